// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{CacheConfig, CacheEvent, CatalogCache, CatalogSource, FetchError};
use async_trait::async_trait;
use senti_dash_domain::{CatalogKey, Course, Department, Professor, ProfessorId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, oneshot};

type Listing<T> = Result<Vec<T>, FetchError>;

/// An in-memory catalog backend that records every call.
///
/// A fetch for a gated key waits until its gate is released.
#[derive(Default)]
pub struct StubCatalog {
    departments: Mutex<Option<Listing<Department>>>,
    professors: Mutex<HashMap<Option<String>, Listing<Professor>>>,
    courses: Mutex<HashMap<Option<ProfessorId>, Listing<Course>>>,
    gates: Mutex<HashMap<CatalogKey, oneshot::Receiver<()>>>,
    calls: Mutex<Vec<CatalogKey>>,
}

impl StubCatalog {
    pub fn set_departments(&self, listing: Listing<Department>) {
        *self.departments.lock().unwrap() = Some(listing);
    }

    pub fn set_professors(&self, department: Option<&str>, listing: Listing<Professor>) {
        self.professors
            .lock()
            .unwrap()
            .insert(department.map(str::to_string), listing);
    }

    pub fn set_courses(&self, professor_id: Option<u32>, listing: Listing<Course>) {
        self.courses
            .lock()
            .unwrap()
            .insert(professor_id.map(ProfessorId::new), listing);
    }

    /// Holds the next fetch of `key` until the returned sender fires.
    pub fn gate(&self, key: CatalogKey) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert(key, rx);
        tx
    }

    pub fn calls_for(&self, key: &CatalogKey) -> usize {
        self.calls.lock().unwrap().iter().filter(|k| *k == key).count()
    }

    async fn enter(&self, key: CatalogKey) {
        self.calls.lock().unwrap().push(key.clone());
        let gate: Option<oneshot::Receiver<()>> = self.gates.lock().unwrap().remove(&key);
        if let Some(gate) = gate {
            let _ = gate.await;
        }
    }
}

#[async_trait]
impl CatalogSource for StubCatalog {
    async fn list_departments(&self) -> Result<Vec<Department>, FetchError> {
        self.enter(CatalogKey::Departments).await;
        self.departments
            .lock()
            .unwrap()
            .clone()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_professors(
        &self,
        department: Option<&str>,
    ) -> Result<Vec<Professor>, FetchError> {
        let department: Option<String> = department.map(str::to_string);
        self.enter(CatalogKey::Professors {
            department: department.clone(),
        })
        .await;
        self.professors
            .lock()
            .unwrap()
            .get(&department)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn list_courses(
        &self,
        professor_id: Option<ProfessorId>,
    ) -> Result<Vec<Course>, FetchError> {
        self.enter(CatalogKey::Courses { professor_id }).await;
        self.courses
            .lock()
            .unwrap()
            .get(&professor_id)
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub fn catalog_with(stub: &Arc<StubCatalog>) -> CatalogCache {
    CatalogCache::new(stub.clone(), &CacheConfig::default())
}

pub fn unavailable() -> FetchError {
    FetchError::Status {
        status: 503,
        message: String::from("service unavailable"),
    }
}

pub fn professors_key(department: &str) -> CatalogKey {
    CatalogKey::Professors {
        department: Some(department.to_string()),
    }
}

pub fn names<T: senti_dash_domain::Named>(items: &[T]) -> Vec<&str> {
    items.iter().map(senti_dash_domain::Named::name).collect()
}

/// Waits for the next event that is not `Loading`.
pub async fn settled<K: Clone>(events: &mut broadcast::Receiver<CacheEvent<K>>) -> CacheEvent<K> {
    loop {
        let event: CacheEvent<K> = events.recv().await.unwrap();
        if !matches!(event, CacheEvent::Loading { .. }) {
            return event;
        }
    }
}
