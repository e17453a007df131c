// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::FetchError;
use async_trait::async_trait;
use senti_dash_domain::{Course, Department, Professor, ProfessorId};

/// The backend that serves the catalog lists.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Lists every department.
    async fn list_departments(&self) -> Result<Vec<Department>, FetchError>;

    /// Lists professors, optionally only those of `department`.
    async fn list_professors(&self, department: Option<&str>)
    -> Result<Vec<Professor>, FetchError>;

    /// Lists courses, optionally only those taught by `professor_id`.
    async fn list_courses(
        &self,
        professor_id: Option<ProfessorId>,
    ) -> Result<Vec<Course>, FetchError>;
}
