// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory caches for the dashboard's catalog lists.
//!
//! [`QueryCache`] is the keyed cache behind every list: one in-flight fetch
//! per key shared by all waiters, per-key error state with explicit retry,
//! stale-while-revalidate past a configurable age, and a broadcast stream of
//! [`CacheEvent`]s. [`CatalogCache`] puts a [`CatalogSource`] behind three of
//! them.

#![deny(
    clippy::pedantic,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod catalog;
mod config;
mod error;
mod query_cache;
mod source;

#[cfg(test)]
mod tests;

pub use catalog::CatalogCache;
pub use config::{
    CacheConfig, DEFAULT_CATALOG_STALE_AFTER, DEFAULT_EVENT_BUFFER, DEFAULT_METRICS_STALE_AFTER,
};
pub use error::FetchError;
pub use query_cache::{CacheEvent, QueryCache, QueryState};
pub use source::CatalogSource;
