// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::time::Duration;

/// Default staleness window for catalog lists.
pub const DEFAULT_CATALOG_STALE_AFTER: Duration = Duration::from_secs(10 * 60);

/// Default staleness window for dashboard metrics.
pub const DEFAULT_METRICS_STALE_AFTER: Duration = Duration::from_secs(5 * 60);

/// Default capacity of the cache event channel.
pub const DEFAULT_EVENT_BUFFER: usize = 100;

/// Tuning for the catalog and metrics caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheConfig {
    /// Age after which a catalog list is revalidated on access.
    pub catalog_stale_after: Duration,
    /// Age after which a metrics payload is revalidated on access.
    pub metrics_stale_after: Duration,
    /// Capacity of each cache's event channel. Slow subscribers that fall
    /// further behind than this miss events.
    pub event_buffer: usize,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            catalog_stale_after: DEFAULT_CATALOG_STALE_AFTER,
            metrics_stale_after: DEFAULT_METRICS_STALE_AFTER,
            event_buffer: DEFAULT_EVENT_BUFFER,
        }
    }
}
