// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Cascading scope selection for the sentiment dashboard.
//!
//! A `SelectionState` changes only through [`apply`]. Choosing a new filter
//! type clears every selected value; choosing a department clears professor
//! and course; choosing a professor clears the course. [`emit`] turns a
//! selection into the `MetricsScope` sent to the metrics backend, and is
//! invoked by `Command::Apply` rather than on every change.

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

mod apply;
mod command;
mod query;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::apply;
pub use command::Command;
pub use query::{MetricsScope, ScopeQuery, emit};
pub use state::{SelectionState, TransitionResult};
