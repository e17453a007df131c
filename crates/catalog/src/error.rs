// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Errors raised while fetching catalog or metrics data.

use senti_dash_domain::DomainError;
use thiserror::Error;

/// A failed fetch.
///
/// Fetch errors are captured by the cache and exposed as per-key state; they
/// never propagate into the selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The request did not reach the backend or the connection failed.
    #[error("Request to backend failed: {message}")]
    Transport {
        /// A description of the transport failure.
        message: String,
    },
    /// The backend answered with a non-success status.
    #[error("Backend returned status {status}: {message}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The response body or error message.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("Failed to decode backend response: {message}")]
    Decode {
        /// The decoding error message.
        message: String,
    },
    /// The response decoded but violates a catalog rule.
    #[error("Backend returned invalid data: {0}")]
    Invalid(DomainError),
}

impl FetchError {
    /// Whether repeating the same request might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Decode { .. } | Self::Invalid(_) => false,
        }
    }
}

impl From<DomainError> for FetchError {
    fn from(err: DomainError) -> Self {
        Self::Invalid(err)
    }
}
