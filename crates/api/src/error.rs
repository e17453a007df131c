// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use senti_dash_catalog::FetchError;
use senti_dash_domain::DomainError;

/// API-level errors.
///
/// These are distinct from domain and fetch errors and represent the API
/// contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The backend could not serve the request.
    BackendUnavailable {
        /// A human-readable description of the failure.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::BackendUnavailable { message } => {
                write!(f, "Backend unavailable: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::UnknownScopeKind(value) => ApiError::InvalidInput {
            field: String::from("kind"),
            message: format!("Unknown scope kind '{value}'"),
        },
        DomainError::InvalidProfessorId(value) => ApiError::InvalidInput {
            field: String::from("professor_id"),
            message: format!("'{value}' is not a valid professor id"),
        },
        DomainError::InvalidCourseId(value) => ApiError::InvalidInput {
            field: String::from("course_id"),
            message: format!("'{value}' is not a valid course id"),
        },
        DomainError::UnknownCatalogList(value) => ApiError::ResourceNotFound {
            resource_type: String::from("Catalog list"),
            message: format!("No catalog list named '{value}'"),
        },
        err @ (DomainError::DuplicateDepartment(_)
        | DomainError::InvalidTrendDate { .. }
        | DomainError::TrendOutOfOrder { .. }) => ApiError::BackendUnavailable {
            message: err.to_string(),
        },
    }
}

/// Translates a fetch error into an API error.
///
/// Fetch failures all originate at the backend, including data that fails
/// validation.
#[must_use]
pub fn translate_fetch_error(err: FetchError) -> ApiError {
    ApiError::BackendUnavailable {
        message: err.to_string(),
    }
}
