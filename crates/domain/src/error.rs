// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The scope kind is not one of `department`, `professor` or `course`.
    UnknownScopeKind(String),
    /// A professor identifier could not be parsed.
    InvalidProfessorId(String),
    /// A course identifier could not be parsed.
    InvalidCourseId(String),
    /// The catalog list name is not `departments`, `professors` or `courses`.
    UnknownCatalogList(String),
    /// A department name appears more than once in a single catalog response.
    DuplicateDepartment(String),
    /// A trend point carries a date that is not `YYYY-MM-DD`.
    InvalidTrendDate {
        /// The offending date string.
        date: String,
        /// The parsing error message.
        error: String,
    },
    /// Trend points are not in chronological order.
    TrendOutOfOrder {
        /// The date of the earlier point in the sequence.
        previous: String,
        /// The date that precedes it in time.
        current: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownScopeKind(value) => write!(
                f,
                "Unknown scope kind '{value}': expected department, professor or course"
            ),
            Self::InvalidProfessorId(value) => write!(f, "Invalid professor id: '{value}'"),
            Self::InvalidCourseId(value) => write!(f, "Invalid course id: '{value}'"),
            Self::UnknownCatalogList(value) => write!(f, "Unknown catalog list '{value}'"),
            Self::DuplicateDepartment(name) => {
                write!(f, "Department '{name}' appears more than once in the catalog")
            }
            Self::InvalidTrendDate { date, error } => {
                write!(f, "Failed to parse trend date '{date}': {error}")
            }
            Self::TrendOutOfOrder { previous, current } => {
                write!(f, "Trend point {current} follows later point {previous}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
