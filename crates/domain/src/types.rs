// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The dimension a filter panel is currently set to.
///
/// `None` is the initial value and means "no filter": the dashboard shows the
/// globally unscoped metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScopeKind {
    /// No scope selected.
    #[default]
    None,
    /// Filter by department name.
    Department,
    /// Filter by professor id.
    Professor,
    /// Filter by course id.
    Course,
}

impl ScopeKind {
    /// Converts this kind to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Department => "department",
            Self::Professor => "professor",
            Self::Course => "course",
        }
    }

    /// Returns the emitted scope for this kind, or `None` for [`ScopeKind::None`].
    #[must_use]
    pub const fn scope(&self) -> Option<Scope> {
        match self {
            Self::None => None,
            Self::Department => Some(Scope::Department),
            Self::Professor => Some(Scope::Professor),
            Self::Course => Some(Scope::Course),
        }
    }
}

impl FromStr for ScopeKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "none" | "all" => Ok(Self::None),
            "department" => Ok(Self::Department),
            "professor" => Ok(Self::Professor),
            "course" => Ok(Self::Course),
            other => Err(DomainError::UnknownScopeKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for ScopeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A scope that can actually be sent to the metrics backend.
///
/// This is [`ScopeKind`] without its `None` variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Metrics for one department.
    Department,
    /// Metrics for one professor.
    Professor,
    /// Metrics for one course.
    Course,
}

impl Scope {
    /// Converts this scope to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Department => "department",
            Self::Professor => "professor",
            Self::Course => "course",
        }
    }

    /// Returns the selection kind that emits this scope.
    #[must_use]
    pub const fn kind(&self) -> ScopeKind {
        match self {
            Self::Department => ScopeKind::Department,
            Self::Professor => ScopeKind::Professor,
            Self::Course => ScopeKind::Course,
        }
    }
}

impl FromStr for Scope {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ScopeKind::from_str(s)?
            .scope()
            .ok_or_else(|| DomainError::UnknownScopeKind(s.to_string()))
    }
}

impl std::fmt::Display for Scope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stable identity of a professor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfessorId(u32);

impl ProfessorId {
    /// Wraps a raw professor id.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl FromStr for ProfessorId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| DomainError::InvalidProfessorId(s.to_string()))
    }
}

impl std::fmt::Display for ProfessorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stable identity of a course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CourseId(u32);

impl CourseId {
    /// Wraps a raw course id.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the raw id.
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

impl FromStr for CourseId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u32>()
            .map(Self)
            .map_err(|_| DomainError::InvalidCourseId(s.to_string()))
    }
}

impl std::fmt::Display for CourseId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A department as listed by the catalog backend.
///
/// The name is the natural key (case-sensitive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    /// Department name.
    pub name: String,
    /// Number of professors in the department.
    #[serde(rename = "professorCount", alias = "professor_count", default)]
    pub professor_count: u32,
}

impl Department {
    /// Creates a new department snapshot.
    #[must_use]
    pub fn new(name: &str, professor_count: u32) -> Self {
        Self {
            name: name.to_string(),
            professor_count,
        }
    }
}

/// A professor as listed by the catalog backend.
///
/// `department` is a denormalized label, not a reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professor {
    /// Stable identity.
    pub id: ProfessorId,
    /// Display name.
    pub name: String,
    /// Department name this professor belongs to.
    #[serde(default)]
    pub department: String,
}

impl Professor {
    /// Creates a new professor snapshot.
    #[must_use]
    pub fn new(id: u32, name: &str, department: &str) -> Self {
        Self {
            id: ProfessorId::new(id),
            name: name.to_string(),
            department: department.to_string(),
        }
    }
}

/// A course as listed by the catalog backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    /// Stable identity.
    pub id: CourseId,
    /// Display name.
    pub name: String,
    /// Owning department, when the backend reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
}

impl Course {
    /// Creates a new course snapshot.
    #[must_use]
    pub fn new(id: u32, name: &str, department: Option<&str>) -> Self {
        Self {
            id: CourseId::new(id),
            name: name.to_string(),
            department: department.map(str::to_string),
        }
    }
}

/// Anything listed in a catalog by display name.
pub trait Named {
    /// The display name used for ordering.
    fn name(&self) -> &str;
}

impl Named for Department {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Professor {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Course {
    fn name(&self) -> &str {
        &self.name
    }
}

/// The three catalog lists the filter panel can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogList {
    /// All departments.
    Departments,
    /// Professors, optionally narrowed to one department.
    Professors,
    /// Courses, optionally narrowed to one professor.
    Courses,
}

impl CatalogList {
    /// Converts this list to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Departments => "departments",
            Self::Professors => "professors",
            Self::Courses => "courses",
        }
    }
}

impl FromStr for CatalogList {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "departments" => Ok(Self::Departments),
            "professors" => Ok(Self::Professors),
            "courses" => Ok(Self::Courses),
            other => Err(DomainError::UnknownCatalogList(other.to_string())),
        }
    }
}

impl std::fmt::Display for CatalogList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifies one cached catalog list: the list plus the filter it was
/// fetched with.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "list", rename_all = "lowercase")]
pub enum CatalogKey {
    /// The department list.
    Departments,
    /// Professors in `department`, or all professors.
    Professors {
        /// Department name filter.
        department: Option<String>,
    },
    /// Courses taught by `professor_id`, or the full catalog.
    Courses {
        /// Professor filter.
        professor_id: Option<ProfessorId>,
    },
}

impl CatalogKey {
    /// Returns which list this key belongs to.
    #[must_use]
    pub const fn list(&self) -> CatalogList {
        match self {
            Self::Departments => CatalogList::Departments,
            Self::Professors { .. } => CatalogList::Professors,
            Self::Courses { .. } => CatalogList::Courses,
        }
    }
}

impl std::fmt::Display for CatalogKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Departments => write!(f, "departments"),
            Self::Professors { department: None } => write!(f, "professors"),
            Self::Professors {
                department: Some(name),
            } => write!(f, "professors[department={name}]"),
            Self::Courses { professor_id: None } => write!(f, "courses"),
            Self::Courses {
                professor_id: Some(id),
            } => write!(f, "courses[professor={id}]"),
        }
    }
}
