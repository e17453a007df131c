// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use crate::metrics::TrendPoint;
use crate::types::Department;
use std::collections::HashSet;
use time::Date;
use time::macros::format_description;

/// Validates that department names are unique within one catalog response.
///
/// Names are compared case-sensitively: they are the natural key used by
/// the professor filter.
///
/// # Errors
///
/// Returns `DomainError::DuplicateDepartment` naming the first repeated name.
pub fn validate_unique_departments(departments: &[Department]) -> Result<(), DomainError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(departments.len());
    for department in departments {
        if !seen.insert(department.name.as_str()) {
            return Err(DomainError::DuplicateDepartment(department.name.clone()));
        }
    }
    Ok(())
}

/// Parses a trend point date.
///
/// # Errors
///
/// Returns `DomainError::InvalidTrendDate` if the string is not `YYYY-MM-DD`.
pub fn parse_trend_date(date: &str) -> Result<Date, DomainError> {
    Date::parse(date, format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::InvalidTrendDate {
            date: date.to_string(),
            error: e.to_string(),
        }
    })
}

/// Validates that trend points are in chronological order.
///
/// Repeated dates are allowed.
///
/// # Errors
///
/// Returns an error if:
/// - A date cannot be parsed
/// - A point is dated before the point that precedes it
pub fn validate_trend_order(points: &[TrendPoint]) -> Result<(), DomainError> {
    let mut previous: Option<(Date, &str)> = None;
    for point in points {
        let date: Date = parse_trend_date(&point.date)?;
        if let Some((prev_date, prev_str)) = previous
            && date < prev_date
        {
            return Err(DomainError::TrendOutOfOrder {
                previous: prev_str.to_string(),
                current: point.date.clone(),
            });
        }
        previous = Some((date, point.date.as_str()));
    }
    Ok(())
}
