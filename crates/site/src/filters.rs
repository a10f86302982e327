//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Formats a `NaiveDate` as "June 18, 2025".
///
/// Usage in templates: `{{ post.published_at|long_date }}`
#[allow(clippy::unnecessary_wraps)]
#[askama::filter_fn]
pub fn long_date(
    value: &chrono::NaiveDate,
    _env: &dyn askama::Values,
) -> askama::Result<String> {
    Ok(value.format("%B %-d, %Y").to_string())
}
