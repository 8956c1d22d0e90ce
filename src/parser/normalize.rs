//! Numeric normalization for listing text
//!
//! Prices, areas and room counts arrive as free-form text such as
//! `"3.5 tỷ VND"`, `"70 m²"` or `"2 PN"`. These helpers pull the first
//! numeric run out of such text.
//!
//! There is no locale handling: a dotted thousands figure like `"1.234.567"`
//! is read as a single run, which is not a valid number.

use regex::Regex;
use std::sync::LazyLock;

use crate::utils::error::ExtractError;

// A run of digits and dots containing at least one digit
static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9.]*[0-9][0-9.]*").expect("Invalid regex pattern"));

/// Extract the first numeric value from text
///
/// Returns `None` for absent or empty input, for text without digits, and for
/// a numeric run that is not a valid number.
///
/// # Examples
///
/// ```
/// use rever_crawler::parser::normalize::extract_number;
///
/// assert_eq!(extract_number(Some("3.5 tỷ")), Some(3.5));
/// assert_eq!(extract_number(Some("Thỏa thuận")), None);
/// assert_eq!(extract_number(None), None);
/// ```
pub fn extract_number(text: Option<&str>) -> Option<f64> {
    try_extract_number(text).ok().flatten()
}

/// Strict form of [`extract_number`]
///
/// A numeric run that does not parse (`"1.2.3"`) is an error instead of
/// `None`, so the caller can drop the listing rather than lose the field.
///
/// # Errors
///
/// Returns `ExtractError::InvalidNumber` when the first run is not a number
pub fn try_extract_number(text: Option<&str>) -> Result<Option<f64>, ExtractError> {
    let Some(text) = text.filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    let Some(run) = NUMBER_REGEX.find(text) else {
        return Ok(None);
    };

    run.as_str()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| ExtractError::InvalidNumber {
            field: "text",
            raw: run.as_str().to_string(),
        })
}

/// Remove every occurrence of each token from text
///
/// # Examples
///
/// ```
/// use rever_crawler::parser::normalize::strip_tokens;
///
/// assert_eq!(strip_tokens("3.5 tỷ VND", &["tỷ", "VND"]), "3.5  ");
/// ```
pub fn strip_tokens(text: &str, tokens: &[&str]) -> String {
    tokens
        .iter()
        .fold(text.to_string(), |acc, token| acc.replace(token, ""))
}

/// Convert a normalized count to an integer
///
/// Truncates toward zero. Zero counts as absent, the way the site shows an
/// unknown room count.
///
/// # Errors
///
/// Returns `ExtractError::InvalidCount` for values outside the `i64` range
pub fn to_count(value: Option<f64>) -> Result<Option<i64>, ExtractError> {
    match value {
        None => Ok(None),
        Some(v) if v == 0.0 => Ok(None),
        Some(v) if v.is_finite() && v.abs() < i64::MAX as f64 => Ok(Some(v.trunc() as i64)),
        Some(v) => Err(ExtractError::InvalidCount {
            field: "text",
            value: v,
        }),
    }
}
