//! Input validation for the UI boundary.
//!
//! The ledger store trusts what it receives; front-ends run user input
//! through these helpers first and surface [`EngineError::Validation`]
//! to the user instead of writing anything.

use chrono::{Datelike, NaiveDateTime};

use crate::{EngineError, ResultEngine};

/// Years that encode to exactly four digits.
pub const YEAR_RANGE: std::ops::RangeInclusive<i32> = 0..=9999;

/// Trims a name and rejects it when nothing is left.
pub fn normalize_name(value: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation(
            "name must not be empty".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

/// Rejects amounts that are not strictly positive finite numbers.
pub fn validate_amount(amount: f64) -> ResultEngine<f64> {
    if !amount.is_finite() || amount <= 0.0 {
        return Err(EngineError::Validation(format!(
            "amount must be > 0, got {amount}"
        )));
    }
    Ok(amount)
}

/// Rejects dates whose year does not fit the four-digit storage encoding.
pub fn validate_date(date: NaiveDateTime) -> ResultEngine<NaiveDateTime> {
    if !YEAR_RANGE.contains(&date.year()) {
        return Err(EngineError::Validation(format!(
            "year must be between 0 and 9999, got {}",
            date.year()
        )));
    }
    Ok(date)
}

/// Parses a user typed amount.
///
/// Accepts `.` or `,` as decimal separator. Signs, exponents and anything
/// other than digits and a single separator are rejected.
pub fn parse_amount(value: &str) -> ResultEngine<f64> {
    let invalid = || EngineError::Validation(format!("invalid amount: '{}'", value.trim()));

    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Validation("empty amount".to_string()));
    }

    let normalized = trimmed.replace(',', ".");
    let mut parts = normalized.split('.');
    let whole = parts.next().unwrap_or_default();
    let fraction = parts.next();
    if parts.next().is_some() {
        return Err(invalid());
    }

    let digits_only = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if whole.is_empty() && fraction.is_none_or(str::is_empty) {
        return Err(invalid());
    }
    if !digits_only(whole) || !fraction.is_none_or(digits_only) {
        return Err(invalid());
    }

    let amount: f64 = normalized.parse().map_err(|_| invalid())?;
    validate_amount(amount)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_is_trimmed() {
        assert_eq!(normalize_name("  Coffee\t").unwrap(), "Coffee");
        assert!(matches!(
            normalize_name(" \n "),
            Err(EngineError::Validation(_))
        ));
    }

    #[test]
    fn amount_must_be_positive() {
        assert_eq!(validate_amount(0.01).unwrap(), 0.01);
        assert!(validate_amount(0.0).is_err());
        assert!(validate_amount(-3.0).is_err());
        assert!(validate_amount(f64::NAN).is_err());
        assert!(validate_amount(f64::INFINITY).is_err());
    }

    #[test]
    fn dates_need_a_four_digit_year() {
        let date = |y| {
            chrono::NaiveDate::from_ymd_opt(y, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        };
        assert_eq!(validate_date(date(2026)).unwrap(), date(2026));
        assert!(validate_date(date(0)).is_ok());
        assert!(validate_date(date(9999)).is_ok());
        assert!(matches!(
            validate_date(date(10000)),
            Err(EngineError::Validation(_))
        ));
        assert!(validate_date(date(-1)).is_err());
    }

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!(parse_amount("25.50").unwrap(), 25.5);
        assert_eq!(parse_amount("25,50").unwrap(), 25.5);
        assert_eq!(parse_amount(" 7 ").unwrap(), 7.0);
        assert_eq!(parse_amount(".5").unwrap(), 0.5);
        assert_eq!(parse_amount("3.").unwrap(), 3.0);
    }

    #[test]
    fn parse_rejects_malformed_input() {
        for raw in ["", "  ", ".", "abc", "1.2.3", "-4", "+4", "1e3", "inf", "NaN", "0", "0.00"] {
            assert!(parse_amount(raw).is_err(), "{raw:?} should be rejected");
        }
    }
}
