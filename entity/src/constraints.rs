//! Column constraints checked in `before_save`, so a bad value never reaches SQL.
//!
//! Only values that are `Set` or `Unchanged` are inspected; `NotSet` columns
//! fall back to their database defaults.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use sea_orm::{ActiveValue, DbErr, Value};
use thiserror::Error;

/// Local part, `@`, domain with at least one dot.
pub static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$")
        .expect("email pattern is a valid regex")
});

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("{column}: longer than {max} characters")]
    TooLong { column: &'static str, max: usize },
    #[error("{column}: not a valid email address")]
    Email { column: &'static str },
    #[error("{column}: more than {scale} decimal places")]
    Scale { column: &'static str, scale: u32 },
    #[error("{column}: exceeds {digits} integer digits")]
    Precision { column: &'static str, digits: u32 },
    #[error("{column}: must not be negative")]
    Negative { column: &'static str },
}

impl From<Violation> for DbErr {
    fn from(value: Violation) -> Self {
        DbErr::Custom(value.to_string())
    }
}

fn current<T>(value: &ActiveValue<T>) -> Option<&T>
where
    T: Into<Value>,
{
    match value {
        ActiveValue::Set(inner) | ActiveValue::Unchanged(inner) => Some(inner),
        ActiveValue::NotSet => None,
    }
}

pub fn max_len(
    column: &'static str,
    value: &ActiveValue<String>,
    max: usize,
) -> Result<(), Violation> {
    match current(value) {
        Some(text) if text.chars().count() > max => Err(Violation::TooLong { column, max }),
        _ => Ok(()),
    }
}

pub fn max_len_opt(
    column: &'static str,
    value: &ActiveValue<Option<String>>,
    max: usize,
) -> Result<(), Violation> {
    match current(value).and_then(Option::as_ref) {
        Some(text) if text.chars().count() > max => Err(Violation::TooLong { column, max }),
        _ => Ok(()),
    }
}

pub fn email(column: &'static str, value: &ActiveValue<String>) -> Result<(), Violation> {
    match current(value) {
        Some(text) if !EMAIL_PATTERN.is_match(text) => Err(Violation::Email { column }),
        _ => Ok(()),
    }
}

/// `NUMERIC(precision, scale)` check for a decimal value.
pub fn decimal_fits(
    column: &'static str,
    value: &Decimal,
    precision: u32,
    scale: u32,
) -> Result<(), Violation> {
    if value.normalize().scale() > scale {
        return Err(Violation::Scale { column, scale });
    }
    let digits = precision - scale;
    let limit = Decimal::from(10u64.pow(digits));
    if value.abs().trunc() >= limit {
        return Err(Violation::Precision { column, digits });
    }
    Ok(())
}

pub fn numeric(
    column: &'static str,
    value: &ActiveValue<Decimal>,
    precision: u32,
    scale: u32,
) -> Result<(), Violation> {
    match current(value) {
        Some(amount) => decimal_fits(column, amount, precision, scale),
        None => Ok(()),
    }
}

pub fn numeric_opt(
    column: &'static str,
    value: &ActiveValue<Option<Decimal>>,
    precision: u32,
    scale: u32,
) -> Result<(), Violation> {
    match current(value).and_then(Option::as_ref) {
        Some(amount) => decimal_fits(column, amount, precision, scale),
        None => Ok(()),
    }
}

pub fn non_negative(column: &'static str, value: &ActiveValue<i64>) -> Result<(), Violation> {
    match current(value) {
        Some(n) if *n < 0 => Err(Violation::Negative { column }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
    use std::str::FromStr;

    #[test]
    fn email_pattern_accepts_plain_addresses() {
        assert!(EMAIL_PATTERN.is_match("jane.doe+hr@example.co.uk"));
        assert!(EMAIL_PATTERN.is_match("a_b@corp-mail.com"));
    }

    #[test]
    fn email_pattern_rejects_malformed_addresses() {
        for bad in ["plain", "no-domain@", "@example.com", "a@b", "a b@example.com"] {
            assert!(!EMAIL_PATTERN.is_match(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn unset_columns_are_skipped() {
        assert!(max_len("t.c", &NotSet, 1).is_ok());
        assert!(email("t.c", &NotSet).is_ok());
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let value = Set("ééé".to_string());
        assert!(max_len("t.c", &value, 3).is_ok());
        assert_eq!(
            max_len("t.c", &value, 2),
            Err(Violation::TooLong { column: "t.c", max: 2 })
        );
    }

    #[test]
    fn unchanged_values_are_still_checked() {
        let value = Unchanged("not-an-email".to_string());
        assert_eq!(
            email("hrd_users.email", &value),
            Err(Violation::Email { column: "hrd_users.email" })
        );
    }

    #[test]
    fn decimals_respect_precision_and_scale() {
        let ok = Decimal::from_str("9999999999.99").unwrap();
        assert!(decimal_fits("c", &ok, 12, 2).is_ok());

        let trailing_zeros = Decimal::from_str("10.5000").unwrap();
        assert!(decimal_fits("c", &trailing_zeros, 12, 2).is_ok());

        let too_fine = Decimal::from_str("1.234").unwrap();
        assert!(matches!(
            decimal_fits("c", &too_fine, 12, 2),
            Err(Violation::Scale { scale: 2, .. })
        ));

        let too_big = Decimal::from_str("10000000000").unwrap();
        assert!(matches!(
            decimal_fits("c", &too_big, 12, 2),
            Err(Violation::Precision { digits: 10, .. })
        ));
    }

    #[test]
    fn violation_becomes_custom_db_error() {
        let err: DbErr = Violation::Negative { column: "hrd_documents.file_size" }.into();
        assert!(matches!(
            err,
            DbErr::Custom(ref msg) if msg == "hrd_documents.file_size: must not be negative"
        ));
    }
}
