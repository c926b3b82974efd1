use std::borrow::Cow;
use std::net::IpAddr;

use entity::constraints::decimal_fits;
use rust_decimal::Decimal;
use validator::ValidationError;

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn two_places(value: &Decimal, precision: u32) -> Result<(), ValidationError> {
    decimal_fits("value", value, precision, 2)
        .map_err(|_| failure("decimal", "must fit the column with at most two decimal places"))
}

fn within(value: &Decimal, min: Decimal, max: Decimal, code: &'static str) -> Result<(), ValidationError> {
    if *value < min || *value > max {
        let mut err = failure(code, "out of range");
        err.add_param(Cow::Borrowed("min"), &min.to_string());
        err.add_param(Cow::Borrowed("max"), &max.to_string());
        return Err(err);
    }
    Ok(())
}

/// Non-negative NUMERIC(12,2) amount.
pub(crate) fn money(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(failure("money", "must not be negative"));
    }
    two_places(value, 12)
}

/// Performance rating on the 1 to 5 scale.
pub(crate) fn rating(value: &Decimal) -> Result<(), ValidationError> {
    within(value, Decimal::ONE, Decimal::from(5), "rating")?;
    two_places(value, 3)
}

/// 0 to 100, two decimal places. Used for goal achievement and training scores.
pub(crate) fn percentage(value: &Decimal) -> Result<(), ValidationError> {
    within(value, Decimal::ZERO, Decimal::ONE_HUNDRED, "percentage")?;
    two_places(value, 5)
}

pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(failure("blank", "must not be blank"));
    }
    Ok(())
}

pub(crate) fn ip_address(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<IpAddr>()
        .map(|_| ())
        .map_err(|_| failure("ip_address", "not an IPv4 or IPv6 address"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    #[test]
    fn rating_bounds_are_inclusive() {
        assert!(rating(&dec("1")).is_ok());
        assert!(rating(&dec("5.00")).is_ok());
        assert!(rating(&dec("3.75")).is_ok());
        assert_eq!(rating(&dec("0.99")).unwrap_err().code, "rating");
        assert_eq!(rating(&dec("5.01")).unwrap_err().code, "rating");
    }

    #[test]
    fn percentage_rejects_outside_zero_to_hundred() {
        assert!(percentage(&dec("0")).is_ok());
        assert!(percentage(&dec("100")).is_ok());
        assert!(percentage(&dec("-0.01")).is_err());
        assert!(percentage(&dec("100.5")).is_err());
    }

    #[test]
    fn money_checks_sign_and_scale() {
        assert!(money(&dec("0")).is_ok());
        assert!(money(&dec("9999999999.99")).is_ok());
        assert_eq!(money(&dec("-1")).unwrap_err().code, "money");
        assert_eq!(money(&dec("10.005")).unwrap_err().code, "decimal");
    }

    #[test]
    fn ip_addresses_of_both_families_pass() {
        assert!(ip_address("10.0.0.1").is_ok());
        assert!(ip_address("::1").is_ok());
        assert!(ip_address("localhost").is_err());
    }
}
