//! Pay slips: drafting with computed totals and the processed / paid steps.

use std::str::FromStr;

use chrono::NaiveDate;
use entity::{PayrollStatus, payroll};
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{info, instrument};
use validator::{Validate, ValidationError};

use crate::validation::money;
use crate::{ApiError, ApiResult, load, validated};

fn period_in_order(payload: &PayrollCreate) -> Result<(), ValidationError> {
    if payload.pay_period_end < payload.pay_period_start {
        let mut err = ValidationError::new("pay_period");
        err.message = Some("pay period ends before it starts".into());
        return Err(err);
    }
    Ok(())
}

/// Every numeric entry must be a NUMERIC(12,2) amount; other values are notes.
fn amount_entries(entries: &Map<String, Value>) -> Result<(), ValidationError> {
    for (name, value) in entries {
        let numeric = matches!(value, Value::Number(_))
            || matches!(value, Value::String(raw) if Decimal::from_str(raw.trim()).is_ok());
        if !numeric {
            continue;
        }
        let Some(figure) = amount(value) else {
            return Err(ValidationError::new("amount")
                .with_message(format!("{name}: not a representable amount").into()));
        };
        money(&figure).map_err(|err| {
            let reason = err.message.clone().unwrap_or_default();
            err.with_message(format!("{name}: {reason}").into())
        })?;
    }
    Ok(())
}

/// Gross and net are not accepted from callers; see [`PayrollCreate::totals`].
#[derive(Clone, Debug, Deserialize, Validate)]
#[validate(schema(function = "period_in_order"))]
pub struct PayrollCreate {
    pub employee_id: i32,
    pub pay_period_start: NaiveDate,
    pub pay_period_end: NaiveDate,
    #[validate(custom(function = "money"))]
    pub base_salary: Decimal,
    #[serde(default)]
    #[validate(custom(function = "money"))]
    pub overtime_pay: Decimal,
    #[serde(default)]
    #[validate(custom(function = "amount_entries"))]
    pub allowances: Map<String, Value>,
    #[serde(default)]
    #[validate(custom(function = "amount_entries"))]
    pub deductions: Map<String, Value>,
    #[serde(default)]
    #[validate(custom(function = "money"))]
    pub tax_deduction: Decimal,
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct PayrollStatusUpdate {
    pub status: PayrollStatus,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[validate(length(max = 100))]
    pub bank_reference: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PayrollResponse {
    pub id: i32,
    pub employee_id: i32,
    pub pay_period_start: NaiveDate,
    pub pay_period_end: NaiveDate,
    pub base_salary: Decimal,
    pub overtime_pay: Decimal,
    pub allowances: Value,
    pub deductions: Value,
    pub gross_pay: Decimal,
    pub tax_deduction: Decimal,
    pub net_pay: Decimal,
    pub status: PayrollStatus,
    pub processed_by: Option<i32>,
    pub processed_at: Option<DateTimeWithTimeZone>,
    pub payment_date: Option<NaiveDate>,
    pub bank_reference: String,
    pub created_at: DateTimeWithTimeZone,
}

impl From<payroll::Model> for PayrollResponse {
    fn from(model: payroll::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            pay_period_start: model.pay_period_start,
            pay_period_end: model.pay_period_end,
            base_salary: model.base_salary,
            overtime_pay: model.overtime_pay,
            allowances: model.allowances,
            deductions: model.deductions,
            gross_pay: model.gross_pay,
            tax_deduction: model.tax_deduction,
            net_pay: model.net_pay,
            status: model.status,
            processed_by: model.processed_by,
            processed_at: model.processed_at,
            payment_date: model.payment_date,
            bank_reference: model.bank_reference,
            created_at: model.created_at,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PayTotals {
    pub gross: Decimal,
    pub net: Decimal,
}

/// Numbers and numeric strings count; anything else in the map is skipped.
fn amount(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(number) => Decimal::from_str(&number.to_string())
            .or_else(|_| Decimal::from_scientific(&number.to_string()))
            .ok(),
        Value::String(raw) => Decimal::from_str(raw.trim()).ok(),
        _ => None,
    }
}

fn overflow(field: &str) -> ApiError {
    ApiError::InvalidInput(format!("{field}: amount out of range"))
}

fn sum(field: &str, entries: &Map<String, Value>) -> ApiResult<Decimal> {
    entries
        .values()
        .filter_map(amount)
        .try_fold(Decimal::ZERO, |total, figure| total.checked_add(figure))
        .ok_or_else(|| overflow(field))
}

impl PayrollCreate {
    pub fn totals(&self) -> ApiResult<PayTotals> {
        let allowances = sum("allowances", &self.allowances)?;
        let deductions = sum("deductions", &self.deductions)?;
        let gross = self
            .base_salary
            .checked_add(self.overtime_pay)
            .and_then(|pay| pay.checked_add(allowances))
            .ok_or_else(|| overflow("gross_pay"))?
            .round_dp(2);
        let net = gross
            .checked_sub(deductions)
            .and_then(|pay| pay.checked_sub(self.tax_deduction))
            .ok_or_else(|| overflow("net_pay"))?
            .round_dp(2);
        Ok(PayTotals { gross, net })
    }

    pub fn into_active_model(self) -> ApiResult<payroll::ActiveModel> {
        let totals = self.totals()?;
        Ok(payroll::ActiveModel {
            employee_id: Set(self.employee_id),
            pay_period_start: Set(self.pay_period_start),
            pay_period_end: Set(self.pay_period_end),
            base_salary: Set(self.base_salary),
            overtime_pay: Set(self.overtime_pay),
            allowances: Set(Value::Object(self.allowances)),
            deductions: Set(Value::Object(self.deductions)),
            gross_pay: Set(totals.gross),
            tax_deduction: Set(self.tax_deduction),
            net_pay: Set(totals.net),
            ..payroll::ActiveModel::new()
        })
    }
}

/// Stores a draft slip with gross and net computed from the components.
#[instrument(name = "hr.payroll.draft", skip(db, payload), fields(employee_id = payload.employee_id))]
pub async fn draft<C>(db: &C, payload: PayrollCreate) -> ApiResult<payroll::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    Ok(payload.into_active_model()?.insert(db).await?)
}

/// Moves a slip to `payload.status`. `processed` records who processed it;
/// `paid` defaults the payment date to today when none is given.
#[instrument(name = "hr.payroll.set_status", skip(db, payload), fields(status = ?payload.status))]
pub async fn set_status<C>(
    db: &C,
    id: i32,
    processor_id: i32,
    payload: PayrollStatusUpdate,
) -> ApiResult<payroll::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let mut active: payroll::ActiveModel = load::<payroll::Entity, _>(db, id).await?.into();
    match payload.status {
        PayrollStatus::Draft => {}
        PayrollStatus::Processed => {
            active.processed_by = Set(Some(processor_id));
            active.processed_at = Set(Some(entity::now()));
        }
        PayrollStatus::Paid => {
            let paid_on = payload
                .payment_date
                .unwrap_or_else(|| chrono::Utc::now().date_naive());
            active.payment_date = Set(Some(paid_on));
        }
    }
    if let Some(reference) = payload.bank_reference {
        active.bank_reference = Set(reference);
    }
    active.status = Set(payload.status);
    let saved = active.update(db).await?;
    info!(payroll_id = saved.id, "payroll status changed");
    Ok(saved)
}

/// Slips of one employee, latest period first.
pub async fn for_employee<C>(db: &C, employee_id: i32) -> ApiResult<Vec<payroll::Model>>
where
    C: ConnectionTrait,
{
    Ok(payroll::Entity::find()
        .filter(payroll::Column::EmployeeId.eq(employee_id))
        .order_by_desc(payroll::Column::PayPeriodStart)
        .all(db)
        .await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dec(raw: &str) -> Decimal {
        Decimal::from_str(raw).unwrap()
    }

    fn march(raw: Value) -> PayrollCreate {
        let mut body = json!({
            "employee_id": 4,
            "pay_period_start": "2024-03-01",
            "pay_period_end": "2024-03-31",
            "base_salary": "5000.00"
        });
        if let (Value::Object(base), Value::Object(extra)) = (&mut body, raw) {
            base.extend(extra);
        }
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn totals_add_components_and_subtract_deductions() {
        let slip = march(json!({
            "overtime_pay": "250.50",
            "allowances": {"housing": 400, "transport": "120.25", "note": "n/a"},
            "deductions": {"pension": 300.5, "loan": "99.75", "flag": true},
            "tax_deduction": "812.10"
        }));
        let totals = slip.totals().unwrap();
        assert_eq!(totals.gross, dec("5770.75"));
        assert_eq!(totals.net, dec("4558.40"));
    }

    #[test]
    fn bare_slip_nets_to_base() {
        let slip = march(json!({}));
        assert!(slip.validate().is_ok());
        assert_eq!(slip.totals().unwrap(), PayTotals { gross: dec("5000"), net: dec("5000") });

        let active = slip.into_active_model().unwrap();
        assert_eq!(active.status.as_ref(), &PayrollStatus::Draft);
        assert_eq!(active.allowances.as_ref(), &json!({}));
        assert_eq!(active.bank_reference.as_ref(), "");
    }

    #[test]
    fn inverted_period_is_rejected() {
        let slip = march(json!({"pay_period_end": "2024-02-28"}));
        let errors = slip.validate().unwrap_err();
        assert!(errors.errors().contains_key("__all__"));
    }

    #[test]
    fn negative_amounts_are_rejected() {
        let slip = march(json!({"tax_deduction": "-1"}));
        let errors = slip.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("tax_deduction"));
    }

    #[test]
    fn oversized_entries_fail_validation_instead_of_overflowing() {
        let slip = march(json!({
            "allowances": {"a": "79228162514264337593543950335", "b": "1"}
        }));
        let errors = slip.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("allowances"));

        let slip = march(json!({"deductions": {"fine": 10_000_000_000_i64, "memo": "late"}}));
        let errors = slip.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("deductions"));
    }

    #[test]
    fn unvalidated_overflow_is_an_error_not_a_panic() {
        let slip = march(json!({
            "allowances": {"a": "79228162514264337593543950335", "b": "1"}
        }));
        let err = slip.totals().unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn bank_reference_is_bounded() {
        let update = PayrollStatusUpdate {
            status: PayrollStatus::Paid,
            payment_date: None,
            bank_reference: Some("x".repeat(101)),
        };
        assert!(update.validate().is_err());
    }
}
