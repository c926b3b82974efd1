use chrono::NaiveDate;
use entity::contract;
use rust_decimal::Decimal;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::instrument;
use validator::Validate;

use crate::validation::money;
use crate::{ApiResult, load, nullable, validated};

fn default_working_hours() -> i32 {
    40
}

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct ContractCreate {
    pub employee_id: i32,
    /// Permanent, Contract, Temporary.
    #[validate(length(min = 1, max = 50))]
    pub contract_type: String,
    pub start_date: NaiveDate,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[validate(custom(function = "money"))]
    pub base_salary: Decimal,
    #[serde(default)]
    pub allowances: Map<String, Value>,
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default = "default_working_hours")]
    #[validate(range(min = 1, max = 168))]
    pub working_hours: i32,
    #[serde(default)]
    pub signed_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct ContractUpdate {
    #[validate(length(min = 1, max = 50))]
    pub contract_type: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub end_date: Option<Option<NaiveDate>>,
    #[validate(custom(function = "money"))]
    pub base_salary: Option<Decimal>,
    pub allowances: Option<Map<String, Value>>,
    pub benefits: Option<Vec<String>>,
    #[validate(range(min = 1, max = 168))]
    pub working_hours: Option<i32>,
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "nullable")]
    pub signed_date: Option<Option<NaiveDate>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContractResponse {
    pub id: i32,
    pub employee_id: i32,
    pub contract_type: String,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub base_salary: Decimal,
    pub allowances: Value,
    pub benefits: Value,
    pub working_hours: i32,
    pub is_active: bool,
    pub signed_date: Option<NaiveDate>,
    pub created_at: DateTimeWithTimeZone,
}

impl From<contract::Model> for ContractResponse {
    fn from(model: contract::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            contract_type: model.contract_type,
            start_date: model.start_date,
            end_date: model.end_date,
            base_salary: model.base_salary,
            allowances: model.allowances,
            benefits: model.benefits,
            working_hours: model.working_hours,
            is_active: model.is_active,
            signed_date: model.signed_date,
            created_at: model.created_at,
        }
    }
}

fn benefit_list(benefits: Vec<String>) -> Value {
    Value::Array(benefits.into_iter().map(Value::String).collect())
}

impl ContractCreate {
    pub fn into_active_model(self) -> contract::ActiveModel {
        contract::ActiveModel {
            employee_id: Set(self.employee_id),
            contract_type: Set(self.contract_type),
            start_date: Set(self.start_date),
            end_date: Set(self.end_date),
            base_salary: Set(self.base_salary),
            allowances: Set(Value::Object(self.allowances)),
            benefits: Set(benefit_list(self.benefits)),
            working_hours: Set(self.working_hours),
            signed_date: Set(self.signed_date),
            ..contract::ActiveModel::new()
        }
    }
}

impl ContractUpdate {
    pub fn apply(self, active: &mut contract::ActiveModel) {
        if let Some(contract_type) = self.contract_type {
            active.contract_type = Set(contract_type);
        }
        if let Some(end_date) = self.end_date {
            active.end_date = Set(end_date);
        }
        if let Some(base_salary) = self.base_salary {
            active.base_salary = Set(base_salary);
        }
        if let Some(allowances) = self.allowances {
            active.allowances = Set(Value::Object(allowances));
        }
        if let Some(benefits) = self.benefits {
            active.benefits = Set(benefit_list(benefits));
        }
        if let Some(hours) = self.working_hours {
            active.working_hours = Set(hours);
        }
        if let Some(is_active) = self.is_active {
            active.is_active = Set(is_active);
        }
        if let Some(signed_date) = self.signed_date {
            active.signed_date = Set(signed_date);
        }
    }
}

#[instrument(name = "hr.contracts.create", skip_all, fields(employee = payload.employee_id))]
pub async fn create<C>(db: &C, payload: ContractCreate) -> ApiResult<contract::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    Ok(payload.into_active_model().insert(db).await?)
}

#[instrument(name = "hr.contracts.update", skip(db, payload))]
pub async fn update<C>(db: &C, id: i32, payload: ContractUpdate) -> ApiResult<contract::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let mut active: contract::ActiveModel = load::<contract::Entity, _>(db, id).await?.into();
    payload.apply(&mut active);
    Ok(active.update(db).await?)
}

/// Most recently started active contract that covers `day`.
pub async fn current_for<C>(
    db: &C,
    employee_id: i32,
    day: NaiveDate,
) -> ApiResult<Option<contract::Model>>
where
    C: ConnectionTrait,
{
    let contracts = contract::Entity::find()
        .filter(contract::Column::EmployeeId.eq(employee_id))
        .filter(contract::Column::IsActive.eq(true))
        .filter(contract::Column::StartDate.lte(day))
        .order_by_desc(contract::Column::StartDate)
        .all(db)
        .await?;
    Ok(contracts.into_iter().find(|c| c.covers(day)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_optional_containers() {
        let parsed: ContractCreate = serde_json::from_value(serde_json::json!({
            "employee_id": 1,
            "contract_type": "Permanent",
            "start_date": "2024-01-01",
            "base_salary": "4200.00"
        }))
        .unwrap();
        assert!(parsed.validate().is_ok());
        assert_eq!(parsed.working_hours, 40);

        let active = parsed.into_active_model();
        assert_eq!(active.allowances.as_ref(), &serde_json::json!({}));
        assert_eq!(active.benefits.as_ref(), &serde_json::json!([]));
        assert_eq!(active.is_active.as_ref(), &true);
    }

    #[test]
    fn working_week_is_bounded() {
        let mut update = ContractUpdate {
            working_hours: Some(0),
            ..ContractUpdate::default()
        };
        assert!(update.validate().is_err());
        update.working_hours = Some(37);
        assert!(update.validate().is_ok());
    }

    #[test]
    fn benefits_are_stored_as_a_json_list() {
        let update = ContractUpdate {
            benefits: Some(vec!["health".into(), "pension".into()]),
            ..ContractUpdate::default()
        };
        let mut active = contract::ActiveModel::new();
        update.apply(&mut active);
        assert_eq!(
            active.benefits.as_ref(),
            &serde_json::json!(["health", "pension"])
        );
    }
}
