use chrono::NaiveDate;
use entity::{EmploymentStatus, employee};
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    EntityTrait, QueryFilter, QueryOrder,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use validator::Validate;

use crate::{ApiError, ApiResult, load, nullable, validated};

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct EmployeeCreate {
    #[validate(length(min = 1, max = 50))]
    pub employee_id: String,
    pub user_id: i32,
    #[validate(length(max = 100))]
    pub first_name: String,
    #[validate(length(max = 100))]
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    #[validate(length(max = 20))]
    pub phone: String,
    #[validate(length(max = 500))]
    pub address: String,
    #[validate(length(max = 100))]
    pub emergency_contact_name: String,
    #[validate(length(max = 20))]
    pub emergency_contact_phone: String,
    pub hire_date: NaiveDate,
    #[serde(default)]
    pub department_id: Option<i32>,
    #[serde(default)]
    pub position_id: Option<i32>,
    #[serde(default)]
    pub manager_id: Option<i32>,
}

/// Partial update. For the three references, `null` clears the link and an
/// absent key leaves it untouched.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct EmployeeUpdate {
    #[validate(length(max = 100))]
    pub first_name: Option<String>,
    #[validate(length(max = 100))]
    pub last_name: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    #[validate(length(max = 500))]
    pub address: Option<String>,
    #[validate(length(max = 100))]
    pub emergency_contact_name: Option<String>,
    #[validate(length(max = 20))]
    pub emergency_contact_phone: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub department_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub position_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "nullable")]
    pub manager_id: Option<Option<i32>>,
    pub employment_status: Option<EmploymentStatus>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EmployeeResponse {
    pub id: i32,
    pub employee_id: String,
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    pub date_of_birth: NaiveDate,
    pub phone: String,
    pub address: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub hire_date: NaiveDate,
    pub employment_status: EmploymentStatus,
    pub department_id: Option<i32>,
    pub position_id: Option<i32>,
    pub manager_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

impl From<employee::Model> for EmployeeResponse {
    fn from(model: employee::Model) -> Self {
        Self {
            full_name: model.full_name(),
            id: model.id,
            employee_id: model.employee_id,
            user_id: model.user_id,
            first_name: model.first_name,
            last_name: model.last_name,
            date_of_birth: model.date_of_birth,
            phone: model.phone,
            address: model.address,
            emergency_contact_name: model.emergency_contact_name,
            emergency_contact_phone: model.emergency_contact_phone,
            hire_date: model.hire_date,
            employment_status: model.employment_status,
            department_id: model.department_id,
            position_id: model.position_id,
            manager_id: model.manager_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl EmployeeCreate {
    pub fn into_active_model(self) -> employee::ActiveModel {
        employee::ActiveModel {
            employee_id: Set(self.employee_id),
            user_id: Set(self.user_id),
            first_name: Set(self.first_name),
            last_name: Set(self.last_name),
            date_of_birth: Set(self.date_of_birth),
            phone: Set(self.phone),
            address: Set(self.address),
            emergency_contact_name: Set(self.emergency_contact_name),
            emergency_contact_phone: Set(self.emergency_contact_phone),
            hire_date: Set(self.hire_date),
            department_id: Set(self.department_id),
            position_id: Set(self.position_id),
            manager_id: Set(self.manager_id),
            ..employee::ActiveModel::new()
        }
    }
}

impl EmployeeUpdate {
    pub fn apply(self, active: &mut employee::ActiveModel) {
        if let Some(first_name) = self.first_name {
            active.first_name = Set(first_name);
        }
        if let Some(last_name) = self.last_name {
            active.last_name = Set(last_name);
        }
        if let Some(phone) = self.phone {
            active.phone = Set(phone);
        }
        if let Some(address) = self.address {
            active.address = Set(address);
        }
        if let Some(name) = self.emergency_contact_name {
            active.emergency_contact_name = Set(name);
        }
        if let Some(phone) = self.emergency_contact_phone {
            active.emergency_contact_phone = Set(phone);
        }
        if let Some(department_id) = self.department_id {
            active.department_id = Set(department_id);
        }
        if let Some(position_id) = self.position_id {
            active.position_id = Set(position_id);
        }
        if let Some(manager_id) = self.manager_id {
            active.manager_id = Set(manager_id);
        }
        if let Some(status) = self.employment_status {
            active.employment_status = Set(status);
        }
    }
}

#[instrument(name = "hr.employees.create", skip_all, fields(employee_id = %payload.employee_id))]
pub async fn create<C>(db: &C, payload: EmployeeCreate) -> ApiResult<employee::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    Ok(payload.into_active_model().insert(db).await?)
}

#[instrument(name = "hr.employees.update", skip(db, payload))]
pub async fn update<C>(db: &C, id: i32, payload: EmployeeUpdate) -> ApiResult<employee::Model>
where
    C: ConnectionTrait,
{
    let payload = validated(payload)?;
    let current = load::<employee::Entity, _>(db, id).await?;
    if let Some(Some(manager_id)) = payload.manager_id {
        ensure_no_reporting_cycle(db, &current, manager_id).await?;
    }
    let mut active: employee::ActiveModel = current.into();
    payload.apply(&mut active);
    Ok(active.update(db).await?)
}

pub async fn get<C>(db: &C, id: i32) -> ApiResult<employee::Model>
where
    C: ConnectionTrait,
{
    load::<employee::Entity, _>(db, id).await
}

pub async fn find_by_employee_id<C>(db: &C, employee_id: &str) -> ApiResult<employee::Model>
where
    C: ConnectionTrait,
{
    employee::Entity::find()
        .filter(employee::Column::EmployeeId.eq(employee_id))
        .one(db)
        .await?
        .ok_or(ApiError::NotFound)
}

pub async fn list_by_department<C>(db: &C, department_id: i32) -> ApiResult<Vec<employee::Model>>
where
    C: ConnectionTrait,
{
    Ok(employee::Entity::find()
        .filter(employee::Column::DepartmentId.eq(department_id))
        .order_by_asc(employee::Column::LastName)
        .order_by_asc(employee::Column::FirstName)
        .all(db)
        .await?)
}

/// Rejects a manager assignment that would make `employee` report to itself,
/// directly or through the proposed manager's own chain.
async fn ensure_no_reporting_cycle<C>(
    db: &C,
    employee: &employee::Model,
    manager_id: i32,
) -> ApiResult<()>
where
    C: ConnectionTrait,
{
    if manager_id == employee.id {
        return Err(ApiError::InvalidInput(
            "an employee cannot manage themselves".into(),
        ));
    }
    let manager = load::<employee::Entity, _>(db, manager_id).await?;
    let chain = manager.reporting_line(db).await?;
    if chain.iter().any(|above| above.id == employee.id) {
        return Err(ApiError::InvalidInput(format!(
            "employee {} already reports to {}",
            manager.employee_id, employee.employee_id
        )));
    }
    Ok(())
}
