use std::collections::HashSet;

use crate::constraints;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait, QueryOrder};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "hrd_employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub employee_id: String,
    #[sea_orm(unique)]
    pub user_id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Date,
    pub phone: String,
    pub address: String,
    pub emergency_contact_name: String,
    pub emergency_contact_phone: String,
    pub hire_date: Date,
    pub employment_status: EmploymentStatus,
    #[sea_orm(indexed)]
    pub department_id: Option<i32>,
    #[sea_orm(indexed)]
    pub position_id: Option<i32>,
    #[sea_orm(indexed)]
    pub manager_id: Option<i32>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    User,
    Department,
    Position,
    Manager,
    Contract,
    LeaveRequest,
    TrainingEnrollment,
    PerformanceReview,
    Document,
    Payroll,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::User => Entity::belongs_to(super::user::Entity)
                .from(Column::UserId)
                .to(super::user::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Self::Department => Entity::belongs_to(super::department::Entity)
                .from(Column::DepartmentId)
                .to(super::department::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Self::Position => Entity::belongs_to(super::position::Entity)
                .from(Column::PositionId)
                .to(super::position::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Self::Manager => Entity::belongs_to(Entity)
                .from(Column::ManagerId)
                .to(Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Self::Contract => Entity::has_many(super::contract::Entity).into(),
            Self::LeaveRequest => Entity::has_many(super::leave_request::Entity).into(),
            Self::TrainingEnrollment => {
                Entity::has_many(super::training_enrollment::Entity).into()
            }
            Self::PerformanceReview => {
                Entity::has_many(super::performance_review::Entity).into()
            }
            Self::Document => Entity::has_many(super::document::Entity).into(),
            Self::Payroll => Entity::has_many(super::payroll::Entity).into(),
        }
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::position::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Position.def()
    }
}

impl Related<super::contract::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contract.def()
    }
}

impl Related<super::leave_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LeaveRequest.def()
    }
}

impl Related<super::training_enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrainingEnrollment.def()
    }
}

impl Related<super::performance_review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PerformanceReview.def()
    }
}

impl Related<super::document::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Document.def()
    }
}

impl Related<super::payroll::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Payroll.def()
    }
}

impl Related<super::training_program::Entity> for Entity {
    fn to() -> RelationDef {
        super::training_enrollment::Relation::TrainingProgram.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::training_enrollment::Relation::Employee.def().rev())
    }
}

/// Employee → direct manager, for `find_also_linked` / `find_linked`.
#[derive(Debug)]
pub struct ManagerLink;

impl Linked for ManagerLink {
    type FromEntity = Entity;
    type ToEntity = Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![Relation::Manager.def()]
    }
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub async fn find_manager<C>(&self, db: &C) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        match self.manager_id {
            Some(id) => Entity::find_by_id(id).one(db).await,
            None => Ok(None),
        }
    }

    pub async fn find_subordinates<C>(&self, db: &C) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::ManagerId.eq(self.id))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    /// Managers from the direct one upwards. Stops early if a manager repeats,
    /// since nothing at this layer prevents reporting cycles.
    pub async fn reporting_line<C>(&self, db: &C) -> Result<Vec<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut seen = HashSet::from([self.id]);
        let mut line = Vec::new();
        let mut next = self.manager_id;
        while let Some(id) = next {
            if !seen.insert(id) {
                break;
            }
            let Some(manager) = Entity::find_by_id(id).one(db).await? else {
                break;
            };
            next = manager.manager_id;
            line.push(manager);
        }
        Ok(line)
    }
}

#[derive(
    Copy, Clone, Debug, Default, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum EmploymentStatus {
    #[default]
    #[sea_orm(string_value = "active")]
    Active,
    #[sea_orm(string_value = "inactive")]
    Inactive,
    #[sea_orm(string_value = "terminated")]
    Terminated,
    #[sea_orm(string_value = "resigned")]
    Resigned,
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            employment_status: Set(EmploymentStatus::default()),
            department_id: Set(None),
            position_id: Set(None),
            manager_id: Set(None),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        constraints::max_len("hrd_employees.employee_id", &self.employee_id, 50)?;
        constraints::max_len("hrd_employees.first_name", &self.first_name, 100)?;
        constraints::max_len("hrd_employees.last_name", &self.last_name, 100)?;
        constraints::max_len("hrd_employees.phone", &self.phone, 20)?;
        constraints::max_len("hrd_employees.address", &self.address, 500)?;
        constraints::max_len(
            "hrd_employees.emergency_contact_name",
            &self.emergency_contact_name,
            100,
        )?;
        constraints::max_len(
            "hrd_employees.emergency_contact_phone",
            &self.emergency_contact_phone,
            20,
        )?;

        let now = crate::now();
        if insert && self.created_at.is_not_set() {
            self.created_at = Set(now);
        }
        self.updated_at = Set(now);
        Ok(self)
    }
}
