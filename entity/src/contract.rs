use crate::constraints;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait};
use serde_json::json;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "hrd_contracts")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub employee_id: i32,
    /// Permanent, Contract, Temporary.
    pub contract_type: String,
    pub start_date: Date,
    pub end_date: Option<Date>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub base_salary: Decimal,
    /// Allowance name to amount (or any JSON value).
    pub allowances: Json,
    /// List of benefit names.
    pub benefits: Json,
    /// Hours per week.
    pub working_hours: i32,
    pub is_active: bool,
    pub signed_date: Option<Date>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::employee::Entity",
        from = "Column::EmployeeId",
        to = "super::employee::Column::Id",
        on_delete = "Cascade"
    )]
    Employee,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Model {
    /// Whether the contract covers `day`; an absent end date is open-ended.
    pub fn covers(&self, day: Date) -> bool {
        self.start_date <= day && self.end_date.is_none_or(|end| day <= end)
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            end_date: Set(None),
            allowances: Set(json!({})),
            benefits: Set(json!([])),
            working_hours: Set(40),
            is_active: Set(true),
            signed_date: Set(None),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        constraints::max_len("hrd_contracts.contract_type", &self.contract_type, 50)?;
        constraints::numeric("hrd_contracts.base_salary", &self.base_salary, 12, 2)?;

        if insert && self.created_at.is_not_set() {
            self.created_at = Set(crate::now());
        }
        Ok(self)
    }
}
