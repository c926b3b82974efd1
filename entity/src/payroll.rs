use crate::constraints;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "hrd_payroll")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub employee_id: i32,
    pub pay_period_start: Date,
    pub pay_period_end: Date,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub base_salary: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub overtime_pay: Decimal,
    pub allowances: Json,
    pub deductions: Json,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub gross_pay: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub tax_deduction: Decimal,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub net_pay: Decimal,
    pub status: Status,
    pub processed_by: Option<i32>,
    pub processed_at: Option<DateTimeWithTimeZone>,
    pub payment_date: Option<Date>,
    pub bank_reference: String,
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
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::ProcessedBy",
        to = "super::user::Column::Id",
        on_delete = "SetNull"
    )]
    Processor,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Processor.def()
    }
}

#[derive(
    Copy, Clone, Debug, Default, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "processed")]
    Processed,
    #[sea_orm(string_value = "paid")]
    Paid,
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            overtime_pay: Set(Decimal::ZERO),
            allowances: Set(json!({})),
            deductions: Set(json!({})),
            status: Set(Status::default()),
            processed_by: Set(None),
            processed_at: Set(None),
            payment_date: Set(None),
            bank_reference: Set(String::new()),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        constraints::numeric("hrd_payroll.base_salary", &self.base_salary, 12, 2)?;
        constraints::numeric("hrd_payroll.overtime_pay", &self.overtime_pay, 12, 2)?;
        constraints::numeric("hrd_payroll.gross_pay", &self.gross_pay, 12, 2)?;
        constraints::numeric("hrd_payroll.tax_deduction", &self.tax_deduction, 12, 2)?;
        constraints::numeric("hrd_payroll.net_pay", &self.net_pay, 12, 2)?;
        constraints::max_len("hrd_payroll.bank_reference", &self.bank_reference, 100)?;

        if insert && self.created_at.is_not_set() {
            self.created_at = Set(crate::now());
        }
        Ok(self)
    }
}
