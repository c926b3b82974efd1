use crate::constraints;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "hrd_training_programs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    pub description: String,
    pub trainer: String,
    pub duration_hours: i32,
    pub max_participants: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub cost_per_participant: Option<Decimal>,
    pub start_date: DateTimeWithTimeZone,
    pub end_date: DateTimeWithTimeZone,
    pub location: String,
    pub status: Status,
    pub materials: Json,
    pub prerequisites: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::training_enrollment::Entity")]
    Enrollment,
}

impl Related<super::training_enrollment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Enrollment.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        super::training_enrollment::Relation::Employee.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::training_enrollment::Relation::TrainingProgram.def().rev())
    }
}

#[derive(
    Copy, Clone, Debug, Default, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[default]
    #[sea_orm(string_value = "scheduled")]
    Scheduled,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "completed")]
    Completed,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            max_participants: Set(None),
            cost_per_participant: Set(None),
            status: Set(Status::default()),
            materials: Set(json!([])),
            prerequisites: Set(String::new()),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        constraints::max_len("hrd_training_programs.title", &self.title, 200)?;
        constraints::max_len("hrd_training_programs.description", &self.description, 2000)?;
        constraints::max_len("hrd_training_programs.trainer", &self.trainer, 200)?;
        constraints::max_len("hrd_training_programs.location", &self.location, 255)?;
        constraints::max_len(
            "hrd_training_programs.prerequisites",
            &self.prerequisites,
            1000,
        )?;
        constraints::numeric_opt(
            "hrd_training_programs.cost_per_participant",
            &self.cost_per_participant,
            12,
            2,
        )?;

        if insert && self.created_at.is_not_set() {
            self.created_at = Set(crate::now());
        }
        Ok(self)
    }
}
