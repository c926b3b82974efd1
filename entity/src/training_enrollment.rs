use crate::constraints;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait};

/// Junction between employees and training programs.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "hrd_training_enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub employee_id: i32,
    #[sea_orm(indexed)]
    pub training_program_id: i32,
    pub enrollment_date: DateTimeWithTimeZone,
    pub completion_date: Option<DateTimeWithTimeZone>,
    /// enrolled, completed, failed, withdrawn.
    pub completion_status: String,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub score: Option<Decimal>,
    pub certificate_issued: bool,
    pub feedback: String,
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
        belongs_to = "super::training_program::Entity",
        from = "Column::TrainingProgramId",
        to = "super::training_program::Column::Id",
        on_delete = "Cascade"
    )]
    TrainingProgram,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::training_program::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TrainingProgram.def()
    }
}

pub const ENROLLED: &str = "enrolled";

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            completion_date: Set(None),
            completion_status: Set(ENROLLED.to_string()),
            score: Set(None),
            certificate_issued: Set(false),
            feedback: Set(String::new()),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        constraints::max_len(
            "hrd_training_enrollments.completion_status",
            &self.completion_status,
            20,
        )?;
        constraints::numeric_opt("hrd_training_enrollments.score", &self.score, 5, 2)?;
        constraints::max_len("hrd_training_enrollments.feedback", &self.feedback, 1000)?;

        if insert && self.enrollment_date.is_not_set() {
            self.enrollment_date = Set(crate::now());
        }
        Ok(self)
    }
}
