use crate::constraints;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait};
use serde_json::json;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "hrd_performance_reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub employee_id: i32,
    #[sea_orm(indexed)]
    pub reviewer_id: i32,
    pub review_period_start: Date,
    pub review_period_end: Date,
    /// 1 to 5.
    #[sea_orm(column_type = "Decimal(Some((3, 2)))")]
    pub overall_rating: Decimal,
    /// Percentage, 0 to 100.
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub goals_achievement: Decimal,
    /// Competency name to score.
    pub competency_scores: Json,
    pub strengths: String,
    pub areas_for_improvement: String,
    pub development_plan: String,
    pub employee_comments: String,
    pub reviewer_comments: String,
    pub is_final: bool,
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
        belongs_to = "super::employee::Entity",
        from = "Column::ReviewerId",
        to = "super::employee::Column::Id",
        on_delete = "Restrict"
    )]
    Reviewer,
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

/// Review → reviewing employee.
#[derive(Debug)]
pub struct ReviewerLink;

impl Linked for ReviewerLink {
    type FromEntity = Entity;
    type ToEntity = super::employee::Entity;

    fn link(&self) -> Vec<RelationDef> {
        vec![Relation::Reviewer.def()]
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            competency_scores: Set(json!({})),
            employee_comments: Set(String::new()),
            is_final: Set(false),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        const MAX: usize = 2000;
        constraints::numeric(
            "hrd_performance_reviews.overall_rating",
            &self.overall_rating,
            3,
            2,
        )?;
        constraints::numeric(
            "hrd_performance_reviews.goals_achievement",
            &self.goals_achievement,
            5,
            2,
        )?;
        constraints::max_len("hrd_performance_reviews.strengths", &self.strengths, MAX)?;
        constraints::max_len(
            "hrd_performance_reviews.areas_for_improvement",
            &self.areas_for_improvement,
            MAX,
        )?;
        constraints::max_len(
            "hrd_performance_reviews.development_plan",
            &self.development_plan,
            MAX,
        )?;
        constraints::max_len(
            "hrd_performance_reviews.employee_comments",
            &self.employee_comments,
            MAX,
        )?;
        constraints::max_len(
            "hrd_performance_reviews.reviewer_comments",
            &self.reviewer_comments,
            MAX,
        )?;

        if insert && self.created_at.is_not_set() {
            self.created_at = Set(crate::now());
        }
        Ok(self)
    }
}
