use crate::constraints;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};

/// One row per user per calendar date.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "hrd_attendance")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(indexed)]
    pub user_id: i32,
    pub date: Date,
    pub check_in_time: Option<Time>,
    pub check_out_time: Option<Time>,
    pub break_start_time: Option<Time>,
    pub break_end_time: Option<Time>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))", nullable)]
    pub total_hours: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub overtime_hours: Decimal,
    pub status: Status,
    /// GPS coordinates or a free-form place name.
    pub check_in_location: Option<String>,
    pub check_out_location: Option<String>,
    pub notes: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

#[derive(
    Copy, Clone, Debug, Default, EnumIter, DeriveActiveEnum, Eq, PartialEq, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "snake_case")]
pub enum Status {
    #[sea_orm(string_value = "present")]
    Present,
    #[default]
    #[sea_orm(string_value = "absent")]
    Absent,
    #[sea_orm(string_value = "late")]
    Late,
    #[sea_orm(string_value = "half_day")]
    HalfDay,
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            check_in_time: Set(None),
            check_out_time: Set(None),
            break_start_time: Set(None),
            break_end_time: Set(None),
            total_hours: Set(None),
            overtime_hours: Set(Decimal::ZERO),
            status: Set(Status::default()),
            check_in_location: Set(None),
            check_out_location: Set(None),
            notes: Set(String::new()),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        constraints::numeric_opt("hrd_attendance.total_hours", &self.total_hours, 5, 2)?;
        constraints::numeric("hrd_attendance.overtime_hours", &self.overtime_hours, 5, 2)?;
        constraints::max_len_opt(
            "hrd_attendance.check_in_location",
            &self.check_in_location,
            255,
        )?;
        constraints::max_len_opt(
            "hrd_attendance.check_out_location",
            &self.check_out_location,
            255,
        )?;
        constraints::max_len("hrd_attendance.notes", &self.notes, 500)?;

        if insert && self.created_at.is_not_set() {
            self.created_at = Set(crate::now());
        }
        Ok(self)
    }
}
