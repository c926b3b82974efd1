use crate::constraints;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "hrd_positions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub title: String,
    #[sea_orm(unique)]
    pub code: String,
    pub description: String,
    #[sea_orm(indexed)]
    pub department_id: i32,
    /// Entry, Mid, Senior, Executive.
    pub level: String,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub min_salary: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub max_salary: Option<Decimal>,
    pub requirements: String,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Department,
    Employee,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Department => Entity::belongs_to(super::department::Entity)
                .from(Column::DepartmentId)
                .to(super::department::Column::Id)
                .on_delete(ForeignKeyAction::Cascade)
                .into(),
            Self::Employee => Entity::has_many(super::employee::Entity).into(),
        }
    }
}

impl Related<super::department::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Department.def()
    }
}

impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            description: Set(String::new()),
            min_salary: Set(None),
            max_salary: Set(None),
            requirements: Set(String::new()),
            is_active: Set(true),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        constraints::max_len("hrd_positions.title", &self.title, 100)?;
        constraints::max_len("hrd_positions.code", &self.code, 20)?;
        constraints::max_len("hrd_positions.description", &self.description, 1000)?;
        constraints::max_len("hrd_positions.level", &self.level, 50)?;
        constraints::max_len("hrd_positions.requirements", &self.requirements, 2000)?;
        constraints::numeric_opt("hrd_positions.min_salary", &self.min_salary, 12, 2)?;
        constraints::numeric_opt("hrd_positions.max_salary", &self.max_salary, 12, 2)?;

        if insert && self.created_at.is_not_set() {
            self.created_at = Set(crate::now());
        }
        Ok(self)
    }
}
