use crate::constraints;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::Set, ConnectionTrait};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "hrd_departments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub code: String,
    pub description: String,
    pub manager_id: Option<i32>,
    #[sea_orm(column_type = "Decimal(Some((12, 2)))", nullable)]
    pub budget: Option<Decimal>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation {
    Manager,
    Employee,
    Position,
}

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Self::Manager => Entity::belongs_to(super::employee::Entity)
                .from(Column::ManagerId)
                .to(super::employee::Column::Id)
                .on_delete(ForeignKeyAction::SetNull)
                .into(),
            Self::Employee => Entity::has_many(super::employee::Entity).into(),
            Self::Position => Entity::has_many(super::position::Entity).into(),
        }
    }
}

// Members, not the manager: use `Relation::Manager` or `Model::find_manager` for that.
impl Related<super::employee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Employee.def()
    }
}

impl Related<super::position::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Position.def()
    }
}

impl Model {
    pub async fn find_manager<C>(&self, db: &C) -> Result<Option<super::employee::Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        match self.manager_id {
            Some(id) => super::employee::Entity::find_by_id(id).one(db).await,
            None => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            description: Set(String::new()),
            manager_id: Set(None),
            budget: Set(None),
            is_active: Set(true),
            ..<Self as ActiveModelTrait>::default()
        }
    }

    async fn before_save<C>(mut self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        constraints::max_len("hrd_departments.name", &self.name, 100)?;
        constraints::max_len("hrd_departments.code", &self.code, 20)?;
        constraints::max_len("hrd_departments.description", &self.description, 500)?;
        constraints::numeric_opt("hrd_departments.budget", &self.budget, 12, 2)?;

        if insert && self.created_at.is_not_set() {
            self.created_at = Set(crate::now());
        }
        Ok(self)
    }
}
