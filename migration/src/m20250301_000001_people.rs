use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

use crate::columns::*;
use crate::idens::{HrdDepartments, HrdEmployees, HrdPositions, HrdUsers};

const DEPARTMENT_MANAGER_FK: &str = "fk_hrd_departments_manager";

/// Departments and employees reference each other. SQLite accepts the forward
/// reference inline; other backends get the constraint once both tables exist.
fn department_manager_fk() -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(DEPARTMENT_MANAGER_FK)
        .from(HrdDepartments::Table, HrdDepartments::ManagerId)
        .to(HrdEmployees::Table, HrdEmployees::Id)
        .on_delete(ForeignKeyAction::SetNull)
        .on_update(ForeignKeyAction::Cascade)
        .to_owned()
}

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let sqlite = manager.get_database_backend() == DatabaseBackend::Sqlite;

        manager
            .create_table(
                Table::create()
                    .table(HrdUsers::Table)
                    .if_not_exists()
                    .col(&mut id(HrdUsers::Id))
                    .col(&mut text(HrdUsers::Email, 255))
                    .col(&mut text(HrdUsers::PasswordHash, 255))
                    .col(&mut enumeration(HrdUsers::Role, Some("employee")))
                    .col(&mut flag(HrdUsers::IsActive, true))
                    .col(
                        ColumnDef::new(HrdUsers::LastLogin)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(&mut created_now(HrdUsers::CreatedAt))
                    .col(&mut created_now(HrdUsers::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hrd_users_email")
                    .table(HrdUsers::Table)
                    .col(HrdUsers::Email)
                    .unique()
                    .to_owned(),
            )
            .await?;

        let mut departments = Table::create();
        departments
            .table(HrdDepartments::Table)
            .if_not_exists()
            .col(&mut id(HrdDepartments::Id))
            .col(&mut text(HrdDepartments::Name, 100))
            .col(&mut text(HrdDepartments::Code, 20))
            .col(&mut text_or_empty(HrdDepartments::Description, 500))
            .col(&mut reference_opt(HrdDepartments::ManagerId))
            .col(&mut money_opt(HrdDepartments::Budget))
            .col(&mut flag(HrdDepartments::IsActive, true))
            .col(&mut created_now(HrdDepartments::CreatedAt));
        if sqlite {
            departments.foreign_key(&mut department_manager_fk());
        }
        manager.create_table(departments).await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hrd_departments_code")
                    .table(HrdDepartments::Table)
                    .col(HrdDepartments::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HrdPositions::Table)
                    .if_not_exists()
                    .col(&mut id(HrdPositions::Id))
                    .col(&mut text(HrdPositions::Title, 100))
                    .col(&mut text(HrdPositions::Code, 20))
                    .col(&mut text_or_empty(HrdPositions::Description, 1000))
                    .col(&mut reference(HrdPositions::DepartmentId))
                    .col(&mut text(HrdPositions::Level, 50))
                    .col(&mut money_opt(HrdPositions::MinSalary))
                    .col(&mut money_opt(HrdPositions::MaxSalary))
                    .col(&mut text_or_empty(HrdPositions::Requirements, 2000))
                    .col(&mut flag(HrdPositions::IsActive, true))
                    .col(&mut created_now(HrdPositions::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_positions_department")
                            .from(HrdPositions::Table, HrdPositions::DepartmentId)
                            .to(HrdDepartments::Table, HrdDepartments::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hrd_positions_code")
                    .table(HrdPositions::Table)
                    .col(HrdPositions::Code)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HrdEmployees::Table)
                    .if_not_exists()
                    .col(&mut id(HrdEmployees::Id))
                    .col(&mut text(HrdEmployees::EmployeeId, 50))
                    .col(&mut reference(HrdEmployees::UserId))
                    .col(&mut text(HrdEmployees::FirstName, 100))
                    .col(&mut text(HrdEmployees::LastName, 100))
                    .col(ColumnDef::new(HrdEmployees::DateOfBirth).date().not_null())
                    .col(&mut text(HrdEmployees::Phone, 20))
                    .col(&mut text(HrdEmployees::Address, 500))
                    .col(&mut text(HrdEmployees::EmergencyContactName, 100))
                    .col(&mut text(HrdEmployees::EmergencyContactPhone, 20))
                    .col(ColumnDef::new(HrdEmployees::HireDate).date().not_null())
                    .col(&mut enumeration(
                        HrdEmployees::EmploymentStatus,
                        Some("active"),
                    ))
                    .col(&mut reference_opt(HrdEmployees::DepartmentId))
                    .col(&mut reference_opt(HrdEmployees::PositionId))
                    .col(&mut reference_opt(HrdEmployees::ManagerId))
                    .col(&mut created_now(HrdEmployees::CreatedAt))
                    .col(&mut created_now(HrdEmployees::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_employees_user")
                            .from(HrdEmployees::Table, HrdEmployees::UserId)
                            .to(HrdUsers::Table, HrdUsers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_employees_department")
                            .from(HrdEmployees::Table, HrdEmployees::DepartmentId)
                            .to(HrdDepartments::Table, HrdDepartments::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_employees_position")
                            .from(HrdEmployees::Table, HrdEmployees::PositionId)
                            .to(HrdPositions::Table, HrdPositions::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_employees_manager")
                            .from(HrdEmployees::Table, HrdEmployees::ManagerId)
                            .to(HrdEmployees::Table, HrdEmployees::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        if !sqlite {
            manager.create_foreign_key(department_manager_fk()).await?;
        }

        for (name, column, unique) in [
            ("idx_hrd_employees_employee_id", HrdEmployees::EmployeeId, true),
            ("idx_hrd_employees_user", HrdEmployees::UserId, true),
            ("idx_hrd_employees_department", HrdEmployees::DepartmentId, false),
            ("idx_hrd_employees_position", HrdEmployees::PositionId, false),
            ("idx_hrd_employees_manager", HrdEmployees::ManagerId, false),
        ] {
            let mut index = Index::create();
            index
                .if_not_exists()
                .name(name)
                .table(HrdEmployees::Table)
                .col(column);
            if unique {
                index.unique();
            }
            manager.create_index(index).await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        if manager.get_database_backend() != DatabaseBackend::Sqlite {
            manager
                .drop_foreign_key(
                    ForeignKey::drop()
                        .name(DEPARTMENT_MANAGER_FK)
                        .table(HrdDepartments::Table)
                        .to_owned(),
                )
                .await?;
        }
        manager
            .drop_table(Table::drop().table(HrdEmployees::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HrdPositions::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HrdDepartments::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HrdUsers::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
