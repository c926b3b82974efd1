use sea_orm_migration::prelude::*;

use crate::columns::*;
use crate::idens::{HrdAuditLogs, HrdContracts, HrdEmployees, HrdPayroll, HrdSettings, HrdUsers};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HrdContracts::Table)
                    .if_not_exists()
                    .col(&mut id(HrdContracts::Id))
                    .col(&mut reference(HrdContracts::EmployeeId))
                    .col(&mut text(HrdContracts::ContractType, 50))
                    .col(ColumnDef::new(HrdContracts::StartDate).date().not_null())
                    .col(ColumnDef::new(HrdContracts::EndDate).date().null())
                    .col(&mut money(HrdContracts::BaseSalary))
                    .col(&mut json_object(HrdContracts::Allowances))
                    .col(&mut json_list(HrdContracts::Benefits))
                    .col(
                        ColumnDef::new(HrdContracts::WorkingHours)
                            .integer()
                            .not_null()
                            .default(40),
                    )
                    .col(&mut flag(HrdContracts::IsActive, true))
                    .col(ColumnDef::new(HrdContracts::SignedDate).date().null())
                    .col(&mut created_now(HrdContracts::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_contracts_employee")
                            .from(HrdContracts::Table, HrdContracts::EmployeeId)
                            .to(HrdEmployees::Table, HrdEmployees::Id)
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
                    .name("idx_hrd_contracts_employee")
                    .table(HrdContracts::Table)
                    .col(HrdContracts::EmployeeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HrdPayroll::Table)
                    .if_not_exists()
                    .col(&mut id(HrdPayroll::Id))
                    .col(&mut reference(HrdPayroll::EmployeeId))
                    .col(ColumnDef::new(HrdPayroll::PayPeriodStart).date().not_null())
                    .col(ColumnDef::new(HrdPayroll::PayPeriodEnd).date().not_null())
                    .col(&mut money(HrdPayroll::BaseSalary))
                    .col(money(HrdPayroll::OvertimePay).default(0))
                    .col(&mut json_object(HrdPayroll::Allowances))
                    .col(&mut json_object(HrdPayroll::Deductions))
                    .col(&mut money(HrdPayroll::GrossPay))
                    .col(&mut money(HrdPayroll::TaxDeduction))
                    .col(&mut money(HrdPayroll::NetPay))
                    .col(&mut enumeration(HrdPayroll::Status, Some("draft")))
                    .col(&mut reference_opt(HrdPayroll::ProcessedBy))
                    .col(
                        ColumnDef::new(HrdPayroll::ProcessedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(HrdPayroll::PaymentDate).date().null())
                    .col(&mut text_or_empty(HrdPayroll::BankReference, 100))
                    .col(&mut created_now(HrdPayroll::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_payroll_employee")
                            .from(HrdPayroll::Table, HrdPayroll::EmployeeId)
                            .to(HrdEmployees::Table, HrdEmployees::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_payroll_processed_by")
                            .from(HrdPayroll::Table, HrdPayroll::ProcessedBy)
                            .to(HrdUsers::Table, HrdUsers::Id)
                            .on_delete(ForeignKeyAction::SetNull)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hrd_payroll_employee_period")
                    .table(HrdPayroll::Table)
                    .col(HrdPayroll::EmployeeId)
                    .col(HrdPayroll::PayPeriodStart)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HrdSettings::Table)
                    .if_not_exists()
                    .col(&mut id(HrdSettings::Id))
                    .col(&mut text(HrdSettings::Key, 100))
                    .col(&mut text(HrdSettings::Value, 2000))
                    .col(&mut text_or_empty(HrdSettings::Description, 500))
                    .col(
                        ColumnDef::new(HrdSettings::DataType)
                            .string_len(20)
                            .not_null()
                            .default("string"),
                    )
                    .col(&mut flag(HrdSettings::IsSystem, false))
                    .col(&mut reference(HrdSettings::UpdatedBy))
                    .col(&mut created_now(HrdSettings::UpdatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_settings_updated_by")
                            .from(HrdSettings::Table, HrdSettings::UpdatedBy)
                            .to(HrdUsers::Table, HrdUsers::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hrd_settings_key")
                    .table(HrdSettings::Table)
                    .col(HrdSettings::Key)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HrdAuditLogs::Table)
                    .if_not_exists()
                    .col(&mut id(HrdAuditLogs::Id))
                    .col(&mut reference(HrdAuditLogs::UserId))
                    .col(&mut text(HrdAuditLogs::Action, 100))
                    .col(&mut text(HrdAuditLogs::TableName, 100))
                    .col(ColumnDef::new(HrdAuditLogs::RecordId).integer().null())
                    .col(&mut json_object(HrdAuditLogs::OldValues))
                    .col(&mut json_object(HrdAuditLogs::NewValues))
                    .col(&mut text(HrdAuditLogs::IpAddress, 45))
                    .col(&mut text_or_empty(HrdAuditLogs::UserAgent, 500))
                    .col(&mut created_now(HrdAuditLogs::Timestamp))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_audit_logs_user")
                            .from(HrdAuditLogs::Table, HrdAuditLogs::UserId)
                            .to(HrdUsers::Table, HrdUsers::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hrd_audit_logs_table_record")
                    .table(HrdAuditLogs::Table)
                    .col(HrdAuditLogs::TableName)
                    .col(HrdAuditLogs::RecordId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hrd_audit_logs_timestamp")
                    .table(HrdAuditLogs::Table)
                    .col(HrdAuditLogs::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            HrdAuditLogs::Table.into_iden(),
            HrdSettings::Table.into_iden(),
            HrdPayroll::Table.into_iden(),
            HrdContracts::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}
