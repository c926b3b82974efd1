use sea_orm_migration::prelude::*;

use crate::columns::*;
use crate::idens::{HrdAttendance, HrdEmployees, HrdHolidays, HrdLeaveRequests, HrdUsers};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HrdAttendance::Table)
                    .if_not_exists()
                    .col(&mut id(HrdAttendance::Id))
                    .col(&mut reference(HrdAttendance::UserId))
                    .col(ColumnDef::new(HrdAttendance::Date).date().not_null())
                    .col(ColumnDef::new(HrdAttendance::CheckInTime).time().null())
                    .col(ColumnDef::new(HrdAttendance::CheckOutTime).time().null())
                    .col(ColumnDef::new(HrdAttendance::BreakStartTime).time().null())
                    .col(ColumnDef::new(HrdAttendance::BreakEndTime).time().null())
                    .col(ColumnDef::new(HrdAttendance::TotalHours).decimal_len(5, 2).null())
                    .col(
                        ColumnDef::new(HrdAttendance::OvertimeHours)
                            .decimal_len(5, 2)
                            .not_null()
                            .default(0),
                    )
                    .col(&mut enumeration(HrdAttendance::Status, Some("absent")))
                    .col(ColumnDef::new(HrdAttendance::CheckInLocation).string_len(255).null())
                    .col(ColumnDef::new(HrdAttendance::CheckOutLocation).string_len(255).null())
                    .col(&mut text_or_empty(HrdAttendance::Notes, 500))
                    .col(&mut created_now(HrdAttendance::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_attendance_user")
                            .from(HrdAttendance::Table, HrdAttendance::UserId)
                            .to(HrdUsers::Table, HrdUsers::Id)
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
                    .name("idx_hrd_attendance_user_date")
                    .table(HrdAttendance::Table)
                    .col(HrdAttendance::UserId)
                    .col(HrdAttendance::Date)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HrdLeaveRequests::Table)
                    .if_not_exists()
                    .col(&mut id(HrdLeaveRequests::Id))
                    .col(&mut reference(HrdLeaveRequests::EmployeeId))
                    .col(&mut enumeration(HrdLeaveRequests::LeaveType, None))
                    .col(ColumnDef::new(HrdLeaveRequests::StartDate).date().not_null())
                    .col(ColumnDef::new(HrdLeaveRequests::EndDate).date().not_null())
                    .col(
                        ColumnDef::new(HrdLeaveRequests::DaysRequested)
                            .integer()
                            .not_null(),
                    )
                    .col(&mut text(HrdLeaveRequests::Reason, 1000))
                    .col(&mut enumeration(HrdLeaveRequests::Status, Some("pending")))
                    .col(&mut reference_opt(HrdLeaveRequests::ApprovedBy))
                    .col(
                        ColumnDef::new(HrdLeaveRequests::ApprovedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(&mut text_or_empty(HrdLeaveRequests::RejectionReason, 500))
                    .col(&mut json_list(HrdLeaveRequests::SupportingDocuments))
                    .col(&mut created_now(HrdLeaveRequests::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_leave_requests_employee")
                            .from(HrdLeaveRequests::Table, HrdLeaveRequests::EmployeeId)
                            .to(HrdEmployees::Table, HrdEmployees::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_leave_requests_approver")
                            .from(HrdLeaveRequests::Table, HrdLeaveRequests::ApprovedBy)
                            .to(HrdEmployees::Table, HrdEmployees::Id)
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
                    .name("idx_hrd_leave_requests_employee")
                    .table(HrdLeaveRequests::Table)
                    .col(HrdLeaveRequests::EmployeeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hrd_leave_requests_status")
                    .table(HrdLeaveRequests::Table)
                    .col(HrdLeaveRequests::Status)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HrdHolidays::Table)
                    .if_not_exists()
                    .col(&mut id(HrdHolidays::Id))
                    .col(&mut text(HrdHolidays::Name, 200))
                    .col(ColumnDef::new(HrdHolidays::Date).date().not_null())
                    .col(&mut text_or_empty(HrdHolidays::Description, 500))
                    .col(&mut flag(HrdHolidays::IsRecurring, false))
                    .col(&mut flag(HrdHolidays::IsWorkingDay, false))
                    .col(&mut reference(HrdHolidays::CreatedBy))
                    .col(&mut created_now(HrdHolidays::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_holidays_created_by")
                            .from(HrdHolidays::Table, HrdHolidays::CreatedBy)
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
                    .name("idx_hrd_holidays_date")
                    .table(HrdHolidays::Table)
                    .col(HrdHolidays::Date)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(HrdHolidays::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HrdLeaveRequests::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HrdAttendance::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}
