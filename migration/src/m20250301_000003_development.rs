use sea_orm_migration::prelude::*;

use crate::columns::*;
use crate::idens::{
    HrdDocuments, HrdEmployees, HrdPerformanceReviews, HrdTrainingEnrollments,
    HrdTrainingPrograms, HrdUsers,
};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(HrdTrainingPrograms::Table)
                    .if_not_exists()
                    .col(&mut id(HrdTrainingPrograms::Id))
                    .col(&mut text(HrdTrainingPrograms::Title, 200))
                    .col(&mut text(HrdTrainingPrograms::Description, 2000))
                    .col(&mut text(HrdTrainingPrograms::Trainer, 200))
                    .col(
                        ColumnDef::new(HrdTrainingPrograms::DurationHours)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HrdTrainingPrograms::MaxParticipants)
                            .integer()
                            .null(),
                    )
                    .col(&mut money_opt(HrdTrainingPrograms::CostPerParticipant))
                    .col(
                        ColumnDef::new(HrdTrainingPrograms::StartDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HrdTrainingPrograms::EndDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(&mut text(HrdTrainingPrograms::Location, 255))
                    .col(&mut enumeration(
                        HrdTrainingPrograms::Status,
                        Some("scheduled"),
                    ))
                    .col(&mut json_list(HrdTrainingPrograms::Materials))
                    .col(&mut text_or_empty(HrdTrainingPrograms::Prerequisites, 1000))
                    .col(&mut created_now(HrdTrainingPrograms::CreatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HrdTrainingEnrollments::Table)
                    .if_not_exists()
                    .col(&mut id(HrdTrainingEnrollments::Id))
                    .col(&mut reference(HrdTrainingEnrollments::EmployeeId))
                    .col(&mut reference(HrdTrainingEnrollments::TrainingProgramId))
                    .col(&mut created_now(HrdTrainingEnrollments::EnrollmentDate))
                    .col(
                        ColumnDef::new(HrdTrainingEnrollments::CompletionDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(HrdTrainingEnrollments::CompletionStatus)
                            .string_len(20)
                            .not_null()
                            .default("enrolled"),
                    )
                    .col(
                        ColumnDef::new(HrdTrainingEnrollments::Score)
                            .decimal_len(5, 2)
                            .null(),
                    )
                    .col(&mut flag(HrdTrainingEnrollments::CertificateIssued, false))
                    .col(&mut text_or_empty(HrdTrainingEnrollments::Feedback, 1000))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_training_enrollments_employee")
                            .from(
                                HrdTrainingEnrollments::Table,
                                HrdTrainingEnrollments::EmployeeId,
                            )
                            .to(HrdEmployees::Table, HrdEmployees::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_training_enrollments_program")
                            .from(
                                HrdTrainingEnrollments::Table,
                                HrdTrainingEnrollments::TrainingProgramId,
                            )
                            .to(HrdTrainingPrograms::Table, HrdTrainingPrograms::Id)
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
                    .name("idx_hrd_training_enrollments_employee")
                    .table(HrdTrainingEnrollments::Table)
                    .col(HrdTrainingEnrollments::EmployeeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_hrd_training_enrollments_program")
                    .table(HrdTrainingEnrollments::Table)
                    .col(HrdTrainingEnrollments::TrainingProgramId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HrdPerformanceReviews::Table)
                    .if_not_exists()
                    .col(&mut id(HrdPerformanceReviews::Id))
                    .col(&mut reference(HrdPerformanceReviews::EmployeeId))
                    .col(&mut reference(HrdPerformanceReviews::ReviewerId))
                    .col(
                        ColumnDef::new(HrdPerformanceReviews::ReviewPeriodStart)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HrdPerformanceReviews::ReviewPeriodEnd)
                            .date()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HrdPerformanceReviews::OverallRating)
                            .decimal_len(3, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(HrdPerformanceReviews::GoalsAchievement)
                            .decimal_len(5, 2)
                            .not_null(),
                    )
                    .col(&mut json_object(HrdPerformanceReviews::CompetencyScores))
                    .col(&mut text(HrdPerformanceReviews::Strengths, 2000))
                    .col(&mut text(HrdPerformanceReviews::AreasForImprovement, 2000))
                    .col(&mut text(HrdPerformanceReviews::DevelopmentPlan, 2000))
                    .col(&mut text_or_empty(HrdPerformanceReviews::EmployeeComments, 2000))
                    .col(&mut text(HrdPerformanceReviews::ReviewerComments, 2000))
                    .col(&mut flag(HrdPerformanceReviews::IsFinal, false))
                    .col(&mut created_now(HrdPerformanceReviews::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_performance_reviews_employee")
                            .from(
                                HrdPerformanceReviews::Table,
                                HrdPerformanceReviews::EmployeeId,
                            )
                            .to(HrdEmployees::Table, HrdEmployees::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_performance_reviews_reviewer")
                            .from(
                                HrdPerformanceReviews::Table,
                                HrdPerformanceReviews::ReviewerId,
                            )
                            .to(HrdEmployees::Table, HrdEmployees::Id)
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
                    .name("idx_hrd_performance_reviews_employee")
                    .table(HrdPerformanceReviews::Table)
                    .col(HrdPerformanceReviews::EmployeeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(HrdDocuments::Table)
                    .if_not_exists()
                    .col(&mut id(HrdDocuments::Id))
                    .col(&mut reference(HrdDocuments::EmployeeId))
                    .col(&mut enumeration(HrdDocuments::DocumentType, None))
                    .col(&mut text(HrdDocuments::Title, 255))
                    .col(&mut text(HrdDocuments::FileName, 255))
                    .col(&mut text(HrdDocuments::FilePath, 500))
                    .col(ColumnDef::new(HrdDocuments::FileSize).big_integer().not_null())
                    .col(&mut text(HrdDocuments::MimeType, 100))
                    .col(&mut text_or_empty(HrdDocuments::Description, 500))
                    .col(&mut reference(HrdDocuments::UploadedBy))
                    .col(&mut flag(HrdDocuments::IsConfidential, false))
                    .col(ColumnDef::new(HrdDocuments::ExpiryDate).date().null())
                    .col(&mut created_now(HrdDocuments::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_documents_employee")
                            .from(HrdDocuments::Table, HrdDocuments::EmployeeId)
                            .to(HrdEmployees::Table, HrdEmployees::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_hrd_documents_uploaded_by")
                            .from(HrdDocuments::Table, HrdDocuments::UploadedBy)
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
                    .name("idx_hrd_documents_employee")
                    .table(HrdDocuments::Table)
                    .col(HrdDocuments::EmployeeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for table in [
            HrdDocuments::Table.into_iden(),
            HrdPerformanceReviews::Table.into_iden(),
            HrdTrainingEnrollments::Table.into_iden(),
            HrdTrainingPrograms::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }
        Ok(())
    }
}
