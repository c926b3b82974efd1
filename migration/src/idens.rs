use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
pub enum HrdUsers {
    Table,
    Id,
    Email,
    PasswordHash,
    Role,
    IsActive,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum HrdEmployees {
    Table,
    Id,
    EmployeeId,
    UserId,
    FirstName,
    LastName,
    DateOfBirth,
    Phone,
    Address,
    EmergencyContactName,
    EmergencyContactPhone,
    HireDate,
    EmploymentStatus,
    DepartmentId,
    PositionId,
    ManagerId,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum HrdDepartments {
    Table,
    Id,
    Name,
    Code,
    Description,
    ManagerId,
    Budget,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum HrdPositions {
    Table,
    Id,
    Title,
    Code,
    Description,
    DepartmentId,
    Level,
    MinSalary,
    MaxSalary,
    Requirements,
    IsActive,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum HrdContracts {
    Table,
    Id,
    EmployeeId,
    ContractType,
    StartDate,
    EndDate,
    BaseSalary,
    Allowances,
    Benefits,
    WorkingHours,
    IsActive,
    SignedDate,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum HrdAttendance {
    Table,
    Id,
    UserId,
    Date,
    CheckInTime,
    CheckOutTime,
    BreakStartTime,
    BreakEndTime,
    TotalHours,
    OvertimeHours,
    Status,
    CheckInLocation,
    CheckOutLocation,
    Notes,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum HrdLeaveRequests {
    Table,
    Id,
    EmployeeId,
    LeaveType,
    StartDate,
    EndDate,
    DaysRequested,
    Reason,
    Status,
    ApprovedBy,
    ApprovedAt,
    RejectionReason,
    SupportingDocuments,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum HrdTrainingPrograms {
    Table,
    Id,
    Title,
    Description,
    Trainer,
    DurationHours,
    MaxParticipants,
    CostPerParticipant,
    StartDate,
    EndDate,
    Location,
    Status,
    Materials,
    Prerequisites,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum HrdTrainingEnrollments {
    Table,
    Id,
    EmployeeId,
    TrainingProgramId,
    EnrollmentDate,
    CompletionDate,
    CompletionStatus,
    Score,
    CertificateIssued,
    Feedback,
}

#[derive(DeriveIden)]
pub enum HrdPerformanceReviews {
    Table,
    Id,
    EmployeeId,
    ReviewerId,
    ReviewPeriodStart,
    ReviewPeriodEnd,
    OverallRating,
    GoalsAchievement,
    CompetencyScores,
    Strengths,
    AreasForImprovement,
    DevelopmentPlan,
    EmployeeComments,
    ReviewerComments,
    IsFinal,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum HrdDocuments {
    Table,
    Id,
    EmployeeId,
    DocumentType,
    Title,
    FileName,
    FilePath,
    FileSize,
    MimeType,
    Description,
    UploadedBy,
    IsConfidential,
    ExpiryDate,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum HrdPayroll {
    Table,
    Id,
    EmployeeId,
    PayPeriodStart,
    PayPeriodEnd,
    BaseSalary,
    OvertimePay,
    Allowances,
    Deductions,
    GrossPay,
    TaxDeduction,
    NetPay,
    Status,
    ProcessedBy,
    ProcessedAt,
    PaymentDate,
    BankReference,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum HrdHolidays {
    Table,
    Id,
    Name,
    Date,
    Description,
    IsRecurring,
    IsWorkingDay,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
pub enum HrdSettings {
    Table,
    Id,
    Key,
    Value,
    Description,
    DataType,
    IsSystem,
    UpdatedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
pub enum HrdAuditLogs {
    Table,
    Id,
    UserId,
    Action,
    TableName,
    RecordId,
    OldValues,
    NewValues,
    IpAddress,
    UserAgent,
    Timestamp,
}
