use chrono::NaiveDate;
use entity::{EmploymentStatus, PayrollStatus, UserRole, employee, holiday, payroll, user};
use migration::{Migrator, MigratorTrait};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue::Set, ConnectOptions, ConnectionTrait,
    Database, DatabaseBackend, DatabaseConnection, DbErr, Statement,
};

async fn migrated() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "PRAGMA foreign_keys = ON;",
    ))
    .await
    .unwrap();
    Migrator::up(&db, None).await.unwrap();
    db
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

async fn insert_user(db: &DatabaseConnection, email: &str) -> user::Model {
    user::ActiveModel {
        email: Set(email.into()),
        password_hash: Set("hash".into()),
        ..user::ActiveModel::new()
    }
    .insert(db)
    .await
    .unwrap()
}

async fn insert_employee(
    db: &DatabaseConnection,
    code: &str,
    manager_id: Option<i32>,
) -> employee::Model {
    let account = insert_user(db, &format!("{}@example.com", code.to_lowercase())).await;
    employee::ActiveModel {
        employee_id: Set(code.into()),
        user_id: Set(account.id),
        first_name: Set("Pat".into()),
        last_name: Set(code.into()),
        date_of_birth: Set(day(1990, 1, 1)),
        phone: Set("555".into()),
        address: Set("Somewhere".into()),
        emergency_contact_name: Set("Kin".into()),
        emergency_contact_phone: Set("556".into()),
        hire_date: Set(day(2023, 1, 15)),
        manager_id: Set(manager_id),
        ..employee::ActiveModel::new()
    }
    .insert(db)
    .await
    .unwrap()
}

#[tokio::test]
async fn user_defaults_and_timestamps() {
    let db = migrated().await;
    let stored = insert_user(&db, "first@example.com").await;

    assert_eq!(stored.role, UserRole::Employee);
    assert!(stored.is_active);
    assert!(stored.last_login.is_none());
    assert_eq!(stored.created_at, stored.updated_at);
}

#[tokio::test]
async fn invalid_email_never_reaches_sql() {
    let db = migrated().await;
    let err = user::ActiveModel {
        email: Set("not-an-email".into()),
        password_hash: Set("hash".into()),
        ..user::ActiveModel::new()
    }
    .insert(&db)
    .await
    .unwrap_err();
    assert!(matches!(err, DbErr::Custom(ref msg) if msg.contains("hrd_users.email")), "{err:?}");
}

#[tokio::test]
async fn employee_defaults_to_active_and_walks_reporting_line() {
    let db = migrated().await;
    let ceo = insert_employee(&db, "E001", None).await;
    let lead = insert_employee(&db, "E002", Some(ceo.id)).await;
    let dev = insert_employee(&db, "E003", Some(lead.id)).await;

    assert_eq!(dev.employment_status, EmploymentStatus::Active);
    assert_eq!(dev.full_name(), "Pat E003");
    assert_eq!(dev.find_manager(&db).await.unwrap().map(|m| m.id), Some(lead.id));

    let line: Vec<i32> = dev
        .reporting_line(&db)
        .await
        .unwrap()
        .iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(line, vec![lead.id, ceo.id]);

    let reports = ceo.find_subordinates(&db).await.unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].id, lead.id);
}

#[tokio::test]
async fn reporting_line_stops_at_a_cycle() {
    let db = migrated().await;
    let a = insert_employee(&db, "E010", None).await;
    let b = insert_employee(&db, "E011", Some(a.id)).await;

    let mut active: employee::ActiveModel = a.clone().into();
    active.manager_id = Set(Some(b.id));
    let a = active.update(&db).await.unwrap();

    let line = a.reporting_line(&db).await.unwrap();
    assert_eq!(line.len(), 1);
    assert_eq!(line[0].id, b.id);
}

#[tokio::test]
async fn payroll_amounts_must_fit_the_column() {
    let db = migrated().await;
    let worker = insert_employee(&db, "E020", None).await;
    let oversized = Decimal::new(1_234_567_890_100, 2);

    let err = payroll::ActiveModel {
        employee_id: Set(worker.id),
        pay_period_start: Set(day(2024, 3, 1)),
        pay_period_end: Set(day(2024, 3, 31)),
        base_salary: Set(oversized),
        gross_pay: Set(oversized),
        tax_deduction: Set(Decimal::ZERO),
        net_pay: Set(oversized),
        ..payroll::ActiveModel::new()
    }
    .insert(&db)
    .await
    .unwrap_err();
    assert!(matches!(err, DbErr::Custom(ref msg) if msg.contains("base_salary")), "{err:?}");

    let stored = payroll::ActiveModel {
        employee_id: Set(worker.id),
        pay_period_start: Set(day(2024, 3, 1)),
        pay_period_end: Set(day(2024, 3, 31)),
        base_salary: Set(Decimal::new(500_000, 2)),
        gross_pay: Set(Decimal::new(500_000, 2)),
        tax_deduction: Set(Decimal::ZERO),
        net_pay: Set(Decimal::new(500_000, 2)),
        ..payroll::ActiveModel::new()
    }
    .insert(&db)
    .await
    .unwrap();
    assert_eq!(stored.status, PayrollStatus::Draft);
    assert_eq!(stored.overtime_pay, Decimal::ZERO);
    assert_eq!(stored.allowances, serde_json::json!({}));
}

#[test]
fn recurring_holiday_ignores_the_year() {
    let model = holiday::Model {
        id: 1,
        name: "New Year".into(),
        date: day(2020, 1, 1),
        description: String::new(),
        is_recurring: true,
        is_working_day: false,
        created_by: 1,
        created_at: entity::now(),
    };
    assert!(model.falls_on(day(2031, 1, 1)));
    assert!(!model.falls_on(day(2031, 1, 2)));

    let once = holiday::Model {
        is_recurring: false,
        ..model
    };
    assert!(!once.falls_on(day(2031, 1, 1)));
    assert!(once.falls_on(day(2020, 1, 1)));
}
