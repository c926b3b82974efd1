use migration::{Migrator, MigratorTrait};
use sea_orm_migration::sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement,
};

async fn memory_db() -> DatabaseConnection {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);
    let db = Database::connect(options).await.unwrap();
    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "PRAGMA foreign_keys = ON;",
    ))
    .await
    .unwrap();
    db
}

async fn table_names(db: &DatabaseConnection) -> Vec<String> {
    let rows = db
        .query_all(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name LIKE 'hrd_%' ORDER BY name",
        ))
        .await
        .unwrap();
    rows.iter()
        .map(|row| row.try_get::<String>("", "name").unwrap())
        .collect()
}

#[tokio::test]
async fn up_creates_all_fifteen_tables() {
    let db = memory_db().await;
    Migrator::up(&db, None).await.unwrap();

    let tables = table_names(&db).await;
    assert_eq!(
        tables,
        vec![
            "hrd_attendance",
            "hrd_audit_logs",
            "hrd_contracts",
            "hrd_departments",
            "hrd_documents",
            "hrd_employees",
            "hrd_holidays",
            "hrd_leave_requests",
            "hrd_payroll",
            "hrd_performance_reviews",
            "hrd_positions",
            "hrd_settings",
            "hrd_training_enrollments",
            "hrd_training_programs",
            "hrd_users",
        ]
    );
    assert!(Migrator::get_pending_migrations(&db).await.unwrap().is_empty());
}

#[tokio::test]
async fn down_removes_every_table_and_up_is_repeatable() {
    let db = memory_db().await;
    Migrator::up(&db, None).await.unwrap();
    Migrator::down(&db, None).await.unwrap();
    assert!(table_names(&db).await.is_empty());

    Migrator::up(&db, None).await.unwrap();
    assert_eq!(table_names(&db).await.len(), 15);
}

#[tokio::test]
async fn user_email_is_unique_at_the_storage_level() {
    let db = memory_db().await;
    Migrator::up(&db, None).await.unwrap();

    let insert = "INSERT INTO hrd_users (email, password_hash) VALUES ('dup@example.com', 'x')";
    db.execute(Statement::from_string(DatabaseBackend::Sqlite, insert))
        .await
        .unwrap();
    let err = db
        .execute(Statement::from_string(DatabaseBackend::Sqlite, insert))
        .await
        .expect_err("second insert must violate the unique index");
    assert!(err.to_string().contains("UNIQUE"));
}

#[tokio::test]
async fn column_defaults_match_the_model() {
    let db = memory_db().await;
    Migrator::up(&db, None).await.unwrap();

    db.execute(Statement::from_string(
        DatabaseBackend::Sqlite,
        "INSERT INTO hrd_users (email, password_hash) VALUES ('d@example.com', 'x')",
    ))
    .await
    .unwrap();
    let row = db
        .query_one(Statement::from_string(
            DatabaseBackend::Sqlite,
            "SELECT role, is_active FROM hrd_users WHERE email = 'd@example.com'",
        ))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row.try_get::<String>("", "role").unwrap(), "employee");
    assert!(row.try_get::<bool>("", "is_active").unwrap());
}
