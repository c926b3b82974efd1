pub use sea_orm_migration::prelude::*;

mod columns;
mod idens;
mod m20250301_000001_people;
mod m20250301_000002_time_and_leave;
mod m20250301_000003_development;
mod m20250301_000004_compensation_and_admin;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_people::Migration),
            Box::new(m20250301_000002_time_and_leave::Migration),
            Box::new(m20250301_000003_development::Migration),
            Box::new(m20250301_000004_compensation_and_admin::Migration),
        ]
    }
}
