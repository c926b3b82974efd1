mod config;
mod hasher;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use migration::{Migrator, MigratorTrait};
use platform_db::{DbPool, connect};
use platform_obs::init_tracing;
use products_hr::seed::seed_demo;
use sea_orm::TransactionTrait;
use tracing::info;

use crate::{config::AppConfig, hasher::Argon2Hasher};

#[derive(Parser, Debug)]
#[command(name = "hrd", version, about = "HR administration toolkit")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Manage the hrd_* schema.
    #[command(subcommand)]
    Migrate(MigrateCommand),
    /// Insert demo records (admin user, department, position, holiday, settings).
    Seed(SeedCommand),
}

#[derive(Subcommand, Debug)]
enum MigrateCommand {
    /// Apply pending migrations.
    Up,
    /// Roll back the most recent migrations.
    Down {
        #[arg(long, default_value_t = 1)]
        steps: u32,
    },
    /// List applied and pending migrations.
    Status,
}

#[derive(Args, Debug)]
struct SeedCommand {
    /// Administrator email; overrides HRD_ADMIN_EMAIL.
    #[arg(long)]
    admin_email: Option<String>,
    /// Apply pending migrations before seeding.
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    init_tracing(config.obs.clone())?;
    match cli.command {
        Command::Migrate(action) => match action {
            MigrateCommand::Up => migrate_up(&config).await,
            MigrateCommand::Down { steps } => migrate_down(&config, steps).await,
            MigrateCommand::Status => migrate_status(&config).await,
        },
        Command::Seed(cmd) => run_seed(&config, cmd).await,
    }
}

async fn setup_pool(config: &AppConfig) -> Result<DbPool> {
    connect(&config.database).await.map_err(Into::into)
}

async fn ensure_migrations(pool: &DbPool) -> Result<()> {
    let pending = Migrator::get_pending_migrations(pool).await?;
    if !pending.is_empty() {
        anyhow::bail!(
            "{} pending migrations; run `hrd migrate up` or pass --migrate",
            pending.len()
        );
    }
    Ok(())
}

async fn migrate_up(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    Migrator::up(&pool, None).await?;
    info!("database migrations applied");
    Ok(())
}

async fn migrate_down(config: &AppConfig, steps: u32) -> Result<()> {
    let pool = setup_pool(config).await?;
    Migrator::down(&pool, Some(steps)).await?;
    info!(steps, "migrations rolled back");
    Ok(())
}

async fn migrate_status(config: &AppConfig) -> Result<()> {
    let pool = setup_pool(config).await?;
    for migration in Migrator::get_applied_migrations(&pool).await? {
        println!("applied  {}", migration.name());
    }
    for migration in Migrator::get_pending_migrations(&pool).await? {
        println!("pending  {}", migration.name());
    }
    Ok(())
}

async fn run_seed(config: &AppConfig, cmd: SeedCommand) -> Result<()> {
    let pool = setup_pool(config).await?;
    if cmd.migrate {
        Migrator::up(&pool, None).await?;
    } else {
        ensure_migrations(&pool).await?;
    }
    let email = cmd.admin_email.as_deref().unwrap_or(&config.admin_email);
    let password = config.admin_password()?;

    let txn = pool.begin().await?;
    let seeded = seed_demo(&txn, &Argon2Hasher, email, password)
        .await
        .with_context(|| format!("seed data failed for {email}"))?;
    txn.commit().await?;

    info!(
        admin = %seeded.admin.email,
        department = %seeded.department.code,
        employee = %seeded.employee.employee_id,
        settings = seeded.settings.len(),
        "demo data ready"
    );
    Ok(())
}
