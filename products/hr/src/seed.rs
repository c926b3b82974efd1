//! Demo data for a fresh database: one administrator who is also the first
//! employee, an engineering department with one position, a recurring
//! holiday and the settings the attendance and leave counters read.

use chrono::NaiveDate;
use entity::{UserRole, department, employee, holiday, position, setting, user};
use rust_decimal::Decimal;
use sea_orm::ConnectionTrait;
use serde_json::json;
use tracing::{info, instrument};

use crate::departments::{self, DepartmentCreate, DepartmentUpdate};
use crate::employees::{self, EmployeeCreate};
use crate::holidays::{self, HolidayCreate};
use crate::positions::{self, PositionCreate};
use crate::settings::{self, SettingCreate, SettingType};
use crate::users::{self, UserCreate};
use crate::{ApiError, ApiResult, PasswordHasher, attendance, stats};

#[derive(Debug, Clone)]
pub struct SeededRecords {
    pub admin: user::Model,
    pub department: department::Model,
    pub position: position::Model,
    pub employee: employee::Model,
    pub holidays: Vec<holiday::Model>,
    pub settings: Vec<setting::Model>,
}

impl SeededRecords {
    pub fn setting(&self, key: &str) -> Option<&setting::Model> {
        self.settings.iter().find(|s| s.key == key)
    }

    pub fn holiday_named(&self, name: &str) -> Option<&holiday::Model> {
        self.holidays.iter().find(|h| h.name == name)
    }
}

fn date(year: i32, month: u32, day: u32) -> ApiResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| ApiError::InvalidInput(format!("invalid date {year}-{month}-{day}")))
}

/// Inserts the demo records. Run it inside a transaction; a second run
/// fails with `Conflict` on the admin email.
#[instrument(name = "hr.seed.demo", skip(db, hasher, admin_password))]
pub async fn seed_demo<C>(
    db: &C,
    hasher: &dyn PasswordHasher,
    admin_email: &str,
    admin_password: &str,
) -> ApiResult<SeededRecords>
where
    C: ConnectionTrait,
{
    let admin = users::register(
        db,
        UserCreate {
            email: admin_email.to_string(),
            password: admin_password.to_string(),
            role: UserRole::Admin,
        },
        hasher,
    )
    .await?;

    let engineering = departments::create(
        db,
        DepartmentCreate {
            name: "Engineering".into(),
            code: "ENG".into(),
            description: "Product engineering".into(),
            manager_id: None,
            budget: Some(Decimal::new(25_000_000, 2)),
        },
    )
    .await?;

    let engineer = positions::create(
        db,
        PositionCreate {
            title: "Software Engineer".into(),
            code: "SWE".into(),
            description: "Builds and runs the product".into(),
            department_id: engineering.id,
            level: "Mid".into(),
            min_salary: Some(Decimal::new(6_000_000, 2)),
            max_salary: Some(Decimal::new(12_000_000, 2)),
            requirements: String::new(),
        },
    )
    .await?;

    let first_hire = employees::create(
        db,
        EmployeeCreate {
            employee_id: "E001".into(),
            user_id: admin.id,
            first_name: "Avery".into(),
            last_name: "Admin".into(),
            date_of_birth: date(1985, 4, 12)?,
            phone: "+1-555-0100".into(),
            address: "1 Main Street".into(),
            emergency_contact_name: "Jordan Admin".into(),
            emergency_contact_phone: "+1-555-0101".into(),
            hire_date: date(2024, 1, 2)?,
            department_id: Some(engineering.id),
            position_id: Some(engineer.id),
            manager_id: None,
        },
    )
    .await?;

    let engineering = departments::update(
        db,
        engineering.id,
        DepartmentUpdate {
            manager_id: Some(Some(first_hire.id)),
            ..DepartmentUpdate::default()
        },
    )
    .await?;

    let new_year = holidays::create(
        db,
        admin.id,
        HolidayCreate {
            name: "New Year".into(),
            date: date(2024, 1, 1)?,
            description: "Observed every year".into(),
            is_recurring: true,
            is_working_day: false,
        },
    )
    .await?;

    let defaults = [
        SettingCreate {
            key: "company.name".into(),
            value: "Demo Company".into(),
            description: "Shown in page headers".into(),
            data_type: SettingType::String,
            is_system: false,
        },
        SettingCreate {
            key: attendance::LATE_AFTER_KEY.into(),
            value: "09:15".into(),
            description: "Check-ins after this time are marked late".into(),
            data_type: SettingType::String,
            is_system: true,
        },
        SettingCreate {
            key: stats::LEAVE_ENTITLEMENTS_KEY.into(),
            value: json!({"annual": 21, "sick": 10, "emergency": 3}).to_string(),
            description: "Yearly leave allowance in days per leave type".into(),
            data_type: SettingType::Json,
            is_system: true,
        },
    ];
    let mut stored = Vec::with_capacity(defaults.len());
    for create in defaults {
        stored.push(settings::create(db, admin.id, create).await?);
    }

    info!(admin_id = admin.id, employee_id = first_hire.id, "demo data seeded");
    Ok(SeededRecords {
        admin,
        department: engineering,
        position: engineer,
        employee: first_hire,
        holidays: vec![new_year],
        settings: stored,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{PlainHasher, migrated_db};

    #[tokio::test]
    async fn seeds_a_consistent_demo() {
        let db = migrated_db().await;
        let seeded = seed_demo(&db, &PlainHasher, "admin@hrd.test", "changeme")
            .await
            .unwrap();

        assert_eq!(seeded.admin.role, UserRole::Admin);
        assert_eq!(seeded.department.manager_id, Some(seeded.employee.id));
        assert_eq!(seeded.employee.position_id, Some(seeded.position.id));
        assert!(seeded.holiday_named("New Year").is_some_and(|h| h.is_recurring));
        assert!(seeded.setting(stats::LEAVE_ENTITLEMENTS_KEY).is_some_and(|s| s.is_system));

        let allowances = stats::entitlements_from_settings(&db).await.unwrap();
        assert_eq!(allowances.get("annual"), Some(&21));
        assert_eq!(
            attendance::late_cutoff(&db).await.unwrap(),
            chrono::NaiveTime::from_hms_opt(9, 15, 0).unwrap()
        );
    }

    #[tokio::test]
    async fn second_run_conflicts_on_admin_email() {
        let db = migrated_db().await;
        seed_demo(&db, &PlainHasher, "admin@hrd.test", "changeme")
            .await
            .unwrap();
        let err = seed_demo(&db, &PlainHasher, "admin@hrd.test", "changeme")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)), "got {err:?}");
    }
}
