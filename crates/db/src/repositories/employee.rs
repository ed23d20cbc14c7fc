use crate::models::{DbEmployee, DbScheduleEntry};
use chrono::Utc;
use clinic_core::models::schedule::WeeklyScheduleEntry;
use eyre::Result;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

pub async fn create_employee(
    pool: &Pool<Postgres>,
    first_name: &str,
    last_name: &str,
    schedule: &[WeeklyScheduleEntry],
) -> Result<DbEmployee> {
    let id = Uuid::new_v4();
    let now = Utc::now();

    tracing::debug!(
        "Creating employee: id={}, name={} {}, schedule_entries={}",
        id, first_name, last_name, schedule.len()
    );

    let mut tx = pool.begin().await?;

    let employee = sqlx::query_as::<_, DbEmployee>(
        r#"
        INSERT INTO employees (id, first_name, last_name, is_active, created_at)
        VALUES ($1, $2, $3, TRUE, $4)
        RETURNING id, first_name, last_name, is_active, created_at
        "#,
    )
    .bind(id)
    .bind(first_name)
    .bind(last_name)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    insert_schedule_entries(&mut tx, id, schedule).await?;

    tx.commit().await?;

    Ok(employee)
}

pub async fn get_employee_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbEmployee>> {
    let employee = sqlx::query_as::<_, DbEmployee>(
        r#"
        SELECT id, first_name, last_name, is_active, created_at
        FROM employees
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(employee)
}

pub async fn get_schedule_entries(
    pool: &Pool<Postgres>,
    employee_id: Uuid,
) -> Result<Vec<DbScheduleEntry>> {
    let entries = sqlx::query_as::<_, DbScheduleEntry>(
        r#"
        SELECT employee_id, day_of_week, start_hour, end_hour
        FROM employee_schedules
        WHERE employee_id = $1
        ORDER BY day_of_week ASC
        "#,
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Swaps the whole weekly schedule in one transaction.
pub async fn replace_schedule(
    pool: &Pool<Postgres>,
    employee_id: Uuid,
    schedule: &[WeeklyScheduleEntry],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM employee_schedules
        WHERE employee_id = $1
        "#,
    )
    .bind(employee_id)
    .execute(&mut *tx)
    .await?;

    insert_schedule_entries(&mut tx, employee_id, schedule).await?;

    tx.commit().await?;

    tracing::debug!("Schedule replaced for employee {}", employee_id);
    Ok(())
}

async fn insert_schedule_entries(
    tx: &mut Transaction<'_, Postgres>,
    employee_id: Uuid,
    schedule: &[WeeklyScheduleEntry],
) -> Result<()> {
    for entry in schedule {
        sqlx::query(
            r#"
            INSERT INTO employee_schedules (employee_id, day_of_week, start_hour, end_hour)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(employee_id)
        .bind(i16::from(entry.day_of_week))
        .bind(i16::from(entry.start_hour))
        .bind(i16::from(entry.end_hour))
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}
