use crate::models::{DbAppointment, DbStatusChange};
use chrono::{DateTime, Utc};
use clinic_core::models::appointment::AppointmentStatus;
use eyre::Result;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

/// Row values for a new appointment, already converted to UTC.
#[derive(Debug, Clone)]
pub struct NewAppointmentRow {
    pub patient_id: Uuid,
    pub physiotherapist_id: Uuid,
    pub service_id: Option<Uuid>,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: i32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub enum BookingOutcome {
    Booked(DbAppointment),
    /// Ids of the blocking appointments that overlap the requested time.
    Conflict(Vec<Uuid>),
}

#[derive(Debug, Clone)]
pub enum StatusUpdateOutcome {
    Updated(DbAppointment),
    NotFound,
    /// The appointment would block time already taken by these appointments.
    Conflict(Vec<Uuid>),
}

fn non_blocking_statuses() -> Vec<String> {
    AppointmentStatus::non_blocking()
        .iter()
        .map(|status| status.as_str().to_string())
        .collect()
}

/// Whether moving from the stored status to `next` makes the appointment
/// occupy its time again. Unknown stored statuses count as blocking, the
/// same way the overlap queries treat them.
fn reblocks(stored: &str, next: AppointmentStatus) -> bool {
    next.blocks_provider_time() && non_blocking_statuses().iter().any(|status| status == stored)
}

/// Appointments of one physiotherapist that overlap `[from, to)` and still
/// occupy their time.
pub async fn get_blocking_appointments_between(
    pool: &Pool<Postgres>,
    physiotherapist_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
) -> Result<Vec<DbAppointment>> {
    let appointments = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, patient_id, physiotherapist_id, service_id, scheduled_at,
               duration_minutes, status, notes, created_at, updated_at
        FROM appointments
        WHERE physiotherapist_id = $1
          AND scheduled_at < $3
          AND scheduled_at + make_interval(mins => duration_minutes) > $2
          AND status <> ALL($4)
        ORDER BY scheduled_at ASC
        "#,
    )
    .bind(physiotherapist_id)
    .bind(from)
    .bind(to)
    .bind(non_blocking_statuses())
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

/// Inserts an appointment unless it collides with a blocking one.
///
/// A transaction-scoped advisory lock keyed on the physiotherapist makes
/// concurrent bookings for the same person run one after another, so the
/// overlap check and the insert cannot interleave.
pub async fn create_appointment_exclusive(
    pool: &Pool<Postgres>,
    appointment: &NewAppointmentRow,
) -> Result<BookingOutcome> {
    let id = Uuid::new_v4();
    let now = Utc::now();
    let ends_at = appointment.scheduled_at
        + chrono::Duration::minutes(i64::from(appointment.duration_minutes));

    let mut tx = pool.begin().await?;

    lock_physiotherapist(&mut tx, appointment.physiotherapist_id).await?;

    let conflicts = find_overlapping(
        &mut tx,
        appointment.physiotherapist_id,
        appointment.scheduled_at,
        ends_at,
        None,
    )
    .await?;

    if !conflicts.is_empty() {
        tx.rollback().await?;
        return Ok(BookingOutcome::Conflict(conflicts));
    }

    let created = sqlx::query_as::<_, DbAppointment>(
        r#"
        INSERT INTO appointments (id, patient_id, physiotherapist_id, service_id, scheduled_at,
                                  duration_minutes, status, notes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
        RETURNING id, patient_id, physiotherapist_id, service_id, scheduled_at,
                  duration_minutes, status, notes, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(appointment.patient_id)
    .bind(appointment.physiotherapist_id)
    .bind(appointment.service_id)
    .bind(appointment.scheduled_at)
    .bind(appointment.duration_minutes)
    .bind(AppointmentStatus::Scheduled.as_str())
    .bind(appointment.notes.as_deref())
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    record_status(&mut tx, id, AppointmentStatus::Scheduled, now).await?;

    tx.commit().await?;

    tracing::debug!("Appointment created: id={}", created.id);
    Ok(BookingOutcome::Booked(created))
}

/// Changes the status and appends it to the history in one transaction.
///
/// When a cancelled or no-show appointment is moved back to a status that
/// blocks time, the overlap check from [`create_appointment_exclusive`] runs
/// again under the same advisory lock, ignoring the appointment itself.
pub async fn update_appointment_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: AppointmentStatus,
) -> Result<StatusUpdateOutcome> {
    let now = Utc::now();
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, DbAppointment>(
        r#"
        SELECT id, patient_id, physiotherapist_id, service_id, scheduled_at,
               duration_minutes, status, notes, created_at, updated_at
        FROM appointments
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(current) = current else {
        tx.rollback().await?;
        return Ok(StatusUpdateOutcome::NotFound);
    };

    if reblocks(&current.status, status) {
        lock_physiotherapist(&mut tx, current.physiotherapist_id).await?;

        let ends_at =
            current.scheduled_at + chrono::Duration::minutes(i64::from(current.duration_minutes));
        let conflicts = find_overlapping(
            &mut tx,
            current.physiotherapist_id,
            current.scheduled_at,
            ends_at,
            Some(current.id),
        )
        .await?;

        if !conflicts.is_empty() {
            tx.rollback().await?;
            return Ok(StatusUpdateOutcome::Conflict(conflicts));
        }
    }

    let updated = sqlx::query_as::<_, DbAppointment>(
        r#"
        UPDATE appointments
        SET status = $2, updated_at = $3
        WHERE id = $1
        RETURNING id, patient_id, physiotherapist_id, service_id, scheduled_at,
                  duration_minutes, status, notes, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    record_status(&mut tx, id, status, now).await?;

    tx.commit().await?;

    tracing::debug!("Appointment {} moved from {} to {}", id, current.status, updated.status);
    Ok(StatusUpdateOutcome::Updated(updated))
}

pub async fn get_status_history(
    pool: &Pool<Postgres>,
    appointment_id: Uuid,
) -> Result<Vec<DbStatusChange>> {
    let history = sqlx::query_as::<_, DbStatusChange>(
        r#"
        SELECT appointment_id, status, changed_at
        FROM appointment_status_history
        WHERE appointment_id = $1
        ORDER BY changed_at ASC, id ASC
        "#,
    )
    .bind(appointment_id)
    .fetch_all(pool)
    .await?;

    Ok(history)
}

async fn lock_physiotherapist(
    tx: &mut Transaction<'_, Postgres>,
    physiotherapist_id: Uuid,
) -> Result<()> {
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
        .bind(physiotherapist_id.to_string())
        .execute(&mut **tx)
        .await?;

    Ok(())
}

/// Ids of blocking appointments overlapping `[from, to)`, optionally
/// leaving one appointment out.
async fn find_overlapping(
    tx: &mut Transaction<'_, Postgres>,
    physiotherapist_id: Uuid,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    except: Option<Uuid>,
) -> Result<Vec<Uuid>> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        r#"
        SELECT id
        FROM appointments
        WHERE physiotherapist_id = $1
          AND scheduled_at < $3
          AND scheduled_at + make_interval(mins => duration_minutes) > $2
          AND status <> ALL($4)
          AND ($5::uuid IS NULL OR id <> $5)
        "#,
    )
    .bind(physiotherapist_id)
    .bind(from)
    .bind(to)
    .bind(non_blocking_statuses())
    .bind(except)
    .fetch_all(&mut **tx)
    .await?;

    Ok(ids)
}

async fn record_status(
    tx: &mut Transaction<'_, Postgres>,
    appointment_id: Uuid,
    status: AppointmentStatus,
    changed_at: DateTime<Utc>,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO appointment_status_history (appointment_id, status, changed_at)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(appointment_id)
    .bind(status.as_str())
    .bind(changed_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
