use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

const INDEXES: [&str; 5] = [
    "CREATE INDEX IF NOT EXISTS idx_appointments_physiotherapist_scheduled_at ON appointments(physiotherapist_id, scheduled_at)",
    "CREATE INDEX IF NOT EXISTS idx_appointments_patient_scheduled_at ON appointments(patient_id, scheduled_at DESC)",
    "CREATE INDEX IF NOT EXISTS idx_appointments_status_scheduled_at ON appointments(status, scheduled_at)",
    "CREATE INDEX IF NOT EXISTS idx_employees_last_name ON employees(last_name, first_name)",
    "CREATE INDEX IF NOT EXISTS idx_status_history_appointment ON appointment_status_history(appointment_id, changed_at)",
];

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create employees table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            first_name VARCHAR(255) NOT NULL,
            last_name VARCHAR(255) NOT NULL,
            is_active BOOLEAN NOT NULL DEFAULT TRUE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create employee_schedules table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS employee_schedules (
            employee_id UUID NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
            day_of_week SMALLINT NOT NULL,
            start_hour SMALLINT NOT NULL,
            end_hour SMALLINT NOT NULL,
            PRIMARY KEY (employee_id, day_of_week),
            CONSTRAINT valid_day_of_week CHECK (day_of_week BETWEEN 0 AND 6),
            CONSTRAINT valid_start_hour CHECK (start_hour BETWEEN 0 AND 23),
            CONSTRAINT valid_end_hour CHECK (end_hour BETWEEN 0 AND 24),
            CONSTRAINT valid_hour_range CHECK (start_hour <= end_hour)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointments table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointments (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            patient_id UUID NOT NULL,
            physiotherapist_id UUID NOT NULL REFERENCES employees(id),
            service_id UUID NULL,
            scheduled_at TIMESTAMP WITH TIME ZONE NOT NULL,
            duration_minutes INTEGER NOT NULL,
            status VARCHAR(32) NOT NULL DEFAULT 'scheduled',
            notes TEXT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_duration CHECK (duration_minutes BETWEEN 15 AND 240)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create appointment_status_history table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS appointment_status_history (
            id BIGSERIAL PRIMARY KEY,
            appointment_id UUID NOT NULL REFERENCES appointments(id) ON DELETE CASCADE,
            status VARCHAR(32) NOT NULL,
            changed_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in INDEXES {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
