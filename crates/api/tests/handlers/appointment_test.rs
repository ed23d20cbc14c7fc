use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clinic_api::{handlers::appointment::*, middleware::error_handling::AppError};
use clinic_core::{
    errors::ClinicError,
    models::appointment::{AppointmentStatus, CreateAppointmentRequest, UpdateStatusRequest},
};
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::test_utils::{TestContext, appointment, at, fake_provider};

// 2030-10-21 is a Monday
fn request(physiotherapist_id: Uuid, scheduled_at: &str, duration_minutes: i64) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        patient_id: Uuid::new_v4(),
        physiotherapist_id,
        service_id: None,
        scheduled_at: at(scheduled_at),
        duration_minutes,
        notes: Some("Lower back pain".to_string()),
    }
}

#[test_log::test(tokio::test)]
async fn test_create_appointment() {
    let mut ctx = TestContext::new();
    let provider = fake_provider();
    let provider_id = provider.id;

    ctx.directory
        .expect_find_provider()
        .with(predicate::eq(provider_id))
        .returning(move |_| Ok(Some(provider.clone())));
    ctx.bookings
        .expect_book()
        .withf(move |new| {
            new.physiotherapist_id == provider_id
                && new.scheduled_at == at("2030-10-21 10:00")
                && new.duration_minutes == 45
        })
        .times(1)
        .returning(move |new| {
            Ok(appointment(
                new.physiotherapist_id,
                "2030-10-21 10:00",
                new.duration_minutes,
                AppointmentStatus::Scheduled,
            ))
        });

    let (status, Json(response)) = create_appointment(
        State(ctx.build_state()),
        Json(request(provider_id, "2030-10-21 10:00", 45)),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert!(response.success);
    assert_eq!(response.data.status, AppointmentStatus::Scheduled);
    assert_eq!(response.data.scheduled_at, at("2030-10-21 10:00"));
}

#[tokio::test]
async fn test_create_appointment_in_the_past() {
    let mut ctx = TestContext::new();
    let provider = fake_provider();
    let provider_id = provider.id;

    ctx.directory
        .expect_find_provider()
        .returning(move |_| Ok(Some(provider.clone())));
    ctx.bookings.expect_book().never();

    // 2020-10-19 was a Monday
    let result = create_appointment(
        State(ctx.build_state()),
        Json(request(provider_id, "2020-10-19 10:00", 45)),
    )
    .await;

    assert!(matches!(result, Err(AppError(ClinicError::Validation(_)))));
}

#[tokio::test]
async fn test_create_appointment_outside_working_hours() {
    let mut ctx = TestContext::new();
    let provider = fake_provider();
    let provider_id = provider.id;

    ctx.directory
        .expect_find_provider()
        .returning(move |_| Ok(Some(provider.clone())));
    ctx.bookings.expect_book().never();

    let result = create_appointment(
        State(ctx.build_state()),
        Json(request(provider_id, "2030-10-21 15:30", 45)),
    )
    .await;

    assert!(matches!(result, Err(AppError(ClinicError::Validation(_)))));
}

#[tokio::test]
async fn test_create_appointment_conflict() {
    let mut ctx = TestContext::new();
    let provider = fake_provider();
    let provider_id = provider.id;

    ctx.directory
        .expect_find_provider()
        .returning(move |_| Ok(Some(provider.clone())));
    ctx.bookings
        .expect_book()
        .times(1)
        .returning(|_| Err(ClinicError::Conflict("Therapist is already booked".to_string())));

    let err = create_appointment(
        State(ctx.build_state()),
        Json(request(provider_id, "2030-10-21 10:00", 45)),
    )
    .await
    .unwrap_err();

    assert_eq!(err.status_code(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_appointment_unknown_therapist() {
    let mut ctx = TestContext::new();
    ctx.directory.expect_find_provider().returning(|_| Ok(None));
    ctx.bookings.expect_book().never();

    let result = create_appointment(
        State(ctx.build_state()),
        Json(request(Uuid::new_v4(), "2030-10-21 10:00", 45)),
    )
    .await;

    assert!(matches!(result, Err(AppError(ClinicError::NotFound(_)))));
}

#[test_log::test(tokio::test)]
async fn test_cancel_appointment() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();
    let provider_id = Uuid::new_v4();

    ctx.bookings
        .expect_update_status()
        .with(predicate::eq(id), predicate::eq(AppointmentStatus::Cancelled))
        .times(1)
        .returning(move |id, status| {
            let mut updated = appointment(provider_id, "2030-10-21 10:00", 45, status);
            updated.id = id;
            Ok(Some(updated))
        });

    let response = update_appointment_status(
        State(ctx.build_state()),
        Path(id),
        Json(UpdateStatusRequest {
            status: AppointmentStatus::Cancelled,
        }),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(response.data.id, id);
    assert_eq!(response.data.status, AppointmentStatus::Cancelled);
    assert!(!response.data.status.blocks_provider_time());
    assert_eq!(
        response.data.status_history.last().map(|change| change.status),
        Some(AppointmentStatus::Cancelled)
    );
}

#[tokio::test]
async fn test_update_status_unknown_appointment() {
    let mut ctx = TestContext::new();
    ctx.bookings
        .expect_update_status()
        .returning(|_, _| Ok(None));

    let result = update_appointment_status(
        State(ctx.build_state()),
        Path(Uuid::new_v4()),
        Json(UpdateStatusRequest {
            status: AppointmentStatus::Confirmed,
        }),
    )
    .await;

    assert!(matches!(result, Err(AppError(ClinicError::NotFound(_)))));
}

#[tokio::test]
async fn test_restoring_status_into_taken_time_is_409() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.bookings
        .expect_update_status()
        .with(predicate::eq(id), predicate::eq(AppointmentStatus::Scheduled))
        .times(1)
        .returning(|id, _| {
            Err(ClinicError::Conflict(format!(
                "Therapist is already booked during appointment {}",
                id
            )))
        });

    let err = update_appointment_status(
        State(ctx.build_state()),
        Path(id),
        Json(UpdateStatusRequest {
            status: AppointmentStatus::Scheduled,
        }),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, AppError(ClinicError::Conflict(_))));
    assert_eq!(err.status_code(), StatusCode::CONFLICT);
}
