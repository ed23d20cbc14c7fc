use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use clinic_api::{handlers::employee::*, middleware::error_handling::AppError};
use clinic_core::{
    errors::ClinicError,
    models::schedule::{CreateEmployeeRequest, Provider, UpdateScheduleRequest, WeeklyScheduleEntry},
    schedule::default_weekly_schedule,
};
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use crate::test_utils::{TestContext, fake_provider};

fn weekend_shift_schedule() -> Vec<WeeklyScheduleEntry> {
    vec![
        WeeklyScheduleEntry::new(0, 10, 14),
        WeeklyScheduleEntry::day_off(1),
        WeeklyScheduleEntry::day_off(2),
        WeeklyScheduleEntry::new(3, 12, 20),
        WeeklyScheduleEntry::new(4, 12, 20),
        WeeklyScheduleEntry::new(5, 8, 12),
        WeeklyScheduleEntry::new(6, 9, 15),
    ]
}

#[tokio::test]
async fn test_get_schedule() {
    let mut ctx = TestContext::new();
    let provider = fake_provider();
    let id = provider.id;
    let expected = provider.clone();

    ctx.directory
        .expect_find_provider()
        .with(predicate::eq(id))
        .times(1)
        .returning(move |_| Ok(Some(provider.clone())));

    let response = get_employee_schedule(State(ctx.build_state()), Path(id))
        .await
        .unwrap()
        .0;

    assert_eq!(response.id, expected.id);
    assert_eq!(response.first_name, expected.first_name);
    assert_eq!(response.last_name, expected.last_name);
    assert_eq!(response.schedule, default_weekly_schedule());
}

#[tokio::test]
async fn test_get_schedule_not_found() {
    let mut ctx = TestContext::new();
    ctx.directory.expect_find_provider().returning(|_| Ok(None));

    let result = get_employee_schedule(State(ctx.build_state()), Path(Uuid::new_v4())).await;

    match result {
        Err(AppError(ClinicError::NotFound(_))) => {} // Expected
        other => panic!("Expected NotFound error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_update_schedule_replaces_all_days() {
    let mut ctx = TestContext::new();
    let provider = fake_provider();
    let id = provider.id;

    ctx.directory
        .expect_replace_schedule()
        .withf(move |got_id, schedule| *got_id == id && *schedule == weekend_shift_schedule())
        .times(1)
        .returning(move |_, schedule| {
            Ok(Some(Provider {
                schedule,
                ..provider.clone()
            }))
        });

    let response = update_employee_schedule(
        State(ctx.build_state()),
        Path(id),
        Json(UpdateScheduleRequest {
            schedule: weekend_shift_schedule(),
        }),
    )
    .await
    .unwrap()
    .0;

    assert_eq!(response.schedule, weekend_shift_schedule());
}

#[tokio::test]
async fn test_update_schedule_rejects_incomplete_week() {
    let mut ctx = TestContext::new();
    ctx.directory.expect_replace_schedule().never();

    let mut schedule = weekend_shift_schedule();
    schedule.pop();

    let result = update_employee_schedule(
        State(ctx.build_state()),
        Path(Uuid::new_v4()),
        Json(UpdateScheduleRequest { schedule }),
    )
    .await;

    assert!(matches!(result, Err(AppError(ClinicError::Validation(_)))));
}

#[tokio::test]
async fn test_update_schedule_rejects_inverted_hours() {
    let mut ctx = TestContext::new();
    ctx.directory.expect_replace_schedule().never();

    let mut schedule = weekend_shift_schedule();
    schedule[3] = WeeklyScheduleEntry::new(3, 20, 12);

    let result = update_employee_schedule(
        State(ctx.build_state()),
        Path(Uuid::new_v4()),
        Json(UpdateScheduleRequest { schedule }),
    )
    .await;

    assert!(matches!(result, Err(AppError(ClinicError::Validation(_)))));
}

#[tokio::test]
async fn test_update_schedule_for_unknown_employee() {
    let mut ctx = TestContext::new();
    ctx.directory
        .expect_replace_schedule()
        .returning(|_, _| Ok(None));

    let result = update_employee_schedule(
        State(ctx.build_state()),
        Path(Uuid::new_v4()),
        Json(UpdateScheduleRequest {
            schedule: default_weekly_schedule(),
        }),
    )
    .await;

    assert!(matches!(result, Err(AppError(ClinicError::NotFound(_)))));
}

#[tokio::test]
async fn test_create_employee_gets_default_schedule() {
    let mut ctx = TestContext::new();

    ctx.directory
        .expect_create_provider()
        .withf(|first, last, schedule| {
            first == "Anna" && last == "Nowak" && *schedule == default_weekly_schedule()
        })
        .times(1)
        .returning(|first_name, last_name, schedule| {
            Ok(Provider {
                id: Uuid::new_v4(),
                first_name,
                last_name,
                schedule,
            })
        });

    let (status, Json(response)) = create_employee(
        State(ctx.build_state()),
        Json(CreateEmployeeRequest {
            first_name: " Anna ".to_string(),
            last_name: "Nowak".to_string(),
            schedule: None,
        }),
    )
    .await
    .unwrap();

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response.first_name, "Anna");
    assert_eq!(response.schedule, default_weekly_schedule());
}

#[tokio::test]
async fn test_create_employee_requires_names() {
    let mut ctx = TestContext::new();
    ctx.directory.expect_create_provider().never();

    let result = create_employee(
        State(ctx.build_state()),
        Json(CreateEmployeeRequest {
            first_name: "   ".to_string(),
            last_name: "Nowak".to_string(),
            schedule: None,
        }),
    )
    .await;

    assert!(matches!(result, Err(AppError(ClinicError::Validation(_)))));
}
