use axum::extract::{Path, Query, State};
use chrono::NaiveDate;
use clinic_api::{
    handlers::availability::*,
    middleware::error_handling::AppError,
};
use clinic_core::{errors::ClinicError, models::appointment::BookedInterval};
use mockall::predicate;
use pretty_assertions::assert_eq;
use rstest::rstest;
use uuid::Uuid;

use crate::test_utils::{TestContext, at, fake_provider};

fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn query(therapist: Option<Uuid>, date: Option<&str>, duration: Option<&str>) -> SlotsQuery {
    SlotsQuery {
        therapist: therapist.map(|id| id.to_string()),
        date: date.map(str::to_string),
        duration: duration.map(str::to_string),
    }
}

#[tokio::test]
async fn test_slots_for_a_free_monday() {
    let mut ctx = TestContext::new();
    let provider = fake_provider();
    let provider_id = provider.id;
    let expected_name = provider.full_name();

    ctx.directory
        .expect_find_provider()
        .with(predicate::eq(provider_id))
        .times(1)
        .returning(move |_| Ok(Some(provider.clone())));
    ctx.bookings
        .expect_booked_intervals()
        .with(predicate::eq(provider_id), predicate::eq(monday()))
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let response = get_available_slots(
        State(ctx.build_state()),
        Query(query(Some(provider_id), Some("2026-10-19"), None)),
    )
    .await
    .unwrap()
    .0;

    assert!(response.success);
    assert_eq!(response.therapist_name, expected_name);
    assert_eq!(response.slots.len(), 15);
    assert_eq!(response.slots[0].time, "08:00");
    assert_eq!(response.slots[14].time, "15:00");
    assert_eq!(response.slots[14].end, at("2026-10-19 15:45"));
    assert!(response.slots.iter().all(|slot| slot.available));

    let hours = response.working_hours.unwrap();
    assert_eq!((hours.start.as_str(), hours.end.as_str()), ("08:00", "16:00"));
    assert_eq!(response.message, None);
}

#[tokio::test]
async fn test_booked_time_is_excluded() {
    let mut ctx = TestContext::new();
    let provider = fake_provider();
    let provider_id = provider.id;

    ctx.directory
        .expect_find_provider()
        .returning(move |_| Ok(Some(provider.clone())));
    ctx.bookings
        .expect_booked_intervals()
        .returning(|_, _| Ok(vec![BookedInterval::new(at("2026-10-19 10:00"), 45)]));

    let response = get_available_slots(
        State(ctx.build_state()),
        Query(query(Some(provider_id), Some("2026-10-19"), Some("45"))),
    )
    .await
    .unwrap()
    .0;

    let times: Vec<&str> = response.slots.iter().map(|slot| slot.time.as_str()).collect();
    assert_eq!(times.len(), 12);
    assert!(times.contains(&"09:00"));
    assert!(times.contains(&"11:00"));
    for taken in ["09:30", "10:00", "10:30"] {
        assert!(!times.contains(&taken), "{} should be taken", taken);
    }
}

#[tokio::test]
async fn test_day_off_explains_itself_without_loading_bookings() {
    let mut ctx = TestContext::new();
    let provider = fake_provider();
    let provider_id = provider.id;
    let expected_message = format!("{} does not work on Sunday", provider.full_name());

    ctx.directory
        .expect_find_provider()
        .returning(move |_| Ok(Some(provider.clone())));
    ctx.bookings.expect_booked_intervals().never();

    let response = get_available_slots(
        State(ctx.build_state()),
        Query(query(Some(provider_id), Some("2026-10-18"), None)),
    )
    .await
    .unwrap()
    .0;

    assert!(response.success);
    assert!(response.slots.is_empty());
    assert!(response.working_hours.is_none());
    assert_eq!(response.message, Some(expected_message));
}

#[tokio::test]
async fn test_missing_parameters_are_rejected() {
    let ctx = TestContext::new();
    let state = ctx.build_state();

    let result = get_available_slots(
        State(state.clone()),
        Query(query(None, Some("2026-10-19"), None)),
    )
    .await;
    assert!(matches!(result, Err(AppError(ClinicError::Validation(_)))));

    let result = get_available_slots(
        State(state),
        Query(query(Some(Uuid::new_v4()), None, None)),
    )
    .await;
    assert!(matches!(result, Err(AppError(ClinicError::Validation(_)))));
}

#[tokio::test]
async fn test_malformed_therapist_id_is_rejected() {
    let mut ctx = TestContext::new();
    ctx.directory.expect_find_provider().never();

    let result = get_available_slots(
        State(ctx.build_state()),
        Query(SlotsQuery {
            therapist: Some("not-a-uuid".to_string()),
            date: Some("2026-10-19".to_string()),
            duration: None,
        }),
    )
    .await;

    assert!(matches!(result, Err(AppError(ClinicError::Validation(_)))));
}

#[rstest]
#[case::malformed_date(Some("19.10.2026"), None)]
#[case::zero_duration(Some("2026-10-19"), Some("0"))]
#[case::negative_duration(Some("2026-10-19"), Some("-15"))]
#[case::text_duration(Some("2026-10-19"), Some("long"))]
#[tokio::test]
async fn test_invalid_arguments_never_reach_the_store(
    #[case] date: Option<&str>,
    #[case] duration: Option<&str>,
) {
    let mut ctx = TestContext::new();
    ctx.directory.expect_find_provider().never();
    ctx.bookings.expect_booked_intervals().never();

    let result = get_available_slots(
        State(ctx.build_state()),
        Query(query(Some(Uuid::new_v4()), date, duration)),
    )
    .await;

    assert!(matches!(result, Err(AppError(ClinicError::InvalidArgument(_)))));
}

#[tokio::test]
async fn test_unknown_therapist_is_not_found() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();
    ctx.directory
        .expect_find_provider()
        .with(predicate::eq(id))
        .returning(|_| Ok(None));

    let result = get_available_slots(
        State(ctx.build_state()),
        Query(query(Some(id), Some("2026-10-19"), None)),
    )
    .await;

    match result {
        Err(AppError(ClinicError::NotFound(message))) => {
            assert_eq!(message, format!("Therapist with ID {} not found", id));
        }
        other => panic!("Expected NotFound error, got: {:?}", other),
    }
}

#[tokio::test]
async fn test_store_failure_is_reported_as_database_error() {
    let mut ctx = TestContext::new();
    let provider = fake_provider();
    let provider_id = provider.id;

    ctx.directory
        .expect_find_provider()
        .returning(move |_| Ok(Some(provider.clone())));
    ctx.bookings
        .expect_booked_intervals()
        .returning(|_, _| Err(ClinicError::Database(eyre::eyre!("connection reset"))));

    let result = get_available_slots(
        State(ctx.build_state()),
        Query(query(Some(provider_id), Some("2026-10-19"), None)),
    )
    .await;

    assert!(matches!(result, Err(AppError(ClinicError::Database(_)))));
}

#[tokio::test]
async fn test_employee_availability_uses_path_id() {
    let mut ctx = TestContext::new();
    let provider = fake_provider();
    let provider_id = provider.id;

    ctx.directory
        .expect_find_provider()
        .with(predicate::eq(provider_id))
        .times(1)
        .returning(move |_| Ok(Some(provider.clone())));
    ctx.bookings
        .expect_booked_intervals()
        .returning(|_, _| Ok(Vec::new()));

    let response = get_employee_availability(
        State(ctx.build_state()),
        Path(provider_id),
        Query(EmployeeAvailabilityQuery {
            date: Some("2026-10-19".to_string()),
            duration: Some("60".to_string()),
        }),
    )
    .await
    .unwrap()
    .0;

    // 08:00 .. 15:00 every half hour
    assert_eq!(response.slots.len(), 15);
    assert_eq!(response.slots[14].end, at("2026-10-19 16:00"));
}

#[tokio::test]
async fn test_employee_availability_requires_date() {
    let ctx = TestContext::new();

    let result = get_employee_availability(
        State(ctx.build_state()),
        Path(Uuid::new_v4()),
        Query(EmployeeAvailabilityQuery::default()),
    )
    .await;

    assert!(matches!(result, Err(AppError(ClinicError::Validation(_)))));
}

#[rstest]
#[case(None, 45)]
#[case(Some(""), 45)]
#[case(Some("30"), 30)]
#[case(Some(" 90 "), 90)]
fn test_parse_duration_defaults(#[case] raw: Option<&str>, #[case] expected: i64) {
    assert_eq!(parse_duration(raw, 45).unwrap(), expected);
}
