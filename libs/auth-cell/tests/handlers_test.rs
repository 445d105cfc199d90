use std::marker::PhantomData;

use axum::extract::{Json, State};
use axum_extra::{extract::WithRejection, TypedHeader};
use headers::Authorization;

use auth_cell::handlers::{current_session, login_admin, login_doctor, login_patient};
use auth_cell::models::{AdminLoginRequest, DoctorLoginRequest, PatientLoginRequest};
use shared_models::auth::Role;
use shared_models::error::AppError;
use shared_utils::test_utils::{JwtTestUtils, TestSession, TestState};

#[tokio::test]
async fn test_patient_login_success() {
    let test = TestState::new();
    let patient = test.seed_patient("Kavya Iyer").await;

    let result = login_patient(
        State(test.state.clone()),
        WithRejection(Json(PatientLoginRequest {
            patient_id: Some(patient.patient_id.clone()),
            patient_date_of_birth: Some("1992-08-15".to_string()),
        }), PhantomData),
    )
    .await;

    let response = result.unwrap().0;
    assert!(response.success);
    assert_eq!(response.message.as_deref(), Some("p00001 Login success"));
    assert_eq!(response.data.role, Role::Patient);
    assert_eq!(response.data.name.as_deref(), Some("Kavya Iyer"));
}

#[tokio::test]
async fn test_patient_login_accepts_day_first_dates() {
    let test = TestState::new();
    let patient = test.seed_patient("Kavya Iyer").await;

    let result = login_patient(
        State(test.state.clone()),
        WithRejection(Json(PatientLoginRequest {
            patient_id: Some(patient.patient_id),
            patient_date_of_birth: Some("15/8/1992".to_string()),
        }), PhantomData),
    )
    .await;

    assert!(result.is_ok());
}

#[tokio::test]
async fn test_patient_login_wrong_date_of_birth() {
    let test = TestState::new();
    let patient = test.seed_patient("Kavya Iyer").await;

    let result = login_patient(
        State(test.state.clone()),
        WithRejection(Json(PatientLoginRequest {
            patient_id: Some(patient.patient_id),
            patient_date_of_birth: Some("1992-08-16".to_string()),
        }), PhantomData),
    )
    .await;

    match result.unwrap_err() {
        AppError::Auth(msg) => assert_eq!(msg, "Invalid credentials"),
        other => panic!("Expected Auth error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_doctor_login_unknown_and_missing_fields() {
    let test = TestState::new();

    let unknown = login_doctor(
        State(test.state.clone()),
        WithRejection(Json(DoctorLoginRequest {
            doctor_id: Some("d404".to_string()),
            doctor_date_of_birth: Some("1980-03-09".to_string()),
        }), PhantomData),
    )
    .await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));

    let missing = login_doctor(
        State(test.state.clone()),
        WithRejection(Json(DoctorLoginRequest {
            doctor_id: None,
            doctor_date_of_birth: Some("1980-03-09".to_string()),
        }), PhantomData),
    )
    .await;
    assert!(matches!(missing, Err(AppError::ValidationError(_))));
}

#[tokio::test]
async fn test_admin_login() {
    let test = TestState::new();

    let ok = login_admin(
        State(test.state.clone()),
        WithRejection(Json(AdminLoginRequest {
            username: Some(test.config.admin_username.clone()),
            password: Some(test.config.admin_password.clone()),
        }), PhantomData),
    )
    .await
    .unwrap();
    assert_eq!(ok.0.data.role, Role::Admin);

    let wrong = login_admin(
        State(test.state.clone()),
        WithRejection(Json(AdminLoginRequest {
            username: Some(test.config.admin_username.clone()),
            password: Some("guess".to_string()),
        }), PhantomData),
    )
    .await;
    assert!(matches!(wrong, Err(AppError::Auth(_))));
}

#[tokio::test]
async fn test_current_session() {
    let test = TestState::new();
    let session = TestSession::doctor("d001");
    let token = JwtTestUtils::create_test_token(&session, &test.config.session_secret, Some(1));

    let bearer = Authorization::bearer(&token).unwrap();
    let response = current_session(State(test.state.clone()), Some(TypedHeader(bearer)))
        .await
        .unwrap()
        .0;
    assert_eq!(response.data.subject, "d001");
    assert_eq!(response.data.role, Role::Doctor);

    let missing = current_session(State(test.state.clone()), None).await;
    assert!(matches!(missing, Err(AppError::Auth(_))));

    let expired = JwtTestUtils::create_expired_token(&session, &test.config.session_secret);
    let bearer = Authorization::bearer(&expired).unwrap();
    let result = current_session(State(test.state.clone()), Some(TypedHeader(bearer))).await;
    assert!(matches!(result, Err(AppError::Auth(_))));
}
