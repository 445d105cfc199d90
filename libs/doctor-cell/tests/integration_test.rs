use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use doctor_cell::router::doctor_routes;
use shared_database::VisitRepository;
use shared_models::visit::NewVisit;
use shared_utils::test_utils::{TestSession, TestState};

fn create_test_app(test: &TestState) -> Router {
    doctor_routes(test.state.clone())
}

async fn send(test: &TestState, method: &str, uri: &str, session: &TestSession, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", test.bearer(session));
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = create_test_app(test).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

fn registration() -> Value {
    json!({
        "doctorName": "Dr. Anil Kapoor",
        "doctorSpecialization": "neurology",
        "dateOfBirth": "1975-04-18",
        "contactNumber": "9345678012",
        "address": "Neuro Wing",
        "gender": "male"
    })
}

#[tokio::test]
async fn test_create_doctor_success() {
    let test = TestState::new();

    let (status, body) = send(&test, "POST", "/", &TestSession::admin(), Some(registration())).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["doctor_id"], "d001");
    assert_eq!(body["data"]["doctor_specialization"], "Neurology");
    assert_eq!(body["data"]["doctor_is_available"], true);
}

#[tokio::test]
async fn test_sequential_doctor_ids() {
    let test = TestState::new();

    for expected in ["d001", "d002", "d003"] {
        let (status, body) = send(&test, "POST", "/", &TestSession::admin(), Some(registration())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["data"]["doctor_id"], expected);
    }
}

#[tokio::test]
async fn test_available_listing() {
    let test = TestState::new();
    test.seed_doctor("Dr. On", true).await;
    test.seed_doctor("Dr. Off", false).await;
    let patient = TestSession::patient("p00001");

    let (status, body) = send(&test, "GET", "/", &patient, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (status, body) = send(&test, "GET", "/available", &patient, None).await;
    assert_eq!(status, StatusCode::OK);
    let available = body["data"].as_array().unwrap();
    assert_eq!(available.len(), 1);
    assert_eq!(available[0]["doctor_name"], "Dr. On");
}

#[tokio::test]
async fn test_doctor_updates_own_record_only() {
    let test = TestState::new();
    let own = test.seed_doctor("Dr. Own", true).await;
    let other = test.seed_doctor("Dr. Other", true).await;
    let session = TestSession::doctor(&own.doctor_id);

    let (status, body) = send(
        &test,
        "PUT",
        &format!("/{}", own.doctor_id),
        &session,
        Some(json!({ "doctorIsAvailable": false })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["doctor_is_available"], false);

    let (status, _) = send(
        &test,
        "PUT",
        &format!("/{}", other.doctor_id),
        &session,
        Some(json!({ "doctorIsAvailable": false })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_delete_referenced_doctor_conflicts() {
    let test = TestState::new();
    let patient = test.seed_patient("Booked Patient").await;
    let busy = test.seed_doctor("Dr. Busy", true).await;
    let idle = test.seed_doctor("Dr. Idle", true).await;

    test.store
        .create_visit(NewVisit {
            patient_id: patient.patient_id,
            doctor_id: busy.doctor_id.clone(),
            date_of_visit: Utc::now() + Duration::days(1),
            visit_reason: None,
        })
        .await
        .unwrap();

    let admin = TestSession::admin();

    let (status, body) = send(&test, "DELETE", &format!("/{}", busy.doctor_id), &admin, None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);

    let (status, body) = send(&test, "DELETE", &format!("/{}", idle.doctor_id), &admin, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["doctor_id"], idle.doctor_id);

    let (status, _) = send(&test, "DELETE", "/d12", &admin, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&test, "DELETE", &format!("/{}", idle.doctor_id), &admin, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_doctor_is_not_found() {
    let test = TestState::new();

    let (status, body) = send(&test, "GET", "/d404", &TestSession::admin(), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Doctor not found");
}
