use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use tower::ServiceExt;

use patient_cell::router::patient_routes;
use shared_database::{StatisticsRepository, VisitRepository};
use shared_models::visit::NewVisit;
use shared_utils::test_utils::{TestSession, TestState};

fn create_test_app(test: &TestState) -> Router {
    patient_routes(test.state.clone())
}

async fn send(app: Router, method: &str, uri: &str, bearer: Option<String>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(bearer) = bearer {
        builder = builder.header("authorization", bearer);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, json)
}

fn registration() -> Value {
    json!({
        "patientName": "Nikhil Verma",
        "dateOfBirth": "1995-07-21",
        "address": "14 Park Avenue",
        "contactNumber": "9123456789",
        "gender": "M",
        "bloodGroup": "O+",
        "height": 176.5,
        "weight": 72.0
    })
}

#[tokio::test]
async fn test_requires_authentication() {
    let test = TestState::new();
    let (status, body) = send(create_test_app(&test), "GET", "/", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_admin_registers_patient() {
    let test = TestState::new();
    let admin = test.bearer(&TestSession::admin());

    let (status, body) = send(create_test_app(&test), "POST", "/", Some(admin.clone()), Some(registration())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["patient_id"], "p00001");
    assert_eq!(body["data"]["patient_gender"], "M");
    assert_eq!(body["data"]["patient_blood_group"], "O+");

    let (status, body) = send(create_test_app(&test), "GET", "/", Some(admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_non_admin_cannot_register() {
    let test = TestState::new();
    let doctor = test.bearer(&TestSession::doctor("d001"));

    let (status, body) = send(create_test_app(&test), "POST", "/", Some(doctor), Some(registration())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");
}

#[tokio::test]
async fn test_invalid_registration_is_bad_request() {
    let test = TestState::new();
    let admin = test.bearer(&TestSession::admin());

    let mut body = registration();
    body["contactNumber"] = json!("12-34");
    let (status, response) = send(create_test_app(&test), "POST", "/", Some(admin), Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "validation_error");
}

#[tokio::test]
async fn test_wrong_typed_field_uses_error_envelope() {
    let test = TestState::new();
    let admin = test.bearer(&TestSession::admin());

    let mut body = registration();
    body["height"] = json!("tall");
    let (status, response) = send(create_test_app(&test), "POST", "/", Some(admin), Some(body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["success"], false);
    assert_eq!(response["error"], "validation_error");
    assert!(response["message"].as_str().unwrap().contains("height"));
}

#[tokio::test]
async fn test_malformed_json_uses_error_envelope() {
    let test = TestState::new();
    let request = Request::builder()
        .method("POST")
        .uri("/")
        .header("authorization", test.bearer(&TestSession::admin()))
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = create_test_app(&test).oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(test.store.count_patients().await.unwrap(), 0);
}

#[tokio::test]
async fn test_patient_reads_only_own_record() {
    let test = TestState::new();
    let own = test.seed_patient("Own Record").await;
    let other = test.seed_patient("Someone Else").await;
    let bearer = test.bearer(&TestSession::patient(&own.patient_id));

    let (status, body) = send(create_test_app(&test), "GET", &format!("/{}", own.patient_id), Some(bearer.clone()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["patient_name"], "Own Record");

    let (status, _) = send(create_test_app(&test), "GET", &format!("/{}", other.patient_id), Some(bearer), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let doctor = test.bearer(&TestSession::doctor("d001"));
    let (status, _) = send(create_test_app(&test), "GET", &format!("/{}", other.patient_id), Some(doctor), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_partial_update() {
    let test = TestState::new();
    let patient = test.seed_patient("Before").await;
    let admin = test.bearer(&TestSession::admin());

    let (status, body) = send(
        create_test_app(&test),
        "PUT",
        &format!("/{}", patient.patient_id),
        Some(admin.clone()),
        Some(json!({ "patientName": "After" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["patient_name"], "After");
    assert_eq!(body["data"]["patient_address"], patient.patient_address);

    let (status, _) = send(create_test_app(&test), "PUT", &format!("/{}", patient.patient_id), Some(admin.clone()), Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(create_test_app(&test), "PUT", "/p09999", Some(admin), Some(json!({ "address": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_rules() {
    let test = TestState::new();
    let admin = test.bearer(&TestSession::admin());
    let booked = test.seed_patient("Booked").await;
    let free = test.seed_patient("Free").await;
    let doctor = test.seed_doctor("Dr. Lal", true).await;

    test.store
        .create_visit(NewVisit {
            patient_id: booked.patient_id.clone(),
            doctor_id: doctor.doctor_id,
            date_of_visit: Utc::now(),
            visit_reason: None,
        })
        .await
        .unwrap();

    let (status, body) = send(create_test_app(&test), "DELETE", &format!("/{}", booked.patient_id), Some(admin.clone()), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "conflict");

    let (status, _) = send(create_test_app(&test), "DELETE", "/not-an-id", Some(admin.clone()), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(create_test_app(&test), "DELETE", &format!("/{}", free.patient_id), Some(admin.clone()), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(create_test_app(&test), "DELETE", &format!("/{}", free.patient_id), Some(admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
