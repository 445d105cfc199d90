use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{TimeZone, Utc};
use serde_json::{json, Value};
use tower::ServiceExt;

use report_cell::router::report_routes;
use shared_database::VisitRepository;
use shared_models::visit::{CompletionNote, NewVisit, Visit, VisitTransition};
use shared_utils::test_utils::{TestSession, TestState};

fn create_test_app(test: &TestState) -> Router {
    report_routes(test.state.clone())
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

async fn pending_visit(test: &TestState, patient_id: &str, day: u32) -> Visit {
    test.store
        .create_visit(NewVisit {
            patient_id: patient_id.to_string(),
            doctor_id: "d001".to_string(),
            date_of_visit: Utc.with_ymd_and_hms(2026, 3, day, 9, 30, 0).unwrap(),
            visit_reason: None,
        })
        .await
        .unwrap()
}

async fn completed_visit(test: &TestState, patient_id: &str, day: u32) -> Visit {
    let visit = pending_visit(test, patient_id, day).await;
    let note = CompletionNote {
        doctor_remarks: format!("Checked on day {}", day),
        prescription: None,
        follow_up_date: None,
    };
    test.store
        .transition_visit(visit.visit_id, VisitTransition::Complete(note))
        .await
        .unwrap()
        .visit
}

async fn seeded() -> TestState {
    let test = TestState::new();
    test.seed_doctor("Dr. Meera Iyer", true).await;
    test.seed_patient("Asha Rao").await;
    test.seed_patient("Ravi Kumar").await;
    test
}

#[tokio::test]
async fn test_requires_authentication() {
    let test = TestState::new();
    let (status, _) = send(create_test_app(&test), "GET", "/", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_empty_list_is_ok() {
    let test = seeded().await;

    let (status, body) = send(
        create_test_app(&test),
        "GET",
        "/?patientId=p00001",
        Some(test.bearer(&TestSession::admin())),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
}

#[tokio::test]
async fn test_list_orders_newest_visit_first_and_filters() {
    let test = seeded().await;
    completed_visit(&test, "p00001", 2).await;
    completed_visit(&test, "p00001", 9).await;
    completed_visit(&test, "p00002", 5).await;
    let admin = test.bearer(&TestSession::admin());

    let (status, body) = send(create_test_app(&test), "GET", "/", Some(admin.clone()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (_, body) = send(create_test_app(&test), "GET", "/?patientId=p00001", Some(admin), None).await;
    let reports = body["data"].as_array().unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0]["report_id"], "R0000000002");
    assert_eq!(reports[1]["report_id"], "R0000000001");
}

#[tokio::test]
async fn test_patient_sees_only_own_reports() {
    let test = seeded().await;
    completed_visit(&test, "p00001", 2).await;
    completed_visit(&test, "p00002", 5).await;
    let patient = test.bearer(&TestSession::patient("p00002"));

    let (status, body) = send(create_test_app(&test), "GET", "/", Some(patient.clone()), None).await;
    assert_eq!(status, StatusCode::OK);
    let reports = body["data"].as_array().unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["patient_id"], "p00002");

    let (status, _) = send(create_test_app(&test), "GET", "/?patientId=p00001", Some(patient.clone()), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(create_test_app(&test), "GET", "/R0000000001", Some(patient), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        create_test_app(&test),
        "GET",
        "/R0000000001",
        Some(test.bearer(&TestSession::patient("p00001"))),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["doctor_remarks"], "Checked on day 2");
}

#[tokio::test]
async fn test_get_report_errors() {
    let test = seeded().await;
    let admin = test.bearer(&TestSession::admin());

    let (status, _) = send(create_test_app(&test), "GET", "/R0000000099", Some(admin.clone()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(create_test_app(&test), "GET", "/R99", Some(admin), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_report_completes_visit() {
    let test = seeded().await;
    let visit = pending_visit(&test, "p00001", 2).await;
    let doctor = test.bearer(&TestSession::doctor("d001"));

    let (status, body) = send(
        create_test_app(&test),
        "POST",
        "/",
        Some(doctor.clone()),
        Some(json!({
            "visitId": visit.visit_id.to_string(),
            "patientId": "p00001",
            "doctorId": "d001",
            "doctorRemarks": "Mild fever, resolving",
            "prescription": "Fluids",
            "followUpDate": "2026-03-09"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["report"]["report_id"], "R0000000001");
    assert_eq!(body["data"]["visit"]["visit_status"], "visited");
    assert_eq!(body["data"]["visit"]["report_id"], "R0000000001");

    let stored = test.store.get_visit(visit.visit_id).await.unwrap().unwrap();
    assert_eq!(stored.report_id.as_deref(), Some("R0000000001"));

    let (status, _) = send(
        create_test_app(&test),
        "POST",
        "/",
        Some(doctor),
        Some(json!({
            "visitId": visit.visit_id.to_string(),
            "doctorRemarks": "Second opinion"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_report_validation() {
    let test = seeded().await;
    let visit = pending_visit(&test, "p00001", 2).await;
    let doctor = test.bearer(&TestSession::doctor("d001"));

    let (status, _) = send(
        create_test_app(&test),
        "POST",
        "/",
        Some(doctor.clone()),
        Some(json!({ "visitId": visit.visit_id.to_string() })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        create_test_app(&test),
        "POST",
        "/",
        Some(doctor.clone()),
        Some(json!({
            "visitId": visit.visit_id.to_string(),
            "patientId": "p00002",
            "doctorRemarks": "Wrong chart"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, _) = send(
        create_test_app(&test),
        "POST",
        "/",
        Some(test.bearer(&TestSession::patient("p00001"))),
        Some(json!({
            "visitId": visit.visit_id.to_string(),
            "doctorRemarks": "Feeling fine"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let stored = test.store.get_visit(visit.visit_id).await.unwrap().unwrap();
    assert!(stored.report_id.is_none());
}
