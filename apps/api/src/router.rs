use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use admin_cell::router::admin_routes;
use auth_cell::router::auth_routes;
use doctor_cell::router::doctor_routes;
use patient_cell::router::patient_routes;
use report_cell::router::report_routes;
use shared_database::AppState;
use visit_cell::router::visit_routes;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Hospital Management API is running" }))
        .nest("/login", auth_routes(state.clone()))
        .nest("/patients", patient_routes(state.clone()))
        .nest("/doctors", doctor_routes(state.clone()))
        .nest("/visits", visit_routes(state.clone()))
        .nest("/reports", report_routes(state.clone()))
        .nest("/admin", admin_routes(state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use shared_utils::test_utils::TestState;

    async fn send(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn liveness_needs_no_session() {
        let test = TestState::new();
        let app = create_router(test.state.clone());

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"Hospital Management API is running");
    }

    #[tokio::test]
    async fn protected_routes_reject_anonymous_callers() {
        let test = TestState::new();
        let app = create_router(test.state.clone());

        for uri in ["/patients", "/doctors", "/visits", "/reports", "/admin/statistics/visits"] {
            let (status, body) = send(&app, "GET", uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{}", uri);
            assert_eq!(body["success"], false);
        }
    }

    #[tokio::test]
    async fn login_book_and_complete_a_visit() {
        let test = TestState::new();
        let app = create_router(test.state.clone());
        test.seed_doctor("Dr. Meera Iyer", true).await;
        test.seed_patient("Asha Rao").await;

        let (status, body) = send(
            &app,
            "POST",
            "/login/patient",
            None,
            Some(json!({ "patientId": "p00001", "patientDateOfBirth": "15/8/1992" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "p00001 Login success");
        let patient_token = body["data"]["token"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            "/visits",
            Some(&patient_token),
            Some(json!({ "patientId": "p00001", "doctorId": "d001", "dateOfVisit": "2026-03-02T09:30" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        let visit_id = body["data"]["visit_id"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "POST",
            "/login/doctor",
            None,
            Some(json!({ "doctorId": "d001", "doctorDateOfBirth": "1980-03-09" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let doctor_token = body["data"]["token"].as_str().unwrap().to_string();

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/visits/{}/status", visit_id),
            Some(&doctor_token),
            Some(json!({ "visitStatus": "visited", "doctorRemarks": "stable" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["report"]["report_id"], "R0000000001");

        let (status, body) = send(&app, "GET", "/reports", Some(&patient_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["report_id"], "R0000000001");
        assert_eq!(body["data"][0]["doctor_remarks"], "stable");

        let (status, body) = send(
            &app,
            "PUT",
            &format!("/visits/{}/status", visit_id),
            Some(&patient_token),
            Some(json!({ "visitStatus": "cancelled" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "precondition_failed");
    }
}
