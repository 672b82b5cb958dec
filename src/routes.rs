// routes.rs
use std::sync::Arc;

use axum::{routing::get, Extension, Json, Router};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::{handler::accounts::accounts_handler, middleware::rate_limit::RateLimiter, AppState};

// Health check handler
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "message": "Server is running"
    }))
}

pub fn create_router(app_state: Arc<AppState>, registration_limiter: Arc<RateLimiter>) -> Router {
    let api_route = Router::new()
        .nest("/accounts", accounts_handler(registration_limiter))
        .layer(TraceLayer::new_for_http())
        .layer(Extension(app_state));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_route)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        middleware::rate_limit::registration_rate_limiter,
        service::registration_service::AgencyRegistrationService,
        test_support::{test_config, InMemoryAccounts, RecordingMailer},
    };
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    fn app(accounts: Arc<InMemoryAccounts>, mailer: Arc<RecordingMailer>) -> Router {
        let registration_service =
            AgencyRegistrationService::new(accounts, mailer, "https://iayos.online");
        let app_state = Arc::new(AppState::new(test_config(), registration_service));
        create_router(app_state, Arc::new(registration_rate_limiter()))
    }

    fn register_request(ip: &str, email: &str) -> Request<Body> {
        let body = json!({
            "business_name": "CleanPro Services",
            "email": email,
            "password": "s3cure-passw0rd",
            "password_confirm": "s3cure-passw0rd",
            "contact_number": "09171234567"
        });
        Request::builder()
            .method("POST")
            .uri("/api/accounts/register/agency")
            .header(header::CONTENT_TYPE, "application/json")
            .header("x-forwarded-for", ip)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = app(Default::default(), Default::default());
        let response = app
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn registration_returns_created() {
        let app = app(Default::default(), Default::default());
        let response = app
            .oneshot(register_request("203.0.113.7", "ops@cleanpro.ph"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let body = json_body(response).await;
        assert_eq!(body["status"], "success");
        assert_eq!(body["data"]["email"], "ops@cleanpro.ph");
        assert_eq!(body["data"]["verification_email_sent"], true);
    }

    #[tokio::test]
    async fn fourth_registration_from_same_ip_is_limited() {
        let app = app(Default::default(), Default::default());

        for i in 0..3 {
            let response = app
                .clone()
                .oneshot(register_request("203.0.113.7", &format!("agency{}@example.com", i)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .clone()
            .oneshot(register_request("203.0.113.7", "agency3@example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(json_body(response).await["status"], "fail");

        let response = app
            .oneshot(register_request("198.51.100.2", "agency3@example.com"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn duplicate_email_is_conflict() {
        let app = app(Default::default(), Default::default());

        let first = app
            .clone()
            .oneshot(register_request("203.0.113.7", "ops@cleanpro.ph"))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app
            .oneshot(register_request("203.0.113.8", "ops@cleanpro.ph"))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn mail_failure_is_multi_status() {
        let accounts = Arc::new(InMemoryAccounts::default());
        let app = app(accounts.clone(), Arc::new(RecordingMailer::failing()));

        let response = app
            .oneshot(register_request("203.0.113.7", "ops@cleanpro.ph"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::MULTI_STATUS);
        let body = json_body(response).await;
        assert_eq!(body["status"], "partial_success");
        assert_eq!(body["data"]["verification_email_sent"], false);
        assert_eq!(accounts.len(), 1);
    }

    #[tokio::test]
    async fn unavailable_database_is_503() {
        let accounts = Arc::new(InMemoryAccounts::failing_with(|| sqlx::Error::PoolClosed));
        let app = app(accounts, Default::default());

        let response = app
            .oneshot(register_request("203.0.113.7", "ops@cleanpro.ph"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn verify_link_marks_account() {
        let accounts = Arc::new(InMemoryAccounts::default());
        let app = app(accounts.clone(), Default::default());

        app.clone()
            .oneshot(register_request("203.0.113.7", "ops@cleanpro.ph"))
            .await
            .unwrap();
        let token = accounts
            .account("ops@cleanpro.ph")
            .and_then(|a| a.verify_token)
            .unwrap();

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(format!("/api/accounts/verify?token={}", token))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(accounts.account("ops@cleanpro.ph").unwrap().is_verified);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/accounts/verify?token=unknown")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
