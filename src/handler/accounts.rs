use std::sync::Arc;

use axum::{
    extract::Query,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use validator::Validate;

use crate::{
    dtos::{
        accountdtos::{RegisterAgencyDto, VerifyEmailQueryDto},
        responsedtos::ApiResponse,
    },
    error::HttpError,
    middleware::rate_limit::{rate_limit_middleware, RateLimiter},
    service::registration_service::RegistrationOutcome,
    AppState,
};

pub fn accounts_handler(registration_limiter: Arc<RateLimiter>) -> Router {
    Router::new()
        .route(
            "/register/agency",
            post(register_agency).layer(middleware::from_fn_with_state(
                registration_limiter,
                rate_limit_middleware,
            )),
        )
        .route("/verify", get(verify_email))
}

pub async fn register_agency(
    Extension(app_state): Extension<Arc<AppState>>,
    Json(body): Json<RegisterAgencyDto>,
) -> Result<impl IntoResponse, HttpError> {
    let outcome = app_state.registration_service.register(body).await?;

    let response = match outcome {
        RegistrationOutcome::Registered(data) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                "Agency registered. Check your email to verify your account.",
                data,
            )),
        ),
        RegistrationOutcome::EmailFailed(data) => (
            StatusCode::MULTI_STATUS,
            Json(ApiResponse::partial(
                "Agency registered, but the verification email could not be sent.",
                data,
            )),
        ),
    };

    Ok(response)
}

pub async fn verify_email(
    Query(query_params): Query<VerifyEmailQueryDto>,
    Extension(app_state): Extension<Arc<AppState>>,
) -> Result<impl IntoResponse, HttpError> {
    query_params
        .validate()
        .map_err(|e| HttpError::bad_request(e.to_string()))?;

    let account = app_state
        .registration_service
        .verify_email(&query_params.token)
        .await?;

    Ok(Json(ApiResponse::success("Email verified successfully", account)))
}
