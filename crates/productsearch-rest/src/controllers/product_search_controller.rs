//! Product search controller.
//!
//! Mounted under `/productSearch`. Registration answers with a plain
//! `Done!!!` acknowledgement rather than the stored record.

use crate::responses::{ApiResult, AppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use productsearch_service::{AddUserRequest, EmailQuery, PersonResponse};

/// Body of the registration acknowledgement.
pub const ADD_USER_ACK: &str = "Done!!!";

/// Body of the liveness probe.
pub const PING_REPLY: &str = "Ping";

/// Creates the product search router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/ping", get(ping))
        .route("/addUser", get(add_user_from_query).post(add_user))
        .route("/getUserByEmail", get(get_user_by_email))
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/productSearch/ping",
    tag = "productSearch",
    responses(
        (status = 200, description = "Service responds", body = String, content_type = "text/plain")
    )
)]
pub async fn ping() -> &'static str {
    PING_REPLY
}

/// Registers a person from a JSON body.
#[utoipa::path(
    post,
    path = "/productSearch/addUser",
    tag = "productSearch",
    request_body = AddUserRequest,
    responses(
        (status = 200, description = "Person stored", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid person"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn add_user(
    State(state): State<AppState>,
    payload: Result<Json<AddUserRequest>, axum::extract::rejection::JsonRejection>,
) -> ApiResult<&'static str> {
    let Json(request) = payload.map_err(AppError::from)?;
    state.person_service.add_user(request).await?;
    Ok(ADD_USER_ACK)
}

/// Registers a person from query parameters.
#[utoipa::path(
    get,
    path = "/productSearch/addUser",
    tag = "productSearch",
    params(AddUserRequest),
    responses(
        (status = 200, description = "Person stored", body = String, content_type = "text/plain"),
        (status = 400, description = "Invalid person"),
        (status = 500, description = "Persistence failure")
    )
)]
pub async fn add_user_from_query(
    State(state): State<AppState>,
    query: Result<Query<AddUserRequest>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<&'static str> {
    let Query(request) = query.map_err(AppError::from)?;
    state.person_service.add_user(request).await?;
    Ok(ADD_USER_ACK)
}

/// Lists every person registered under an email address.
#[utoipa::path(
    get,
    path = "/productSearch/getUserByEmail",
    tag = "productSearch",
    params(EmailQuery),
    responses(
        (status = 200, description = "Matching people, possibly none", body = Vec<PersonResponse>),
        (status = 400, description = "Missing or blank email")
    )
)]
pub async fn get_user_by_email(
    State(state): State<AppState>,
    query: Result<Query<EmailQuery>, axum::extract::rejection::QueryRejection>,
) -> ApiResult<Json<Vec<PersonResponse>>> {
    let Query(EmailQuery { email }) = query.map_err(AppError::from)?;
    let people = state.person_service.get_users_by_email(&email).await?;
    Ok(Json(people))
}
