use crate::api::AppState;
use crate::api::dto::messages::{CreateMessageRequest, ListParams, UpdateMessageRequest};
use crate::domain::message::MessageResponse;
use crate::error::{AppError, Result};
use axum::{
    Json,
    extract::rejection::JsonRejection,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use opentelemetry::{global, metrics::Counter};

#[derive(Clone, Debug)]
pub struct Metrics {
    messages_created: Counter<u64>,
}

impl Metrics {
    #[must_use]
    pub fn new() -> Self {
        let meter = global::meter("bulletin-server");
        Self {
            messages_created: meter
                .u64_counter("bulletin_messages_created_total")
                .with_description("Total number of messages created")
                .build(),
        }
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Creates a new message.
///
/// # Errors
/// Returns `AppError::BadRequest` if the body is not valid JSON.
/// Returns `AppError::Validation` if the content violates the length rule.
pub async fn create_message(
    State(state): State<AppState>,
    payload: std::result::Result<Json<CreateMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse> {
    let Json(req) = payload.map_err(|_| AppError::BadRequest("invalid request payload".to_string()))?;

    let response = state.message_service.create_message(&req.content).await?;

    // Count only after the row is durably stored; validation failures and
    // storage errors must not move the counter.
    state.metrics.messages_created.add(1, &[]);

    Ok((StatusCode::CREATED, Json(response)))
}

/// Lists messages, newest first. An unusable `limit` falls back to the
/// service default.
pub async fn get_all_messages(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<MessageResponse>>> {
    let limit = params.limit.as_deref().and_then(|raw| raw.parse::<i64>().ok());

    let messages = state.message_service.get_all_messages(limit).await?;
    Ok(Json(messages))
}

/// Fetches a single message.
///
/// # Errors
/// Returns `AppError::BadRequest` if the id is not an integer.
/// Returns `AppError::NotFound` if no such message exists.
pub async fn get_message_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id)?;

    let message = state.message_service.get_message_by_id(id).await?;
    Ok(Json(message))
}

/// Replaces the content of an existing message.
pub async fn update_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UpdateMessageRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>> {
    let id = parse_id(&id)?;
    let Json(req) = payload.map_err(|_| AppError::BadRequest("invalid request payload".to_string()))?;

    let message = state.message_service.update_message(id, &req.content).await?;
    Ok(Json(message))
}

/// Soft-deletes a message. Succeeds even if the id never existed.
pub async fn delete_message(State(state): State<AppState>, Path(id): Path<String>) -> Result<impl IntoResponse> {
    let id = parse_id(&id)?;

    state.message_service.delete_message(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.parse().map_err(|_| AppError::BadRequest("invalid message id".to_string()))
}
