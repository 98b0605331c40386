//! Support network: requests for prayer or counsel and the replies to them.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use grace_db::Storage;
use grace_types::api::{SupportReplyRequest, SupportThread};
use grace_types::models::{Resource, SupportReply, SupportRequest, SupportRequestInput};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{MaybeUser, ValidJson};
use crate::state::{AppState, blocking};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<SupportRequest>>, ApiError> {
    let rows = blocking(&state, |store| Ok(store.list::<SupportRequest>()?)).await?;
    Ok(Json(rows.into_iter().rev().map(SupportRequest::redacted).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    user: MaybeUser,
    ValidJson(input): ValidJson<SupportRequestInput>,
) -> Result<(StatusCode, Json<SupportRequest>), ApiError> {
    let mut request = SupportRequest::create(Uuid::new_v4().to_string(), input, Utc::now());
    request.user_id = user.user_id();
    request.status = "open".to_string();

    let request = blocking(&state, move |store| {
        store.insert(&request)?;
        Ok(request)
    })
    .await?;

    info!("Support request {} opened ({})", request.id, request.topic);
    Ok((StatusCode::CREATED, Json(request.redacted())))
}

pub async fn thread(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<SupportThread>, ApiError> {
    let thread = blocking(&state, move |store| {
        let request = store
            .get::<SupportRequest>(&id)?
            .ok_or_else(ApiError::not_found::<SupportRequest>)?;
        let replies = store.find_by::<SupportReply>("request_id", &id)?;
        Ok(SupportThread {
            request: request.redacted(),
            replies,
        })
    })
    .await?;
    Ok(Json(thread))
}

/// The first reply moves an open request to `answered`.
pub async fn reply(
    State(state): State<AppState>,
    user: MaybeUser,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<SupportReplyRequest>,
) -> Result<(StatusCode, Json<SupportReply>), ApiError> {
    let author_name = req
        .author_name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or("A friend")
        .to_string();
    let reply = SupportReply {
        id: Uuid::new_v4().to_string(),
        request_id: id.clone(),
        user_id: user.user_id(),
        author_name,
        message: req.message,
        created_at: Utc::now(),
    };

    let reply = blocking(&state, move |store| {
        let mut request = store
            .get::<SupportRequest>(&id)?
            .ok_or_else(ApiError::not_found::<SupportRequest>)?;
        if request.status == "closed" {
            return Err(ApiError::BadRequest("support request is closed".into()));
        }
        store.insert(&reply)?;
        if request.status == "open" {
            request.status = "answered".to_string();
            store.update(&request)?;
        }
        Ok(reply)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(reply)))
}
