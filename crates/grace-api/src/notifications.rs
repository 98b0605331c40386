use axum::{
    Extension, Json,
    extract::{Path, State},
};
use grace_db::Storage;
use grace_types::api::Claims;
use grace_types::models::Notification;

use crate::error::ApiError;
use crate::state::{AppState, blocking};

/// The caller's own notifications plus broadcasts, newest first.
pub async fn list(State(state): State<AppState>, Extension(claims): Extension<Claims>) -> Result<Json<Vec<Notification>>, ApiError> {
    let user_id = claims.sub.to_string();
    let rows = blocking(&state, |store| Ok(store.list::<Notification>()?)).await?;
    let visible = rows
        .into_iter()
        .rev()
        .filter(|n| n.user_id.as_deref().is_none_or(|owner| owner == user_id))
        .collect();
    Ok(Json(visible))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<Notification>, ApiError> {
    let user_id = claims.sub.to_string();
    let notification = blocking(&state, move |store| {
        let mut notification = store.get::<Notification>(&id)?.ok_or_else(ApiError::not_found::<Notification>)?;
        match notification.user_id.as_deref() {
            None => return Err(ApiError::BadRequest("broadcast notifications cannot be marked read".into())),
            Some(owner) if owner != user_id => return Err(ApiError::not_found::<Notification>()),
            Some(_) => {}
        }
        if !notification.is_read {
            notification.is_read = true;
            store.update(&notification)?;
        }
        Ok(notification)
    })
    .await?;
    Ok(Json(notification))
}
