//! Generic admin handlers shared by every editable record type.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use grace_db::{Entity, Storage};
use grace_types::models::Resource;
use serde_json::{Value, json};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::ValidJson;
use crate::state::{AppState, blocking};

pub async fn list<E: Entity>(State(state): State<AppState>) -> Result<Json<Vec<E>>, ApiError> {
    let rows = blocking(&state, |store| Ok(store.list::<E>()?)).await?;
    Ok(Json(rows))
}

pub async fn get<E: Entity>(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<E>, ApiError> {
    let row = blocking(&state, move |store| {
        store.get::<E>(&id)?.ok_or_else(ApiError::not_found::<E>)
    })
    .await?;
    Ok(Json(row))
}

pub async fn create<E: Entity + Resource>(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<E::Input>,
) -> Result<(StatusCode, Json<E>), ApiError> {
    let record = E::create(Uuid::new_v4().to_string(), input, Utc::now());
    let record = blocking(&state, move |store| {
        store.insert(&record)?;
        Ok(record)
    })
    .await?;

    info!("Created {} {}", E::KIND, record.id());
    Ok((StatusCode::CREATED, Json(record)))
}

/// Full replacement of the editable fields.
pub async fn update<E: Entity + Resource>(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<E::Input>,
) -> Result<Json<E>, ApiError> {
    let record = blocking(&state, move |store| {
        let mut record = store.get::<E>(&id)?.ok_or_else(ApiError::not_found::<E>)?;
        record.apply(input);
        if !store.update(&record)? {
            return Err(ApiError::not_found::<E>());
        }
        Ok(record)
    })
    .await?;
    Ok(Json(record))
}

pub async fn delete<E: Entity>(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Value>, ApiError> {
    let key = id.clone();
    let removed = blocking(&state, move |store| Ok(store.delete::<E>(&key)?)).await?;
    if !removed {
        return Err(ApiError::not_found::<E>());
    }

    info!("Deleted {} {}", E::KIND, id);
    Ok(Json(json!({ "deleted": id })))
}
