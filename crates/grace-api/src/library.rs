use axum::{
    Json,
    extract::{Path, Query, State},
};
use grace_db::Storage;
use grace_types::models::{Ebook, Sponsor};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::{AppState, blocking};

#[derive(Debug, Deserialize)]
pub struct EbookQuery {
    pub category: Option<String>,
}

pub async fn ebooks(State(state): State<AppState>, Query(query): Query<EbookQuery>) -> Result<Json<Vec<Ebook>>, ApiError> {
    let mut rows = blocking(&state, |store| Ok(store.list::<Ebook>()?)).await?;
    rows.retain(|e| e.is_active);
    if let Some(category) = query.category.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        rows.retain(|e| e.category.eq_ignore_ascii_case(category));
    }
    Ok(Json(rows))
}

pub async fn ebook(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Ebook>, ApiError> {
    let row = blocking(&state, move |store| Ok(store.get::<Ebook>(&id)?)).await?;
    row.filter(|e| e.is_active)
        .map(Json)
        .ok_or_else(ApiError::not_found::<Ebook>)
}

pub async fn sponsors(State(state): State<AppState>) -> Result<Json<Vec<Sponsor>>, ApiError> {
    let mut rows = blocking(&state, |store| Ok(store.list::<Sponsor>()?)).await?;
    rows.retain(|s| s.is_active);
    Ok(Json(rows))
}
