use axum::{
    Json,
    extract::{Query, State},
};
use grace_db::Storage;
use grace_types::api::{RandomVerseQuery, ScriptureVerse};
use grace_types::models::Verse;

use crate::error::ApiError;
use crate::state::{AppState, blocking};

/// Curated verses managed from the admin panel.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Verse>>, ApiError> {
    let mut rows = blocking(&state, |store| Ok(store.list::<Verse>()?)).await?;
    rows.retain(|v| v.is_active);
    Ok(Json(rows))
}

pub async fn daily(State(state): State<AppState>) -> Json<ScriptureVerse> {
    Json(state.scripture.daily_verse().await)
}

pub async fn random(State(state): State<AppState>, Query(query): Query<RandomVerseQuery>) -> Json<ScriptureVerse> {
    Json(state.scripture.random_verse(query.theme.as_deref()).await)
}

pub async fn themes(State(state): State<AppState>) -> Json<Vec<&'static str>> {
    Json(state.scripture.themes())
}
