use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use grace_db::Storage;
use grace_types::api::PrayerStats;
use grace_types::models::{Prayer, PrayerInput, Resource};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::{MaybeUser, ValidJson};
use crate::state::{AppState, blocking};

/// Prayer wall, newest first.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Prayer>>, ApiError> {
    let rows = blocking(&state, |store| Ok(store.list::<Prayer>()?)).await?;
    Ok(Json(rows.into_iter().rev().map(Prayer::redacted).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    user: MaybeUser,
    ValidJson(input): ValidJson<PrayerInput>,
) -> Result<(StatusCode, Json<Prayer>), ApiError> {
    let mut prayer = Prayer::create(Uuid::new_v4().to_string(), input, Utc::now());
    prayer.user_id = user.user_id();
    // Only moderators mark prayers answered.
    prayer.is_answered = false;

    let prayer = blocking(&state, move |store| {
        store.insert(&prayer)?;
        Ok(prayer)
    })
    .await?;

    info!("Prayer {} submitted ({})", prayer.id, prayer.category);
    Ok((StatusCode::CREATED, Json(prayer.redacted())))
}

/// Someone prayed for this request.
pub async fn pray(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Prayer>, ApiError> {
    let prayer = blocking(&state, move |store| {
        let mut prayer = store.get::<Prayer>(&id)?.ok_or_else(ApiError::not_found::<Prayer>)?;
        prayer.prayer_count += 1;
        store.update(&prayer)?;
        Ok(prayer)
    })
    .await?;
    Ok(Json(prayer.redacted()))
}

pub fn summarize(rows: &[Prayer]) -> PrayerStats {
    let mut stats = PrayerStats {
        total: rows.len(),
        ..PrayerStats::default()
    };
    for prayer in rows {
        if prayer.is_answered {
            stats.answered += 1;
        }
        stats.prayers_offered += prayer.prayer_count;
        *stats.by_category.entry(prayer.category.clone()).or_default() += 1;
    }
    stats
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<PrayerStats>, ApiError> {
    let rows = blocking(&state, |store| Ok(store.list::<Prayer>()?)).await?;
    Ok(Json(summarize(&rows)))
}
