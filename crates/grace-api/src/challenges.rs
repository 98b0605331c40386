//! Reading challenges and per-user progress. Day N can only be completed
//! after day N-1; completions feed the points ledger.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use grace_db::{Store, Storage};
use grace_types::api::{ChallengeDetail, ChallengeProgressView, Claims, CompleteDayResponse};
use grace_types::models::{
    Challenge, ChallengeDay, ChallengeDayInput, ChallengeInput, ChallengeProgress, PointsEntry, Resource,
};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::ValidJson;
use crate::state::{AppState, blocking};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Challenge>>, ApiError> {
    let mut rows = blocking(&state, |store| Ok(store.list::<Challenge>()?)).await?;
    rows.retain(|c| c.is_active);
    Ok(Json(rows))
}

fn days_of(store: &Store, challenge_id: &str) -> Result<Vec<ChallengeDay>, ApiError> {
    let mut days = store.find_by::<ChallengeDay>("challenge_id", challenge_id)?;
    days.sort_by_key(|d| d.day_number);
    Ok(days)
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<ChallengeDetail>, ApiError> {
    let detail = blocking(&state, move |store| {
        let challenge = store
            .get::<Challenge>(&id)?
            .filter(|c| c.is_active)
            .ok_or_else(ApiError::not_found::<Challenge>)?;
        let days = days_of(store, &id)?;
        Ok(ChallengeDetail { challenge, days })
    })
    .await?;
    Ok(Json(detail))
}

/// Build the progress view from one user's completion rows.
pub fn progress_view(challenge: &Challenge, rows: &[ChallengeProgress]) -> ChallengeProgressView {
    let mut completed_days: Vec<i64> = rows
        .iter()
        .filter(|p| p.challenge_id == challenge.id)
        .map(|p| p.day_number)
        .collect();
    completed_days.sort_unstable();
    completed_days.dedup();

    let next_day = (1..=challenge.duration_days).find(|day| !completed_days.contains(day));
    ChallengeProgressView {
        challenge_id: challenge.id.clone(),
        completed_days,
        next_day,
        completed: next_day.is_none(),
    }
}

/// Day 1 is always open; any later day needs its predecessor.
pub fn is_unlocked(day: i64, completed_days: &[i64]) -> bool {
    day == 1 || completed_days.contains(&(day - 1))
}

fn user_progress(store: &Store, user_id: &str, challenge_id: &str) -> Result<Vec<ChallengeProgress>, ApiError> {
    let rows = store.find_by::<ChallengeProgress>("user_id", user_id)?;
    Ok(rows.into_iter().filter(|p| p.challenge_id == challenge_id).collect())
}

pub async fn progress(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<Json<ChallengeProgressView>, ApiError> {
    let user_id = claims.sub.to_string();
    let view = blocking(&state, move |store| {
        let challenge = store.get::<Challenge>(&id)?.ok_or_else(ApiError::not_found::<Challenge>)?;
        let rows = user_progress(store, &user_id, &id)?;
        Ok(progress_view(&challenge, &rows))
    })
    .await?;
    Ok(Json(view))
}

pub async fn complete_day(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path((id, day)): Path<(String, i64)>,
) -> Result<Json<CompleteDayResponse>, ApiError> {
    let user_id = claims.sub.to_string();
    let response = blocking(&state, move |store| {
        let challenge = store
            .get::<Challenge>(&id)?
            .filter(|c| c.is_active)
            .ok_or_else(ApiError::not_found::<Challenge>)?;
        if day < 1 || day > challenge.duration_days {
            return Err(ApiError::BadRequest(format!(
                "day must be between 1 and {}",
                challenge.duration_days
            )));
        }

        let mut rows = user_progress(store, &user_id, &id)?;
        let view = progress_view(&challenge, &rows);
        if view.completed_days.contains(&day) {
            return Ok(CompleteDayResponse {
                day_number: day,
                already_completed: true,
                points_awarded: 0,
                progress: view,
            });
        }
        if !is_unlocked(day, &view.completed_days) {
            return Err(ApiError::BadRequest(format!("day {} is locked", day)));
        }

        let now = Utc::now();
        let entry = ChallengeProgress {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.clone(),
            challenge_id: id.clone(),
            day_number: day,
            completed_at: now,
        };
        store.insert(&entry)?;
        rows.push(entry);

        let mut awarded = challenge.points_per_day;
        store.insert(&PointsEntry {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.clone(),
            points: challenge.points_per_day,
            reason: format!("{}: day {}", challenge.title, day),
            created_at: now,
        })?;

        let progress = progress_view(&challenge, &rows);
        if progress.completed {
            let bonus = challenge.completion_bonus();
            store.insert(&PointsEntry {
                id: Uuid::new_v4().to_string(),
                user_id: user_id.clone(),
                points: bonus,
                reason: format!("{}: completed", challenge.title),
                created_at: now,
            })?;
            awarded += bonus;
            info!("User {} completed challenge {}", user_id, challenge.id);
        }

        Ok(CompleteDayResponse {
            day_number: day,
            already_completed: false,
            points_awarded: awarded,
            progress,
        })
    })
    .await?;
    Ok(Json(response))
}

// -- Admin: challenge days --

fn check_day(store: &Store, input: &ChallengeDayInput, editing: Option<&str>) -> Result<(), ApiError> {
    let challenge = store
        .get::<Challenge>(&input.challenge_id)?
        .ok_or_else(|| ApiError::BadRequest(format!("challenge {} does not exist", input.challenge_id)))?;
    if input.day_number > challenge.duration_days {
        return Err(ApiError::BadRequest(format!(
            "day_number exceeds the challenge length of {}",
            challenge.duration_days
        )));
    }
    let taken = days_of(store, &challenge.id)?
        .iter()
        .any(|d| d.day_number == input.day_number && Some(d.id.as_str()) != editing);
    if taken {
        return Err(ApiError::BadRequest(format!(
            "day {} already exists for this challenge",
            input.day_number
        )));
    }
    Ok(())
}

pub async fn create_day(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<ChallengeDayInput>,
) -> Result<(StatusCode, Json<ChallengeDay>), ApiError> {
    let day = blocking(&state, move |store| {
        check_day(store, &input, None)?;
        let day = ChallengeDay::create(Uuid::new_v4().to_string(), input, Utc::now());
        store.insert(&day)?;
        Ok(day)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(day)))
}

pub async fn update_day(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<ChallengeDayInput>,
) -> Result<Json<ChallengeDay>, ApiError> {
    let day = blocking(&state, move |store| {
        let mut day = store.get::<ChallengeDay>(&id)?.ok_or_else(ApiError::not_found::<ChallengeDay>)?;
        check_day(store, &input, Some(id.as_str()))?;
        day.apply(input);
        if !store.update(&day)? {
            return Err(ApiError::not_found::<ChallengeDay>());
        }
        Ok(day)
    })
    .await?;
    Ok(Json(day))
}

/// Shortening a challenge is refused while it still has days past the new end.
pub async fn update_challenge(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(input): ValidJson<ChallengeInput>,
) -> Result<Json<Challenge>, ApiError> {
    let challenge = blocking(&state, move |store| {
        let mut challenge = store.get::<Challenge>(&id)?.ok_or_else(ApiError::not_found::<Challenge>)?;
        if let Some(last) = days_of(store, &id)?.last() {
            if last.day_number > input.duration_days {
                return Err(ApiError::BadRequest(format!(
                    "day {} exists beyond the new length of {}",
                    last.day_number, input.duration_days
                )));
            }
        }
        challenge.apply(input);
        if !store.update(&challenge)? {
            return Err(ApiError::not_found::<Challenge>());
        }
        Ok(challenge)
    })
    .await?;
    Ok(Json(challenge))
}
