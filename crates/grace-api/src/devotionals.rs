use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{Local, NaiveDate};
use grace_db::Storage;
use grace_types::models::Devotional;

use crate::error::ApiError;
use crate::state::{AppState, blocking};

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Devotional>>, ApiError> {
    let mut rows = blocking(&state, |store| Ok(store.list::<Devotional>()?)).await?;
    rows.retain(|d| d.is_active);
    rows.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
    Ok(Json(rows))
}

/// Today's devotional, or the most recent one published before today.
pub fn pick_for(rows: Vec<Devotional>, today: NaiveDate) -> Option<Devotional> {
    rows.into_iter()
        .filter(|d| d.is_active && d.publish_date <= today)
        .max_by_key(|d| d.publish_date)
}

pub async fn today(State(state): State<AppState>) -> Result<Json<Devotional>, ApiError> {
    let today = Local::now().date_naive();
    let rows = blocking(&state, |store| Ok(store.list::<Devotional>()?)).await?;
    pick_for(rows, today)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("no devotional published yet".into()))
}

pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Devotional>, ApiError> {
    let row = blocking(&state, move |store| Ok(store.get::<Devotional>(&id)?)).await?;
    row.filter(|d| d.is_active)
        .map(Json)
        .ok_or_else(ApiError::not_found::<Devotional>)
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn devotional(id: &str, date: &str, active: bool) -> Devotional {
        Devotional {
            id: id.into(),
            title: id.into(),
            content: "c".into(),
            verse_text: "v".into(),
            verse_reference: "r".into(),
            publish_date: date.parse().unwrap(),
            author: "Daily Grace".into(),
            is_active: active,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn prefers_today_then_latest_past() {
        let today: NaiveDate = "2026-10-18".parse().unwrap();
        let rows = vec![
            devotional("past", "2026-10-10", true),
            devotional("today", "2026-10-18", true),
            devotional("future", "2026-10-20", true),
        ];
        assert_eq!(pick_for(rows.clone(), today).unwrap().id, "today");

        let rows = vec![rows[0].clone(), rows[2].clone(), devotional("hidden", "2026-10-17", false)];
        assert_eq!(pick_for(rows, today).unwrap().id, "past");
    }

    #[test]
    fn nothing_published() {
        let today: NaiveDate = "2026-10-18".parse().unwrap();
        assert!(pick_for(vec![devotional("future", "2026-11-01", true)], today).is_none());
    }
}
