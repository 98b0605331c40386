use axum::{Json, extract::State};
use grace_db::Storage;
use grace_types::api::{AdminStats, UserProfile};
use grace_types::models::{
    Certificate, Challenge, Contributor, Devotional, Ebook, Prayer, Sponsor, SupportRequest, User, Verse,
};

use crate::error::ApiError;
use crate::state::{AppState, blocking};

pub async fn users(State(state): State<AppState>) -> Result<Json<Vec<UserProfile>>, ApiError> {
    let users = blocking(&state, |store| Ok(store.list::<User>()?)).await?;
    Ok(Json(users.into_iter().map(UserProfile::from).collect()))
}

pub async fn stats(State(state): State<AppState>) -> Result<Json<AdminStats>, ApiError> {
    let stats = blocking(&state, |store| {
        Ok(AdminStats {
            users: store.count::<User>()?,
            devotionals: store.count::<Devotional>()?,
            verses: store.count::<Verse>()?,
            prayers: store.count::<Prayer>()?,
            challenges: store.count::<Challenge>()?,
            contributors: store.count::<Contributor>()?,
            ebooks: store.count::<Ebook>()?,
            sponsors: store.count::<Sponsor>()?,
            certificates: store.count::<Certificate>()?,
            support_requests: store.count::<SupportRequest>()?,
        })
    })
    .await?;
    Ok(Json(stats))
}
