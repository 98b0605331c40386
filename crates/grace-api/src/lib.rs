pub mod admin;
pub mod auth;
pub mod challenges;
pub mod contributors;
pub mod crud;
pub mod devotionals;
pub mod error;
pub mod extract;
pub mod guidance;
pub mod library;
pub mod middleware;
pub mod notifications;
pub mod points;
pub mod prayers;
pub mod state;
pub mod support;
pub mod verses;

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    routing::{delete, get, patch, post},
};
use grace_db::Entity;
use grace_types::models::{
    Challenge, ChallengeDay, Contributor, Devotional, Ebook, Notification, Prayer, Resource, Sponsor,
    SupportRequest, User, Verse,
};
use serde_json::{Value, json};

pub use error::ApiError;
pub use state::{AppState, AppStateInner};

use crate::middleware::{require_admin, require_auth};

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/devotionals", get(devotionals::list))
        .route("/api/devotionals/today", get(devotionals::today))
        .route("/api/devotionals/{id}", get(devotionals::get))
        .route("/api/verses", get(verses::list))
        .route("/api/verses/daily", get(verses::daily))
        .route("/api/verses/random", get(verses::random))
        .route("/api/verses/themes", get(verses::themes))
        .route("/api/prayers", get(prayers::list).post(prayers::create))
        .route("/api/prayers/stats", get(prayers::stats))
        .route("/api/prayers/{id}/pray", post(prayers::pray))
        .route("/api/challenges", get(challenges::list))
        .route("/api/challenges/{id}", get(challenges::get))
        .route("/api/contributors", get(contributors::list).post(contributors::create))
        .route("/api/certificates/{id}", get(contributors::show_certificate))
        .route("/api/certificates/verify/{code}", get(contributors::verify))
        .route("/api/ebooks", get(library::ebooks))
        .route("/api/ebooks/{id}", get(library::ebook))
        .route("/api/sponsors", get(library::sponsors))
        .route("/api/support", get(support::list).post(support::create))
        .route("/api/support/{id}", get(support::thread))
        .route("/api/support/{id}/replies", post(support::reply))
        .route("/api/guidance", post(guidance::respond))
}

fn member_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/challenges/{id}/progress", get(challenges::progress))
        .route("/api/challenges/{id}/days/{day}/complete", post(challenges::complete_day))
        .route("/api/points", get(points::summary))
        .route("/api/points/leaderboard", get(points::leaderboard))
        .route("/api/notifications", get(notifications::list))
        .route("/api/notifications/{id}/read", patch(notifications::mark_read))
        .route_layer(from_fn_with_state(state.clone(), require_auth))
}

/// Collection and item routes for one editable record type.
fn resource<E: Entity + Resource>(path: &str) -> Router<AppState> {
    Router::new()
        .route(path, get(crud::list::<E>).post(crud::create::<E>))
        .route(
            &format!("{path}/{{id}}"),
            get(crud::get::<E>).put(crud::update::<E>).delete(crud::delete::<E>),
        )
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/stats", get(admin::stats))
        .route("/users", get(admin::users))
        .route("/users/{id}", delete(crud::delete::<User>))
        .merge(resource::<Devotional>("/devotionals"))
        .merge(resource::<Verse>("/verses"))
        .merge(resource::<Prayer>("/prayers"))
        .route("/challenges", get(crud::list::<Challenge>).post(crud::create::<Challenge>))
        .route(
            "/challenges/{id}",
            get(crud::get::<Challenge>)
                .put(challenges::update_challenge)
                .delete(crud::delete::<Challenge>),
        )
        .merge(resource::<Contributor>("/contributors"))
        .merge(resource::<Ebook>("/ebooks"))
        .merge(resource::<Sponsor>("/sponsors"))
        .merge(resource::<Notification>("/notifications"))
        .merge(resource::<SupportRequest>("/support"))
        .route("/challenge-days", get(crud::list::<ChallengeDay>).post(challenges::create_day))
        .route(
            "/challenge-days/{id}",
            get(crud::get::<ChallengeDay>)
                .put(challenges::update_day)
                .delete(crud::delete::<ChallengeDay>),
        )
        .route("/contributors/{id}/certificate", post(contributors::issue_certificate))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}

/// The full `/api` surface. Transport layers (CORS, tracing, static files)
/// are added by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(member_routes(&state))
        .nest("/api/admin", admin_routes(&state))
        .with_state(state)
}
