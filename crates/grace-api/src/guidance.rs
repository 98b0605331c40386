use axum::{Json, extract::State};
use grace_types::api::{GuidanceRequest, GuidanceResponse};
use tracing::debug;

use crate::extract::ValidJson;
use crate::state::AppState;

pub async fn respond(State(state): State<AppState>, ValidJson(req): ValidJson<GuidanceRequest>) -> Json<GuidanceResponse> {
    let reply = state.guidance.respond(req.message.trim()).await;
    debug!("Guidance reply ({}, {:?})", reply.emotion, reply.source);
    Json(reply)
}
