use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use jsonwebtoken::{DecodingKey, Validation, decode};

use grace_types::api::Claims;

use crate::error::ApiError;
use crate::state::AppState;

pub fn decode_token(secret: &str, token: &str) -> Result<Claims, ApiError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| ApiError::Unauthorized("invalid or expired token".into()))
}

fn bearer_claims(state: &AppState, req: &Request) -> Result<Claims, ApiError> {
    let auth = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or_else(|| ApiError::Unauthorized("missing bearer token".into()))?;
    decode_token(&state.jwt_secret, auth.token())
}

/// Extract and validate the JWT from the Authorization header.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    let claims = bearer_claims(&state, &req)?;
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// As [`require_auth`], then 403 unless the token carries the admin flag.
pub async fn require_admin(State(state): State<AppState>, mut req: Request, next: Next) -> Result<Response, ApiError> {
    let claims = bearer_claims(&state, &req)?;
    if !claims.is_admin {
        return Err(ApiError::Forbidden("admin access required".into()));
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
