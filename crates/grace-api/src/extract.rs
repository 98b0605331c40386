use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
    http::request::Parts,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use grace_types::api::Claims;
use grace_types::validate::Validate;
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::middleware::decode_token;
use crate::state::AppState;

/// JSON body that has passed its [`Validate`] checks.
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
        value.validate().map_err(ApiError::Validation)?;
        Ok(ValidJson(value))
    }
}

/// Claims when a valid bearer token is present. Public routes use this to
/// attribute submissions without requiring login.
pub struct MaybeUser(pub Option<Claims>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = parts
            .headers
            .typed_get::<Authorization<Bearer>>()
            .and_then(|auth| decode_token(&state.jwt_secret, auth.token()).ok());
        Ok(MaybeUser(claims))
    }
}

impl MaybeUser {
    pub fn user_id(&self) -> Option<String> {
        self.0.as_ref().map(|c| c.sub.to_string())
    }
}
