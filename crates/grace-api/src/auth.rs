use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use axum::{Extension, Json, extract::State, http::StatusCode};
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use rand_core::OsRng;
use tracing::info;
use uuid::Uuid;

use grace_db::{Storage, StoreError};
use grace_types::api::{AuthResponse, Claims, LoginRequest, RegisterRequest, UserProfile};
use grace_types::models::User;

use crate::error::ApiError;
use crate::extract::ValidJson;
use crate::state::{AppState, blocking};

fn email_taken() -> ApiError {
    ApiError::BadRequest("email already in use".into())
}

pub async fn register(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let email = req.email.trim().to_lowercase();
    let display_name = match req.display_name.trim() {
        "" => email.split('@').next().unwrap_or_default().to_string(),
        name => name.to_string(),
    };
    let is_admin = state.admin_emails.contains(&email);

    let user = blocking(&state, move |store| {
        if !store.find_by::<User>("email", &email)?.is_empty() {
            return Err(email_taken());
        }

        // Hash password with Argon2id
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = Argon2::default()
            .hash_password(req.password.as_bytes(), &salt)
            .map_err(|e| ApiError::Internal(e.to_string()))?
            .to_string();

        let user = User {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            display_name,
            is_admin,
            created_at: Utc::now(),
        };
        store.insert(&user).map_err(|e| match e {
            StoreError::Conflict(_) => email_taken(),
            other => other.into(),
        })?;
        Ok(user)
    })
    .await?;

    info!("Registered user {} (admin: {})", user.email, user.is_admin);
    let token = issue_token(&state, &user)?;
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.into(),
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    ValidJson(req): ValidJson<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let email = req.email.trim().to_lowercase();
    let user = blocking(&state, move |store| {
        let invalid = || ApiError::Unauthorized("invalid credentials".into());
        let user = store
            .find_by::<User>("email", &email)?
            .into_iter()
            .next()
            .ok_or_else(invalid)?;

        // Verify password
        let parsed_hash = PasswordHash::new(&user.password_hash).map_err(|e| ApiError::Internal(e.to_string()))?;
        Argon2::default()
            .verify_password(req.password.as_bytes(), &parsed_hash)
            .map_err(|_| invalid())?;
        Ok(user)
    })
    .await?;

    let token = issue_token(&state, &user)?;
    Ok(Json(AuthResponse {
        user: user.into(),
        token,
    }))
}

pub async fn me(State(state): State<AppState>, Extension(claims): Extension<Claims>) -> Result<Json<UserProfile>, ApiError> {
    let id = claims.sub.to_string();
    let user = blocking(&state, move |store| {
        store.get::<User>(&id)?.ok_or_else(ApiError::not_found::<User>)
    })
    .await?;
    Ok(Json(user.into()))
}

fn issue_token(state: &AppState, user: &User) -> Result<String, ApiError> {
    let user_id: Uuid = user.id.parse().map_err(|_| ApiError::Internal(format!("malformed user id {}", user.id)))?;
    create_token(&state.jwt_secret, user_id, &user.email, user.is_admin).map_err(|e| ApiError::Internal(e.to_string()))
}

pub fn create_token(secret: &str, user_id: Uuid, email: &str, is_admin: bool) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        email: email.to_string(),
        is_admin,
        exp: (Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
