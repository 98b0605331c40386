use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use grace_content::certificate::{self, Template};
use grace_db::Storage;
use grace_types::api::{CertificateRequest, CertificateVerification};
use grace_types::models::{Certificate, Contributor, ContributorInput, Resource};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::extract::ValidJson;
use crate::state::{AppState, blocking};

/// Public wall of thanks. Contact details stay private.
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Contributor>>, ApiError> {
    let rows = blocking(&state, |store| Ok(store.list::<Contributor>()?)).await?;
    let public = rows
        .into_iter()
        .filter(|c| c.is_public && c.is_active)
        .map(|mut c| {
            c.email = None;
            c
        })
        .collect();
    Ok(Json(public))
}

pub async fn create(
    State(state): State<AppState>,
    ValidJson(input): ValidJson<ContributorInput>,
) -> Result<(StatusCode, Json<Contributor>), ApiError> {
    let contributor = Contributor::create(Uuid::new_v4().to_string(), input, Utc::now());
    let contributor = blocking(&state, move |store| {
        store.insert(&contributor)?;
        Ok(contributor)
    })
    .await?;

    info!("New {} contributor {}", contributor.contribution_type, contributor.id);
    Ok((StatusCode::CREATED, Json(contributor)))
}

pub async fn show_certificate(State(state): State<AppState>, Path(id): Path<String>) -> Result<Json<Certificate>, ApiError> {
    let cert = blocking(&state, move |store| {
        store.get::<Certificate>(&id)?.ok_or_else(ApiError::not_found::<Certificate>)
    })
    .await?;
    Ok(Json(cert))
}

/// Codes are matched case-insensitively.
pub async fn verify(State(state): State<AppState>, Path(code): Path<String>) -> Result<Json<CertificateVerification>, ApiError> {
    let code = code.trim().to_uppercase();
    let found = blocking(&state, move |store| {
        Ok(store.find_by::<Certificate>("verification_code", &code)?.into_iter().next())
    })
    .await?;
    Ok(Json(CertificateVerification {
        valid: found.is_some(),
        certificate: found,
    }))
}

pub async fn issue_certificate(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidJson(req): ValidJson<CertificateRequest>,
) -> Result<(StatusCode, Json<Certificate>), ApiError> {
    let template: Template = req.template.parse().map_err(ApiError::BadRequest)?;
    let cert = blocking(&state, move |store| {
        let contributor = store.get::<Contributor>(&id)?.ok_or_else(ApiError::not_found::<Contributor>)?;
        let cert = certificate::issue(Uuid::new_v4().to_string(), &contributor, template, Utc::now());
        store.insert(&cert)?;
        Ok(cert)
    })
    .await?;

    info!("Issued {} certificate {} ({})", cert.template, cert.id, cert.verification_code);
    Ok((StatusCode::CREATED, Json(cert)))
}
