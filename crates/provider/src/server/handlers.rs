//! Axum request handlers for all provider endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::{
    DecryptRequest, DecryptResponse, EncryptRequest, EncryptResponse, ErrorResponse,
    HealthResponse, MasterKeyResponse,
};
use common::ServiceError;
use credentials::key::generate_master_key_with;
use credentials::{decrypt_credentials, encrypt_credentials_with, Error, MasterKey};
use tracing::{info, warn};

use super::state::AppState;

/// `POST /master-key`: create a new random master key.
pub async fn create_master_key(State(state): State<AppState>) -> Response {
    match generate_master_key_with(state.rng.as_ref()) {
        Ok(key) => {
            info!("master key generated");
            let body = MasterKeyResponse {
                master_key: key.as_hex().to_owned(),
            };
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(e) => {
            warn!(error = %e, "master key generation failed");
            error_response(&service_error(&e))
        }
    }
}

/// `POST /credentials/file`: decrypt the content of a `credentials.yml.enc`.
pub async fn read_file(payload: Result<Json<DecryptRequest>, JsonRejection>) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(&rejection),
    };

    let key = MasterKey::normalize(&req.master_key);
    match decrypt_credentials(&key, req.encrypted_content.trim()) {
        Ok(content) => {
            info!(content_len = content.len(), "credentials decrypted");
            (StatusCode::OK, Json(DecryptResponse { content })).into_response()
        }
        Err(e) => {
            warn!(error = %e, "credentials decryption failed");
            error_response(&service_error(&e))
        }
    }
}

/// `POST /credentials/inline`: encrypt raw YAML into an artifact.
pub async fn read_inline(
    State(state): State<AppState>,
    payload: Result<Json<EncryptRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(&rejection),
    };

    let key = MasterKey::normalize(&req.master_key);
    match encrypt_credentials_with(state.rng.as_ref(), &key, &req.content) {
        Ok(encrypted_content) => {
            info!(content_len = req.content.len(), "credentials encrypted");
            (StatusCode::OK, Json(EncryptResponse { encrypted_content })).into_response()
        }
        Err(e) => {
            warn!(error = %e, "credentials encryption failed");
            error_response(&service_error(&e))
        }
    }
}

/// `GET /health`: liveness check.
pub async fn health() -> Response {
    let body = HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
    };
    (StatusCode::OK, Json(body)).into_response()
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    let err = ErrorResponse::new("not_found", "the requested resource does not exist");
    (StatusCode::NOT_FOUND, Json(err))
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Classify a credentials error for the caller.
fn service_error(err: &Error) -> ServiceError {
    match err {
        Error::InvalidKeyLength(_)
        | Error::InvalidKeyEncoding
        | Error::MalformedArtifact(_)
        | Error::PayloadTooLarge(_) => ServiceError::BadRequest(err.to_string()),
        Error::AuthenticationFailed
        | Error::UnsupportedFormatVersion(..)
        | Error::UnsupportedObjectType(_)
        | Error::UnsupportedLengthEncoding(_)
        | Error::TruncatedPayload { .. }
        | Error::InvalidStringEncoding { .. } => ServiceError::DecryptionFailed(err.to_string()),
        Error::RandomnessUnavailable(_) => ServiceError::Unavailable(err.to_string()),
    }
}

fn error_response(err: &ServiceError) -> Response {
    let status =
        StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::from(err))).into_response()
}

fn rejection_response(rejection: &JsonRejection) -> Response {
    warn!(error = %rejection.body_text(), "invalid request body");
    error_response(&ServiceError::BadRequest(rejection.body_text()))
}
