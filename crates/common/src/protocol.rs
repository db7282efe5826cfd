//! Request and response bodies of the provider HTTP API.
//!
//! Each route corresponds to one object of the infrastructure provider: the
//! master-key resource and the `file` and `inline` credentials data sources.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Master key resource
// ---------------------------------------------------------------------------

/// Response body for `POST /master-key`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MasterKeyResponse {
    /// Newly generated 32-character hex master key.
    pub master_key: String,
}

// ---------------------------------------------------------------------------
// File data source: decrypt
// ---------------------------------------------------------------------------

/// Request body for `POST /credentials/file`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptRequest {
    /// Hex master key; trailing line endings are ignored.
    pub master_key: String,
    /// Content of a `credentials.yml.enc` file.
    pub encrypted_content: String,
}

/// Response body for `POST /credentials/file`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecryptResponse {
    /// Decrypted credentials in YAML format.
    pub content: String,
}

// ---------------------------------------------------------------------------
// Inline data source: encrypt
// ---------------------------------------------------------------------------

/// Request body for `POST /credentials/inline`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptRequest {
    /// Hex master key; trailing line endings are ignored.
    pub master_key: String,
    /// Raw credentials in YAML format.
    pub content: String,
}

/// Response body for `POST /credentials/inline`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncryptResponse {
    /// Encrypted artifact suitable for `credentials.yml.enc`.
    pub encrypted_content: String,
}

// ---------------------------------------------------------------------------
// Error response
// ---------------------------------------------------------------------------

/// Standard error response body returned on any non-2xx status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short machine-readable error code (e.g. `"bad_request"`).
    pub code: String,
    /// Human-readable description safe to expose to callers.
    pub message: String,
}

impl ErrorResponse {
    /// Construct an [`ErrorResponse`] from a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&crate::ServiceError> for ErrorResponse {
    fn from(err: &crate::ServiceError) -> Self {
        Self::new(err.code(), err.to_string())
    }
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process serves requests.
    pub status: String,
    /// Provider version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ServiceError;
    use serde_json::json;

    #[test]
    fn decrypt_request_field_names() {
        let req: DecryptRequest = serde_json::from_value(json!({
            "master_key": "a2683380db86af7597f33561b5f11755",
            "encrypted_content": "YWJj--YWJj--YWJj",
        }))
        .unwrap();
        assert_eq!(req.encrypted_content, "YWJj--YWJj--YWJj");
    }

    #[test]
    fn encrypt_response_serialises_snake_case() {
        let resp = EncryptResponse {
            encrypted_content: "a--b--c".into(),
        };
        assert_eq!(
            serde_json::to_value(&resp).unwrap(),
            json!({"encrypted_content": "a--b--c"})
        );
    }

    #[test]
    fn error_response_from_service_error() {
        let e = ErrorResponse::from(&ServiceError::DecryptionFailed("authentication failed".into()));
        assert_eq!(e.code, "decryption_failed");
        assert!(e.message.contains("authentication failed"));
    }

    #[test]
    fn health_response_serde() {
        let h = HealthResponse {
            status: "ok".into(),
            version: "0.1.0".into(),
        };
        let json = serde_json::to_string(&h).unwrap();
        let decoded: HealthResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.status, "ok");
    }
}
