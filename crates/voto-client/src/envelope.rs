//! Response envelopes and the single decoding boundary
//!
//! Every JSON read, create and update answers `{"data": ...}`. Two endpoints
//! are exceptions: `POST /auth/login` answers `{"token": "..."}` and
//! `POST /eleitores/importar` answers a bare [`ImportReport`].
//!
//! [`ImportReport`]: crate::types::ImportReport

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ApiError, Result};

#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Decode a bare JSON body
pub fn decode<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| {
        debug!(
            "Decode failure at {}: {} (body: {})",
            endpoint,
            e,
            String::from_utf8_lossy(&body[..body.len().min(200)])
        );
        ApiError::decode(endpoint, e)
    })
}

/// Decode `{"data": T}` and return `T`
pub fn decode_data<T: DeserializeOwned>(endpoint: &str, body: &[u8]) -> Result<T> {
    decode::<Envelope<T>>(endpoint, body).map(|envelope| envelope.data)
}

/// Extract the server-provided message from an error body, if any
pub fn error_message(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    parsed
        .message
        .or(parsed.error)
        .filter(|m| !m.trim().is_empty())
}
