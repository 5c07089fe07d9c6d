//! Interaction request signature check
//!
//! Discord signs each interaction request with the application's ed25519
//! key over `timestamp || body`. Requests that fail the check never reach a
//! handler.

use axum::{
    body::Body,
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use ed25519_dalek::{Signature, Verifier, VerifyingKey, PUBLIC_KEY_LENGTH, SIGNATURE_LENGTH};
use tracing::warn;

use crate::error::ApiError;
use crate::AppState;

pub const SIGNATURE_HEADER: &str = "X-Signature-Ed25519";
pub const TIMESTAMP_HEADER: &str = "X-Signature-Timestamp";

/// Interaction payloads are small; anything larger is rejected
const MAX_BODY_BYTES: usize = 1024 * 1024;

const INVALID_SIGNATURE: &str = "invalid request signature";

/// Parse the hex-encoded application public key
pub fn parse_public_key(hex_key: &str) -> Result<VerifyingKey, String> {
    let bytes = hex::decode(hex_key.trim())
        .map_err(|e| format!("public key is not hex: {}", e))?;
    let bytes: [u8; PUBLIC_KEY_LENGTH] = bytes
        .try_into()
        .map_err(|_| format!("public key must be {} bytes", PUBLIC_KEY_LENGTH))?;

    VerifyingKey::from_bytes(&bytes)
        .map_err(|e| format!("invalid public key: {}", e))
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Check `signature_hex` over `timestamp || body`
pub fn is_valid_signature(
    key: &VerifyingKey,
    signature_hex: &str,
    timestamp: &str,
    body: &[u8],
) -> bool {
    let Ok(raw) = hex::decode(signature_hex) else {
        return false;
    };
    let Ok(raw): Result<[u8; SIGNATURE_LENGTH], _> = raw.try_into() else {
        return false;
    };
    let signature = Signature::from_bytes(&raw);

    let mut message = Vec::with_capacity(timestamp.len() + body.len());
    message.extend_from_slice(timestamp.as_bytes());
    message.extend_from_slice(body);

    key.verify(&message, &signature).is_ok()
}

/// Signature middleware for `/interactions`
pub async fn verify_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let (parts, body) = request.into_parts();

    let (Some(signature), Some(timestamp)) = (
        header(&parts.headers, SIGNATURE_HEADER),
        header(&parts.headers, TIMESTAMP_HEADER),
    ) else {
        warn!("Interaction request without signature headers");
        return Err(ApiError::Unauthorized(INVALID_SIGNATURE.to_string()));
    };

    let body_bytes = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read body: {}", e)))?;

    if !is_valid_signature(&state.public_key, signature, timestamp, &body_bytes) {
        warn!(timestamp = %timestamp, "Rejected interaction with bad signature");
        return Err(ApiError::Unauthorized(INVALID_SIGNATURE.to_string()));
    }

    let request = Request::from_parts(parts, Body::from(body_bytes));
    Ok(next.run(request).await)
}
