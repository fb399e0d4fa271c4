// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verification errors.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::models::VerifyResponse;

/// Why a verification request was rejected.
///
/// Every variant is recoverable by the caller: fill in the request, or fetch
/// a fresh nonce and sign again.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VerifyError {
    /// A required request field is absent or empty
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    /// The nonce was never issued for this address, or has been replaced or consumed
    #[error("nonce is not valid for this address")]
    NonceMismatch,
    /// The signature does not recover to the claimed address
    #[error("signature does not match address")]
    SignatureMismatch,
}

impl VerifyError {
    pub fn error_code(&self) -> &'static str {
        match self {
            VerifyError::MissingField(_) => "missing_field",
            VerifyError::NonceMismatch => "nonce_mismatch",
            VerifyError::SignatureMismatch => "signature_mismatch",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            VerifyError::MissingField(_) => StatusCode::BAD_REQUEST,
            VerifyError::NonceMismatch | VerifyError::SignatureMismatch => {
                StatusCode::UNAUTHORIZED
            }
        }
    }
}

impl IntoResponse for VerifyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        (status, Json(VerifyResponse::rejected(self.error_code()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn missing_field_returns_400() {
        let response = VerifyError::MissingField("email").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "missing_field");
    }

    #[tokio::test]
    async fn mismatches_return_401() {
        for err in [VerifyError::NonceMismatch, VerifyError::SignatureMismatch] {
            let code = err.error_code();
            let response = err.into_response();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

            let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let body: serde_json::Value = serde_json::from_slice(&body_bytes).unwrap();
            assert_eq!(body["error"], code);
        }
    }
}
