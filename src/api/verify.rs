// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use tracing::warn;

use super::client_ip::ClientIp;
use crate::{
    models::{VerifyRequest, VerifyResponse},
    notify::OwnershipNotification,
    state::AppState,
    verification::VerifyError,
};

/// Verify a signed challenge and consume its nonce.
///
/// On success a confirmation email is queued for the owner and the
/// monitoring mailbox. Delivery happens in the background and cannot change
/// this response.
#[utoipa::path(
    post,
    path = "/api/verify",
    request_body = VerifyRequest,
    tag = "Verification",
    responses(
        (status = 200, description = "Ownership verified", body = VerifyResponse),
        (status = 400, description = "Missing field", body = VerifyResponse),
        (status = 401, description = "Nonce or signature mismatch", body = VerifyResponse)
    )
)]
pub async fn verify_signature(
    State(state): State<AppState>,
    ClientIp(source_ip): ClientIp,
    payload: Result<Json<VerifyRequest>, JsonRejection>,
) -> Result<Json<VerifyResponse>, VerifyError> {
    let Json(request) = payload.map_err(|e| {
        warn!(error = %e, "Rejected unreadable verification body");
        VerifyError::MissingField("body")
    })?;

    let verified = state.verifier.verify(&request).map_err(|e| {
        warn!(
            address = request.address.as_deref().unwrap_or_default(),
            error_code = e.error_code(),
            "Verification failed"
        );
        e
    })?;

    state
        .notifications
        .enqueue(OwnershipNotification::new(verified, source_ip));

    Ok(Json(VerifyResponse::verified()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationQueue;
    use crate::verification::challenge_message;
    use alloy::signers::{local::PrivateKeySigner, SignerSync};

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn signed_request(state: &AppState) -> VerifyRequest {
        let signer: PrivateKeySigner = KEY.parse().unwrap();
        let address = signer.address().to_string();
        let nonce = state.nonces.issue(&address).unwrap();
        let sig = signer
            .sign_message_sync(challenge_message(&nonce).as_bytes())
            .unwrap();

        VerifyRequest {
            address: Some(address),
            signature: Some(format!("0x{}", alloy::hex::encode(sig.as_bytes()))),
            nonce: Some(nonce),
            email: Some("owner@example.com".to_string()),
        }
    }

    #[tokio::test]
    async fn success_enqueues_notification() {
        let (queue, mut receiver) = NotificationQueue::channel();
        let state = AppState::in_memory(queue);
        let request = signed_request(&state);

        let Json(response) = verify_signature(
            State(state.clone()),
            ClientIp("203.0.113.5".to_string()),
            Ok(Json(request)),
        )
        .await
        .expect("verification succeeds");

        assert_eq!(response, VerifyResponse::verified());
        let notification = receiver.try_recv().expect("notification queued");
        assert_eq!(notification.email, "owner@example.com");
        assert_eq!(notification.source_ip, "203.0.113.5");
        assert_eq!(
            notification.address.as_str(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[tokio::test]
    async fn failure_enqueues_nothing() {
        let (queue, mut receiver) = NotificationQueue::channel();
        let state = AppState::in_memory(queue);
        let mut request = signed_request(&state);
        request.nonce = Some("not-the-nonce".to_string());

        let err = verify_signature(
            State(state),
            ClientIp("203.0.113.5".to_string()),
            Ok(Json(request)),
        )
        .await
        .unwrap_err();

        assert_eq!(err, VerifyError::NonceMismatch);
        assert!(receiver.try_recv().is_err());
    }

    #[tokio::test]
    async fn stopped_dispatcher_does_not_fail_verification() {
        let (queue, receiver) = NotificationQueue::channel();
        drop(receiver);
        let state = AppState::in_memory(queue);
        let request = signed_request(&state);

        let result = verify_signature(
            State(state),
            ClientIp("203.0.113.5".to_string()),
            Ok(Json(request)),
        )
        .await;
        assert!(result.is_ok());
    }
}
