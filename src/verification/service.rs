// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership verification state machine.

use std::sync::Arc;

use super::message::challenge_message;
use super::recovery::AddressRecovery;
use super::VerifyError;
use crate::models::{VerifyRequest, WalletAddress};
use crate::nonce::NonceStore;

/// Successful proof of control over an address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedOwnership {
    /// Canonical address that signed the challenge.
    pub address: WalletAddress,
    /// Caller-supplied destination for the confirmation email.
    pub email: String,
}

/// Checks signed challenges against outstanding nonces.
///
/// The nonce is consumed only after every check has passed, so a client
/// whose response was lost can retry with the same signature.
#[derive(Clone)]
pub struct VerificationService {
    store: Arc<dyn NonceStore>,
    recovery: Arc<dyn AddressRecovery>,
}

impl VerificationService {
    pub fn new(store: Arc<dyn NonceStore>, recovery: Arc<dyn AddressRecovery>) -> Self {
        Self { store, recovery }
    }

    pub fn verify(&self, request: &VerifyRequest) -> Result<VerifiedOwnership, VerifyError> {
        let address = required(&request.address, "address")?;
        let signature = required(&request.signature, "signature")?;
        // Compared byte for byte with the outstanding value; never trimmed.
        let nonce = required(&request.nonce, "nonce")?;
        let email = required(&request.email, "email")?.trim();

        // A malformed address can never hold a nonce.
        let claimed: WalletAddress = address.parse().map_err(|_| VerifyError::NonceMismatch)?;

        match self.store.peek(claimed.as_str()) {
            Some(outstanding) if outstanding == nonce => {}
            _ => {
                tracing::info!(address = %claimed, "Nonce not outstanding for address");
                return Err(VerifyError::NonceMismatch);
            }
        }

        let message = challenge_message(nonce);
        let recovered = match self.recovery.recover(&message, signature) {
            Ok(recovered) => recovered,
            Err(e) => {
                tracing::info!(address = %claimed, error = %e, "Signature recovery failed");
                return Err(VerifyError::SignatureMismatch);
            }
        };

        if recovered != claimed {
            tracing::info!(
                address = %claimed,
                recovered = %recovered,
                "Signature recovered to a different address"
            );
            return Err(VerifyError::SignatureMismatch);
        }

        // Lost race: a concurrent request consumed it, or a newer nonce replaced it.
        if !self.store.consume_if_matches(claimed.as_str(), nonce) {
            tracing::info!(address = %claimed, "Nonce consumed or replaced during verification");
            return Err(VerifyError::NonceMismatch);
        }

        tracing::info!(address = %claimed, "Wallet ownership verified");
        Ok(VerifiedOwnership {
            address: claimed,
            email: email.to_string(),
        })
    }
}

/// Raw field value; blank (whitespace-only) counts as missing.
fn required<'a>(
    value: &'a Option<String>,
    field: &'static str,
) -> Result<&'a str, VerifyError> {
    value
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .ok_or(VerifyError::MissingField(field))
}
