// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Nonce Registry
//!
//! Tracks the single outstanding challenge nonce per wallet address.
//!
//! ## Lifecycle
//!
//! ```text
//! NoNonce ──issue──▶ NonceIssued ──consume──▶ (removed)
//!                        │
//!                        └──issue──▶ NonceIssued (previous value invalidated)
//! ```
//!
//! Records live only in process memory. There is no expiry: a nonce stays
//! valid until it is consumed or replaced by a newer one for the same address.

pub mod memory;

pub use memory::InMemoryNonceStore;

use crate::models::AddressError;

/// Nonces are drawn uniformly from `[0, NONCE_UPPER_BOUND)`.
pub const NONCE_UPPER_BOUND: u32 = 1_000_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NonceError {
    #[error("invalid address: {0}")]
    InvalidInput(#[from] AddressError),
}

/// Keyed registry of outstanding nonces.
///
/// Implementations normalize addresses themselves, so callers may pass the
/// address exactly as the client sent it.
pub trait NonceStore: Send + Sync {
    /// Issue a fresh nonce for `address`, replacing any outstanding one.
    fn issue(&self, address: &str) -> Result<String, NonceError>;

    /// Current outstanding nonce, without consuming it.
    fn peek(&self, address: &str) -> Option<String>;

    /// Remove and return the outstanding nonce. At most one concurrent caller
    /// observes `Some` for a given issuance.
    fn consume(&self, address: &str) -> Option<String>;

    /// Remove the outstanding nonce only if it still equals `expected`.
    ///
    /// Returns `true` if this call removed it.
    fn consume_if_matches(&self, address: &str, expected: &str) -> bool;

    /// Number of outstanding nonces.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
