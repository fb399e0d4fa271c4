// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Ownership Verification
//!
//! Decides whether a signed challenge proves control of an address.
//!
//! ## Flow
//!
//! 1. Reject incomplete requests (`MissingField`)
//! 2. Require the claimed nonce to be the address's outstanding nonce
//!    (`NonceMismatch`)
//! 3. Rebuild the canonical challenge message and recover its signer
//! 4. Require signer == claimed address (`SignatureMismatch`)
//! 5. Consume the nonce
//!
//! Steps 1–4 never mutate the nonce store.

pub mod error;
pub mod message;
pub mod recovery;
pub mod service;

pub use error::VerifyError;
pub use message::challenge_message;
pub use recovery::{AddressRecovery, PersonalSignRecovery, RecoveryError};
pub use service::{VerificationService, VerifiedOwnership};
