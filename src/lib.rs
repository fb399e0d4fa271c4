// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Wallet - Ownership Verifier
//!
//! Challenge-response proof that a caller controls an EVM address: the
//! service issues a single-use nonce, the client signs the challenge message
//! with `personal_sign`, and the service recovers the signer and consumes the
//! nonce. Successful verifications trigger an email notification.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `nonce` - Outstanding nonce registry
//! - `verification` - Signature verification state machine
//! - `notify` - Background email notifications

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod nonce;
pub mod notify;
pub mod state;
pub mod telemetry;
pub mod verification;
