// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Canonical challenge message.
//!
//! Clients must sign exactly this text (via `personal_sign`). Any change in
//! wording, whitespace or line endings yields a different signer on recovery,
//! which is what binds a signature to one nonce.

/// First line of the challenge.
pub const MESSAGE_PREFIX: &str = "Sign this message to verify ownership of your wallet.";

/// Build the message a client signs for `nonce`.
pub fn challenge_message(nonce: &str) -> String {
    format!("{MESSAGE_PREFIX}\nNonce: {nonce}")
}
