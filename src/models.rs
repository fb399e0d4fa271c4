// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response structures used by the REST API. All wire types
//! derive `ToSchema` for the OpenAPI document.
//!
//! ## Wallet Address Type
//!
//! The [`WalletAddress`] newtype wraps Ethereum-style addresses (0x-prefixed,
//! 40 hex characters). Once parsed it is always in canonical lowercase form,
//! so two addresses that differ only in case compare equal.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

// =============================================================================
// Wallet Address Type
// =============================================================================

/// Number of hex digits following the `0x` prefix.
const ADDRESS_HEX_LEN: usize = 40;

/// Canonical (lowercase) Ethereum-compatible wallet address.
///
/// # Example
///
/// ```rust,ignore
/// let addr: WalletAddress = "0x742d35Cc6634C0532925a3b844Bc9e7595f4aB12".parse()?;
/// assert_eq!(addr.as_str(), "0x742d35cc6634c0532925a3b844bc9e7595f4ab12");
/// ```
#[derive(Debug, Clone, Serialize, ToSchema, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct WalletAddress(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    #[error("address is empty")]
    Empty,

    #[error("address must be 0x followed by 40 hex characters")]
    Malformed,
}

impl WalletAddress {
    /// Parse and canonicalize an address. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }

        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or(AddressError::Malformed)?;

        if digits.len() != ADDRESS_HEX_LEN || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AddressError::Malformed);
        }

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for WalletAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl std::fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<alloy::primitives::Address> for WalletAddress {
    fn from(value: alloy::primitives::Address) -> Self {
        WalletAddress(format!("0x{}", alloy::hex::encode(value.as_slice())))
    }
}

// =============================================================================
// Nonce Models
// =============================================================================

/// Query parameters for `GET /api/nonce`.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct NonceQuery {
    /// Address the nonce is bound to.
    pub address: Option<String>,
}

/// A freshly issued nonce.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct NonceResponse {
    /// Decimal nonce to embed in the signed message.
    pub nonce: String,
}

// =============================================================================
// Verification Models
// =============================================================================

/// Request body for `POST /api/verify`.
///
/// Every field is required; they are optional here so that an incomplete
/// request is reported as a missing field rather than a JSON rejection.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct VerifyRequest {
    /// Address claimed by the caller.
    #[serde(default)]
    pub address: Option<String>,
    /// 65-byte `personal_sign` signature, hex encoded.
    #[serde(default)]
    pub signature: Option<String>,
    /// Nonce previously issued for `address`.
    #[serde(default)]
    pub nonce: Option<String>,
    /// Where the ownership confirmation is sent.
    #[serde(default)]
    pub email: Option<String>,
}

/// Verification verdict.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct VerifyResponse {
    pub success: bool,
    /// Stable error code, present only on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl VerifyResponse {
    pub fn verified() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn rejected(code: impl Into<String>) -> Self {
        Self {
            success: false,
            error: Some(code.into()),
        }
    }
}
