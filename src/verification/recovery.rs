// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Signer recovery for `personal_sign` (EIP-191) signatures.

use alloy::primitives::Signature;

use crate::models::WalletAddress;

/// Length of an `r || s || v` signature.
const SIGNATURE_LEN: usize = 65;

#[derive(Debug, thiserror::Error)]
pub enum RecoveryError {
    #[error("signature is not valid hex: {0}")]
    InvalidHex(String),

    #[error("signature must be {SIGNATURE_LEN} bytes, got {0}")]
    InvalidLength(usize),

    #[error("malformed signature: {0}")]
    Malformed(String),

    #[error("signer recovery failed: {0}")]
    Recovery(String),
}

/// Recovers the address that signed a message.
pub trait AddressRecovery: Send + Sync {
    fn recover(&self, message: &str, signature: &str) -> Result<WalletAddress, RecoveryError>;
}

/// EIP-191 recovery over secp256k1, matching wallet `personal_sign`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PersonalSignRecovery;

impl AddressRecovery for PersonalSignRecovery {
    fn recover(&self, message: &str, signature: &str) -> Result<WalletAddress, RecoveryError> {
        let signature = parse_signature(signature)?;
        let signer = signature
            .recover_address_from_msg(message.as_bytes())
            .map_err(|e| RecoveryError::Recovery(e.to_string()))?;
        Ok(WalletAddress::from(signer))
    }
}

/// Decode a hex signature, with or without `0x` prefix.
fn parse_signature(raw: &str) -> Result<Signature, RecoveryError> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes =
        alloy::hex::decode(digits).map_err(|e| RecoveryError::InvalidHex(e.to_string()))?;
    if bytes.len() != SIGNATURE_LEN {
        return Err(RecoveryError::InvalidLength(bytes.len()));
    }

    Signature::try_from(bytes.as_slice()).map_err(|e| RecoveryError::Malformed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::signers::{local::PrivateKeySigner, SignerSync};

    const KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn sign(signer: &PrivateKeySigner, message: &str) -> String {
        let sig = signer.sign_message_sync(message.as_bytes()).unwrap();
        format!("0x{}", alloy::hex::encode(sig.as_bytes()))
    }

    #[test]
    fn recovers_signer_address() {
        let signer: PrivateKeySigner = KEY.parse().unwrap();
        let signature = sign(&signer, "hello");

        let recovered = PersonalSignRecovery.recover("hello", &signature).unwrap();
        assert_eq!(recovered, WalletAddress::from(signer.address()));
        assert_eq!(
            recovered.as_str(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn accepts_signature_without_prefix() {
        let signer: PrivateKeySigner = KEY.parse().unwrap();
        let signature = sign(&signer, "hello");
        let bare = signature.trim_start_matches("0x");

        let recovered = PersonalSignRecovery.recover("hello", bare).unwrap();
        assert_eq!(recovered, WalletAddress::from(signer.address()));
    }

    #[test]
    fn different_message_recovers_different_address() {
        let signer: PrivateKeySigner = KEY.parse().unwrap();
        let signature = sign(&signer, "hello");

        let recovered = PersonalSignRecovery
            .recover("hello!", &signature)
            .expect("a well-formed signature recovers some address");
        assert_ne!(recovered, WalletAddress::from(signer.address()));
    }

    #[test]
    fn rejects_bad_hex() {
        let err = PersonalSignRecovery.recover("hello", "0xnothex").unwrap_err();
        assert!(matches!(err, RecoveryError::InvalidHex(_)));
    }

    #[test]
    fn rejects_wrong_length() {
        let err = PersonalSignRecovery.recover("hello", "0xdeadbeef").unwrap_err();
        assert!(matches!(err, RecoveryError::InvalidLength(4)));
    }

    #[test]
    fn rejects_zero_signature_without_panicking() {
        let zeros = format!("0x{}", "00".repeat(SIGNATURE_LEN));
        assert!(PersonalSignRecovery.recover("hello", &zeros).is_err());
    }
}
