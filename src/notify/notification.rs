// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Ownership confirmation message.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::WalletAddress;
use crate::verification::VerifiedOwnership;

pub const SUBJECT: &str = "Wallet ownership verified";

/// Sent to the address owner (and the monitoring mailbox) after a successful
/// verification.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OwnershipNotification {
    /// Correlates log lines for one notification.
    pub id: Uuid,
    pub address: WalletAddress,
    /// Owner's email as supplied in the verification request.
    pub email: String,
    pub timestamp: DateTime<Utc>,
    pub source_ip: String,
}

impl OwnershipNotification {
    pub fn new(verified: VerifiedOwnership, source_ip: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            address: verified.address,
            email: verified.email,
            timestamp: Utc::now(),
            source_ip: source_ip.into(),
        }
    }

    pub fn subject(&self) -> &'static str {
        SUBJECT
    }

    pub fn text_body(&self) -> String {
        format!(
            "Wallet ownership was verified.\n\n\
             Address: {}\n\
             Email: {}\n\
             Timestamp: {}\n\
             Source IP: {}\n",
            self.address,
            self.email,
            self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            self.source_ip,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn text_body_lists_all_fields() {
        let notification = OwnershipNotification {
            id: Uuid::nil(),
            address: WalletAddress::parse("0x742d35cc6634c0532925a3b844bc9e7595f4ab12").unwrap(),
            email: "owner@example.com".to_string(),
            timestamp: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            source_ip: "203.0.113.7".to_string(),
        };

        let body = notification.text_body();
        assert!(body.contains("Address: 0x742d35cc6634c0532925a3b844bc9e7595f4ab12"));
        assert!(body.contains("Email: owner@example.com"));
        assert!(body.contains("Timestamp: 2026-01-02T03:04:05Z"));
        assert!(body.contains("Source IP: 203.0.113.7"));
        assert_eq!(notification.subject(), "Wallet ownership verified");
    }
}
