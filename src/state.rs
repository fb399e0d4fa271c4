// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::nonce::{InMemoryNonceStore, NonceStore};
use crate::notify::NotificationQueue;
use crate::verification::{AddressRecovery, PersonalSignRecovery, VerificationService};

#[derive(Clone)]
pub struct AppState {
    pub nonces: Arc<dyn NonceStore>,
    pub verifier: VerificationService,
    pub notifications: NotificationQueue,
}

impl AppState {
    pub fn new(
        nonces: Arc<dyn NonceStore>,
        recovery: Arc<dyn AddressRecovery>,
        notifications: NotificationQueue,
    ) -> Self {
        Self {
            verifier: VerificationService::new(nonces.clone(), recovery),
            nonces,
            notifications,
        }
    }

    /// In-memory store and `personal_sign` recovery.
    pub fn in_memory(notifications: NotificationQueue) -> Self {
        Self::new(
            Arc::new(InMemoryNonceStore::new()),
            Arc::new(PersonalSignRecovery),
            notifications,
        )
    }
}
