// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Process-local nonce store backed by a mutex-guarded map.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use k256::elliptic_curve::rand_core::{OsRng, RngCore};

use super::{NonceError, NonceStore, NONCE_UPPER_BOUND};
use crate::models::WalletAddress;

/// Source of raw nonce values, reduced modulo [`NONCE_UPPER_BOUND`] on issue.
pub type NonceGenerator = Box<dyn Fn() -> u32 + Send + Sync>;

/// In-memory [`NonceStore`].
///
/// All map access goes through one mutex, which serializes the
/// read-modify-write of `consume` and `consume_if_matches`. The lock is never
/// held across an await point.
pub struct InMemoryNonceStore {
    nonces: Mutex<HashMap<WalletAddress, String>>,
    generator: NonceGenerator,
}

impl Default for InMemoryNonceStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryNonceStore {
    /// Store drawing nonces from the OS random source.
    pub fn new() -> Self {
        Self::with_generator(Box::new(random_nonce))
    }

    /// Store with a custom value source (deterministic tests).
    pub fn with_generator(generator: NonceGenerator) -> Self {
        Self {
            nonces: Mutex::new(HashMap::new()),
            generator,
        }
    }

    fn map(&self) -> MutexGuard<'_, HashMap<WalletAddress, String>> {
        // Every critical section is a single map operation, so a poisoned
        // lock still guards a consistent map.
        self.nonces
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl NonceStore for InMemoryNonceStore {
    fn issue(&self, address: &str) -> Result<String, NonceError> {
        let address = WalletAddress::parse(address)?;
        let value = ((self.generator)() % NONCE_UPPER_BOUND).to_string();

        let replaced = self.map().insert(address.clone(), value.clone());
        tracing::debug!(
            address = %address,
            replaced = replaced.is_some(),
            "Issued nonce"
        );

        Ok(value)
    }

    fn peek(&self, address: &str) -> Option<String> {
        let address = WalletAddress::parse(address).ok()?;
        self.map().get(&address).cloned()
    }

    fn consume(&self, address: &str) -> Option<String> {
        let address = WalletAddress::parse(address).ok()?;
        self.map().remove(&address)
    }

    fn consume_if_matches(&self, address: &str, expected: &str) -> bool {
        let Ok(address) = WalletAddress::parse(address) else {
            return false;
        };

        let mut map = self.map();
        match map.get(&address) {
            Some(current) if current == expected => {
                map.remove(&address);
                true
            }
            _ => false,
        }
    }

    fn len(&self) -> usize {
        self.map().len()
    }
}

/// Uniform draw from `[0, NONCE_UPPER_BOUND)`.
///
/// Rejection sampling keeps the distribution unbiased: raw values at or above
/// the largest multiple of the bound are redrawn.
fn random_nonce() -> u32 {
    let zone = u32::MAX - (u32::MAX % NONCE_UPPER_BOUND);
    loop {
        let raw = OsRng.next_u32();
        if raw < zone {
            return raw % NONCE_UPPER_BOUND;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Barrier};

    const ADDR: &str = "0x742d35cc6634c0532925a3b844bc9e7595f4ab12";
    const ADDR_UPPER: &str = "0x742D35CC6634C0532925A3B844BC9E7595F4AB12";

    fn counting_store() -> InMemoryNonceStore {
        let counter = Arc::new(AtomicU32::new(100));
        InMemoryNonceStore::with_generator(Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst)
        }))
    }

    #[test]
    fn issue_then_peek_returns_value() {
        let store = InMemoryNonceStore::new();
        let nonce = store.issue(ADDR).unwrap();
        assert_eq!(store.peek(ADDR), Some(nonce));
    }

    #[test]
    fn issued_values_are_decimal_and_in_range() {
        let store = InMemoryNonceStore::new();
        for _ in 0..200 {
            let nonce = store.issue(ADDR).unwrap();
            assert!(nonce.chars().all(|c| c.is_ascii_digit()));
            let value: u32 = nonce.parse().unwrap();
            assert!(value < NONCE_UPPER_BOUND);
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let store = counting_store();
        let nonce = store.issue(ADDR_UPPER).unwrap();
        assert_eq!(store.peek(ADDR), Some(nonce.clone()));
        assert_eq!(store.consume(ADDR), Some(nonce));
        assert_eq!(store.peek(ADDR_UPPER), None);
    }

    #[test]
    fn issue_replaces_previous_nonce() {
        let store = counting_store();
        let first = store.issue(ADDR).unwrap();
        let second = store.issue(ADDR).unwrap();
        assert_ne!(first, second);
        assert_eq!(store.peek(ADDR), Some(second));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn issue_rejects_invalid_address() {
        let store = InMemoryNonceStore::new();
        assert!(matches!(store.issue(""), Err(NonceError::InvalidInput(_))));
        assert!(matches!(
            store.issue("not-an-address"),
            Err(NonceError::InvalidInput(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn peek_does_not_mutate() {
        let store = counting_store();
        let nonce = store.issue(ADDR).unwrap();
        assert_eq!(store.peek(ADDR), Some(nonce.clone()));
        assert_eq!(store.peek(ADDR), Some(nonce));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn consume_twice_returns_absent() {
        let store = counting_store();
        let nonce = store.issue(ADDR).unwrap();
        assert_eq!(store.consume(ADDR), Some(nonce));
        assert_eq!(store.consume(ADDR), None);
        assert!(store.is_empty());
    }

    #[test]
    fn consume_if_matches_leaves_replaced_nonce() {
        let store = counting_store();
        let stale = store.issue(ADDR).unwrap();
        let fresh = store.issue(ADDR).unwrap();

        assert!(!store.consume_if_matches(ADDR, &stale));
        assert_eq!(store.peek(ADDR), Some(fresh.clone()));

        assert!(store.consume_if_matches(ADDR_UPPER, &fresh));
        assert_eq!(store.peek(ADDR), None);
    }

    #[test]
    fn unknown_or_malformed_addresses_are_absent() {
        let store = InMemoryNonceStore::new();
        assert_eq!(store.peek(ADDR), None);
        assert_eq!(store.consume("garbage"), None);
        assert!(!store.consume_if_matches("garbage", "1"));
    }

    #[test]
    fn generator_output_is_bounded() {
        let store = InMemoryNonceStore::with_generator(Box::new(|| u32::MAX));
        let value: u32 = store.issue(ADDR).unwrap().parse().unwrap();
        assert!(value < NONCE_UPPER_BOUND);
    }

    #[test]
    fn concurrent_consume_has_single_winner() {
        const THREADS: usize = 16;

        let store = Arc::new(counting_store());
        store.issue(ADDR).unwrap();
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let store = Arc::clone(&store);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    store.consume(ADDR).is_some()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn concurrent_issue_for_distinct_addresses() {
        let store = Arc::new(InMemoryNonceStore::new());
        let handles: Vec<_> = (0..8u8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    let address = format!("0x{:040x}", i);
                    store.issue(&address).unwrap()
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(store.len(), 8);
    }
}
