//! In-memory registry of revoked access-token identifiers

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Tracks revoked access-token identifiers (`jti` claims) until their
/// natural expiry
///
/// One instance exists per process, created at startup and shared via
/// `Arc`; it lives for the process lifetime. All operations are safe
/// under concurrent access without external locking. Sufficient for a
/// single node; a multi-node deployment swaps in a shared keyed store
/// behind the same `revoke`/`is_revoked` contract.
#[derive(Debug, Default)]
pub struct RevocationRegistry {
    revoked: RwLock<HashMap<String, DateTime<Utc>>>,
}

impl RevocationRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `jti` as revoked until at least `expires_at`
    ///
    /// Idempotent; revoking an already-revoked identifier keeps the
    /// later of the two expiries.
    pub fn revoke(&self, jti: &str, expires_at: DateTime<Utc>) {
        let mut revoked = self.write();
        revoked
            .entry(jti.to_string())
            .and_modify(|existing| {
                if expires_at > *existing {
                    *existing = expires_at;
                }
            })
            .or_insert(expires_at);
    }

    /// Checks whether `jti` has been revoked
    ///
    /// Returns true for any identifier revoked and not yet pruned, even
    /// past its recorded expiry.
    pub fn is_revoked(&self, jti: &str) -> bool {
        self.read().contains_key(jti)
    }

    /// Removes entries whose recorded expiry has passed
    ///
    /// Advisory only — it bounds memory, correctness does not depend on
    /// it. Never removes an entry whose expiry is still in the future.
    /// Safe to call concurrently and repeatedly.
    ///
    /// # Returns
    ///
    /// Number of entries removed
    pub fn prune(&self, now: DateTime<Utc>) -> usize {
        let mut revoked = self.write();
        let initial_count = revoked.len();

        revoked.retain(|_, expires_at| *expires_at >= now);

        initial_count - revoked.len()
    }

    /// Number of tracked revocations
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Whether the registry holds no revocations
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // Registry operations are total: a poisoned lock (a panicked writer)
    // cannot leave the map half-updated, so the guard is recovered
    // instead of propagating the panic.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, DateTime<Utc>>> {
        self.revoked.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, DateTime<Utc>>> {
        self.revoked
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
