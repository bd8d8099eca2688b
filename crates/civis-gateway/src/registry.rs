use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use civis_core::{Address, AttestationKind, ReducedPublicKey};
use civis_crypto::{registry_key, Hash};

use crate::error::RegistryError;

/// One issuer key and whether it is currently trusted for its kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssuerEntry {
    pub kind: AttestationKind,
    pub key: ReducedPublicKey,
    pub trusted: bool,
}

/// Serialized registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySnapshot {
    pub owner: Address,
    pub entries: Vec<SnapshotEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Hex BLAKE3 digest of `(kind, x, y)`.
    pub hash: String,
    #[serde(flatten)]
    pub entry: IssuerEntry,
}

struct RegistryState {
    owner: Address,
    entries: HashMap<Hash, IssuerEntry>,
}

/// Owner-controlled trust store of issuer keys, keyed per attestation kind.
///
/// Entries never expire. Removing a key clears its trust bit, which every
/// later verification observes.
pub struct IssuerRegistry {
    state: RwLock<RegistryState>,
}

impl IssuerRegistry {
    pub fn new(owner: Address) -> Self {
        Self {
            state: RwLock::new(RegistryState {
                owner,
                entries: HashMap::new(),
            }),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_as_owner(
        &self,
        caller: Address,
    ) -> Result<RwLockWriteGuard<'_, RegistryState>, RegistryError> {
        let state = self.write();
        if state.owner != caller {
            return Err(RegistryError::NotOwner { caller });
        }
        Ok(state)
    }

    pub fn owner(&self) -> Address {
        self.read().owner
    }

    /// Trust `key` for `kind`.
    pub fn add(
        &self,
        caller: Address,
        kind: AttestationKind,
        key: ReducedPublicKey,
    ) -> Result<(), RegistryError> {
        let mut state = self.write_as_owner(caller)?;
        state.entries.insert(
            registry_key(kind, &key),
            IssuerEntry {
                kind,
                key,
                trusted: true,
            },
        );
        tracing::info!(kind = %kind, key = %key, "issuer trusted");
        Ok(())
    }

    /// Clear the trust bit for `key` under `kind`. Returns whether it was set.
    pub fn remove(
        &self,
        caller: Address,
        kind: AttestationKind,
        key: ReducedPublicKey,
    ) -> Result<bool, RegistryError> {
        let mut state = self.write_as_owner(caller)?;
        let was_trusted = match state.entries.get_mut(&registry_key(kind, &key)) {
            Some(entry) => std::mem::replace(&mut entry.trusted, false),
            None => false,
        };
        tracing::info!(kind = %kind, key = %key, was_trusted, "issuer trust removed");
        Ok(was_trusted)
    }

    pub fn is_trusted(&self, kind: AttestationKind, key: &ReducedPublicKey) -> bool {
        Self::lookup(&self.read(), kind, key)
    }

    /// Check several keys under one read lock, so a concurrent removal is
    /// seen by all of them or none.
    pub fn all_trusted(&self, keys: &[(AttestationKind, ReducedPublicKey)]) -> bool {
        let state = self.read();
        keys.iter()
            .all(|(kind, key)| Self::lookup(&state, *kind, key))
    }

    fn lookup(state: &RegistryState, kind: AttestationKind, key: &ReducedPublicKey) -> bool {
        state
            .entries
            .get(&registry_key(kind, key))
            .is_some_and(|entry| entry.trusted)
    }

    pub fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), RegistryError> {
        let mut state = self.write_as_owner(caller)?;
        state.owner = new_owner;
        tracing::info!(from = %caller, to = %new_owner, "registry ownership transferred");
        Ok(())
    }

    /// All known entries, trusted first.
    pub fn entries(&self) -> Vec<IssuerEntry> {
        let mut entries: Vec<IssuerEntry> = self.read().entries.values().copied().collect();
        entries.sort_by_key(|e| (!e.trusted, e.kind.tag(), e.key.x, e.key.y));
        entries
    }

    pub fn trusted_count(&self) -> usize {
        self.read().entries.values().filter(|e| e.trusted).count()
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let state = self.read();
        let mut entries: Vec<SnapshotEntry> = state
            .entries
            .iter()
            .map(|(hash, entry)| SnapshotEntry {
                hash: hex::encode(hash),
                entry: *entry,
            })
            .collect();
        entries.sort_by(|a, b| a.hash.cmp(&b.hash));
        RegistrySnapshot {
            owner: state.owner,
            entries,
        }
    }

    /// Rebuild from a snapshot, recomputing every digest.
    pub fn restore(snapshot: RegistrySnapshot) -> Result<Self, RegistryError> {
        let mut entries = HashMap::with_capacity(snapshot.entries.len());
        for item in snapshot.entries {
            let hash = registry_key(item.entry.kind, &item.entry.key);
            if hex::encode(hash) != item.hash {
                return Err(RegistryError::CorruptSnapshot(format!(
                    "digest mismatch for {} key {}",
                    item.entry.kind, item.entry.key
                )));
            }
            entries.insert(hash, item.entry);
        }
        Ok(Self {
            state: RwLock::new(RegistryState {
                owner: snapshot.owner,
                entries,
            }),
        })
    }

    pub fn to_json(&self) -> Result<String, RegistryError> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|e| RegistryError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, RegistryError> {
        let snapshot: RegistrySnapshot =
            serde_json::from_str(json).map_err(|e| RegistryError::Serialization(e.to_string()))?;
        Self::restore(snapshot)
    }
}
