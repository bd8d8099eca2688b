use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

use civis_core::{Address, PublicSignals};
use civis_proof::Proof;

use crate::error::GatewayError;

/// One verification decision, as recorded by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationRecord {
    pub id: Uuid,
    pub caller: Address,
    pub accepted: bool,
    pub timestamp: DateTime<Utc>,
    pub signals: PublicSignals,
    pub proof: Proof,
}

/// Append-only log of verification decisions.
#[derive(Default)]
pub struct AuditLog {
    /// id → (insertion sequence, record)
    records: DashMap<Uuid, (u64, VerificationRecord)>,
    next_seq: AtomicU64,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild from previously exported records.
    pub fn from_records(records: Vec<VerificationRecord>) -> Self {
        let log = Self::new();
        for record in records {
            log.insert(record);
        }
        log
    }

    fn insert(&self, record: VerificationRecord) {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.records.insert(record.id, (seq, record));
    }

    /// Append a decision and return the stored record.
    pub fn record(
        &self,
        caller: Address,
        accepted: bool,
        timestamp: DateTime<Utc>,
        signals: PublicSignals,
        proof: Proof,
    ) -> VerificationRecord {
        let record = VerificationRecord {
            id: Uuid::now_v7(),
            caller,
            accepted,
            timestamp,
            signals,
            proof,
        };
        self.insert(record.clone());
        tracing::debug!(record_id = %record.id, caller = %caller, accepted, "verification recorded");
        record
    }

    pub fn get(&self, id: &Uuid) -> Option<VerificationRecord> {
        self.records.get(id).map(|e| e.value().1.clone())
    }

    /// Every record for `caller`, oldest first.
    pub fn by_caller(&self, caller: &Address) -> Vec<VerificationRecord> {
        self.collect_ordered(|r| r.caller == *caller)
    }

    /// Every record, oldest first.
    pub fn records(&self) -> Vec<VerificationRecord> {
        self.collect_ordered(|_| true)
    }

    fn collect_ordered(&self, keep: impl Fn(&VerificationRecord) -> bool) -> Vec<VerificationRecord> {
        let mut out: Vec<(u64, VerificationRecord)> = self
            .records
            .iter()
            .filter(|e| keep(&e.value().1))
            .map(|e| e.value().clone())
            .collect();
        out.sort_by_key(|(seq, _)| *seq);
        out.into_iter().map(|(_, record)| record).collect()
    }

    pub fn accepted_count(&self) -> usize {
        self.records.iter().filter(|e| e.value().1.accepted).count()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_json(&self) -> Result<String, GatewayError> {
        serde_json::to_string_pretty(&self.records())
            .map_err(|e| GatewayError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self, GatewayError> {
        let records: Vec<VerificationRecord> =
            serde_json::from_str(json).map_err(|e| GatewayError::Serialization(e.to_string()))?;
        Ok(Self::from_records(records))
    }
}
