use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::error::ThreeDsError;
use crate::status::FingerprintStatus;

/// Protocol state for one in-flight 3DS authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionRecord {
    /// Version recommended by the 3DS server at version lookup; fixed thereafter.
    pub protocol_version: String,
    pub fingerprint_status: FingerprintStatus,
}

impl TransactionRecord {
    pub fn new(protocol_version: impl Into<String>, fingerprint_status: FingerprintStatus) -> Self {
        Self {
            protocol_version: protocol_version.into(),
            fingerprint_status,
        }
    }
}

/// Trait for transaction state backends, keyed by `threeDSServerTransID`.
///
/// Implementations must be thread-safe (`Send + Sync`). Every operation is
/// atomic with respect to the others, and readers get clones, never
/// references into the store.
pub trait TransactionStore: Send + Sync {
    /// Insert or overwrite the record for `transaction_id`. Last write wins.
    fn add(&self, transaction_id: &str, record: TransactionRecord);

    /// Snapshot of the record for `transaction_id`, if any.
    fn get(&self, transaction_id: &str) -> Option<TransactionRecord>;

    /// Update only the fingerprint status of an existing record.
    ///
    /// Fails with [`ThreeDsError::NotFound`] when the id is unknown, leaving the
    /// store untouched. A record already in a terminal state keeps it.
    fn set_fingerprint_status(
        &self,
        transaction_id: &str,
        status: FingerprintStatus,
    ) -> Result<(), ThreeDsError>;

    /// Number of tracked transactions.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop records older than `max_age`. Returns number purged.
    fn purge_expired(&self, max_age: Duration) -> usize;
}

#[derive(Debug, Clone)]
struct StoredTransaction {
    record: TransactionRecord,
    created_at: Instant,
}

/// In-memory transaction store backed by DashMap. Lost on restart.
///
/// DashMap shards the map behind per-shard RW locks, so operations on
/// distinct keys rarely contend and never wait on a store-wide lock.
pub struct InMemoryTransactionStore {
    transactions: DashMap<String, StoredTransaction>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self {
            transactions: DashMap::new(),
        }
    }
}

impl Default for InMemoryTransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TransactionStore for InMemoryTransactionStore {
    fn add(&self, transaction_id: &str, record: TransactionRecord) {
        let previous = self.transactions.insert(
            transaction_id.to_string(),
            StoredTransaction {
                record,
                created_at: Instant::now(),
            },
        );
        if previous.is_some() {
            tracing::warn!(
                transaction_id = %transaction_id,
                "overwrote existing 3DS transaction record"
            );
        }
    }

    fn get(&self, transaction_id: &str) -> Option<TransactionRecord> {
        self.transactions
            .get(transaction_id)
            .map(|entry| entry.record.clone())
    }

    fn set_fingerprint_status(
        &self,
        transaction_id: &str,
        status: FingerprintStatus,
    ) -> Result<(), ThreeDsError> {
        let mut entry = self
            .transactions
            .get_mut(transaction_id)
            .ok_or_else(|| ThreeDsError::NotFound(transaction_id.to_string()))?;

        let current = entry.record.fingerprint_status;
        if current.is_terminal() {
            if current != status {
                tracing::warn!(
                    transaction_id = %transaction_id,
                    current = %current,
                    requested = %status,
                    "fingerprint status already final, ignoring update"
                );
            }
            return Ok(());
        }

        entry.record.fingerprint_status = status;
        Ok(())
    }

    fn len(&self) -> usize {
        self.transactions.len()
    }

    fn purge_expired(&self, max_age: Duration) -> usize {
        let before = self.transactions.len();
        self.transactions
            .retain(|_, stored| stored.created_at.elapsed() < max_age);
        before.saturating_sub(self.transactions.len())
    }
}

/// Start a background task that evicts records older than `ttl` every `every`.
///
/// Must be called from within a tokio runtime.
pub fn spawn_eviction(
    store: Arc<dyn TransactionStore>,
    ttl: Duration,
    every: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let purged = store.purge_expired(ttl);
            if purged > 0 {
                tracing::info!(purged, remaining = store.len(), "evicted expired 3DS transactions");
            }
        }
    })
}
