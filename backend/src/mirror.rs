//! Best-effort mirror of newly recorded transactions to the configured
//! sheet endpoint. One POST per record, at most once: no retry, no queue,
//! no idempotency key. A failed push is reported as a transient status and
//! never touches the local store.

use anyhow::Result;
use shared::{SyncStatus, Transaction};
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Clone)]
pub struct MirrorClient {
    http: reqwest::Client,
}

impl MirrorClient {
    /// The timeout bounds every push; local persistence is never delayed
    /// beyond it.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// Push one transaction to the endpoint. An empty endpoint means
    /// mirroring is not configured, which is a no-op rather than an error.
    pub async fn push(&self, transaction: &Transaction, endpoint: &str) -> SyncStatus {
        if endpoint.is_empty() {
            debug!(
                "No sheet endpoint configured, transaction {} kept local only",
                transaction.id
            );
            return SyncStatus::NotConfigured;
        }

        match self.http.post(endpoint).json(transaction).send().await {
            Ok(response) if response.status().is_success() => {
                info!("Mirrored transaction {} to sheet endpoint", transaction.id);
                SyncStatus::Synced
            }
            Ok(response) => {
                warn!(
                    "Sheet endpoint returned {} for transaction {}",
                    response.status(),
                    transaction.id
                );
                SyncStatus::Failed
            }
            Err(e) => {
                warn!("Failed to mirror transaction {}: {}", transaction.id, e);
                SyncStatus::Failed
            }
        }
    }
}
