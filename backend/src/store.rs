//! Local record store: the durable transaction list plus the configured
//! sheet endpoint, kept as two independently named blobs under the data
//! directory. Local persistence is the only durability contract in the
//! system; mirroring happens after a local write and can never undo it.

use anyhow::{anyhow, Context, Result};
use shared::Transaction;
use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Blob holding the full transaction list as JSON, newest first.
const TRANSACTIONS_FILE: &str = "findash_transactions.json";
/// Blob holding the sheet endpoint URL as plain text.
const SHEET_URL_FILE: &str = "findash_sheet_url";

pub struct RecordStore {
    data_dir: PathBuf,
    // Serializes read-modify-write cycles within this process. Across
    // processes the policy stays last-writer-wins.
    write_lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("creating data directory {}", data_dir.display()))?;
        Ok(Self {
            data_dir,
            write_lock: Mutex::new(()),
        })
    }

    fn transactions_path(&self) -> PathBuf {
        self.data_dir.join(TRANSACTIONS_FILE)
    }

    fn sheet_url_path(&self) -> PathBuf {
        self.data_dir.join(SHEET_URL_FILE)
    }

    /// Full persisted list, newest first. A missing blob reads as an empty
    /// list, never as an error.
    pub fn list(&self) -> Result<Vec<Transaction>> {
        let path = self.transactions_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let file =
            File::open(&path).with_context(|| format!("opening {}", path.display()))?;
        let transactions = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(transactions)
    }

    /// Insert a transaction at the head of the list and rewrite the blob.
    /// Ids are unique for the lifetime of the store; a duplicate is refused.
    pub fn append(&self, transaction: Transaction) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let mut transactions = self.list()?;
        if transactions.iter().any(|t| t.id == transaction.id) {
            return Err(anyhow!("transaction id {} already exists", transaction.id));
        }
        let id = transaction.id.clone();
        transactions.insert(0, transaction);
        self.write_transactions(&transactions)?;

        info!("Stored transaction {} ({} total)", id, transactions.len());
        Ok(())
    }

    fn write_transactions(&self, transactions: &[Transaction]) -> Result<()> {
        let path = self.transactions_path();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)
            .with_context(|| format!("opening {} for writing", path.display()))?;

        let mut writer = BufWriter::new(file);
        serde_json::to_writer(&mut writer, transactions)
            .with_context(|| format!("writing {}", path.display()))?;
        writer.flush()?;
        Ok(())
    }

    /// The configured sheet endpoint; empty string means "not configured".
    pub fn endpoint(&self) -> Result<String> {
        let path = self.sheet_url_path();
        if !path.exists() {
            return Ok(String::new());
        }
        let url =
            fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
        Ok(url.trim().to_string())
    }

    /// Replace the configured endpoint. Setting an empty URL disables
    /// mirroring (the "disconnect" action).
    pub fn set_endpoint(&self, url: &str) -> Result<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let path = self.sheet_url_path();
        fs::write(&path, url.trim())
            .with_context(|| format!("writing {}", path.display()))?;
        if url.trim().is_empty() {
            info!("Sheet endpoint cleared, mirroring disabled");
        } else {
            info!("Sheet endpoint configured");
        }
        Ok(())
    }
}
