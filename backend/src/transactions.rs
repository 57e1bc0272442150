//! Transaction entry: validation, id and date assignment, local-first
//! persistence, then the best-effort mirror push.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use shared::{CreateTransactionRequest, Transaction, TransactionCreated};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::mirror::MirrorClient;
use crate::store::RecordStore;

/// Rejections at the entry boundary. Invalid input never reaches the store.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount must be a number")]
    NonFiniteAmount,
    #[error("amount must be greater than zero")]
    NonPositiveAmount,
    #[error("category must not be empty")]
    EmptyCategory,
    #[error("description must not be empty")]
    EmptyDescription,
    #[error("date must be a calendar date in YYYY-MM-DD format")]
    InvalidDate,
}

#[derive(Debug, Error)]
pub enum CreateError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("failed to persist transaction")]
    Storage(#[source] anyhow::Error),
}

#[derive(Clone)]
pub struct TransactionService {
    store: Arc<RecordStore>,
    mirror: MirrorClient,
}

impl TransactionService {
    pub fn new(store: Arc<RecordStore>, mirror: MirrorClient) -> Self {
        Self { store, mirror }
    }

    pub fn list(&self) -> Result<Vec<Transaction>> {
        self.store.list()
    }

    /// Record a new transaction. The local write always comes first; the
    /// mirror outcome only affects the transient `sync` signal in the
    /// response, never the stored record.
    pub async fn create(
        &self,
        request: CreateTransactionRequest,
    ) -> Result<TransactionCreated, CreateError> {
        let transaction = build_transaction(request)?;
        info!(
            "Recording transaction {} ({} {} on {})",
            transaction.id, transaction.transaction_type, transaction.amount, transaction.date
        );

        self.store
            .append(transaction.clone())
            .map_err(CreateError::Storage)?;

        let endpoint = self.store.endpoint().unwrap_or_else(|e| {
            // Unreadable endpoint config degrades to "not configured"
            error!("Failed to read sheet endpoint: {:#}", e);
            String::new()
        });
        let sync = self.mirror.push(&transaction, &endpoint).await;

        Ok(TransactionCreated { transaction, sync })
    }
}

fn build_transaction(request: CreateTransactionRequest) -> Result<Transaction, ValidationError> {
    if !request.amount.is_finite() {
        return Err(ValidationError::NonFiniteAmount);
    }
    if request.amount <= 0.0 {
        return Err(ValidationError::NonPositiveAmount);
    }

    let category = request.category.trim();
    if category.is_empty() {
        return Err(ValidationError::EmptyCategory);
    }
    let description = request.description.trim();
    if description.is_empty() {
        return Err(ValidationError::EmptyDescription);
    }

    let date = match request.date.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| ValidationError::InvalidDate)?
            .format("%Y-%m-%d")
            .to_string(),
        _ => Local::now().format("%Y-%m-%d").to_string(),
    };

    Ok(Transaction {
        id: Uuid::new_v4().to_string(),
        date,
        transaction_type: request.transaction_type,
        category: category.to_string(),
        description: description.to_string(),
        amount: request.amount,
        payment_method: request.payment_method.trim().to_string(),
        reference: request
            .reference
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty()),
    })
}
