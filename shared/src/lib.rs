use serde::{Deserialize, Serialize};
use std::fmt;

/// Payment methods offered by the entry form. Suggestions only; the
/// `payment_method` field accepts any free-text label.
pub const SUGGESTED_PAYMENT_METHODS: [&str; 4] = ["Cash", "Bank Transfer", "Credit Card", "UPI"];

/// Kind of ledger event. Closed set; no other value is valid on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Incoming funds (income)
    Receipt,
    /// Outgoing funds (expense)
    Payment,
    /// Simplified adjustment to the projected bank figure
    BankEntry,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Receipt => "RECEIPT",
            TransactionType::Payment => "PAYMENT",
            TransactionType::BankEntry => "BANK_ENTRY",
        };
        write!(f, "{}", label)
    }
}

/// A single recorded entry. Immutable once created; there is no update or
/// delete operation anywhere in the system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Opaque unique id, generated at creation time and never reused
    pub id: String,
    /// Calendar date in ISO 8601 format (YYYY-MM-DD)
    pub date: String,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// Free-text label, user-entered or AI-suggested
    pub category: String,
    pub description: String,
    /// Positive decimal currency value
    pub amount: f64,
    /// Free-text method label, usually one of SUGGESTED_PAYMENT_METHODS
    pub payment_method: String,
    /// Optional free-text reference; absent means "no reference"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// Aggregate totals over the full transaction list. Derived on demand,
/// never persisted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialSummary {
    pub total_receipts: f64,
    pub total_payments: f64,
    /// Simplified running sum of bank entries, not a true ledger balance
    pub bank_balance: f64,
    /// total_receipts - total_payments
    pub net_cash_flow: f64,
}

/// Aggregate for all transactions sharing one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    /// Canonical YYYY-MM-DD grouping key
    pub date: String,
    pub receipts: f64,
    pub payments: f64,
    /// receipts - payments for this day
    pub net: f64,
    /// That day's transactions in their original relative order
    pub transactions: Vec<Transaction>,
}

/// Entry-form payload for recording a new transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransactionRequest {
    /// Optional date override (YYYY-MM-DD) - uses today if not provided
    #[serde(default)]
    pub date: Option<String>,
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    pub category: String,
    pub description: String,
    /// Must be a finite number greater than zero
    pub amount: f64,
    pub payment_method: String,
    #[serde(default)]
    pub reference: Option<String>,
}

/// Outcome of the best-effort mirror push for one transaction. A transient
/// status signal; the local write has already succeeded in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// No sheet endpoint configured, nothing was attempted
    NotConfigured,
    /// The endpoint acknowledged the push
    Synced,
    /// The push failed; the record is kept locally and not retried
    Failed,
}

/// Response to a successful transaction creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionCreated {
    pub transaction: Transaction,
    pub sync: SyncStatus,
}

/// The configured sheet mirror endpoint. An empty URL means "not
/// configured" and disables mirroring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetEndpoint {
    pub url: String,
}

/// Free-text guidance from the advice service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceResponse {
    pub advice: String,
}

/// Request for a category suggestion for a description being typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySuggestionRequest {
    pub description: String,
}

/// A suggested category label. `superseded` is true when a newer
/// suggestion was requested while this one was in flight; callers should
/// apply only the latest response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySuggestion {
    pub category: String,
    pub superseded: bool,
}

/// Rendered CSV export of the full transaction list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportData {
    pub csv_content: String,
    pub filename: String,
    pub transaction_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_uses_original_wire_field_names() {
        let transaction = Transaction {
            id: "t1".to_string(),
            date: "2024-01-01".to_string(),
            transaction_type: TransactionType::BankEntry,
            category: "Salary".to_string(),
            description: "January".to_string(),
            amount: 100.0,
            payment_method: "Bank Transfer".to_string(),
            reference: None,
        };

        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&transaction).unwrap()).unwrap();
        assert_eq!(json["type"], "BANK_ENTRY");
        assert_eq!(json["paymentMethod"], "Bank Transfer");
        // Absent reference is omitted, not serialized as null
        assert!(json.get("reference").is_none());
    }

    #[test]
    fn transaction_type_rejects_unknown_values() {
        let result: Result<TransactionType, _> = serde_json::from_str("\"TRANSFER\"");
        assert!(result.is_err());
    }

    #[test]
    fn reference_defaults_to_none_when_missing() {
        let json = r#"{
            "id": "t2",
            "date": "2024-02-03",
            "type": "RECEIPT",
            "category": "Sales",
            "description": "Invoice 42",
            "amount": 12.5,
            "paymentMethod": "UPI"
        }"#;
        let transaction: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(transaction.reference, None);
        assert_eq!(transaction.transaction_type, TransactionType::Receipt);
    }
}
