//! Delimited export of the full transaction list. Fields are quoted per
//! RFC 4180, so free-text columns may contain the delimiter or quotes and
//! still re-parse to the same values.

use anyhow::{Context, Result};
use chrono::Local;
use csv::Writer;
use shared::{ExportData, Transaction};
use tracing::info;

/// Fixed column order of the export artifact.
pub const EXPORT_HEADER: [&str; 7] = [
    "Date",
    "Type",
    "Category",
    "Description",
    "Amount",
    "Method",
    "Reference",
];

#[derive(Clone, Default)]
pub struct ExportService;

impl ExportService {
    pub fn new() -> Self {
        Self
    }

    /// Render the list in store order (newest first), one row per
    /// transaction. The filename embeds the current calendar date.
    pub fn export(&self, transactions: &[Transaction]) -> Result<ExportData> {
        self.export_for_date(transactions, &Local::now().format("%Y-%m-%d").to_string())
    }

    fn export_for_date(&self, transactions: &[Transaction], date: &str) -> Result<ExportData> {
        let mut writer = Writer::from_writer(Vec::new());
        writer.write_record(EXPORT_HEADER)?;

        for transaction in transactions {
            let transaction_type = transaction.transaction_type.to_string();
            let amount = transaction.amount.to_string();
            writer.write_record([
                transaction.date.as_str(),
                transaction_type.as_str(),
                transaction.category.as_str(),
                transaction.description.as_str(),
                amount.as_str(),
                transaction.payment_method.as_str(),
                transaction.reference.as_deref().unwrap_or(""),
            ])?;
        }

        writer.flush()?;
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("flushing CSV writer: {}", e))?;
        let csv_content = String::from_utf8(bytes).context("CSV output was not UTF-8")?;
        let filename = format!("findash_sheet_sync_{}.csv", date);

        info!(
            "Exported {} transactions as {}",
            transactions.len(),
            filename
        );

        Ok(ExportData {
            csv_content,
            filename,
            transaction_count: transactions.len(),
        })
    }
}
