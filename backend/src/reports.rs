//! Aggregation over a snapshot of the transaction list: overall totals and
//! the per-day breakdown. Pure functions with no hidden state; the same
//! input always produces the same output.

use chrono::{DateTime, NaiveDate};
use shared::{DailySummary, FinancialSummary, Transaction, TransactionType};
use std::collections::HashMap;

/// Single-pass totals over the whole list. Empty input yields all zeros.
pub fn compute_summary(records: &[Transaction]) -> FinancialSummary {
    let mut summary = FinancialSummary::default();
    for record in records {
        match record.transaction_type {
            TransactionType::Receipt => summary.total_receipts += record.amount,
            TransactionType::Payment => summary.total_payments += record.amount,
            TransactionType::BankEntry => summary.bank_balance += record.amount,
        }
    }
    summary.net_cash_flow = summary.total_receipts - summary.total_payments;
    summary
}

/// Group records by calendar date, most recent day first. Within a group
/// the transactions keep their encounter order from the input, so the
/// groups together are an exact partition of it.
pub fn compute_daily_reports(records: &[Transaction]) -> Vec<DailySummary> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<(Option<NaiveDate>, DailySummary)> = Vec::new();

    for record in records {
        let (day, key) = date_key(&record.date);
        let position = *index.entry(key.clone()).or_insert_with(|| {
            groups.push((
                day,
                DailySummary {
                    date: key,
                    receipts: 0.0,
                    payments: 0.0,
                    net: 0.0,
                    transactions: Vec::new(),
                },
            ));
            groups.len() - 1
        });

        let (_, summary) = &mut groups[position];
        match record.transaction_type {
            TransactionType::Receipt => summary.receipts += record.amount,
            TransactionType::Payment => summary.payments += record.amount,
            // Bank entries appear in the day's list but not in its flows
            TransactionType::BankEntry => {}
        }
        summary.transactions.push(record.clone());
    }

    for (_, summary) in &mut groups {
        summary.net = summary.receipts - summary.payments;
    }

    // Dated groups first, newest day at the top; groups with unparseable
    // dates sort after them by raw key so nothing is dropped.
    groups.sort_by(|(day_a, group_a), (day_b, group_b)| match (day_a, day_b) {
        (Some(a), Some(b)) => b.cmp(a),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => group_b.date.cmp(&group_a.date),
    });

    groups.into_iter().map(|(_, summary)| summary).collect()
}

/// Canonical grouping key for a raw date string. Plain `YYYY-MM-DD` dates
/// and RFC 3339 timestamps of the same calendar day collapse to one key;
/// anything unparseable keeps its raw text as its own group.
fn date_key(raw: &str) -> (Option<NaiveDate>, String) {
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return (Some(day), day.format("%Y-%m-%d").to_string());
    }
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        let day = timestamp.date_naive();
        return (Some(day), day.format("%Y-%m-%d").to_string());
    }
    (None, raw.to_string())
}
