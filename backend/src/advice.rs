//! Calling contract for the external advice service. The remote side is an
//! opaque text-in/text-out capability; whatever it does (timeout, error,
//! garbage), the caller always gets a usable string back.

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use shared::{CategorySuggestion, Transaction};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;

const EMPTY_LEDGER_ADVICE: &str = "Add some transactions to get AI-powered financial insights.";
const ADVICE_FALLBACK: &str = "Advice unavailable. Please check your connection.";
const CATEGORY_FALLBACK: &str = "General";

#[derive(Serialize)]
struct PromptRequest<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct TextResponse {
    text: String,
}

#[derive(Clone)]
pub struct AdviceService {
    http: reqwest::Client,
    endpoint: Option<String>,
    // Monotonic ticket counter for category suggestions; only the holder
    // of the latest ticket gets a non-superseded response.
    suggestion_seq: Arc<AtomicU64>,
}

impl AdviceService {
    pub fn new(endpoint: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            endpoint,
            suggestion_seq: Arc::new(AtomicU64::new(0)),
        })
    }

    /// Free-text guidance over the full transaction list. Degrades to a
    /// fixed message when the list is empty or the remote call fails.
    pub async fn generate_advice(&self, records: &[Transaction]) -> String {
        if records.is_empty() {
            return EMPTY_LEDGER_ADVICE.to_string();
        }

        match self.request_text(&advice_prompt(records)).await {
            Ok(text) if !text.trim().is_empty() => text.trim().to_string(),
            Ok(_) => ADVICE_FALLBACK.to_string(),
            Err(e) => {
                warn!("Advice request failed: {:#}", e);
                ADVICE_FALLBACK.to_string()
            }
        }
    }

    /// One-word category for a description being typed. Each call takes a
    /// ticket; a response whose ticket is no longer the latest comes back
    /// marked superseded so callers apply only the newest result.
    pub async fn suggest_category(&self, description: &str) -> CategorySuggestion {
        let ticket = self.suggestion_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let prompt = format!(
            "Suggest a single, one-word category for this financial transaction \
             description: \"{}\". Output only the category name.",
            description
        );
        let category = match self.request_text(&prompt).await {
            Ok(text) => match text.split_whitespace().next() {
                Some(word) => word.to_string(),
                None => CATEGORY_FALLBACK.to_string(),
            },
            Err(e) => {
                warn!("Category suggestion failed: {:#}", e);
                CATEGORY_FALLBACK.to_string()
            }
        };

        let superseded = self.suggestion_seq.load(Ordering::SeqCst) != ticket;
        CategorySuggestion {
            category,
            superseded,
        }
    }

    async fn request_text(&self, prompt: &str) -> Result<String> {
        let endpoint = self
            .endpoint
            .as_deref()
            .ok_or_else(|| anyhow!("no advice endpoint configured"))?;

        let response = self
            .http
            .post(endpoint)
            .json(&PromptRequest { prompt })
            .send()
            .await?
            .error_for_status()?;
        let body: TextResponse = response.json().await?;
        Ok(body.text)
    }
}

/// Newline-joined `date: TYPE of amount for description` rendering, one
/// line per record, wrapped in the analysis instruction.
fn advice_prompt(records: &[Transaction]) -> String {
    let lines: Vec<String> = records
        .iter()
        .map(|t| {
            format!(
                "{}: {} of {} for {}",
                t.date, t.transaction_type, t.amount, t.description
            )
        })
        .collect();

    format!(
        "Analyze these financial transactions and provide 3 concise, actionable \
         pieces of advice to improve financial health. Keep it brief and \
         professional.\n\n{}",
        lines.join("\n")
    )
}
