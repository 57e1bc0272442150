//! Runtime configuration, read once from the environment at startup.

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 5;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Directory holding the persisted blobs (created on startup)
    pub data_dir: PathBuf,
    /// Address the HTTP server binds to
    pub bind_addr: SocketAddr,
    /// Advice service URL; None leaves the advice endpoints on fallbacks
    pub advice_url: Option<String>,
    /// Upper bound on any outbound HTTP call (mirror push, advice)
    pub http_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let data_dir = std::env::var("FINDASH_DATA_DIR")
            .unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string())
            .into();

        let bind_addr = std::env::var("FINDASH_ADDR")
            .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
            .parse()
            .context("invalid FINDASH_ADDR")?;

        let advice_url = std::env::var("FINDASH_ADVICE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        let timeout_secs = match std::env::var("FINDASH_HTTP_TIMEOUT_SECS") {
            Ok(value) => value.parse().context("invalid FINDASH_HTTP_TIMEOUT_SECS")?,
            Err(_) => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            data_dir,
            bind_addr,
            advice_url,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
