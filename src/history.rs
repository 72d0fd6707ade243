//! Per-day claim history, persisted as a single JSON object keyed by
//! `YYYY-MM-DD`. The whole file is rewritten on save; a missing or corrupt
//! file reads as an empty ledger so a bad disk never fails a run.

use crate::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// How a run's success came about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimType {
    /// A claim control was clicked after the simulated wallet connection.
    WalletConnected,
    /// Nothing claimable was found; still counts as a successful run.
    NoClaimableMerits,
    /// Anything else, including failed runs.
    Other,
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ClaimType::WalletConnected => "wallet_connected",
            ClaimType::NoClaimableMerits => "no_claimable_merits",
            ClaimType::Other => "other",
        };
        f.write_str(s)
    }
}

/// One recorded claim attempt. At most one per calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimRecord {
    pub timestamp: DateTime<Local>,
    pub success: bool,
    pub claim_type: ClaimType,
    /// Masked form only; the full address is never persisted.
    pub wallet_address: String,
    pub github_run_id: String,
    pub error: Option<String>,
}

/// The full per-day history, keyed by `YYYY-MM-DD`.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLedger {
    entries: BTreeMap<String, ClaimRecord>,
}

impl HistoryLedger {
    /// Insert or overwrite the entry for a day. A later run may overwrite
    /// an earlier one for the same day in either direction.
    pub fn record(&mut self, date: &str, record: ClaimRecord) {
        self.entries.insert(date.to_string(), record);
    }

    /// True iff an entry exists for the day and it was successful.
    pub fn already_succeeded(&self, date: &str) -> bool {
        self.entries.get(date).map(|r| r.success).unwrap_or(false)
    }

    pub fn get(&self, date: &str) -> Option<&ClaimRecord> {
        self.entries.get(date)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Today's ledger key in the local timezone.
pub fn today_key() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Loads and saves the ledger file.
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the ledger. Never fails: a missing file is an empty ledger, and
    /// a corrupt one is logged and treated the same way.
    pub fn load(&self) -> HistoryLedger {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no claim history at {}", self.path.display());
                return HistoryLedger::default();
            }
            Err(e) => {
                warn!("could not read claim history: {e}");
                return HistoryLedger::default();
            }
        };
        match serde_json::from_str::<HistoryLedger>(&content) {
            Ok(ledger) => {
                info!("loaded claim history: {} entries", ledger.len());
                ledger
            }
            Err(e) => {
                warn!("could not parse claim history: {e}");
                HistoryLedger::default()
            }
        }
    }

    /// Rewrite the whole ledger file.
    pub fn save(&self, ledger: &HistoryLedger) -> Result<()> {
        let json = serde_json::to_string_pretty(ledger)?;
        std::fs::write(&self.path, json)?;
        info!("saved claim history to {}", self.path.display());
        Ok(())
    }
}
