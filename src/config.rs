//! Run configuration, assembled once in `main` and passed to constructors.
//!
//! Environment reads happen here and nowhere else: `GITHUB_ACTIONS` selects
//! CI mode (headless browser flags, debug logging) and `GITHUB_RUN_ID` tags
//! history records. The private key is deliberately not part of this struct;
//! it goes straight from the environment into [`crate::Identity::derive`].

use crate::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Fixed settle delays used while driving the page. Client-rendered content
/// has no reliable ready signal, so these are heuristics, not guarantees.
#[derive(Debug, Clone)]
pub struct Delays {
    /// After each navigation, before inspecting the page.
    pub page_settle: Duration,
    /// After scrolling an element into view, before clicking it.
    pub scroll_settle: Duration,
    /// After clicking a connect control.
    pub post_click: Duration,
    /// After clicking a claim control, before checking for success.
    pub claim_settle: Duration,
    /// Bounded wait for the document body after navigation.
    pub body_timeout: Duration,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            page_settle: Duration::from_secs(5),
            scroll_settle: Duration::from_secs(2),
            post_click: Duration::from_secs(3),
            claim_settle: Duration::from_secs(5),
            body_timeout: Duration::from_secs(30),
        }
    }
}

impl Delays {
    /// All delays zeroed. Used by tests driving a scripted engine.
    pub fn none() -> Self {
        Self {
            page_settle: Duration::ZERO,
            scroll_settle: Duration::ZERO,
            post_click: Duration::ZERO,
            claim_settle: Duration::ZERO,
            body_timeout: Duration::ZERO,
        }
    }
}

/// Explicit configuration for one claim run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// True when running under GitHub Actions (`GITHUB_ACTIONS=true`).
    pub ci_mode: bool,
    /// Opaque run identifier stored in history records.
    pub run_id: String,
    /// Run the browser headless. Always true in CI mode.
    pub headless: bool,
    /// Blockscout instance base URL.
    pub base_url: String,
    /// WebDriver endpoint to connect to.
    pub webdriver_url: String,
    /// Path of the claim history file.
    pub history_path: PathBuf,
    /// Directory where debug screenshots are written.
    pub screenshot_dir: PathBuf,
    /// Settle delays.
    pub delays: Delays,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ci_mode: false,
            run_id: "local".into(),
            headless: false,
            base_url: "https://eth.blockscout.com".into(),
            webdriver_url: "http://localhost:9515".into(),
            history_path: PathBuf::from("claim_history.json"),
            screenshot_dir: PathBuf::from("."),
            delays: Delays::default(),
        }
    }
}

impl RunConfig {
    /// Build a config from the environment, defaults for everything else.
    pub fn from_env() -> Self {
        let ci_mode = std::env::var("GITHUB_ACTIONS")
            .map(|v| v == "true")
            .unwrap_or(false);
        let run_id = std::env::var("GITHUB_RUN_ID").unwrap_or_else(|_| "local".into());
        Self {
            ci_mode,
            run_id,
            headless: ci_mode,
            ..Self::default()
        }
    }
}

/// Read the required private key from the environment.
pub fn private_key_from_env() -> Result<String> {
    std::env::var("PRIVATE_KEY").map_err(|_| Error::Config("PRIVATE_KEY is required".into()))
}
