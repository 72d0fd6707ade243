//! # merit-claimer
//!
//! Daily Blockscout merit claiming bot. Derives a wallet address from a
//! private key, drives a WebDriver session to the merits page, simulates a
//! wallet connection, clicks any available claim control, and records the
//! outcome to a local history file (one entry per calendar day).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use merit_claimer::{Identity, MeritBot, RunConfig, WebDriverEngine};
//!
//! # #[tokio::main]
//! # async fn main() -> merit_claimer::Result<()> {
//! let config = RunConfig::from_env();
//! let identity = Identity::derive(&std::env::var("PRIVATE_KEY").unwrap())?;
//! let engine = WebDriverEngine::launch(&config).await?;
//! let bot = MeritBot::new(config, identity, Box::new(engine));
//! let outcome = bot.run().await?;
//! println!("{:?}", outcome);
//! # Ok(())
//! # }
//! ```
//!
//! The "wallet connection" is a client-side storage write only. No signing
//! or on-chain interaction happens anywhere in this crate.

mod bot;
mod browser;
mod classifier;
mod config;
mod history;
mod identity;
mod locator;
mod navigator;
mod prober;
mod webdriver;

pub use bot::{MeritBot, RunOutcome};
pub use browser::{BrowserEngine, PageElement, StorageArea};
pub use classifier::looks_successful;
pub use config::{private_key_from_env, Delays, RunConfig};
pub use history::{today_key, ClaimRecord, ClaimType, HistoryLedger, HistoryStore};
pub use identity::Identity;
pub use locator::{claim_locators, connect_locators, success_style_locators, Locator};
pub use navigator::{fallback_urls, merits_url, open};
pub use prober::{attempt, find_and_activate, ProbeOutcome};
pub use webdriver::WebDriverEngine;

/// Result type for merit-claimer operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during setup or a claim run.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid private key: {0}")]
    InvalidKeyFormat(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("browser error: {0}")]
    Browser(#[from] thirtyfour::error::WebDriverError),

    #[error("engine error: {0}")]
    Engine(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
