//! One claim run, start to teardown.

use crate::browser::{BrowserEngine, StorageArea};
use crate::config::RunConfig;
use crate::history::{self, ClaimRecord, ClaimType, HistoryStore};
use crate::identity::Identity;
use crate::prober::ProbeOutcome;
use crate::{classifier, locator, navigator, prober, Error, Result};
use chrono::Local;
use std::time::Instant;
use tracing::{error, info, warn};

/// What a run ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Today's entry was already successful; nothing was touched.
    AlreadyClaimed,
    /// A record was written for today.
    Recorded {
        success: bool,
        claim_type: ClaimType,
        error: Option<String>,
    },
}

/// Result of the claim probing loop.
enum ClaimProbe {
    /// A claim was clicked and the page looked successful afterwards.
    Confirmed,
    /// Something was clicked but no success evidence appeared.
    ClickedUnconfirmed,
    /// No claim control anywhere.
    Nothing,
}

/// Drives one browser session through the daily claim flow.
pub struct MeritBot {
    config: RunConfig,
    identity: Identity,
    store: HistoryStore,
    engine: Box<dyn BrowserEngine>,
}

impl MeritBot {
    pub fn new(config: RunConfig, identity: Identity, engine: Box<dyn BrowserEngine>) -> Self {
        let store = HistoryStore::new(config.history_path.clone());
        Self {
            config,
            identity,
            store,
            engine,
        }
    }

    /// Run the full flow: skip if today already succeeded, otherwise
    /// navigate, probe, classify, always tear the session down, and record
    /// the outcome. Returns `Err` only for setup-level problems; attempt
    /// failures are caught here and recorded.
    pub async fn run(&self) -> Result<RunOutcome> {
        let start = Instant::now();
        info!("starting merit claim run for {}", self.identity.masked());

        let mut ledger = self.store.load();
        let today = history::today_key();
        if ledger.already_succeeded(&today) {
            info!("already claimed merits today, skipping");
            // The session already exists by the time we get here; close it
            // even though nothing was navigated.
            if let Err(e) = self.engine.quit().await {
                warn!("failed to close browser session: {e}");
            }
            return Ok(RunOutcome::AlreadyClaimed);
        }

        let attempt = self.attempt().await;

        // Teardown runs whatever the attempt did.
        self.save_screenshot("final_screenshot.png").await;
        if let Err(e) = self.engine.quit().await {
            warn!("failed to close browser session: {e}");
        }

        let (success, claim_type, error) = match attempt {
            Ok(claim_type) => (true, claim_type, None),
            Err(e) => {
                error!("claim run failed: {e}");
                (false, ClaimType::Other, Some(e.to_string()))
            }
        };

        ledger.record(
            &today,
            ClaimRecord {
                timestamp: Local::now(),
                success,
                claim_type,
                wallet_address: self.identity.masked(),
                github_run_id: self.config.run_id.clone(),
                error: error.clone(),
            },
        );
        if let Err(e) = self.store.save(&ledger) {
            error!("failed to save claim history: {e}");
        }

        info!(
            "claim run finished in {:.2}s",
            start.elapsed().as_secs_f64()
        );
        Ok(RunOutcome::Recorded {
            success,
            claim_type,
            error,
        })
    }

    /// The navigation-to-claim flow. Any error here fails the whole
    /// attempt and is recorded by `run`.
    async fn attempt(&self) -> Result<ClaimType> {
        let address = self.identity.address();
        let primary = navigator::merits_url(&self.config.base_url, address);
        let fallbacks = navigator::fallback_urls(&self.config.base_url, address);
        let delays = &self.config.delays;

        if !navigator::open(self.engine.as_ref(), &primary, &fallbacks, delays).await {
            return Err(Error::Navigation("all merits page urls exhausted".into()));
        }
        self.save_screenshot("initial_page.png").await;

        let connected = prober::find_and_activate(
            self.engine.as_ref(),
            &locator::connect_locators(),
            delays.scroll_settle,
        )
        .await;
        if connected {
            tokio::time::sleep(delays.post_click).await;
            if let Err(e) = self.simulate_wallet_connection().await {
                warn!("failed to simulate wallet connection: {e}");
            }
        } else {
            info!("no connect wallet button found");
        }

        tokio::time::sleep(delays.page_settle).await;
        self.save_screenshot("after_connection.png").await;

        match self.probe_claims().await {
            ClaimProbe::Confirmed => {
                info!("merit claim confirmed");
                Ok(ClaimType::WalletConnected)
            }
            ClaimProbe::ClickedUnconfirmed => {
                info!("clicked a claim control, no confirmation seen");
                Ok(ClaimType::WalletConnected)
            }
            ClaimProbe::Nothing => {
                info!("no claimable merits found, treating as a successful run");
                Ok(ClaimType::NoClaimableMerits)
            }
        }
    }

    /// Walk the claim locators. Each activation is followed by a success
    /// check; confirmation stops probing, otherwise the click is kept as a
    /// weaker positive signal and probing continues.
    async fn probe_claims(&self) -> ClaimProbe {
        let delays = &self.config.delays;
        let mut clicked = false;
        for locator in locator::claim_locators() {
            match prober::attempt(self.engine.as_ref(), &locator, delays.scroll_settle).await {
                ProbeOutcome::Activated => {
                    clicked = true;
                    tokio::time::sleep(delays.claim_settle).await;
                    if classifier::looks_successful(self.engine.as_ref()).await {
                        return ClaimProbe::Confirmed;
                    }
                }
                ProbeOutcome::NotFound | ProbeOutcome::NotActionable => {}
            }
        }
        if clicked {
            ClaimProbe::ClickedUnconfirmed
        } else {
            ClaimProbe::Nothing
        }
    }

    /// Write the connected-wallet markers into client-side storage. A fake
    /// placeholder, not a real wallet session.
    async fn simulate_wallet_connection(&self) -> Result<()> {
        let address = self.identity.address();
        let wallet_data = serde_json::json!({
            "address": address,
            "connected": true,
            "provider": "injected",
        })
        .to_string();

        let engine = self.engine.as_ref();
        engine
            .set_client_storage(StorageArea::Local, "wallet_address", address)
            .await?;
        engine
            .set_client_storage(StorageArea::Local, "wallet_connected", "true")
            .await?;
        engine
            .set_client_storage(StorageArea::Local, "wallet_data", &wallet_data)
            .await?;
        engine
            .set_client_storage(StorageArea::Session, "wallet_address", address)
            .await?;
        engine
            .set_client_storage(StorageArea::Session, "wallet_connected", "true")
            .await?;
        info!("simulated wallet connection in browser storage");
        Ok(())
    }

    async fn save_screenshot(&self, name: &str) {
        let path = self.config.screenshot_dir.join(name);
        if let Err(e) = self.engine.screenshot(&path).await {
            warn!("failed to save screenshot {}: {e}", path.display());
        }
    }
}
