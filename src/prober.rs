//! Selector-ranked element probing.
//!
//! Each locator attempt produces a typed [`ProbeOutcome`] instead of a
//! swallowed exception, so the probing policy (first activation wins, skip
//! everything else) is plain control flow over data.

use crate::browser::BrowserEngine;
use crate::locator::Locator;
use std::time::Duration;
use tracing::{debug, info};

/// What probing one locator produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// No candidates matched (or the locator itself failed to resolve).
    NotFound,
    /// Candidates matched but none was visible, enabled, and clickable.
    NotActionable,
    /// A candidate was scrolled into view and clicked.
    Activated,
}

/// Probe a single locator: find candidates, pick the first one that is
/// visible and enabled, scroll it into view, pause, click.
///
/// Engine errors inside one locator never escalate; this is a best-effort
/// probe and a failed locator just reads as [`ProbeOutcome::NotFound`].
pub async fn attempt(
    engine: &dyn BrowserEngine,
    locator: &Locator,
    scroll_settle: Duration,
) -> ProbeOutcome {
    let candidates = match engine.find_elements(locator).await {
        Ok(candidates) => candidates,
        Err(e) => {
            debug!("locator {locator} failed to resolve: {e}");
            return ProbeOutcome::NotFound;
        }
    };
    if candidates.is_empty() {
        return ProbeOutcome::NotFound;
    }

    for candidate in &candidates {
        let usable = matches!(candidate.is_visible().await, Ok(true))
            && matches!(candidate.is_enabled().await, Ok(true));
        if !usable {
            continue;
        }
        if let Err(e) = candidate.scroll_into_view().await {
            debug!("could not scroll candidate for {locator}: {e}");
            continue;
        }
        tokio::time::sleep(scroll_settle).await;
        match candidate.click().await {
            Ok(()) => {
                let label = candidate.label().await.unwrap_or_default();
                info!("clicked {locator}: '{label}'");
                return ProbeOutcome::Activated;
            }
            Err(e) => {
                debug!("click failed for {locator}: {e}");
                continue;
            }
        }
    }

    ProbeOutcome::NotActionable
}

/// Probe locators in priority order and stop at the first activation.
/// An empty list returns false without touching the engine.
pub async fn find_and_activate(
    engine: &dyn BrowserEngine,
    locators: &[Locator],
    scroll_settle: Duration,
) -> bool {
    for locator in locators {
        if attempt(engine, locator, scroll_settle).await == ProbeOutcome::Activated {
            return true;
        }
    }
    false
}
