//! Page navigation with ordered fallback URLs.

use crate::browser::BrowserEngine;
use crate::config::Delays;
use crate::Result;
use tracing::{info, warn};

/// Content markers that mean the URL resolved to a missing page.
const NOT_FOUND_MARKERS: [&str; 2] = ["404", "Not Found"];

/// The merits page for an address.
pub fn merits_url(base_url: &str, address: &str) -> String {
    format!("{base_url}/address/{address}/merits")
}

/// Alternative URLs tried in order when the primary is unreachable or
/// resolves to a not-found page.
pub fn fallback_urls(base_url: &str, address: &str) -> Vec<String> {
    vec![
        format!("{base_url}/address/{address}"),
        format!("{base_url}/account/merits"),
        format!("{base_url}/merits"),
        format!("{base_url}/rewards"),
    ]
}

/// Open the primary URL, falling through the fallback list in order. Returns
/// false only when every URL is exhausted.
pub async fn open(
    engine: &dyn BrowserEngine,
    primary: &str,
    fallbacks: &[String],
    delays: &Delays,
) -> bool {
    match load(engine, primary, delays).await {
        Ok(true) => {
            info!("loaded merits page: {primary}");
            return true;
        }
        Ok(false) => warn!("merits page not found, trying alternative urls"),
        Err(e) => warn!("failed to load {primary}: {e}"),
    }

    for url in fallbacks {
        info!("trying alternative url: {url}");
        match load(engine, url, delays).await {
            Ok(true) => {
                info!("loaded alternative url: {url}");
                return true;
            }
            Ok(false) => continue,
            Err(e) => {
                warn!("failed to load {url}: {e}");
                continue;
            }
        }
    }

    false
}

/// Navigate to one URL and decide whether it resolved to a real page.
/// `Ok(false)` means the page loaded but carries a not-found marker.
async fn load(engine: &dyn BrowserEngine, url: &str, delays: &Delays) -> Result<bool> {
    engine.navigate(url).await?;
    // Client-rendered content: give the page a moment before inspecting it.
    tokio::time::sleep(delays.page_settle).await;
    engine.wait_for_body(delays.body_timeout).await?;
    let source = engine.page_source().await?;
    Ok(!NOT_FOUND_MARKERS.iter().any(|m| source.contains(m)))
}
