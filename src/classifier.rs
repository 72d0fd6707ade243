//! Boolean success classification from rendered page evidence.
//!
//! Two independent signals, either sufficient: a keyword anywhere in the
//! page content, or a visible success-styled element. Keyword matching has
//! no negation handling, so a page merely mentioning "merit" reads as
//! success; that looseness is deliberate and documented.

use crate::browser::BrowserEngine;
use crate::locator;
use tracing::{info, warn};

/// Case-insensitive substrings that count as evidence of a completed claim.
pub const SUCCESS_KEYWORDS: [&str; 8] = [
    "success",
    "claimed",
    "completed",
    "earned",
    "congratulations",
    "well done",
    "reward",
    "merit",
];

/// First success keyword present in the content, if any.
pub fn keyword_hit(content: &str) -> Option<&'static str> {
    let lower = content.to_lowercase();
    SUCCESS_KEYWORDS.iter().copied().find(|kw| lower.contains(kw))
}

/// Does the current page look like a completed claim?
///
/// Engine errors degrade to `false`; the classifier never fails a run.
pub async fn looks_successful(engine: &dyn BrowserEngine) -> bool {
    match engine.page_source().await {
        Ok(source) => {
            if let Some(keyword) = keyword_hit(&source) {
                info!("found success indicator: {keyword}");
                return true;
            }
        }
        Err(e) => warn!("could not read page content: {e}"),
    }

    for locator in locator::success_style_locators() {
        let elements = match engine.find_elements(&locator).await {
            Ok(elements) => elements,
            Err(_) => continue,
        };
        for element in &elements {
            if matches!(element.is_visible().await, Ok(true)) {
                info!("found success element: {locator}");
                return true;
            }
        }
    }

    false
}
