//! The browser-engine collaborator interface.
//!
//! Everything the bot needs from a browser is behind these two traits, so
//! the probing and classification logic can run against a scripted engine
//! in tests and a real WebDriver session in production.

use crate::locator::Locator;
use crate::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;

/// Which client-side storage area to write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageArea {
    Local,
    Session,
}

/// A handle to one element on the current page.
#[async_trait]
pub trait PageElement: Send + Sync {
    async fn is_visible(&self) -> Result<bool>;
    async fn is_enabled(&self) -> Result<bool>;
    async fn scroll_into_view(&self) -> Result<()>;
    async fn click(&self) -> Result<()>;
    /// Visible text of the element, for logging.
    async fn label(&self) -> Result<String>;
}

/// One browser session, exclusively owned by a single run.
#[async_trait]
pub trait BrowserEngine: Send + Sync {
    async fn navigate(&self, url: &str) -> Result<()>;

    /// Bounded wait for the document body to exist.
    async fn wait_for_body(&self, timeout: Duration) -> Result<()>;

    /// All elements currently matching the locator, in document order.
    async fn find_elements(&self, locator: &Locator) -> Result<Vec<Box<dyn PageElement>>>;

    /// Full rendered page content.
    async fn page_source(&self) -> Result<String>;

    /// Write a key into client-side storage. This is the entirety of the
    /// "wallet connection": a fake, non-cryptographic placeholder.
    async fn set_client_storage(&self, area: StorageArea, key: &str, value: &str) -> Result<()>;

    async fn screenshot(&self, path: &Path) -> Result<()>;

    /// Tear the session down. Always called, whatever the run outcome.
    async fn quit(&self) -> Result<()>;
}
