//! WebDriver-backed implementation of the browser-engine interface.

use crate::browser::{BrowserEngine, PageElement, StorageArea};
use crate::config::RunConfig;
use crate::locator::Locator;
use crate::Result;
use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thirtyfour::prelude::*;
use tracing::{debug, info};

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Chrome flags for sandboxed CI runners, matching what GitHub-hosted
/// runners need to keep Chrome alive in a container.
const CI_FLAGS: &[&str] = &[
    "--no-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--disable-web-security",
    "--allow-running-insecure-content",
    "--disable-extensions",
    "--disable-plugins",
];

/// A live Chrome session behind a WebDriver endpoint.
pub struct WebDriverEngine {
    driver: WebDriver,
}

impl WebDriverEngine {
    /// Connect to the WebDriver endpoint and start a session configured
    /// for the run mode.
    pub async fn launch(config: &RunConfig) -> Result<Self> {
        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.add_arg("--headless=new")?;
        }
        if config.ci_mode {
            for flag in CI_FLAGS {
                caps.add_arg(flag)?;
            }
        }
        caps.add_arg("--window-size=1920,1080")?;
        caps.add_arg(&format!("--user-agent={USER_AGENT}"))?;

        debug!(
            "starting webdriver session at {} (headless: {})",
            config.webdriver_url, config.headless
        );
        let driver = WebDriver::new(&config.webdriver_url, caps).await?;
        info!("webdriver session started");
        Ok(Self { driver })
    }
}

fn to_by(locator: &Locator) -> By {
    match locator {
        Locator::XPath(expr) => By::XPath(expr.clone()),
        Locator::Css(expr) => By::Css(expr.clone()),
    }
}

struct WdElement {
    inner: WebElement,
}

#[async_trait]
impl PageElement for WdElement {
    async fn is_visible(&self) -> Result<bool> {
        Ok(self.inner.is_displayed().await?)
    }

    async fn is_enabled(&self) -> Result<bool> {
        Ok(self.inner.is_enabled().await?)
    }

    async fn scroll_into_view(&self) -> Result<()> {
        self.inner.scroll_into_view().await?;
        Ok(())
    }

    async fn click(&self) -> Result<()> {
        self.inner.click().await?;
        Ok(())
    }

    async fn label(&self) -> Result<String> {
        Ok(self.inner.text().await?)
    }
}

#[async_trait]
impl BrowserEngine for WebDriverEngine {
    async fn navigate(&self, url: &str) -> Result<()> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn wait_for_body(&self, timeout: Duration) -> Result<()> {
        self.driver
            .query(By::Tag("body".to_string()))
            .wait(timeout, Duration::from_millis(250))
            .first()
            .await?;
        Ok(())
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<Box<dyn PageElement>>> {
        let elements = self.driver.find_all(to_by(locator)).await?;
        Ok(elements
            .into_iter()
            .map(|inner| Box::new(WdElement { inner }) as Box<dyn PageElement>)
            .collect())
    }

    async fn page_source(&self) -> Result<String> {
        Ok(self.driver.source().await?)
    }

    async fn set_client_storage(&self, area: StorageArea, key: &str, value: &str) -> Result<()> {
        let store = match area {
            StorageArea::Local => "localStorage",
            StorageArea::Session => "sessionStorage",
        };
        let script = format!("{store}.setItem(arguments[0], arguments[1]);");
        self.driver
            .execute(
                &script,
                vec![serde_json::json!(key), serde_json::json!(value)],
            )
            .await?;
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        let png = self.driver.screenshot_as_png().await?;
        std::fs::write(path, png)?;
        Ok(())
    }

    async fn quit(&self) -> Result<()> {
        self.driver.clone().quit().await?;
        Ok(())
    }
}
