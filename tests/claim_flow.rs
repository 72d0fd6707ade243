//! Scenario tests driving the probing, classification, navigation, and full
//! bot flow against a scripted in-memory browser engine.

use async_trait::async_trait;
use merit_claimer::{
    attempt, fallback_urls, find_and_activate, looks_successful, merits_url, today_key,
    BrowserEngine,
    ClaimRecord, ClaimType, Delays, Error, HistoryLedger, HistoryStore, Identity, Locator,
    MeritBot, PageElement, ProbeOutcome, RunConfig, RunOutcome, StorageArea,
};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

const KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
const ADDRESS: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

/// Everything the mock engine was asked to do, in order.
#[derive(Default)]
struct EngineLog {
    visited: Vec<String>,
    finds: Vec<String>,
    clicked: Vec<String>,
    storage: Vec<(StorageArea, String, String)>,
    screenshots: Vec<PathBuf>,
    quit: bool,
}

#[derive(Clone)]
struct ElementSpec {
    label: String,
    visible: bool,
    enabled: bool,
}

impl ElementSpec {
    fn button(label: &str) -> Self {
        Self {
            label: label.into(),
            visible: true,
            enabled: true,
        }
    }

    fn hidden(label: &str) -> Self {
        Self {
            visible: false,
            ..Self::button(label)
        }
    }

    fn disabled(label: &str) -> Self {
        Self {
            enabled: false,
            ..Self::button(label)
        }
    }
}

/// One scripted page: its source and the elements each locator expression
/// resolves to.
#[derive(Clone)]
struct PageSpec {
    source: String,
    elements: HashMap<String, Vec<ElementSpec>>,
}

impl PageSpec {
    fn new(source: &str) -> Self {
        Self {
            source: source.into(),
            elements: HashMap::new(),
        }
    }

    fn with_elements(mut self, expr: &str, elements: Vec<ElementSpec>) -> Self {
        self.elements.insert(expr.into(), elements);
        self
    }
}

struct MockEngine {
    pages: HashMap<String, PageSpec>,
    default_page: PageSpec,
    unreachable: Vec<String>,
    current: Mutex<Option<String>>,
    events: Arc<Mutex<EngineLog>>,
}

impl MockEngine {
    fn new() -> Self {
        Self {
            pages: HashMap::new(),
            default_page: PageSpec::new("<html><body>blank page</body></html>"),
            unreachable: Vec::new(),
            current: Mutex::new(None),
            events: Arc::new(Mutex::new(EngineLog::default())),
        }
    }

    fn page(mut self, url: &str, page: PageSpec) -> Self {
        self.pages.insert(url.into(), page);
        self
    }

    /// The page served for any URL without an explicit entry.
    fn with_default_page(mut self, page: PageSpec) -> Self {
        self.default_page = page;
        self
    }

    fn unreachable(mut self, url: &str) -> Self {
        self.unreachable.push(url.into());
        self
    }

    fn events(&self) -> Arc<Mutex<EngineLog>> {
        self.events.clone()
    }

    fn current_page(&self) -> PageSpec {
        let current = self.current.lock().unwrap();
        current
            .as_ref()
            .and_then(|url| self.pages.get(url))
            .unwrap_or(&self.default_page)
            .clone()
    }
}

struct MockElement {
    spec: ElementSpec,
    events: Arc<Mutex<EngineLog>>,
}

#[async_trait]
impl PageElement for MockElement {
    async fn is_visible(&self) -> merit_claimer::Result<bool> {
        Ok(self.spec.visible)
    }

    async fn is_enabled(&self) -> merit_claimer::Result<bool> {
        Ok(self.spec.enabled)
    }

    async fn scroll_into_view(&self) -> merit_claimer::Result<()> {
        Ok(())
    }

    async fn click(&self) -> merit_claimer::Result<()> {
        self.events.lock().unwrap().clicked.push(self.spec.label.clone());
        Ok(())
    }

    async fn label(&self) -> merit_claimer::Result<String> {
        Ok(self.spec.label.clone())
    }
}

#[async_trait]
impl BrowserEngine for MockEngine {
    async fn navigate(&self, url: &str) -> merit_claimer::Result<()> {
        self.events.lock().unwrap().visited.push(url.to_string());
        if self.unreachable.iter().any(|u| u == url) {
            return Err(Error::Engine(format!("cannot reach {url}")));
        }
        *self.current.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn wait_for_body(&self, _timeout: Duration) -> merit_claimer::Result<()> {
        Ok(())
    }

    async fn find_elements(
        &self,
        locator: &Locator,
    ) -> merit_claimer::Result<Vec<Box<dyn PageElement>>> {
        self.events
            .lock()
            .unwrap()
            .finds
            .push(locator.expression().to_string());
        let page = self.current_page();
        Ok(page
            .elements
            .get(locator.expression())
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(|spec| {
                Box::new(MockElement {
                    spec,
                    events: self.events.clone(),
                }) as Box<dyn PageElement>
            })
            .collect())
    }

    async fn page_source(&self) -> merit_claimer::Result<String> {
        Ok(self.current_page().source)
    }

    async fn set_client_storage(
        &self,
        area: StorageArea,
        key: &str,
        value: &str,
    ) -> merit_claimer::Result<()> {
        self.events
            .lock()
            .unwrap()
            .storage
            .push((area, key.to_string(), value.to_string()));
        Ok(())
    }

    async fn screenshot(&self, path: &Path) -> merit_claimer::Result<()> {
        self.events.lock().unwrap().screenshots.push(path.to_path_buf());
        Ok(())
    }

    async fn quit(&self) -> merit_claimer::Result<()> {
        self.events.lock().unwrap().quit = true;
        Ok(())
    }
}

fn test_config(dir: &Path) -> RunConfig {
    RunConfig {
        history_path: dir.join("claim_history.json"),
        screenshot_dir: dir.to_path_buf(),
        delays: Delays::none(),
        ..RunConfig::default()
    }
}

fn bot_with(engine: MockEngine, dir: &Path) -> (MeritBot, Arc<Mutex<EngineLog>>) {
    let events = engine.events();
    let identity = Identity::derive(KEY).unwrap();
    let bot = MeritBot::new(test_config(dir), identity, Box::new(engine));
    (bot, events)
}

// --- prober ---

#[tokio::test]
async fn empty_locator_list_is_a_noop() {
    let engine = MockEngine::new();
    let events = engine.events();

    assert!(!find_and_activate(&engine, &[], Duration::ZERO).await);

    let log = events.lock().unwrap();
    assert!(log.finds.is_empty());
    assert!(log.clicked.is_empty());
}

#[tokio::test]
async fn first_actionable_locator_wins() {
    let engine = MockEngine::new().with_default_page(
        PageSpec::new("<body></body>")
            .with_elements(".b", vec![ElementSpec::hidden("B")])
            .with_elements(".c", vec![ElementSpec::button("Go")]),
    );
    let events = engine.events();
    let specs = vec![Locator::css(".a"), Locator::css(".b"), Locator::css(".c")];

    assert!(find_and_activate(&engine, &specs, Duration::ZERO).await);

    // Only the third locator's candidate is ever touched.
    let log = events.lock().unwrap();
    assert_eq!(log.clicked, vec!["Go"]);
    assert_eq!(log.finds, vec![".a", ".b", ".c"]);
}

#[tokio::test]
async fn attempt_reports_typed_outcomes() {
    let engine = MockEngine::new().with_default_page(
        PageSpec::new("<body></body>")
            .with_elements(".hidden", vec![ElementSpec::hidden("H")])
            .with_elements(".off", vec![ElementSpec::disabled("D")])
            .with_elements(".ok", vec![ElementSpec::button("OK")]),
    );

    let missing = Locator::css(".missing");
    let hidden = Locator::css(".hidden");
    let off = Locator::css(".off");
    let ok = Locator::css(".ok");

    assert_eq!(
        attempt(&engine, &missing, Duration::ZERO).await,
        ProbeOutcome::NotFound
    );
    assert_eq!(
        attempt(&engine, &hidden, Duration::ZERO).await,
        ProbeOutcome::NotActionable
    );
    assert_eq!(
        attempt(&engine, &off, Duration::ZERO).await,
        ProbeOutcome::NotActionable
    );
    assert_eq!(
        attempt(&engine, &ok, Duration::ZERO).await,
        ProbeOutcome::Activated
    );
}

// --- classifier ---

#[tokio::test]
async fn keyword_alone_is_sufficient() {
    let engine = MockEngine::new()
        .with_default_page(PageSpec::new("<body><h1>Congratulations!</h1></body>"));
    assert!(looks_successful(&engine).await);
}

#[tokio::test]
async fn visible_success_element_alone_is_sufficient() {
    let engine = MockEngine::new().with_default_page(
        PageSpec::new("<body>nothing of note</body>")
            .with_elements(".success", vec![ElementSpec::button("done banner")]),
    );
    assert!(looks_successful(&engine).await);
}

#[tokio::test]
async fn hidden_success_element_does_not_count() {
    let engine = MockEngine::new().with_default_page(
        PageSpec::new("<body>nothing of note</body>")
            .with_elements(".success", vec![ElementSpec::hidden("done banner")]),
    );
    assert!(!looks_successful(&engine).await);
}

// --- navigator ---

#[tokio::test]
async fn fallbacks_are_tried_in_declared_order() {
    let base = "https://x.test";
    let primary = merits_url(base, "A");
    let fallbacks = fallback_urls(base, "A");

    let engine = MockEngine::new()
        .page(&primary, PageSpec::new("<body>404 Not Found</body>"))
        .page(&fallbacks[0], PageSpec::new("<body>Not Found</body>"))
        .unreachable(&fallbacks[1]);
    let events = engine.events();

    assert!(merit_claimer::open(&engine, &primary, &fallbacks, &Delays::none()).await);

    let log = events.lock().unwrap();
    assert_eq!(
        log.visited,
        vec![
            primary.clone(),
            fallbacks[0].clone(),
            fallbacks[1].clone(),
            fallbacks[2].clone(),
        ]
    );
}

#[tokio::test]
async fn exhausting_every_url_returns_false() {
    let engine = MockEngine::new().with_default_page(PageSpec::new("<body>404</body>"));
    let primary = merits_url("https://x.test", "A");
    let fallbacks = fallback_urls("https://x.test", "A");

    assert!(!merit_claimer::open(&engine, &primary, &fallbacks, &Delays::none()).await);
}

// --- full runs ---

#[tokio::test]
async fn run_without_claimables_records_success() {
    let dir = tempfile::tempdir().unwrap();
    let (bot, events) = bot_with(MockEngine::new(), dir.path());

    let outcome = bot.run().await.unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Recorded {
            success: true,
            claim_type: ClaimType::NoClaimableMerits,
            error: None,
        }
    );

    let ledger = HistoryStore::new(dir.path().join("claim_history.json")).load();
    let entry = ledger.get(&today_key()).unwrap();
    assert!(entry.success);
    assert_eq!(entry.claim_type, ClaimType::NoClaimableMerits);
    assert_eq!(entry.wallet_address, "0xf39F...2266");
    assert_eq!(entry.github_run_id, "local");

    let log = events.lock().unwrap();
    assert!(log.quit);
    let names: Vec<_> = log
        .screenshots
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec![
            "initial_page.png",
            "after_connection.png",
            "final_screenshot.png"
        ]
    );
}

#[tokio::test]
async fn confirmed_claim_connects_clicks_and_injects_storage() {
    let dir = tempfile::tempdir().unwrap();
    let page = PageSpec::new("<body>Congratulations, merits for you</body>")
        .with_elements(
            "//button[contains(text(), 'Connect')]",
            vec![ElementSpec::button("Connect")],
        )
        .with_elements(
            "//button[contains(text(), 'Claim')]",
            vec![ElementSpec::button("Claim")],
        );
    let (bot, events) = bot_with(MockEngine::new().with_default_page(page), dir.path());

    let outcome = bot.run().await.unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Recorded {
            success: true,
            claim_type: ClaimType::WalletConnected,
            error: None,
        }
    );

    let log = events.lock().unwrap();
    assert_eq!(log.clicked, vec!["Connect", "Claim"]);
    assert!(log.quit);

    // Wallet simulation wrote both storage areas, full address included.
    assert_eq!(log.storage.len(), 5);
    assert!(log
        .storage
        .contains(&(StorageArea::Local, "wallet_address".into(), ADDRESS.into())));
    assert!(log
        .storage
        .contains(&(StorageArea::Local, "wallet_connected".into(), "true".into())));
    assert!(log
        .storage
        .contains(&(StorageArea::Session, "wallet_connected".into(), "true".into())));
}

#[tokio::test]
async fn unconfirmed_click_still_counts_as_claimed() {
    let dir = tempfile::tempdir().unwrap();
    // No success keywords, no success-styled elements after the click.
    let page = PageSpec::new("<body>nothing to report</body>").with_elements(
        ".claim-button",
        vec![ElementSpec::button("Collect points")],
    );
    let (bot, events) = bot_with(MockEngine::new().with_default_page(page), dir.path());

    let outcome = bot.run().await.unwrap();
    assert_eq!(
        outcome,
        RunOutcome::Recorded {
            success: true,
            claim_type: ClaimType::WalletConnected,
            error: None,
        }
    );
    assert_eq!(events.lock().unwrap().clicked, vec!["Collect points"]);
}

#[tokio::test]
async fn navigation_exhaustion_records_failure_and_still_quits() {
    let dir = tempfile::tempdir().unwrap();
    let engine = MockEngine::new().with_default_page(PageSpec::new("<body>404</body>"));
    let (bot, events) = bot_with(engine, dir.path());

    let outcome = bot.run().await.unwrap();
    match outcome {
        RunOutcome::Recorded {
            success: false,
            claim_type: ClaimType::Other,
            error: Some(error),
        } => assert!(error.contains("exhausted")),
        other => panic!("unexpected outcome: {other:?}"),
    }

    let ledger = HistoryStore::new(dir.path().join("claim_history.json")).load();
    let entry = ledger.get(&today_key()).unwrap();
    assert!(!entry.success);
    assert!(entry.error.is_some());

    let log = events.lock().unwrap();
    assert!(log.quit);
    // The attempt never got past navigation, so only the final screenshot.
    assert_eq!(log.screenshots.len(), 1);
}

#[tokio::test]
async fn same_day_rerun_after_success_is_skipped_entirely() {
    let dir = tempfile::tempdir().unwrap();
    let history_path = dir.path().join("claim_history.json");

    let store = HistoryStore::new(&history_path);
    let mut ledger = HistoryLedger::default();
    ledger.record(
        &today_key(),
        ClaimRecord {
            timestamp: chrono::Local::now(),
            success: true,
            claim_type: ClaimType::WalletConnected,
            wallet_address: "0xf39F...2266".into(),
            github_run_id: "12345".into(),
            error: None,
        },
    );
    store.save(&ledger).unwrap();
    let before = std::fs::read(&history_path).unwrap();

    let (bot, events) = bot_with(MockEngine::new(), dir.path());
    let outcome = bot.run().await.unwrap();
    assert_eq!(outcome, RunOutcome::AlreadyClaimed);

    // No navigation, no probing, ledger file untouched — but the session
    // is still closed.
    let log = events.lock().unwrap();
    assert!(log.visited.is_empty());
    assert!(log.finds.is_empty());
    assert!(log.quit);
    let after = std::fs::read(&history_path).unwrap();
    assert_eq!(before, after);
}
