use crate::domain::ports::{CatalogLookup, ChatTransport, PageElement, PageLoader, PageSession};
use crate::domain::reference::extract_id;
use crate::domain::{CatalogEntry, InboundMessage, PlatformFlags, ReviewSummary};
use crate::error::{BotError, Result};
use crate::services::fetching::{DECK_LEVEL_SELECTOR, DECK_RESULTS_SELECTOR, TAG_SELECTOR};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::sleep;

pub fn entry(app_id: u64, name: &str) -> CatalogEntry {
    CatalogEntry {
        app_id,
        name: name.to_string(),
        about_the_game: "<p>About</p><p>the game</p>".to_string(),
        short_description: "Short &amp; sweet".to_string(),
        release_date: "1 Jan, 2020".to_string(),
        developers: vec!["Dev One".to_string(), "Dev Two".to_string()],
        publishers: vec!["Pub".to_string()],
        platforms: PlatformFlags {
            windows: true,
            mac: false,
            linux: true,
        },
        supported_languages: "English".to_string(),
        categories: vec!["Single-player".to_string(), "Steam Achievements".to_string()],
        genres: vec!["Action".to_string()],
        controller_support: Some("full".to_string()),
    }
}

#[derive(Default)]
pub struct FakeCatalog {
    entries: HashMap<u64, CatalogEntry>,
    reviews: HashMap<u64, ReviewSummary>,
    delays: HashMap<u64, Duration>,
}

impl FakeCatalog {
    pub fn with_app(mut self, app_id: u64, name: &str) -> Self {
        self.entries.insert(app_id, entry(app_id, name));
        self
    }

    pub fn with_reviews(mut self, app_id: u64, review: ReviewSummary) -> Self {
        self.reviews.insert(app_id, review);
        self
    }

    pub fn with_delay(mut self, app_id: u64, delay: Duration) -> Self {
        self.delays.insert(app_id, delay);
        self
    }
}

#[async_trait]
impl CatalogLookup for FakeCatalog {
    async fn app_details(&self, app_id: u64) -> Result<CatalogEntry> {
        if let Some(delay) = self.delays.get(&app_id) {
            sleep(*delay).await;
        }

        self.entries
            .get(&app_id)
            .cloned()
            .ok_or_else(|| BotError::LookupFailed {
                id: app_id,
                reason: "unknown app".to_string(),
            })
    }

    async fn review_summary(&self, app_id: u64) -> Result<ReviewSummary> {
        self.reviews
            .get(&app_id)
            .cloned()
            .ok_or_else(|| BotError::Other("reviews unavailable".to_string()))
    }
}

#[derive(Clone, Default)]
struct FakePage {
    tags: Option<Vec<String>>,
    deck_level: Option<String>,
}

/// Serves canned store pages keyed by app id and counts session open/close.
#[derive(Default)]
pub struct FakePages {
    pages: HashMap<u64, FakePage>,
    pub opened: Arc<AtomicUsize>,
    pub closed: Arc<AtomicUsize>,
}

impl FakePages {
    pub fn with_page(mut self, app_id: u64, tags: &[&str], deck_level: Option<&str>) -> Self {
        let tags = (!tags.is_empty()).then(|| tags.iter().map(|t| t.to_string()).collect());
        self.pages.insert(
            app_id,
            FakePage {
                tags,
                deck_level: deck_level.map(str::to_string),
            },
        );
        self
    }
}

#[async_trait]
impl PageLoader for FakePages {
    async fn load_page(&self, url: &str) -> Result<Box<dyn PageSession>> {
        let app_id = extract_id(url)?;
        let page = self
            .pages
            .get(&app_id)
            .cloned()
            .ok_or_else(|| BotError::Scrape(format!("no page for {}", url)))?;

        self.opened.fetch_add(1, Ordering::SeqCst);

        let mut elements = HashMap::new();
        if let Some(tags) = page.tags {
            elements.insert(TAG_SELECTOR, tags);
        }
        if let Some(level) = page.deck_level {
            elements.insert(DECK_RESULTS_SELECTOR, vec![level.clone()]);
            elements.insert(DECK_LEVEL_SELECTOR, vec![level]);
        }

        Ok(Box::new(FakeSession {
            elements,
            closed: Arc::clone(&self.closed),
        }))
    }
}

struct FakeSession {
    elements: HashMap<&'static str, Vec<String>>,
    closed: Arc<AtomicUsize>,
}

#[async_trait]
impl PageSession for FakeSession {
    async fn wait_for_elements(
        &mut self,
        selector: &str,
        min_count: usize,
        timeout: Duration,
    ) -> Result<()> {
        let found = self.elements.get(selector).map_or(0, Vec::len);
        if found >= min_count {
            Ok(())
        } else {
            sleep(timeout).await;
            Err(BotError::Scrape(format!("timed out waiting for {}", selector)))
        }
    }

    fn find_elements(&self, selector: &str) -> Result<Vec<PageElement>> {
        Ok(self
            .elements
            .get(selector)
            .map(|texts| texts.iter().map(PageElement::new).collect())
            .unwrap_or_default())
    }

    fn close(&mut self) {
        self.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text(i64, String),
    Document {
        chat_id: i64,
        text: String,
        filename: String,
        data: Vec<u8>,
    },
}

/// Records every outgoing message; inbound messages come from a test-owned channel.
#[derive(Default)]
pub struct FakeTransport {
    pub sent: Mutex<Vec<Sent>>,
    pub fail_text: bool,
    inbound: Mutex<Option<mpsc::Receiver<InboundMessage>>>,
}

impl FakeTransport {
    pub fn failing_text() -> Self {
        Self {
            fail_text: true,
            ..Default::default()
        }
    }

    pub fn with_inbound(inbound: mpsc::Receiver<InboundMessage>) -> Self {
        Self {
            inbound: Mutex::new(Some(inbound)),
            ..Default::default()
        }
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Text(_, text) => Some(text),
                Sent::Document { .. } => None,
            })
            .collect()
    }

    pub fn documents(&self) -> Vec<Vec<u8>> {
        self.sent()
            .into_iter()
            .filter_map(|sent| match sent {
                Sent::Document { data, .. } => Some(data),
                Sent::Text(..) => None,
            })
            .collect()
    }
}

#[async_trait]
impl ChatTransport for FakeTransport {
    async fn receive_messages(&self) -> Result<mpsc::Receiver<InboundMessage>> {
        self.inbound
            .lock()
            .unwrap()
            .take()
            .ok_or_else(|| BotError::Telegram("already receiving".to_string()))
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        if self.fail_text {
            return Err(BotError::Telegram("send failed".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push(Sent::Text(chat_id, text.to_string()));
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: i64,
        text: &str,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<()> {
        self.sent.lock().unwrap().push(Sent::Document {
            chat_id,
            text: text.to_string(),
            filename: filename.to_string(),
            data,
        });
        Ok(())
    }

    fn stop(&self) {}
}
