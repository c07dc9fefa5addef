use crate::domain::ports::{PageElement, PageLoader, PageSession};
use crate::domain::reference::extract_id;
use crate::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

// Lets age-gated store pages render their full content.
const AGE_GATE_COOKIES: &str =
    "birthtime=0; lastagecheckage=1-January-1970; wants_mature_content=1; mature_content=1";

const DECK_RESULTS: &str = r#"div[data-featuretarget="deck-verified-results"]"#;

#[derive(Debug, Deserialize)]
struct DeckReport {
    success: u64,
    results: Option<DeckResults>,
}

#[derive(Debug, Deserialize)]
struct DeckResults {
    resolved_category: u64,
}

fn deck_level(category: u64) -> Option<&'static str> {
    match category {
        1 => Some("Unsupported"),
        2 => Some("Playable"),
        3 => Some("Verified"),
        _ => None,
    }
}

/// Reads the compatibility level out of a store compatibility report.
fn deck_level_from_report(body: &str) -> Result<Option<&'static str>> {
    let report: DeckReport = serde_json::from_str(body)?;
    if report.success != 1 {
        return Ok(None);
    }

    Ok(report
        .results
        .and_then(|results| deck_level(results.resolved_category)))
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| BotError::Selector(e.to_string()))
}

fn count_in(body: &str, selector: &str) -> Result<usize> {
    let selector = parse_selector(selector)?;
    Ok(Html::parse_document(body).select(&selector).count())
}

/// Process-wide page handle. Every page load goes through it until it is closed.
///
/// Pages are fetched as plain documents. The compatibility block the store renders
/// with scripts is filled in from the store's compatibility report instead.
pub struct HttpBrowser {
    client: Client,
    closed: AtomicBool,
    open_pages: Arc<AtomicUsize>,
}

impl HttpBrowser {
    pub fn new(client: Client) -> Self {
        info!("Created new page browser");
        Self {
            client,
            closed: AtomicBool::new(false),
            open_pages: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            info!(
                "Closed page browser with {} pages still open",
                self.open_pages.load(Ordering::SeqCst)
            );
        }
    }

    async fn deck_markup(&self, url: &str) -> Result<Option<String>> {
        let app_id = extract_id(url)?;
        let origin = url.split("/app/").next().unwrap_or(url);
        let report_url = format!(
            "{}/saleaction/ajaxgetdeckappcompatibilityreport?nAppID={}",
            origin, app_id
        );

        let body = fetch_body(&self.client, &report_url).await?;
        Ok(deck_level_from_report(&body)?.map(|level| {
            format!(
                r#"<div data-featuretarget="deck-verified-results"><span>{}</span></div>"#,
                level
            )
        }))
    }
}

#[async_trait]
impl PageLoader for HttpBrowser {
    async fn load_page(&self, url: &str) -> Result<Box<dyn PageSession>> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(BotError::Scrape("browser is closed".to_string()));
        }

        let mut body = fetch_body(&self.client, url).await?;
        if count_in(&body, DECK_RESULTS)? == 0 {
            match self.deck_markup(url).await {
                Ok(Some(markup)) => body.push_str(&markup),
                Ok(None) => debug!("No compatibility level for {}", url),
                Err(e) => debug!("Compatibility report unavailable for {}: {}", url, e),
            }
        }

        self.open_pages.fetch_add(1, Ordering::SeqCst);
        debug!("Opened page {}", url);

        Ok(Box::new(HttpPage {
            url: url.to_string(),
            body,
            open_pages: Some(Arc::clone(&self.open_pages)),
        }))
    }
}

async fn fetch_body(client: &Client, url: &str) -> Result<String> {
    let response = client
        .get(url)
        .header(COOKIE, AGE_GATE_COOKIES)
        .send()
        .await?
        .error_for_status()?;

    Ok(response.text().await?)
}

pub struct HttpPage {
    url: String,
    body: String,
    open_pages: Option<Arc<AtomicUsize>>,
}

#[async_trait]
impl PageSession for HttpPage {
    // A fetched document does not change, so it is checked once.
    async fn wait_for_elements(
        &mut self,
        selector: &str,
        min_count: usize,
        _timeout: Duration,
    ) -> Result<()> {
        let found = count_in(&self.body, selector)?;
        if found >= min_count {
            return Ok(());
        }

        Err(BotError::Scrape(format!(
            "found {} of {} `{}` on {}",
            found, min_count, selector, self.url
        )))
    }

    fn find_elements(&self, selector: &str) -> Result<Vec<PageElement>> {
        let selector = parse_selector(selector)?;
        let document = Html::parse_document(&self.body);

        Ok(document
            .select(&selector)
            .map(|el| PageElement::new(el.text().collect::<String>()))
            .collect())
    }

    fn close(&mut self) {
        if let Some(open_pages) = self.open_pages.take() {
            open_pages.fetch_sub(1, Ordering::SeqCst);
            self.body.clear();
            debug!("Closed page {}", self.url);
        }
    }
}
