use crate::domain::ports::{CatalogLookup, OpenPage, PageLoader};
use crate::domain::{ItemRecord, PageExtras, ReviewSummary};
use crate::error::{BotError, Result};
use crate::services::text_utils::clean_description;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const TAG_SELECTOR: &str = ".app_tag";
pub const DECK_RESULTS_SELECTOR: &str = r#"div[data-featuretarget="deck-verified-results"]"#;
pub const DECK_LEVEL_SELECTOR: &str = r#"div[data-featuretarget="deck-verified-results"] span"#;
pub const SCRAPE_TIMEOUT: Duration = Duration::from_secs(5);

// Rendered by the store as a tag-list button, not a tag.
const ADD_TAG_BUTTON: &str = "+";

/// Builds one `ItemRecord` from the catalog plus the public store page.
#[derive(Clone)]
pub struct ItemFetcher {
    catalog: Arc<dyn CatalogLookup>,
    pages: Arc<dyn PageLoader>,
    store_url: String,
    scrape_timeout: Duration,
}

impl ItemFetcher {
    pub fn new(
        catalog: Arc<dyn CatalogLookup>,
        pages: Arc<dyn PageLoader>,
        store_url: impl Into<String>,
    ) -> Self {
        Self {
            catalog,
            pages,
            store_url: store_url.into().trim_end_matches('/').to_string(),
            scrape_timeout: SCRAPE_TIMEOUT,
        }
    }

    pub fn with_scrape_timeout(mut self, scrape_timeout: Duration) -> Self {
        self.scrape_timeout = scrape_timeout;
        self
    }

    fn page_url(&self, id: u64) -> String {
        format!("{}/app/{}/", self.store_url, id)
    }

    pub async fn fetch(&self, id: u64) -> Result<ItemRecord> {
        let entry = self
            .catalog
            .app_details(id)
            .await
            .map_err(|e| match e {
                BotError::LookupFailed { .. } => e,
                other => BotError::LookupFailed {
                    id,
                    reason: other.to_string(),
                },
            })?;

        // A failed review lookup is indistinguishable from an app without reviews here.
        let review = self.catalog.review_summary(id).await.unwrap_or_else(|e| {
            warn!("No review summary for app {}: {}", id, e);
            ReviewSummary::default()
        });

        let mut extras = PageExtras::default();

        match self.scrape_tags(id).await {
            Ok(tags) => extras.tags = tags,
            Err(e) => warn!("No tags for app {}: {}", id, e),
        }

        match self.scrape_deck_level(id).await {
            Ok(level) => extras.deck_compatibility = level,
            Err(e) => warn!("No Steam Deck level for app {}: {}", id, e),
        }

        let record = ItemRecord::from_catalog(entry, review, extras, clean_description);
        info!("Fetched app {} ({})", record.id, record.name);
        debug!("\n{}", record);

        Ok(record)
    }

    /// Runs `fetch` as its own task and stops waiting for it after `limit`.
    /// A timed-out task is left to finish in the background.
    pub async fn fetch_with_timeout(&self, id: u64, limit: Duration) -> Result<ItemRecord> {
        let fetcher = self.clone();
        let task = tokio::spawn(async move { fetcher.fetch(id).await });

        match tokio::time::timeout(limit, task).await {
            Ok(Ok(result)) => result,
            Ok(Err(e)) => Err(BotError::Other(format!("fetch task for app {} failed: {}", id, e))),
            Err(_) => Err(BotError::Timeout(id)),
        }
    }

    async fn scrape_tags(&self, id: u64) -> Result<Vec<String>> {
        let mut page = OpenPage::new(self.pages.load_page(&self.page_url(id)).await?);
        let session = page.session();

        session
            .wait_for_elements(TAG_SELECTOR, 1, self.scrape_timeout)
            .await?;

        Ok(session
            .find_elements(TAG_SELECTOR)?
            .iter()
            .map(|tag| tag.text().trim())
            .filter(|tag| *tag != ADD_TAG_BUTTON)
            .map(str::to_string)
            .collect())
    }

    async fn scrape_deck_level(&self, id: u64) -> Result<String> {
        let mut page = OpenPage::new(self.pages.load_page(&self.page_url(id)).await?);
        let session = page.session();

        session
            .wait_for_elements(DECK_RESULTS_SELECTOR, 1, self.scrape_timeout)
            .await?;

        session
            .find_elements(DECK_LEVEL_SELECTOR)?
            .first()
            .map(|level| level.text().trim().to_string())
            .filter(|level| !level.is_empty())
            .ok_or_else(|| BotError::Scrape("empty compatibility result".to_string()))
    }
}
