use super::{CatalogEntry, InboundMessage, ReviewSummary};
use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;

#[async_trait]
pub trait CatalogLookup: Send + Sync {
    async fn app_details(&self, app_id: u64) -> Result<CatalogEntry>;
    async fn review_summary(&self, app_id: u64) -> Result<ReviewSummary>;
}

#[async_trait]
pub trait PageLoader: Send + Sync {
    async fn load_page(&self, url: &str) -> Result<Box<dyn PageSession>>;
}

/// One loaded page. Sessions must be closed once the caller is done with them.
#[async_trait]
pub trait PageSession: Send {
    /// Waits until `selector` matches at least `min_count` elements.
    async fn wait_for_elements(
        &mut self,
        selector: &str,
        min_count: usize,
        timeout: Duration,
    ) -> Result<()>;
    fn find_elements(&self, selector: &str) -> Result<Vec<PageElement>>;
    fn close(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageElement {
    text: String,
}

impl PageElement {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Closes the wrapped session on every exit path.
pub struct OpenPage(Box<dyn PageSession>);

impl OpenPage {
    pub fn new(session: Box<dyn PageSession>) -> Self {
        Self(session)
    }

    pub fn session(&mut self) -> &mut dyn PageSession {
        self.0.as_mut()
    }
}

impl Drop for OpenPage {
    fn drop(&mut self) {
        self.0.close();
    }
}

#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn receive_messages(&self) -> Result<mpsc::Receiver<InboundMessage>>;
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;
    /// Sends `text` followed by `data` attached as `filename`.
    async fn send_document(
        &self,
        chat_id: i64,
        text: &str,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<()>;
    fn stop(&self);
}
