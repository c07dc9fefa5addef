use crate::domain::ItemRecord;
use crate::services::fetching::ItemFetcher;
use std::time::Duration;
use tracing::{info, warn};

pub struct BatchCollector {
    fetcher: ItemFetcher,
    one_task_timeout: Option<Duration>,
}

impl BatchCollector {
    pub fn new(fetcher: ItemFetcher, one_task_timeout: Option<Duration>) -> Self {
        Self {
            fetcher,
            one_task_timeout,
        }
    }

    /// Fetches every id in order, one at a time. Ids that fail are logged and left out.
    pub async fn collect(&self, ids: &[u64]) -> Vec<ItemRecord> {
        let mut records = Vec::with_capacity(ids.len());

        for &id in ids {
            let fetched = match self.one_task_timeout {
                Some(limit) => self.fetcher.fetch_with_timeout(id, limit).await,
                None => self.fetcher.fetch(id).await,
            };

            match fetched {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping app {}: {}", id, e),
            }
        }

        info!("Collected {} of {} apps", records.len(), ids.len());
        records
    }
}
