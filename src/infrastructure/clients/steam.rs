use crate::domain::ports::CatalogLookup;
use crate::domain::{CatalogEntry, PlatformFlags, ReviewSummary};
use crate::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::info;

#[derive(Debug, Deserialize)]
pub struct SteamStoreData {
    pub success: bool,
    pub data: Option<SteamStoreDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SteamStoreDetails {
    pub steam_appid: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub about_the_game: String,
    #[serde(default)]
    pub short_description: String,
    pub release_date: Option<ReleaseDate>,
    #[serde(default)]
    pub developers: Vec<String>,
    #[serde(default)]
    pub publishers: Vec<String>,
    #[serde(default)]
    pub platforms: Platforms,
    #[serde(default)]
    pub supported_languages: String,
    #[serde(default)]
    pub categories: Vec<Described>,
    #[serde(default)]
    pub genres: Vec<Described>,
    pub controller_support: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReleaseDate {
    #[serde(default)]
    pub date: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Platforms {
    #[serde(default)]
    pub windows: bool,
    #[serde(default)]
    pub mac: bool,
    #[serde(default)]
    pub linux: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Described {
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct SteamReviewsResponse {
    pub query_summary: ReviewsSummary,
}

#[derive(Debug, Deserialize)]
pub struct ReviewsSummary {
    #[serde(default)]
    pub review_score_desc: String,
    #[serde(default)]
    pub total_positive: u64,
    #[serde(default)]
    pub total_negative: u64,
    #[serde(default)]
    pub total_reviews: u64,
}

impl From<SteamStoreDetails> for CatalogEntry {
    fn from(details: SteamStoreDetails) -> Self {
        Self {
            app_id: details.steam_appid,
            name: details.name,
            about_the_game: details.about_the_game,
            short_description: details.short_description,
            release_date: details.release_date.map(|r| r.date).unwrap_or_default(),
            developers: details.developers,
            publishers: details.publishers,
            platforms: PlatformFlags {
                windows: details.platforms.windows,
                mac: details.platforms.mac,
                linux: details.platforms.linux,
            },
            supported_languages: details.supported_languages,
            categories: details.categories.into_iter().map(|c| c.description).collect(),
            genres: details.genres.into_iter().map(|g| g.description).collect(),
            controller_support: details.controller_support,
        }
    }
}

impl From<ReviewsSummary> for ReviewSummary {
    fn from(summary: ReviewsSummary) -> Self {
        Self {
            description: summary.review_score_desc,
            positive: summary.total_positive,
            negative: summary.total_negative,
            total: summary.total_reviews,
        }
    }
}

pub struct SteamClient {
    client: Client,
    store_url: String,
}

impl SteamClient {
    pub fn new(client: Client, store_url: impl Into<String>) -> Self {
        let store_url = store_url.into().trim_end_matches('/').to_string();
        info!("Created new Steam client for {}", store_url);
        Self { client, store_url }
    }

    async fn fetch_store_data(&self, app_id: u64) -> Result<SteamStoreDetails> {
        let url = format!(
            "{}/api/appdetails?appids={}&cc=eu&l=english",
            self.store_url, app_id
        );

        let response = self.client.get(&url).send().await?.error_for_status()?;
        let mut data: HashMap<String, SteamStoreData> = response.json().await?;

        data.remove(&app_id.to_string())
            .filter(|d| d.success)
            .and_then(|d| d.data)
            .ok_or_else(|| BotError::LookupFailed {
                id: app_id,
                reason: "store returned no data".to_string(),
            })
    }

    async fn fetch_reviews(&self, app_id: u64) -> Result<SteamReviewsResponse> {
        let url = format!(
            "{}/appreviews/{}?json=1&language=english&purchase_type=all&num_per_page=0",
            self.store_url, app_id
        );

        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl CatalogLookup for SteamClient {
    async fn app_details(&self, app_id: u64) -> Result<CatalogEntry> {
        self.fetch_store_data(app_id)
            .await
            .map(CatalogEntry::from)
            .map_err(|e| match e {
                BotError::LookupFailed { .. } => e,
                other => BotError::LookupFailed {
                    id: app_id,
                    reason: other.to_string(),
                },
            })
    }

    async fn review_summary(&self, app_id: u64) -> Result<ReviewSummary> {
        let reviews = self.fetch_reviews(app_id).await?;
        Ok(reviews.query_summary.into())
    }
}
