use std::fmt;

pub const UNKNOWN: &str = "Unknown";
pub const NO_REVIEW_DATA: &str = "No data";

/// Structured details for one app as returned by the catalog lookup.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogEntry {
    pub app_id: u64,
    pub name: String,
    pub about_the_game: String,
    pub short_description: String,
    pub release_date: String,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
    pub platforms: PlatformFlags,
    pub supported_languages: String,
    pub categories: Vec<String>,
    pub genres: Vec<String>,
    pub controller_support: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformFlags {
    pub windows: bool,
    pub mac: bool,
    pub linux: bool,
}

impl PlatformFlags {
    /// Platform names in a fixed Linux, Windows, MacOS order.
    pub fn names(&self) -> Vec<String> {
        [
            (self.linux, "Linux"),
            (self.windows, "Windows"),
            (self.mac, "MacOS"),
        ]
        .into_iter()
        .filter(|(supported, _)| *supported)
        .map(|(_, name)| name.to_string())
        .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub description: String,
    pub positive: u64,
    pub negative: u64,
    pub total: u64,
}

impl Default for ReviewSummary {
    fn default() -> Self {
        Self {
            description: NO_REVIEW_DATA.to_string(),
            positive: 0,
            negative: 0,
            total: 0,
        }
    }
}

/// Normalized view of one store entry used for reporting.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemRecord {
    pub id: u64,
    pub name: String,
    pub about_the_game: String,
    pub short_description: String,
    pub release_date: String,
    pub developers: Vec<String>,
    pub publishers: Vec<String>,
    pub platforms: Vec<String>,
    pub languages: String,
    pub features: Vec<String>,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
    pub controller_support: String,
    pub review: ReviewSummary,
    pub deck_compatibility: String,
}

/// Optional enrichments scraped from the public store page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageExtras {
    pub tags: Vec<String>,
    pub deck_compatibility: String,
}

impl Default for PageExtras {
    fn default() -> Self {
        Self {
            tags: Vec::new(),
            deck_compatibility: UNKNOWN.to_string(),
        }
    }
}

impl ItemRecord {
    pub fn from_catalog(
        entry: CatalogEntry,
        review: ReviewSummary,
        extras: PageExtras,
        clean: impl Fn(&str) -> String,
    ) -> Self {
        Self {
            id: entry.app_id,
            platforms: entry.platforms.names(),
            about_the_game: clean(&entry.about_the_game),
            short_description: clean(&entry.short_description),
            name: entry.name,
            release_date: entry.release_date,
            developers: entry.developers,
            publishers: entry.publishers,
            languages: entry.supported_languages,
            features: entry.categories,
            genres: entry.genres,
            tags: extras.tags,
            controller_support: entry
                .controller_support
                .filter(|support| !support.is_empty())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            review,
            deck_compatibility: extras.deck_compatibility,
        }
    }
}

impl fmt::Display for ItemRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ID: {}", self.id)?;
        writeln!(f, "Game Name: {}", self.name)?;
        writeln!(f, "Release Date: {}", self.release_date)?;
        writeln!(f, "Reviews: {}", self.review.description)?;
        writeln!(f, "Developer: {}", self.developers.join(", "))?;
        writeln!(f, "Publisher: {}", self.publishers.join(", "))?;
        writeln!(f, "Platforms: {}", self.platforms.join(", "))?;
        writeln!(f, "Languages: {}", self.languages)?;
        writeln!(f, "Features: {}", self.features.join(", "))?;
        writeln!(f, "Genres: {}", self.genres.join(", "))?;
        writeln!(f, "Tags: {}", self.tags.join(","))?;
        writeln!(f, "Controller: {}", self.controller_support)?;
        write!(f, "Steam Deck Level: {}", self.deck_compatibility)
    }
}
