use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    #[error("Malformed reference: {0}")]
    MalformedReference(String),
    #[error("Lookup failed for app {id}: {reason}")]
    LookupFailed { id: u64, reason: String },
    #[error("Timed out fetching app {0}")]
    Timeout(u64),
    #[error("Nothing to report")]
    EmptyInput,
    #[error("Scrape error: {0}")]
    Scrape(String),
    #[error("Selector error: {0}")]
    Selector(String),
    #[error("Telegram error: {0}")]
    Telegram(String),
    #[error("Config error: {0}")]
    Config(String),
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, BotError>;
