use crate::config::cli::Args;
use crate::error::{BotError, Result};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{info, warn};

pub(crate) mod cli;

const FALLBACK_CONFIG_FILE: &str = "/etc/app_config.yml";

#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub steam: SteamSection,
    #[serde(default)]
    pub telegram: TelegramSection,
}

#[derive(Debug, Default, Deserialize)]
pub struct SteamSection {
    #[serde(default)]
    pub one_task_timeout_sec: u64,
}

#[derive(Debug, Default, Deserialize)]
pub struct TelegramSection {
    #[serde(default)]
    pub bot_token: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Tries the given path first, then the system-wide fallback.
    fn load_with_fallback(path: &Path) -> Self {
        for candidate in [path, Path::new(FALLBACK_CONFIG_FILE)] {
            match Self::load(candidate) {
                Ok(config) => {
                    info!("Loaded config from {}", candidate.display());
                    return config;
                }
                Err(e) => warn!("Could not load config from {}: {}", candidate.display(), e),
            }
        }

        warn!("No config file found, relying on CLI and environment");
        Self::default()
    }
}

pub struct Config {
    pub args: Args,
    pub bot_token: String,
    pub one_task_timeout: Option<Duration>,
    pub http_client: Client,
}

impl Config {
    pub fn load(args: Args) -> Result<Self> {
        let file = FileConfig::load_with_fallback(&args.config_file);
        Self::from_parts(args, file)
    }

    pub fn from_parts(args: Args, file: FileConfig) -> Result<Self> {
        let non_blank = |token: &String| !token.trim().is_empty();
        let bot_token = args
            .telegram_bot_token
            .clone()
            .filter(non_blank)
            .or(file.telegram.bot_token.filter(non_blank))
            .ok_or_else(|| BotError::Config("No telegram bot token provided".to_string()))?;

        let timeout_sec = args
            .one_task_timeout_sec
            .unwrap_or(file.steam.one_task_timeout_sec);
        let one_task_timeout = (timeout_sec > 0).then(|| Duration::from_secs(timeout_sec));

        let http_client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .build()?;

        Ok(Self {
            args,
            bot_token,
            one_task_timeout,
            http_client,
        })
    }

    /// Logs the non-secret settings.
    pub fn print(&self) {
        info!("Config file: {}", self.args.config_file.display());
        info!("Steam store: {}", self.args.store_url);
        match self.one_task_timeout {
            Some(timeout) => info!("Steam one task timeout: {} seconds", timeout.as_secs()),
            None => info!("Steam one task timeout: disabled"),
        }
    }
}
