use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "config.yml")]
    pub config_file: PathBuf,

    /// Telegram bot token, overrides the value from the config file
    #[arg(long, env = "TELEGRAM_BOT_TOKEN")]
    pub telegram_bot_token: Option<String>,

    /// Per-game fetch timeout in seconds (0 disables it)
    #[arg(long, env = "STEAM_ONE_TASK_TIMEOUT_SEC")]
    pub one_task_timeout_sec: Option<u64>,

    /// Base URL of the Steam store
    #[arg(long, default_value = "https://store.steampowered.com")]
    pub store_url: String,

    /// Base URL of the Telegram Bot API
    #[arg(long, default_value = "https://api.telegram.org")]
    pub telegram_api_url: String,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
