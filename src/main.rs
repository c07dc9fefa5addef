use crate::config::cli::Args;
use crate::config::Config;
use crate::domain::ports::ChatTransport;
use crate::error::Result;
use crate::infrastructure::{HttpBrowser, SteamClient, TelegramClient};
use crate::services::collecting::BatchCollector;
use crate::services::dispatch::Dispatcher;
use crate::services::fetching::ItemFetcher;
use clap::Parser;
use std::sync::Arc;
use tracing::{error, info, Level};

mod config;
mod domain;
mod error;
mod infrastructure;
mod services;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = args.log_level.parse::<Level>().unwrap_or(Level::INFO);
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("Starting Steam report bot");
    let config = Config::load(args)?;
    config.print();

    let browser = Arc::new(HttpBrowser::new(config.http_client.clone()));
    let steam = Arc::new(SteamClient::new(
        config.http_client.clone(),
        &config.args.store_url,
    ));
    let telegram = Arc::new(TelegramClient::new(
        &config.args.telegram_api_url,
        &config.bot_token,
    )?);
    telegram.get_me().await?;

    let fetcher = ItemFetcher::new(steam, browser.clone(), &config.args.store_url);
    let collector = BatchCollector::new(fetcher, config.one_task_timeout);
    let dispatcher = Arc::new(Dispatcher::new(telegram.clone(), collector));

    tokio::select! {
        result = dispatcher.run() => {
            if let Err(e) = result {
                error!("Message loop failed: {}", e);
            }
        }
        _ = shutdown_signal() => info!("Shutting down..."),
    }

    // In-flight dispatches are abandoned with the runtime.
    telegram.stop();
    browser.close();

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
