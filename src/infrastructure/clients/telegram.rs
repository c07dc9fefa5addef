use crate::domain::ports::ChatTransport;
use crate::domain::InboundMessage;
use crate::error::{BotError, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::sleep;
use tracing::{info, warn};

const LONG_POLL_SECS: u64 = 60;
const RETRY_DELAY: Duration = Duration::from_secs(3);

#[derive(Debug, Deserialize)]
struct TgResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BotUser {
    #[serde(default)]
    pub first_name: String,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<TgMessage>,
}

#[derive(Debug, Deserialize)]
pub struct TgMessage {
    pub chat: Chat,
    pub from: Option<BotUser>,
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Chat {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: Option<String>,
}

impl TgMessage {
    /// Only text messages are of interest; everything else is dropped.
    pub fn into_inbound(self) -> Option<InboundMessage> {
        let text = self.text?;
        let sender_name = self
            .chat
            .username
            .or_else(|| self.from.as_ref().and_then(|u| u.username.clone()))
            .or_else(|| self.from.map(|u| u.first_name))
            .or(self.chat.first_name)
            .unwrap_or_default();

        Some(InboundMessage {
            chat_id: self.chat.id,
            sender_name,
            text,
        })
    }
}

#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    stop_tx: Arc<watch::Sender<bool>>,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(LONG_POLL_SECS + 30))
            .build()?;
        let (stop_tx, _) = watch::channel(false);

        Ok(Self {
            client,
            base_url: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
            stop_tx: Arc::new(stop_tx),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.base_url, method)
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let body: TgResponse<T> = response.json().await?;
        if !body.ok {
            return Err(BotError::Telegram(
                body.description
                    .unwrap_or_else(|| "request rejected".to_string()),
            ));
        }

        body.result
            .ok_or_else(|| BotError::Telegram("response without result".to_string()))
    }

    /// Checks the token and returns the bot account.
    pub async fn get_me(&self) -> Result<BotUser> {
        let response = self.client.get(self.method_url("getMe")).send().await?;
        let me: BotUser = Self::parse(response).await?;
        info!(
            "Authorized on account {}",
            me.username.as_deref().unwrap_or(&me.first_name)
        );
        Ok(me)
    }

    async fn get_updates(&self, offset: i64) -> Result<Vec<Update>> {
        let response = self
            .client
            .post(self.method_url("getUpdates"))
            .json(&json!({
                "offset": offset,
                "timeout": LONG_POLL_SECS,
                "allowed_updates": ["message"],
            }))
            .send()
            .await?;

        Self::parse(response).await
    }

    async fn poll(self, tx: mpsc::Sender<InboundMessage>) {
        let mut stop_rx = self.stop_tx.subscribe();
        let mut offset = 0;

        while !*stop_rx.borrow() {
            let updates = tokio::select! {
                _ = stop_rx.changed() => break,
                updates = self.get_updates(offset) => updates,
            };

            match updates {
                Ok(updates) => {
                    for update in updates {
                        offset = offset.max(update.update_id + 1);

                        let Some(message) = update.message.and_then(TgMessage::into_inbound)
                        else {
                            continue;
                        };

                        if tx.send(message).await.is_err() {
                            return;
                        }
                    }
                }
                Err(e) => {
                    warn!("Failed to fetch Telegram updates: {}", e);
                    sleep(RETRY_DELAY).await;
                }
            }
        }

        info!("Stopped receiving Telegram updates");
    }
}

#[async_trait]
impl ChatTransport for TelegramClient {
    async fn receive_messages(&self) -> Result<mpsc::Receiver<InboundMessage>> {
        let (tx, rx) = mpsc::channel(100);
        tokio::spawn(self.clone().poll(tx));
        Ok(rx)
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        let response = self
            .client
            .post(self.method_url("sendMessage"))
            .json(&json!({ "chat_id": chat_id, "text": text }))
            .send()
            .await?;

        Self::parse::<serde_json::Value>(response).await?;
        Ok(())
    }

    async fn send_document(
        &self,
        chat_id: i64,
        text: &str,
        filename: &str,
        data: Vec<u8>,
    ) -> Result<()> {
        if let Err(e) = self.send_text(chat_id, text).await {
            warn!("Failed to send document caption to {}: {}", chat_id, e);
        }

        let document = Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str("text/csv")?;
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("document", document);

        let response = self
            .client
            .post(self.method_url("sendDocument"))
            .multipart(form)
            .send()
            .await?;

        Self::parse::<serde_json::Value>(response).await?;
        Ok(())
    }

    fn stop(&self) {
        self.stop_tx.send_replace(true);
    }
}
