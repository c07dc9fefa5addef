use crate::domain::ports::ChatTransport;
use crate::domain::reference::extract_ids;
use crate::domain::InboundMessage;
use crate::error::Result;
use crate::services::collecting::BatchCollector;
use crate::services::report::{CsvReport, REPORT_FILENAME};
use std::sync::Arc;
use tracing::{error, info, warn};

pub const START_REPLY: &str = "Привет!\n\
    Я ОЧЕНЬ ПРОСТОЙ телеграм бот для сбора информации по стим играм.\n\
    Присылай мне только ссылки на игры одним сообщением и получишь отчет в виде csv файла!";
pub const REPORT_READY_REPLY: &str = "Отчет готов!";

fn accepted_reply(sender_name: &str) -> String {
    format!("{}, взяли работу!", sender_name)
}

fn malformed_reply(line: &str) -> String {
    format!("Битый адрес: {}", line)
}

fn report_failed_reply(reason: &str) -> String {
    format!("Ошибка при создании файла отчета: {}", reason)
}

/// Turns chat messages into CSV reports, one spawned task per message.
pub struct Dispatcher {
    transport: Arc<dyn ChatTransport>,
    collector: BatchCollector,
    reports: CsvReport,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn ChatTransport>, collector: BatchCollector) -> Self {
        Self {
            transport,
            collector,
            reports: CsvReport,
        }
    }

    async fn reply(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.transport.send_text(chat_id, text).await {
            warn!("Failed to reply to chat {}: {}", chat_id, e);
        }
    }

    pub async fn process_message(&self, message: InboundMessage) -> Result<()> {
        let chat_id = message.chat_id;

        if message.is_start_command() {
            self.reply(chat_id, START_REPLY).await;
            return Ok(());
        }

        info!("Building report for {}", message.sender_name);
        self.reply(chat_id, &accepted_reply(&message.sender_name)).await;

        let extracted = extract_ids(&message.text);
        for line in &extracted.malformed {
            warn!("Malformed reference from {}: {}", message.sender_name, line);
            self.reply(chat_id, &malformed_reply(line)).await;
        }

        let records = self.collector.collect(&extracted.ids).await;

        let data = match self.reports.build(&records) {
            Ok(data) => data,
            Err(e) => {
                self.reply(chat_id, &report_failed_reply(&e.to_string())).await;
                return Err(e);
            }
        };

        self.transport
            .send_document(chat_id, REPORT_READY_REPLY, REPORT_FILENAME, data)
            .await?;

        info!("Report for {} built!", message.sender_name);
        Ok(())
    }

    /// Receives messages until the transport stops, without waiting on any dispatch.
    pub async fn run(self: Arc<Self>) -> Result<()> {
        let mut messages = self.transport.receive_messages().await?;
        info!("Processing telegram messages!");

        while let Some(message) = messages.recv().await {
            let dispatcher = Arc::clone(&self);

            tokio::spawn(async move {
                let chat_id = message.chat_id;
                if let Err(e) = dispatcher.process_message(message).await {
                    error!("Failed to process message from chat {}: {}", chat_id, e);
                }
            });
        }

        info!("Message stream closed");
        Ok(())
    }
}
