/// Chat message as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub sender_name: String,
    pub text: String,
}

impl InboundMessage {
    pub fn is_start_command(&self) -> bool {
        self.text.trim() == "/start"
    }
}
