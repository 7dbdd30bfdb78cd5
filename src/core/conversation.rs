use crate::domain::model::ChatMessage;

const MIN_HISTORY_MESSAGES: usize = 2;

/// Conversation memory sent with every request. Messages are stored as
/// user/assistant pairs so trimming never orphans a reply.
#[derive(Debug, Clone, Default)]
pub struct ConversationHistory {
    messages: Vec<ChatMessage>,
    max_messages: Option<usize>,
}

impl ConversationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep at most `max_messages` messages, rounded down to whole turns.
    /// Limits below one turn are raised to 2 so the latest exchange is
    /// always remembered.
    pub fn with_limit(max_messages: usize) -> Self {
        Self {
            messages: Vec::new(),
            max_messages: Some(max_messages.max(MIN_HISTORY_MESSAGES)),
        }
    }

    pub fn push_turn(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.messages.push(ChatMessage::user(user));
        self.messages.push(ChatMessage::assistant(assistant));
        self.trim_if_needed();
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn turn_count(&self) -> usize {
        self.messages.len() / 2
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }

    fn trim_if_needed(&mut self) {
        let Some(max) = self.max_messages else {
            return;
        };
        let keep = max - max % 2;
        if self.messages.len() > keep {
            let remove = self.messages.len() - keep;
            self.messages.drain(0..remove);
            tracing::debug!("Trimmed {} old messages from conversation history", remove);
        }
    }
}
