use crate::core::conversation::ConversationHistory;
use crate::core::inventory::Inventory;
use crate::core::prompt::PromptBuilder;
use crate::domain::model::ChatMessage;
use crate::domain::ports::ChatBackend;
use crate::utils::error::Result;
use std::path::Path;

/// The salesperson: owns the system prompt, the inventory it is grounded on
/// and the running conversation.
pub struct SalesAssistant<B: ChatBackend> {
    backend: B,
    prompt: PromptBuilder,
    inventory: Option<Inventory>,
    history: ConversationHistory,
}

impl<B: ChatBackend> SalesAssistant<B> {
    pub fn new(backend: B, prompt: PromptBuilder) -> Self {
        Self {
            backend,
            prompt,
            inventory: None,
            history: ConversationHistory::new(),
        }
    }

    pub fn with_history_limit(mut self, max_messages: usize) -> Self {
        self.history = ConversationHistory::with_limit(max_messages);
        self
    }

    pub fn with_inventory(mut self, inventory: Inventory) -> Self {
        self.inventory = Some(inventory);
        self
    }

    /// Loads the vehicle inventory. A file that cannot be read or parsed is
    /// logged and the assistant carries on without car data.
    pub fn load_inventory<P: AsRef<Path>>(&mut self, path: P) {
        let path = path.as_ref();
        match Inventory::from_csv_path(path) {
            Ok(inventory) => {
                tracing::info!(
                    "Loaded {} vehicles ({} available) from {}",
                    inventory.len(),
                    inventory.available().count(),
                    path.display()
                );
                self.inventory = Some(inventory);
            }
            Err(e) => {
                tracing::error!("Error loading CSV file {}: {}", path.display(), e);
                self.inventory = None;
            }
        }
    }

    pub fn inventory(&self) -> Option<&Inventory> {
        self.inventory.as_ref()
    }

    pub fn assistant_name(&self) -> &str {
        self.prompt.assistant_name()
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn system_prompt(&self) -> String {
        let section = self.inventory.as_ref().map(Inventory::prompt_section);
        self.prompt.build(section.as_deref())
    }

    /// Sends the query with the full conversation. History only changes when
    /// the backend answers.
    pub async fn try_completion(&mut self, user_query: &str) -> Result<String> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::system(self.system_prompt()));
        messages.extend_from_slice(self.history.messages());
        messages.push(ChatMessage::user(user_query));

        let reply = self.backend.complete(&messages).await?;
        self.history.push_turn(user_query, reply.clone());

        tracing::debug!(
            "Completed turn {} with {}",
            self.history.turn_count(),
            self.backend.model()
        );
        Ok(reply)
    }

    pub async fn get_completion(&mut self, user_query: &str) -> String {
        match self.try_completion(user_query).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!("Chat completion failed: {} ({:?})", e, e.category());
                format!("Sorry, an error occurred: {}", e)
            }
        }
    }

    pub fn clear_conversation(&mut self) {
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::Role;
    use crate::utils::error::MaestroError;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Replays canned replies and records every request it receives.
    #[derive(Clone, Default)]
    struct ScriptedBackend {
        replies: Arc<Mutex<VecDeque<Result<String>>>>,
        requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
    }

    impl ScriptedBackend {
        fn reply(self, text: &str) -> Self {
            self.replies.lock().unwrap().push_back(Ok(text.to_string()));
            self
        }

        fn fail(self, status: u16) -> Self {
            self.replies
                .lock()
                .unwrap()
                .push_back(Err(MaestroError::ApiResponseError {
                    status,
                    body: "boom".to_string(),
                }));
            self
        }

        fn request(&self, index: usize) -> Vec<ChatMessage> {
            self.requests.lock().unwrap()[index].clone()
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
            self.requests.lock().unwrap().push(messages.to_vec());
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Err(MaestroError::EmptyResponse))
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    fn inventory() -> Inventory {
        Inventory::from_reader("Brand,Model,Price\nKia,Soul,19000\n".as_bytes()).unwrap()
    }

    #[tokio::test]
    async fn test_messages_are_system_history_then_user() {
        let backend = ScriptedBackend::default().reply("first").reply("second");
        let mut assistant = SalesAssistant::new(backend.clone(), PromptBuilder::default())
            .with_inventory(inventory());

        assistant.get_completion("hello").await;
        assistant.get_completion("cheap cars?").await;

        let request = backend.request(1);
        assert_eq!(request.len(), 4);
        assert_eq!(request[0].role, Role::System);
        assert!(request[0].content.contains("Kia"));
        assert_eq!(request[1], ChatMessage::user("hello"));
        assert_eq!(request[2], ChatMessage::assistant("first"));
        assert_eq!(request[3], ChatMessage::user("cheap cars?"));
    }

    #[tokio::test]
    async fn test_failure_returns_apology_and_keeps_history() {
        let backend = ScriptedBackend::default().reply("ok").fail(500);
        let mut assistant = SalesAssistant::new(backend, PromptBuilder::default());

        assert_eq!(assistant.get_completion("hi").await, "ok");
        let reply = assistant.get_completion("again").await;

        assert!(reply.starts_with("Sorry, an error occurred: "));
        assert!(reply.contains("500"));
        assert_eq!(assistant.history().turn_count(), 1);
    }

    #[tokio::test]
    async fn test_clear_conversation() {
        let backend = ScriptedBackend::default().reply("ok");
        let mut assistant = SalesAssistant::new(backend, PromptBuilder::default());
        assistant.get_completion("hi").await;
        assistant.clear_conversation();
        assert!(assistant.history().is_empty());
    }

    #[test]
    fn test_missing_inventory_file_falls_back() {
        let mut assistant = SalesAssistant::new(ScriptedBackend::default(), PromptBuilder::default())
            .with_inventory(inventory());
        assistant.load_inventory("/definitely/not/here.csv");

        assert!(assistant.inventory().is_none());
        assert!(assistant.system_prompt().ends_with("No car data available"));
    }
}
