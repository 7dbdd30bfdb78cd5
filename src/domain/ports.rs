use crate::domain::model::ChatMessage;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn exists(&self, path: &str) -> impl std::future::Future<Output = bool> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn model(&self) -> &str;
    fn api_base(&self) -> &str;
    fn api_key(&self) -> Option<&str>;
    fn inventory_path(&self) -> Option<&str>;
    fn appointments_dir(&self) -> &str;
    fn assistant_name(&self) -> &str;
    fn thinking_framework(&self) -> bool;
    fn max_history_messages(&self) -> Option<usize>;
    fn request_timeout_secs(&self) -> u64;
    fn max_retries(&self) -> u32;
}

/// A chat-completion service. Receives the full message list (system prompt
/// first) and returns the assistant's reply text.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
    fn model(&self) -> &str;
}
