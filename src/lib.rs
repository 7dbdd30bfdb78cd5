pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;
pub use config::toml_config::TomlConfig;

pub use adapters::{openai::OpenAiClient, storage::LocalStorage};
pub use self::core::{
    appointment::AppointmentManager, assistant::SalesAssistant, inventory::Inventory,
    prompt::PromptBuilder, session::Session,
};
pub use utils::error::{MaestroError, Result};
