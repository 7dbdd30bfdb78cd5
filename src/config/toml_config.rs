use crate::adapters::openai::{DEFAULT_API_BASE, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::config::{validate_provider, API_KEY_ENV, DEFAULT_APPOINTMENTS_DIR};
use crate::core::prompt::DEFAULT_ASSISTANT_NAME;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{MaestroError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub assistant: AssistantConfig,
    pub openai: OpenAiConfig,
    pub inventory: InventoryConfig,
    pub appointments: AppointmentsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantConfig {
    pub name: String,
    pub thinking_framework: bool,
    pub max_history_messages: Option<usize>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_ASSISTANT_NAME.to_string(),
            thinking_framework: true,
            max_history_messages: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_base: String,
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppointmentsConfig {
    pub directory: String,
}

impl Default for AppointmentsConfig {
    fn default() -> Self {
        Self {
            directory: DEFAULT_APPOINTMENTS_DIR.to_string(),
        }
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"))
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parses the config after substituting `${VAR}` placeholders. A missing
    /// or unresolved `openai.api_key` falls back to `OPENAI_API_KEY`.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = Self::substitute_env_vars(content);
        let mut config: TomlConfig = toml::from_str(&processed)?;

        let unresolved = config
            .openai
            .api_key
            .as_deref()
            .map(|key| key.trim().is_empty() || env_var_pattern().is_match(key))
            .unwrap_or(true);
        if unresolved {
            config.openai.api_key = std::env::var(API_KEY_ENV).ok();
        }

        Ok(config)
    }

    /// Unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.assistant.name.contains('\n') {
            return Err(MaestroError::ConfigValidationError {
                field: "assistant.name".to_string(),
                message: "name must fit on one line".to_string(),
            });
        }
        validate_provider(self)
    }
}

impl ConfigProvider for TomlConfig {
    fn model(&self) -> &str {
        &self.openai.model
    }

    fn api_base(&self) -> &str {
        &self.openai.api_base
    }

    fn api_key(&self) -> Option<&str> {
        self.openai.api_key.as_deref()
    }

    fn inventory_path(&self) -> Option<&str> {
        self.inventory.path.as_deref()
    }

    fn appointments_dir(&self) -> &str {
        &self.appointments.directory
    }

    fn assistant_name(&self) -> &str {
        &self.assistant.name
    }

    fn thinking_framework(&self) -> bool {
        self.assistant.thinking_framework
    }

    fn max_history_messages(&self) -> Option<usize> {
        self.assistant.max_history_messages
    }

    fn request_timeout_secs(&self) -> u64 {
        self.openai.timeout_seconds
    }

    fn max_retries(&self) -> u32 {
        self.openai.max_retries
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
