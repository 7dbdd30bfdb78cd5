use crate::adapters::openai::{DEFAULT_API_BASE, DEFAULT_MAX_RETRIES, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};
use crate::config::{validate_provider, API_KEY_ENV, DEFAULT_APPOINTMENTS_DIR};
use crate::core::prompt::DEFAULT_ASSISTANT_NAME;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "maestro")]
#[command(about = "Car sales assistant grounded on your vehicle inventory")]
pub struct CliConfig {
    /// CSV file with the vehicle inventory
    #[arg(short, long)]
    pub inventory: Option<String>,

    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Base URL of an OpenAI-compatible API
    #[arg(long, default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Read from OPENAI_API_KEY, never from the command line
    #[arg(skip)]
    pub api_key: Option<String>,

    #[arg(long, default_value = DEFAULT_APPOINTMENTS_DIR)]
    pub appointments_dir: String,

    #[arg(long, default_value = DEFAULT_ASSISTANT_NAME)]
    pub assistant_name: String,

    /// Leave the thinking framework out of the system prompt
    #[arg(long)]
    pub no_thinking_framework: bool,

    /// Keep at most this many history messages (unbounded by default)
    #[arg(long)]
    pub max_history: Option<usize>,

    /// Request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Attempts per chat request, including the first (1-10)
    #[arg(long, default_value_t = DEFAULT_MAX_RETRIES)]
    pub retries: u32,

    /// TOML configuration file; replaces the options above except --inventory
    #[arg(short, long)]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl CliConfig {
    /// Parses the command line and picks up the API key from the environment.
    pub fn load() -> Self {
        let mut config = Self::parse();
        config.api_key = std::env::var(API_KEY_ENV).ok();
        config
    }
}

impl ConfigProvider for CliConfig {
    fn model(&self) -> &str {
        &self.model
    }

    fn api_base(&self) -> &str {
        &self.api_base
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn inventory_path(&self) -> Option<&str> {
        self.inventory.as_deref()
    }

    fn appointments_dir(&self) -> &str {
        &self.appointments_dir
    }

    fn assistant_name(&self) -> &str {
        &self.assistant_name
    }

    fn thinking_framework(&self) -> bool {
        !self.no_thinking_framework
    }

    fn max_history_messages(&self) -> Option<usize> {
        self.max_history
    }

    fn request_timeout_secs(&self) -> u64 {
        self.timeout
    }

    fn max_retries(&self) -> u32 {
        self.retries
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
