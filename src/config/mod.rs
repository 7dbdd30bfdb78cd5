#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::openai::MAX_RETRIES;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_api_base, validate_directory, validate_history_limit, validate_inventory_file,
    validate_non_empty, validate_range, validate_retry_count,
};

pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const DEFAULT_APPOINTMENTS_DIR: &str = "appointments";

const MAX_TIMEOUT_SECS: u64 = 600;

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_api_base("api_base", config.api_base())?;
    validate_non_empty("model", config.model())?;
    validate_non_empty("assistant_name", config.assistant_name())?;
    validate_directory("appointments_dir", config.appointments_dir())?;

    if let Some(path) = config.inventory_path() {
        validate_inventory_file("inventory", path)?;
    }

    validate_range(
        "request_timeout_secs",
        config.request_timeout_secs(),
        1,
        MAX_TIMEOUT_SECS,
    )?;
    validate_retry_count("max_retries", config.max_retries(), MAX_RETRIES)?;
    validate_history_limit("max_history_messages", config.max_history_messages())?;

    Ok(())
}
