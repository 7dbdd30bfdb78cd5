use crate::utils::error::{MaestroError, Result};
use std::path::Path;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Into<String>, reason: impl Into<String>) -> MaestroError {
    MaestroError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.into(),
        reason: reason.into(),
    }
}

/// The chat endpoint is appended to this base, so it must be a bare
/// http(s) origin or prefix without query or fragment.
pub fn validate_api_base(field_name: &str, api_base: &str) -> Result<()> {
    if api_base.trim().is_empty() {
        return Err(invalid(field_name, api_base, "API base URL cannot be empty"));
    }

    let url = Url::parse(api_base)
        .map_err(|e| invalid(field_name, api_base, format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => {}
        scheme => {
            return Err(invalid(
                field_name,
                api_base,
                format!("Unsupported URL scheme: {}", scheme),
            ))
        }
    }

    if url.host_str().is_none() {
        return Err(invalid(field_name, api_base, "URL has no host"));
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(invalid(
            field_name,
            api_base,
            "API base URL cannot carry a query string or fragment",
        ));
    }

    Ok(())
}

/// Returns the usable key. Blank keys count as missing; the key itself is
/// never echoed back in the error.
pub fn validate_api_key<'a>(field_name: &str, api_key: Option<&'a str>) -> Result<&'a str> {
    let key = api_key
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .ok_or_else(|| MaestroError::MissingConfigError {
            field: field_name.to_string(),
        })?;

    if key.chars().any(char::is_whitespace) {
        return Err(invalid(
            field_name,
            "<redacted>",
            "API key cannot contain whitespace",
        ));
    }

    Ok(key)
}

pub fn validate_non_empty(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_directory(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

/// Inventory files are read as CSV, so anything else is refused up front.
pub fn validate_inventory_file(field_name: &str, path: &str) -> Result<()> {
    validate_directory(field_name, path)?;

    match Path::new(path).extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("csv") => Ok(()),
        Some(ext) => Err(invalid(
            field_name,
            path,
            format!("Unsupported file extension: {}. Expected a .csv file", ext),
        )),
        None => Err(invalid(field_name, path, "Inventory file has no .csv extension")),
    }
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_retry_count(field_name: &str, retries: u32, max: u32) -> Result<()> {
    validate_range(field_name, retries, 1, max)
}

/// A limit has to hold at least one user/assistant pair.
pub fn validate_history_limit(field_name: &str, limit: Option<usize>) -> Result<()> {
    match limit {
        Some(max) if max < 2 => Err(invalid(
            field_name,
            max.to_string(),
            "History must keep at least one full turn (2 messages)",
        )),
        _ => Ok(()),
    }
}
