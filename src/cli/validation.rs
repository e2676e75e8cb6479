//! CLI argument validation functions
//!
//! Custom value parsers for checks clap cannot express on its own.

use std::fs;
use std::path::PathBuf;

use reqwest::Url;

use crate::providers::PROVIDER_NAMES;

/// Validate that a file path is accessible (exists and is readable)
pub fn validate_config_file_path(path_str: &str) -> Result<PathBuf, String> {
    readable_file(path_str, "Configuration file")
}

/// Validate the `--data` input file
pub fn validate_input_file(path_str: &str) -> Result<PathBuf, String> {
    readable_file(path_str, "Input file")
}

fn readable_file(path_str: &str, what: &str) -> Result<PathBuf, String> {
    let path = PathBuf::from(path_str);

    if !path.exists() {
        return Err(format!("{} does not exist: '{}'", what, path_str));
    }

    if !path.is_file() {
        return Err(format!("{} path is not a file: '{}'", what, path_str));
    }

    match fs::File::open(&path) {
        Ok(_) => Ok(path),
        Err(e) => Err(format!("Cannot read {} '{}': {}", what.to_lowercase(), path_str, e)),
    }
}

/// Validate the per-message character limit
pub fn validate_char_limit(limit_str: &str) -> Result<usize, String> {
    let limit: usize = limit_str
        .parse()
        .map_err(|_| format!("Character limit must be a positive number, got: '{}'", limit_str))?;

    if limit == 0 {
        return Err("Character limit must be greater than 0".to_string());
    }

    Ok(limit)
}

/// Validate a provider kind name, normalised to lowercase
pub fn validate_provider_name(name_str: &str) -> Result<String, String> {
    let name = name_str.trim().to_lowercase();
    if PROVIDER_NAMES.contains(&name.as_str()) {
        Ok(name)
    } else {
        Err(format!(
            "Unknown provider '{}'. Valid providers are: {}",
            name_str,
            PROVIDER_NAMES.join(", ")
        ))
    }
}

/// Validate a proxy URL scheme
pub fn validate_proxy_url(url_str: &str) -> Result<String, String> {
    let url = Url::parse(url_str).map_err(|e| format!("Invalid proxy URL '{}': {}", url_str, e))?;

    match url.scheme() {
        "http" | "https" | "socks5" | "socks5h" => Ok(url_str.to_string()),
        other => Err(format!(
            "Unsupported proxy scheme '{}'. Use http, https, socks5 or socks5h",
            other
        )),
    }
}
