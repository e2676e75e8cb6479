use std::time::Duration;

use anyhow::Context;

use crate::config::HttpSettings;
use crate::error::{AppError, AppResult};

/// `notify-relay/<version>`
pub fn default_user_agent() -> String {
    format!("notify-relay/{}", crate::pkg_version())
}

/// Build the client every provider sends through.
///
/// One client per run keeps connection pooling across chunks. Proxy URLs
/// may use http, https, socks5 or socks5h.
pub fn build_client(settings: &HttpSettings) -> AppResult<reqwest::Client> {
    let user_agent = settings
        .user_agent
        .clone()
        .unwrap_or_else(default_user_agent);

    let mut builder = reqwest::Client::builder()
        // Timeouts
        .timeout(Duration::from_secs(settings.timeout))
        .connect_timeout(Duration::from_secs(settings.connect_timeout))
        // Connection pooling
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        // Compression
        .gzip(true)
        .deflate(true)
        .brotli(true)
        .zstd(true)
        .user_agent(user_agent);

    if let Some(proxy) = &settings.proxy {
        let proxy = reqwest::Proxy::all(proxy).map_err(|e| AppError::Validation {
            field: "http.proxy".to_string(),
            reason: e.to_string(),
        })?;
        builder = builder.proxy(proxy);
    }

    let client = builder
        .build()
        .context("failed to build the HTTP client")?;

    tracing::debug!(
        timeout = settings.timeout,
        connect_timeout = settings.connect_timeout,
        proxy = settings.proxy.is_some(),
        "HTTP client ready"
    );
    Ok(client)
}
