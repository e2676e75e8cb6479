//! The delivery pipeline: strip, chunk, format, pace, send.
//!
//! Chunks are delivered strictly in order, and every provider receives a
//! chunk before the next chunk starts. A failing provider is recorded in the
//! [`RelayReport`] and never stops the run.

mod ansi;
mod format;
mod input;
mod rate_limit;

pub use ansi::strip_ansi;
pub use format::{DEFAULT_FORMAT, MessageFormatter, select_format};
pub use input::{InputSource, NO_INPUT_MESSAGE, read_input};
pub use rate_limit::RateLimiter;

use std::borrow::Cow;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use crate::chunker::{Chunk, Chunker};
use crate::config::RelaySettings;
use crate::error::{AppError, AppResult};
use crate::providers::{NotificationMessage, NotificationProvider, NotificationResult, ProviderRegistry};

/// One provider that did not accept one chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryFailure {
    /// 1-based chunk number
    pub chunk: usize,
    pub provider: &'static str,
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelayReport {
    pub chunks: usize,
    /// Successful (chunk, provider) deliveries
    pub delivered: usize,
    pub failures: Vec<DeliveryFailure>,
}

impl RelayReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Relay {
    chunker: Chunker,
    providers: Vec<Arc<dyn NotificationProvider>>,
    formatter: MessageFormatter,
    delay: Duration,
    limiter: RateLimiter,
    strip_ansi: bool,
    echo: bool,
}

impl Relay {
    pub fn new(chunker: Chunker, registry: ProviderRegistry) -> Self {
        Self {
            chunker,
            providers: registry.providers().to_vec(),
            formatter: MessageFormatter::default(),
            delay: Duration::ZERO,
            limiter: RateLimiter::unlimited(),
            strip_ansi: true,
            echo: false,
        }
    }

    /// Relay configured from the `[relay]` settings section
    pub fn from_settings(settings: &RelaySettings, registry: ProviderRegistry) -> Self {
        let chunker = chunker_for(settings);
        Self::new(chunker, registry)
            .with_formatter(MessageFormatter::new(settings.message_format.as_str()))
            .with_delay(settings.delay())
            .with_rate_limit(settings.rate_limit)
            .with_strip_ansi(settings.strip_ansi)
            .with_echo(settings.echo)
    }

    pub fn with_formatter(mut self, formatter: MessageFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_rate_limit(mut self, per_second: u32) -> Self {
        self.limiter = RateLimiter::new(per_second);
        self
    }

    pub fn with_strip_ansi(mut self, strip_ansi: bool) -> Self {
        self.strip_ansi = strip_ansi;
        self
    }

    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Chunks `text` would be sent as, without sending anything
    pub fn plan(&self, text: &str) -> AppResult<Vec<Chunk>> {
        let text = if self.strip_ansi {
            strip_ansi(text)
        } else {
            Cow::Borrowed(text)
        };
        Ok(self.chunker.split(&text)?)
    }

    /// Chunk `text` and deliver every chunk to every provider.
    ///
    /// Fails only when the text cannot be chunked or echo output fails.
    pub async fn run(&self, text: &str) -> AppResult<RelayReport> {
        let chunks = self.plan(text)?;
        let mut report = RelayReport {
            chunks: chunks.len(),
            ..Default::default()
        };
        tracing::info!(
            chunks = chunks.len(),
            providers = self.providers.len(),
            strategy = self.chunker.strategy().as_str(),
            "relaying input"
        );

        for (index, chunk) in chunks.iter().enumerate() {
            if index > 0 && !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            let count = index + 1;
            tracing::debug!(chunk = count, chars = chunk.char_len(), boundary = ?chunk.boundary, "chunk ready");
            if self.echo {
                echo(&chunk.text)?;
            }

            for provider in &self.providers {
                self.limiter.acquire().await;
                self.deliver(provider.as_ref(), &chunk.text, count, &mut report).await;
            }
        }

        if report.is_success() {
            tracing::info!(chunks = report.chunks, delivered = report.delivered, "relay finished");
        } else {
            tracing::warn!(
                chunks = report.chunks,
                delivered = report.delivered,
                failed = report.failures.len(),
                "relay finished with failures"
            );
        }
        Ok(report)
    }

    async fn deliver(
        &self,
        provider: &dyn NotificationProvider,
        data: &str,
        count: usize,
        report: &mut RelayReport,
    ) {
        let message = NotificationMessage {
            body: self.formatter.for_provider(provider.format()).render(data, count),
            data: data.to_string(),
            count,
        };

        let reason = match provider.send(&message).await {
            Ok(result) if result.success => {
                report.delivered += 1;
                tracing::info!(
                    provider = provider.name(),
                    id = provider.id(),
                    chunk = count,
                    duration_ms = result.duration_ms,
                    "notification sent"
                );
                return;
            }
            Ok(result) => rejection_reason(&result),
            Err(e) => e.to_string(),
        };

        tracing::error!(
            provider = provider.name(),
            id = provider.id(),
            chunk = count,
            %reason,
            "notification failed"
        );
        report.failures.push(DeliveryFailure {
            chunk: count,
            provider: provider.name(),
            id: provider.id().to_string(),
            reason,
        });
    }
}

/// Chunker described by the relay settings
pub fn chunker_for(settings: &RelaySettings) -> Chunker {
    Chunker::new(settings.effective_strategy(), settings.char_limit)
        .with_search_limit(Some(settings.effective_search_limit()))
        .with_marker(settings.marker.as_str())
}

fn rejection_reason(result: &NotificationResult) -> String {
    let detail = result.response.as_deref().unwrap_or("").trim();
    match (result.status_code, detail.is_empty()) {
        (Some(status), true) => format!("HTTP {}", status),
        (Some(status), false) => format!("HTTP {}: {}", status, detail),
        (None, false) => detail.to_string(),
        (None, true) => "request failed".to_string(),
    }
}

fn echo(text: &str) -> AppResult<()> {
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{}", text)
        .and_then(|_| stdout.flush())
        .map_err(|e| AppError::io("writing to stdout", e))
}
