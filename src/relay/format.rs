//! Message templates.
//!
//! Templates use `{{name}}` placeholders. Known names are `data` (the chunk),
//! `count` (1-based message number), `date` and `time`. Anything else is
//! left in place so provider-level placeholders survive.

use std::sync::OnceLock;

use jiff::Zoned;
use regex::{Captures, Regex};

pub const DEFAULT_FORMAT: &str = "{{data}}";

fn placeholder_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z][A-Za-z0-9_]*)\s*\}\}").expect("placeholder regex is valid")
    })
}

/// Pick the template for one provider.
///
/// A non-default global template wins, then a non-default provider
/// template, then [`DEFAULT_FORMAT`].
pub fn select_format<'a>(global: &'a str, provider: Option<&'a str>) -> &'a str {
    if !global.is_empty() && global != DEFAULT_FORMAT {
        return global;
    }
    match provider {
        Some(format) if !format.is_empty() && format != DEFAULT_FORMAT => format,
        _ => DEFAULT_FORMAT,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFormatter {
    template: String,
}

impl Default for MessageFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT)
    }
}

impl MessageFormatter {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// Formatter for a provider that may carry its own template
    pub fn for_provider(&self, provider_format: Option<&str>) -> MessageFormatter {
        MessageFormatter::new(select_format(&self.template, provider_format))
    }

    pub fn render(&self, data: &str, count: usize) -> String {
        self.render_at(data, count, &Zoned::now())
    }

    /// Render with a fixed clock
    pub fn render_at(&self, data: &str, count: usize, now: &Zoned) -> String {
        placeholder_regex()
            .replace_all(&self.template, |caps: &Captures<'_>| match &caps[1] {
                "data" => data.to_string(),
                "count" => count.to_string(),
                "date" => now.strftime("%Y-%m-%d").to_string(),
                "time" => now.strftime("%H:%M:%S").to_string(),
                _ => caps[0].to_string(),
            })
            .into_owned()
    }
}
