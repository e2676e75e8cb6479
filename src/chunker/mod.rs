//! Bulk text chunking.
//!
//! Splits a fully buffered block of text into an ordered sequence of chunks
//! that each fit a downstream character ceiling. Three strategies share the
//! same budget rule and differ in how they pick a boundary:
//!
//! - [`SplitStrategy::Newline`] cuts at the rightmost newline inside a
//!   bounded search window and falls back to a raw character cut.
//! - [`SplitStrategy::Truncate`] packs whole lines and, when a single line
//!   does not fit, cuts it and appends a truncation marker.
//! - [`SplitStrategy::Lines`] emits one chunk per line, cutting over-long
//!   lines with the marker.
//!
//! Lengths are counted in Unicode scalar values, so a multi-byte character is
//! never split across two chunks.

mod error;
mod newline;
mod truncate;

pub use error::ChunkError;
pub use newline::{split, split_chunks};
pub use truncate::{split_lines, split_truncating};

use serde::{Deserialize, Serialize};

/// Marker appended to a chunk whose line had to be cut
pub const DEFAULT_MARKER: &str = "...";

/// Upper bound of the default newline search window
pub const DEFAULT_SEARCH_LIMIT: usize = 250;

/// Default search window for a given chunk limit: `min(250, max_chunk_size)`
pub fn default_search_limit(max_chunk_size: usize) -> usize {
    DEFAULT_SEARCH_LIMIT.min(max_chunk_size)
}

/// Boundary selection policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SplitStrategy {
    /// Prefer the rightmost newline in the search window, else cut raw
    #[default]
    Newline,
    /// Pack whole lines, cut over-long lines with a marker
    Truncate,
    /// One chunk per line, cut over-long lines with a marker
    Lines,
}

impl SplitStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SplitStrategy::Newline => "newline",
            SplitStrategy::Truncate => "truncate",
            SplitStrategy::Lines => "lines",
        }
    }

    /// Whether forced cuts of this strategy carry the truncation marker
    pub fn uses_marker(&self) -> bool {
        !matches!(self, SplitStrategy::Newline)
    }
}

impl std::fmt::Display for SplitStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SplitStrategy {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "newline" | "bulk" => Ok(SplitStrategy::Newline),
            "truncate" => Ok(SplitStrategy::Truncate),
            "lines" | "line" => Ok(SplitStrategy::Lines),
            _ => Err(ChunkError::invalid_argument(format!(
                "unknown split strategy '{}', expected one of: newline, truncate, lines",
                s
            ))),
        }
    }
}

/// How a chunk ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Boundary {
    /// A `\n` directly after the chunk was consumed as the split point
    Newline,
    /// Raw character cut, nothing consumed
    Forced,
    /// Last chunk of the input
    End,
}

/// One bounded piece of the input, in delivery order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub text: String,
    pub boundary: Boundary,
}

impl Chunk {
    pub fn new(text: impl Into<String>, boundary: Boundary) -> Self {
        Self {
            text: text.into(),
            boundary,
        }
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// Configured chunker: a strategy plus its budget parameters.
///
/// ```ignore
/// let chunker = Chunker::new(SplitStrategy::Newline, 2000);
/// for chunk in chunker.split(&input)? {
///     sink.deliver(&chunk.text).await?;
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunker {
    strategy: SplitStrategy,
    max_chunk_size: usize,
    search_limit: Option<usize>,
    marker: String,
}

impl Chunker {
    /// Create a chunker with the default search window and marker
    pub fn new(strategy: SplitStrategy, max_chunk_size: usize) -> Self {
        Self {
            strategy,
            max_chunk_size,
            search_limit: Some(default_search_limit(max_chunk_size)),
            marker: DEFAULT_MARKER.to_string(),
        }
    }

    /// Override the newline search window. `None` disables the scan.
    pub fn with_search_limit(mut self, search_limit: Option<usize>) -> Self {
        self.search_limit = search_limit;
        self
    }

    /// Override the truncation marker
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn strategy(&self) -> SplitStrategy {
        self.strategy
    }

    pub fn max_chunk_size(&self) -> usize {
        self.max_chunk_size
    }

    pub fn search_limit(&self) -> Option<usize> {
        self.search_limit
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    /// Check the parameters without chunking anything
    pub fn validate(&self) -> Result<(), ChunkError> {
        if self.strategy.uses_marker() {
            truncate::check_budget(self.max_chunk_size, &self.marker).map(|_| ())
        } else {
            newline::check_limit(self.max_chunk_size)
        }
    }

    /// Split `text` with the configured strategy
    pub fn split(&self, text: &str) -> Result<Vec<Chunk>, ChunkError> {
        match self.strategy {
            SplitStrategy::Newline => split_chunks(text, self.max_chunk_size, self.search_limit),
            SplitStrategy::Truncate => split_truncating(text, self.max_chunk_size, &self.marker),
            SplitStrategy::Lines => split_lines(text, self.max_chunk_size, &self.marker),
        }
    }

    /// Rebuild the text a chunk sequence came from
    pub fn reassemble(&self, chunks: &[Chunk]) -> String {
        let marker = self.strategy.uses_marker().then_some(self.marker.as_str());
        reassemble(chunks, marker)
    }
}

/// Rebuild the original text from a chunk sequence.
///
/// Newline boundaries get their separator back. When `marker` is set, forced
/// boundaries lose the marker that was appended to them.
pub fn reassemble(chunks: &[Chunk], marker: Option<&str>) -> String {
    let mut out = String::with_capacity(chunks.iter().map(|c| c.text.len() + 1).sum());
    for chunk in chunks {
        match chunk.boundary {
            Boundary::Newline => {
                out.push_str(&chunk.text);
                out.push('\n');
            }
            Boundary::Forced => {
                let text = marker
                    .and_then(|m| chunk.text.strip_suffix(m))
                    .unwrap_or(&chunk.text);
                out.push_str(text);
            }
            Boundary::End => out.push_str(&chunk.text),
        }
    }
    out
}

/// Character position to byte offset table over a borrowed string
pub(crate) struct CharIndex<'a> {
    text: &'a str,
    offsets: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        let offsets = text
            .char_indices()
            .map(|(i, _)| i)
            .chain(std::iter::once(text.len()))
            .collect();
        Self { text, offsets }
    }

    /// Number of characters
    pub(crate) fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Substring between two character positions
    pub(crate) fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[self.offsets[start]..self.offsets[end]]
    }

    pub(crate) fn is_newline(&self, pos: usize) -> bool {
        // '\n' is a single byte and never a UTF-8 continuation byte
        self.text.as_bytes()[self.offsets[pos]] == b'\n'
    }

    /// Position of the first newline at or after `from`
    pub(crate) fn next_newline(&self, from: usize) -> Option<usize> {
        let start = self.offsets[from];
        self.text[start..]
            .find('\n')
            .map(|byte| self.offsets.partition_point(|&o| o < start + byte))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("newline".parse::<SplitStrategy>().unwrap(), SplitStrategy::Newline);
        assert_eq!("BULK".parse::<SplitStrategy>().unwrap(), SplitStrategy::Newline);
        assert_eq!("truncate".parse::<SplitStrategy>().unwrap(), SplitStrategy::Truncate);
        assert_eq!("line".parse::<SplitStrategy>().unwrap(), SplitStrategy::Lines);
        assert!("words".parse::<SplitStrategy>().is_err());
    }

    #[test]
    fn test_default_search_limit() {
        assert_eq!(default_search_limit(4000), 250);
        assert_eq!(default_search_limit(100), 100);
    }

    #[test]
    fn test_chunker_defaults() {
        let chunker = Chunker::new(SplitStrategy::Newline, 2000);
        assert_eq!(chunker.search_limit(), Some(250));
        assert_eq!(chunker.marker(), "...");
        assert!(chunker.validate().is_ok());
    }

    #[test]
    fn test_chunker_validate_marker_budget() {
        let chunker = Chunker::new(SplitStrategy::Truncate, 3);
        assert!(matches!(
            chunker.validate(),
            Err(ChunkError::InvalidArgument { .. })
        ));

        // Newline strategy never appends the marker
        let chunker = Chunker::new(SplitStrategy::Newline, 3);
        assert!(chunker.validate().is_ok());

        let chunker = Chunker::new(SplitStrategy::Lines, 3).with_marker("~");
        assert!(chunker.validate().is_ok());
    }

    #[test]
    fn test_chunker_dispatch() {
        let text = "alpha\nbeta\ngamma";

        let chunks = Chunker::new(SplitStrategy::Lines, 100).split(text).unwrap();
        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["alpha", "beta", "gamma"]);

        let chunks = Chunker::new(SplitStrategy::Truncate, 100).split(text).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, text);

        let chunks = Chunker::new(SplitStrategy::Newline, 10).split(text).unwrap();
        let texts: Vec<_> = chunks.iter().map(|c| c.text.as_str()).collect();
        // The newline sitting exactly on the cut point is outside the chunk
        assert_eq!(texts, vec!["alpha", "beta\ngamma"]);
    }

    #[test]
    fn test_reassemble_strips_marker_only_on_forced() {
        let chunks = vec![
            Chunk::new("aaa...", Boundary::Forced),
            Chunk::new("a...", Boundary::Newline),
            Chunk::new("end", Boundary::End),
        ];
        assert_eq!(reassemble(&chunks, Some("...")), "aaaa...\nend");
        assert_eq!(reassemble(&chunks, None), "aaa...a...\nend");
    }

    #[test]
    fn test_char_index_multibyte() {
        let index = CharIndex::new("añ\nü");
        assert_eq!(index.len(), 4);
        assert_eq!(index.slice(0, 2), "añ");
        assert!(index.is_newline(2));
        assert_eq!(index.next_newline(0), Some(2));
        assert_eq!(index.next_newline(3), None);
    }
}
