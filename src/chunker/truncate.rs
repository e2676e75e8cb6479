//! Marker-reserving splitters.
//!
//! Both strategies here work line by line. When a line cannot fit the budget
//! it is cut `max_chunk_size - marker_len` characters in and the marker is
//! appended, so the chunk is still at most `max_chunk_size` characters. The
//! rest of the line is picked up by the next chunk.

use std::borrow::Cow;

use super::{Boundary, CharIndex, Chunk, ChunkError};

/// Validate the budget and return the forced-cut width
pub(super) fn check_budget(max_chunk_size: usize, marker: &str) -> Result<usize, ChunkError> {
    let marker_len = marker.chars().count();
    if max_chunk_size <= marker_len {
        return Err(ChunkError::invalid_argument(format!(
            "max_chunk_size must be greater than the truncation marker length ({}), got {}",
            marker_len, max_chunk_size
        )));
    }
    Ok(max_chunk_size - marker_len)
}

fn forced(index: &CharIndex<'_>, start: usize, cut: usize, marker: &str) -> Chunk {
    let mut text = String::with_capacity(marker.len() + cut * 4);
    text.push_str(index.slice(start, start + cut));
    text.push_str(marker);
    Chunk::new(text, Boundary::Forced)
}

/// Drop the `\r` of every CRLF line ending
fn trim_carriage_returns(text: &str) -> Cow<'_, str> {
    if !text.contains('\r') {
        return Cow::Borrowed(text);
    }
    let lines: Vec<&str> = text
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    Cow::Owned(lines.join("\n"))
}

/// Pack as many whole lines as fit into each chunk.
///
/// Lines are joined with `\n` and lose a trailing `\r`. A line that does
/// not fit on its own is cut and marked, and chunking resumes inside that
/// same line. A trailing `\n` at the end of the input is consumed like a
/// line scanner would.
///
/// Errors when `max_chunk_size` does not leave room for `marker`.
pub fn split_truncating(
    text: &str,
    max_chunk_size: usize,
    marker: &str,
) -> Result<Vec<Chunk>, ChunkError> {
    let cut = check_budget(max_chunk_size, marker)?;
    let text = trim_carriage_returns(text);
    let index = CharIndex::new(&text);
    let total = index.len();
    let mut chunks = Vec::new();

    let mut offset = 0;
    while offset < total {
        // `end` excludes the separator, `resume` is just past it
        let mut end = offset;
        let mut resume = offset;
        let mut overflow = false;

        while resume < total {
            let line_end = index.next_newline(resume).unwrap_or(total);
            if line_end - offset > max_chunk_size {
                overflow = true;
                break;
            }
            end = line_end;
            resume = if line_end < total { line_end + 1 } else { total };
        }

        if end > offset {
            let boundary = if end < resume {
                Boundary::Newline
            } else {
                Boundary::End
            };
            chunks.push(Chunk::new(index.slice(offset, end), boundary));
            offset = resume;
        } else if overflow {
            // Nothing but blank lines fit before an over-long line, so cut raw
            chunks.push(forced(&index, offset, cut, marker));
            offset += cut;
        } else {
            // Only a lone separator is left
            offset = resume;
        }
    }

    tracing::trace!(
        chars = total,
        chunks = chunks.len(),
        max_chunk_size,
        "packed lines with truncation"
    );
    Ok(chunks)
}

/// Emit one chunk per non-empty line.
///
/// A trailing `\r` is dropped from every line. Lines longer than
/// `max_chunk_size` are cut and marked, and the rest of the line follows as
/// further chunks.
///
/// Errors when `max_chunk_size` does not leave room for `marker`.
pub fn split_lines(text: &str, max_chunk_size: usize, marker: &str) -> Result<Vec<Chunk>, ChunkError> {
    let cut = check_budget(max_chunk_size, marker)?;
    let mut chunks = Vec::new();

    let mut lines = text.split('\n').peekable();
    while let Some(raw) = lines.next() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.is_empty() {
            continue;
        }
        let boundary = if lines.peek().is_some() {
            Boundary::Newline
        } else {
            Boundary::End
        };

        let index = CharIndex::new(line);
        let len = index.len();
        let mut offset = 0;
        while len - offset > max_chunk_size {
            chunks.push(forced(&index, offset, cut, marker));
            offset += cut;
        }
        chunks.push(Chunk::new(index.slice(offset, len), boundary));
    }

    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::reassemble;
    use proptest::prelude::*;

    fn texts(chunks: &[Chunk]) -> Vec<&str> {
        chunks.iter().map(|c| c.text.as_str()).collect()
    }

    #[test]
    fn test_long_line_truncated_with_marker() {
        let line = "a".repeat(500);
        let chunks = split_truncating(&line, 100, "...").unwrap();

        assert_eq!(chunks[0].text, format!("{}...", "a".repeat(97)));
        assert_eq!(chunks[0].char_len(), 100);
        assert_eq!(chunks[0].boundary, Boundary::Forced);
        // 5 cuts of 97 characters, then the remaining 15
        assert_eq!(chunks.len(), 6);
        assert_eq!(chunks[5].text, "a".repeat(15));
        assert_eq!(reassemble(&chunks, Some("...")), line);
    }

    #[test]
    fn test_marker_must_fit() {
        let err = split_truncating("abc", 2, "...").unwrap_err();
        assert!(matches!(err, ChunkError::InvalidArgument { .. }));
        assert!(split_truncating("abc", 3, "...").is_err());
        assert!(split_lines("abc", 3, "...").is_err());
        assert!(split_truncating("abc", 4, "...").is_ok());
    }

    #[test]
    fn test_marker_counted_in_characters() {
        let chunks = split_truncating("abcdefgh", 4, "…").unwrap();
        assert_eq!(texts(&chunks), vec!["abc…", "def…", "gh"]);
    }

    #[test]
    fn test_packs_lines() {
        let chunks = split_truncating("one\ntwo\nthree\nfour", 9, "...").unwrap();
        assert_eq!(texts(&chunks), vec!["one\ntwo", "three", "four"]);
        assert_eq!(chunks[0].boundary, Boundary::Newline);
        assert_eq!(chunks[2].boundary, Boundary::End);
    }

    #[test]
    fn test_resumes_inside_cut_line() {
        let chunks = split_truncating("abcdefgh\nij", 7, "..").unwrap();
        assert_eq!(texts(&chunks), vec!["abcde..", "fgh\nij"]);
    }

    #[test]
    fn test_trailing_newline_consumed() {
        let chunks = split_truncating("abc\n", 10, "...").unwrap();
        assert_eq!(texts(&chunks), vec!["abc"]);
        assert_eq!(reassemble(&chunks, Some("...")), "abc\n");
    }

    #[test]
    fn test_crlf_line_endings_dropped() {
        let chunks = split_truncating("ab\r\ncd\r\n", 10, "...").unwrap();
        assert_eq!(texts(&chunks), vec!["ab\ncd"]);

        // `\r` no longer counts against the budget
        let chunks = split_truncating("ab\r\ncd", 5, "...").unwrap();
        assert_eq!(texts(&chunks), vec!["ab\ncd"]);

        // A lone `\r` inside a line is content
        let chunks = split_truncating("a\rb", 10, "...").unwrap();
        assert_eq!(texts(&chunks), vec!["a\rb"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(split_truncating("", 10, "...").unwrap().is_empty());
        assert!(split_lines("", 10, "...").unwrap().is_empty());
    }

    #[test]
    fn test_blank_lines_before_long_line() {
        let chunks = split_truncating("\n\nabcdefghij", 6, "...").unwrap();
        assert!(chunks.iter().all(|c| c.char_len() <= 6 && !c.text.is_empty()));
        assert_eq!(reassemble(&chunks, Some("...")), "\n\nabcdefghij");
    }

    #[test]
    fn test_lines_one_chunk_per_line() {
        let chunks = split_lines("first\r\n\nsecond\nthird\n", 100, "...").unwrap();
        assert_eq!(texts(&chunks), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_lines_truncates_long_line() {
        let chunks = split_lines("short\nabcdefghijkl", 5, "...").unwrap();
        assert_eq!(texts(&chunks), vec!["short", "ab...", "cd...", "ef...", "gh...", "ijkl"]);
    }

    fn arb_text() -> impl Strategy<Value = String> {
        prop::collection::vec(
            prop_oneof![
                5 => prop::char::range('a', 'z'),
                2 => Just('\n'),
                1 => Just('é'),
            ],
            0..300,
        )
        .prop_map(|chars| chars.into_iter().collect())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(256))]

        #[test]
        fn prop_truncating_respects_limit(text in arb_text(), max in 4usize..50) {
            for chunk in split_truncating(&text, max, "...").unwrap() {
                prop_assert!(chunk.char_len() <= max);
                prop_assert!(!chunk.text.is_empty());
            }
        }

        #[test]
        fn prop_truncating_reassembles(text in arb_text(), max in 4usize..50) {
            let chunks = split_truncating(&text, max, "...").unwrap();
            let rebuilt = reassemble(&chunks, Some("..."));
            // A lone trailing separator may be consumed
            let matches = rebuilt == text || format!("{}\n", rebuilt) == text;
            prop_assert!(matches, "rebuilt {:?} from {:?}", rebuilt, text);
        }

        #[test]
        fn prop_lines_respect_limit(text in arb_text(), max in 4usize..50) {
            for chunk in split_lines(&text, max, "...").unwrap() {
                prop_assert!(chunk.char_len() <= max);
                prop_assert!(!chunk.text.contains('\n'));
            }
        }
    }
}
