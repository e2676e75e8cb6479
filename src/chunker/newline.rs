//! Newline-preferring splitter.
//!
//! Each chunk is tentatively cut `max_chunk_size` characters after its start.
//! The characters just before that cut are scanned right to left for a `\n`;
//! the first one found (the rightmost) becomes the split point and is
//! consumed. With no newline in the window the cut is a raw character cut.

use super::{Boundary, CharIndex, Chunk, ChunkError};

pub(super) fn check_limit(max_chunk_size: usize) -> Result<(), ChunkError> {
    if max_chunk_size == 0 {
        return Err(ChunkError::invalid_argument(
            "max_chunk_size must be at least 1",
        ));
    }
    Ok(())
}

/// Split `text` into chunks of at most `max_chunk_size` characters.
///
/// Returns only the chunk texts; see [`split_chunks`] for boundary details.
pub fn split(
    text: &str,
    max_chunk_size: usize,
    search_limit: Option<usize>,
) -> Result<Vec<String>, ChunkError> {
    Ok(split_chunks(text, max_chunk_size, search_limit)?
        .into_iter()
        .map(|chunk| chunk.text)
        .collect())
}

/// Split `text` into chunks of at most `max_chunk_size` characters,
/// preferring to cut on a newline.
///
/// A newline qualifies when it lies inside the current chunk and at most
/// `search_limit` characters separate it from the tentative cut. A newline
/// at the very start of a chunk never qualifies, so no chunk is empty.
/// `search_limit` of `None`, or larger than `max_chunk_size`, disables the
/// scan and every split is a raw character cut.
///
/// Empty input yields no chunks. Otherwise the result reassembles to `text`
/// exactly (see [`super::reassemble`]).
pub fn split_chunks(
    text: &str,
    max_chunk_size: usize,
    search_limit: Option<usize>,
) -> Result<Vec<Chunk>, ChunkError> {
    check_limit(max_chunk_size)?;

    let window = search_limit.filter(|&limit| limit <= max_chunk_size);
    let index = CharIndex::new(text);
    let total = index.len();

    // Every non-final chunk advances the offset by at least this much
    let min_chunk_size = match window {
        Some(limit) if max_chunk_size > limit => max_chunk_size - limit,
        _ => 1,
    };
    let mut chunks = Vec::with_capacity(total.div_ceil(min_chunk_size));

    let mut offset = 0;
    while offset < total {
        let end = offset + max_chunk_size;
        if end >= total {
            chunks.push(Chunk::new(index.slice(offset, total), Boundary::End));
            break;
        }

        match window.and_then(|limit| rightmost_newline(&index, offset, end, limit)) {
            Some(split_at) => {
                chunks.push(Chunk::new(index.slice(offset, split_at), Boundary::Newline));
                offset = split_at + 1;
            }
            None => {
                chunks.push(Chunk::new(index.slice(offset, end), Boundary::Forced));
                offset = end;
            }
        }
    }

    tracing::trace!(
        chars = total,
        chunks = chunks.len(),
        max_chunk_size,
        "split text on newlines"
    );
    Ok(chunks)
}

/// Scan `end - 1, end - 2, ...` down to `end - 1 - limit`, never reaching
/// the chunk start itself.
fn rightmost_newline(index: &CharIndex<'_>, offset: usize, end: usize, limit: usize) -> Option<usize> {
    let lowest = end.saturating_sub(limit + 1).max(offset + 1);
    (lowest..end).rev().find(|&pos| index.is_newline(pos))
}
