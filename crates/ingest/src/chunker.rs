use serde::Deserialize;

use crate::chunk::Chunk;
use crate::error::IngestError;

/// Window parameters for one processing call.
///
/// Sizes count Unicode characters, not bytes, since stored content may be
/// multi-byte UTF-8.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ChunkParams {
    pub chunk_size: usize,
    pub overlap_size: usize,
}

impl ChunkParams {
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.chunk_size == 0 || self.overlap_size >= self.chunk_size {
            return Err(IngestError::InvalidChunkParams {
                chunk_size: self.chunk_size,
                overlap_size: self.overlap_size,
            });
        }
        Ok(())
    }

    /// Distance between successive window starts. At least 1 for valid params.
    pub fn step(&self) -> usize {
        self.chunk_size - self.overlap_size
    }
}

/// Split `content` into overlapping windows.
///
/// Windows span `[pos, pos + chunk_size)` clipped to the content length,
/// starting at 0 and advancing by `step`. Emission stops once a window
/// reaches the content end, so no window is a pure suffix of its
/// predecessor. The last window may be shorter than `chunk_size`; it is
/// still emitted. Empty content yields an empty sequence.
pub fn chunk_text(
    file_id: &str,
    content: &str,
    params: ChunkParams,
) -> Result<Vec<Chunk>, IngestError> {
    params.validate()?;

    let chars: Vec<char> = content.chars().collect();
    let step = params.step();

    let mut chunks = Vec::new();
    let mut pos = 0;
    while pos < chars.len() {
        let end = usize::min(pos + params.chunk_size, chars.len());
        chunks.push(Chunk {
            file_id: file_id.to_string(),
            index: chunks.len(),
            text: chars[pos..end].iter().collect(),
            offset: (pos, end),
        });
        if end == chars.len() {
            // The window reached the end; a further step would only emit a
            // suffix already contained in this chunk.
            break;
        }
        pos += step;
    }

    Ok(chunks)
}

/// Chunk a stored file's content, rejecting degenerate results.
///
/// A run that yields zero or one chunk means the content fit inside a single
/// window; the caller should use the whole document instead, so it is
/// reported as a failure distinct from an unreadable file.
pub fn process_content(
    file_id: &str,
    content: &str,
    params: ChunkParams,
) -> Result<Vec<Chunk>, IngestError> {
    let chunks = chunk_text(file_id, content, params)?;
    if chunks.len() <= 1 {
        return Err(IngestError::DegenerateChunking {
            produced: chunks.len(),
        });
    }
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(chunk_size: usize, overlap_size: usize) -> ChunkParams {
        ChunkParams {
            chunk_size,
            overlap_size,
        }
    }

    #[test]
    fn alphabet_example() {
        // 26 letters, window 10, overlap 3 -> step 7 -> [0,10) [7,17) [14,24) [21,26)
        let content: String = ('a'..='z').collect();
        let chunks = process_content("f1", &content, params(10, 3)).unwrap();

        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].text, "abcdefghij");
        assert_eq!(chunks[1].text, "hijklmnopq");
        assert_eq!(chunks[2].text, "opqrstuvwx");
        assert_eq!(chunks[3].text, "vwxyz");
        assert_eq!(chunks[3].offset, (21, 26));
    }

    #[test]
    fn window_starts_and_coverage() {
        let content = "x".repeat(100);
        let p = params(10, 3);
        let chunks = chunk_text("f1", &content, p).unwrap();

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert_eq!(chunk.offset.0, i * p.step());
        }
        // No gaps: each window starts at or before the previous end.
        for pair in chunks.windows(2) {
            assert!(pair[1].offset.0 <= pair[0].offset.1);
        }
        assert_eq!(chunks.last().unwrap().offset.1, 100);
    }

    #[test]
    fn adjacent_chunks_share_overlap() {
        let content: String = ('a'..='z').cycle().take(80).collect();
        let p = params(12, 5);
        let chunks = chunk_text("f1", &content, p).unwrap();

        for pair in chunks.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if prev.len_chars() < p.chunk_size {
                // Clipped at content end; tail overlap no longer holds.
                continue;
            }
            let tail: String = prev.text.chars().skip(p.step()).collect();
            let head: String = next.text.chars().take(p.overlap_size).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn chunking_is_deterministic() {
        let content = "the quick brown fox jumps over the lazy dog".repeat(3);
        let a = chunk_text("f1", &content, params(16, 4)).unwrap();
        let b = chunk_text("f1", &content, params(16, 4)).unwrap();

        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.text, y.text);
            assert_eq!(x.offset, y.offset);
        }
    }

    #[test]
    fn content_shorter_than_window_is_degenerate() {
        let err = process_content("f1", "abcde", params(10, 3)).unwrap_err();
        assert!(matches!(
            err,
            IngestError::DegenerateChunking { produced: 1 }
        ));
    }

    #[test]
    fn content_exactly_one_window_is_degenerate() {
        let content = "x".repeat(10);
        let err = process_content("f1", &content, params(10, 3)).unwrap_err();
        assert!(matches!(
            err,
            IngestError::DegenerateChunking { produced: 1 }
        ));
    }

    #[test]
    fn two_windows_is_the_success_boundary() {
        // 2 * chunk_size - overlap_size characters fill exactly two windows.
        let content = "x".repeat(2 * 10 - 3);
        let chunks = process_content("f1", &content, params(10, 3)).unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[1].offset, (7, 17));
    }

    #[test]
    fn empty_content_is_degenerate() {
        let err = process_content("f1", "", params(10, 3)).unwrap_err();
        assert!(matches!(
            err,
            IngestError::DegenerateChunking { produced: 0 }
        ));
    }

    #[test]
    fn zero_chunk_size_rejected() {
        let err = chunk_text("f1", "abc", params(0, 0)).unwrap_err();
        assert!(matches!(err, IngestError::InvalidChunkParams { .. }));
    }

    #[test]
    fn overlap_not_smaller_than_chunk_size_rejected() {
        let err = chunk_text("f1", "abc", params(5, 5)).unwrap_err();
        assert!(matches!(err, IngestError::InvalidChunkParams { .. }));

        let err = chunk_text("f1", "abc", params(5, 9)).unwrap_err();
        assert!(matches!(err, IngestError::InvalidChunkParams { .. }));
    }

    #[test]
    fn zero_overlap_is_allowed() {
        let content = "x".repeat(30);
        let chunks = chunk_text("f1", &content, params(10, 0)).unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1].offset, (10, 20));
    }

    #[test]
    fn sizes_count_characters_not_bytes() {
        // 3 bytes per char in UTF-8; windows must still split on characters.
        let content = "日本語のテキストです".repeat(2); // 20 chars
        let chunks = chunk_text("f1", &content, params(8, 2)).unwrap();

        assert_eq!(chunks[0].text.chars().count(), 8);
        assert_eq!(chunks[0].offset, (0, 8));
        assert_eq!(chunks.last().unwrap().offset.1, 20);
    }
}
