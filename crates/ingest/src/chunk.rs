use serde::{Deserialize, Serialize};

/// One window of a file's content. Chunks are response-scoped: they are
/// produced per processing call and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    /// Stored file this chunk was cut from.
    pub file_id: String,
    /// 0-based position in the emitted sequence.
    pub index: usize,
    pub text: String,
    /// [start, end) character positions in the source content.
    pub offset: (usize, usize),
}

impl Chunk {
    pub fn len_chars(&self) -> usize {
        self.offset.1 - self.offset.0
    }
}
