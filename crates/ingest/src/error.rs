use thiserror::Error;

/// Everything that can go wrong between accepting an upload and handing
/// chunks back. Display strings double as the caller-facing signal for the
/// validation and parameter arms; I/O detail stays server-side.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("File extension not allowed")]
    InvalidExtension { extension: Option<String> },

    #[error("File size exceeds the maximum allowed")]
    FileTooLarge { size: u64, max: u64 },

    #[error("chunk_size must be positive and overlap_size must be smaller than chunk_size")]
    InvalidChunkParams {
        chunk_size: usize,
        overlap_size: usize,
    },

    #[error("chunking produced {produced} chunk(s), at least 2 required")]
    DegenerateChunking { produced: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
