pub mod chunk;
pub mod chunker;
pub mod error;
pub mod file_id;
pub mod storage;
pub mod validator;

pub use chunk::Chunk;
pub use chunker::{ChunkParams, chunk_text, process_content};
pub use error::IngestError;
pub use file_id::{FileIdGenerator, TokenSource, UuidTokenSource};
pub use storage::{LocalStore, UploadSink, store_stream};
pub use validator::UploadPolicy;
