use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt, BufWriter};
use tracing::debug;

use crate::error::IngestError;
use crate::file_id::storage_path;

/// Destination for an upload's bytes. Implementations receive bounded-size
/// pieces and must not assume any particular piece size.
#[async_trait]
pub trait UploadSink: Send {
    async fn write_chunk(&mut self, buf: &[u8]) -> Result<(), IngestError>;
    /// Flush buffered bytes. Until this succeeds the file must be treated as
    /// partially written and its id must not be handed out.
    async fn finish(&mut self) -> Result<(), IngestError>;
}

/// Sink writing to a local file through a fixed-capacity buffer.
pub struct LocalFileSink {
    writer: BufWriter<fs::File>,
}

#[async_trait]
impl UploadSink for LocalFileSink {
    async fn write_chunk(&mut self, buf: &[u8]) -> Result<(), IngestError> {
        self.writer.write_all(buf).await?;
        Ok(())
    }

    async fn finish(&mut self) -> Result<(), IngestError> {
        self.writer.flush().await?;
        Ok(())
    }
}

/// Local-disk backend for project-scoped uploads.
///
/// Stored files are immutable once written; reads never race writes because
/// a file id is only returned to callers after its sink has finished.
pub struct LocalStore {
    files_root: PathBuf,
    io_buffer_size: usize,
}

impl LocalStore {
    pub fn new(files_root: impl Into<PathBuf>, io_buffer_size: usize) -> Self {
        Self {
            files_root: files_root.into(),
            io_buffer_size,
        }
    }

    pub fn files_root(&self) -> &Path {
        &self.files_root
    }

    /// Resolve the directory for a project, creating it on first use.
    pub async fn project_dir(&self, project_id: &str) -> Result<PathBuf, IngestError> {
        let dir = self.files_root.join(project_id);
        fs::create_dir_all(&dir).await?;
        Ok(dir)
    }

    pub fn path_for(&self, project_id: &str, file_id: &str) -> PathBuf {
        storage_path(&self.files_root, project_id, file_id)
    }

    /// Open a sink for a new upload under the project's directory.
    pub async fn create_sink(
        &self,
        project_id: &str,
        file_id: &str,
    ) -> Result<LocalFileSink, IngestError> {
        let dir = self.project_dir(project_id).await?;
        let path = dir.join(file_id);
        debug!(project_id, file_id, "opening upload sink");
        let file = fs::File::create(&path).await?;
        Ok(LocalFileSink {
            writer: BufWriter::with_capacity(self.io_buffer_size, file),
        })
    }

    /// Remove a partially written upload after a failed write.
    pub async fn discard(&self, project_id: &str, file_id: &str) -> Result<(), IngestError> {
        fs::remove_file(self.path_for(project_id, file_id)).await?;
        Ok(())
    }

    /// Read a stored upload back as text for processing.
    pub async fn read_content(
        &self,
        project_id: &str,
        file_id: &str,
    ) -> Result<String, IngestError> {
        let content = fs::read_to_string(self.path_for(project_id, file_id)).await?;
        Ok(content)
    }
}

/// Copy `reader` into `sink` in pieces of at most `io_buffer_size` bytes,
/// keeping memory use bounded regardless of upload size. Returns the number
/// of bytes written. On error the sink is left unfinished.
pub async fn store_stream<R, S>(
    mut reader: R,
    sink: &mut S,
    io_buffer_size: usize,
) -> Result<u64, IngestError>
where
    R: AsyncRead + Unpin,
    S: UploadSink + ?Sized,
{
    let mut buf = vec![0u8; io_buffer_size];
    let mut written = 0u64;
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        sink.write_chunk(&buf[..n]).await?;
        written += n as u64;
    }
    sink.finish().await?;
    Ok(written)
}
