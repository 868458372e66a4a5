use std::path::Path;

use crate::error::IngestError;

/// Policy an upload descriptor must pass before any bytes are stored.
/// Pure configuration; validation itself does no I/O.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    /// Allowed file extensions, compared case-insensitively and without the
    /// leading dot.
    pub allowed_extensions: Vec<String>,
    pub max_size_bytes: u64,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            allowed_extensions: vec!["txt".to_string(), "md".to_string()],
            max_size_bytes: 10 * 1024 * 1024,
        }
    }
}

impl UploadPolicy {
    /// Check a declared file name and (when known) declared size.
    ///
    /// The returned error names the violated rule so the caller can surface
    /// it to the uploader.
    pub fn validate(&self, file_name: &str, declared_size: Option<u64>) -> Result<(), IngestError> {
        let extension = Path::new(file_name).extension().and_then(|e| e.to_str());
        let allowed = extension.is_some_and(|ext| {
            self.allowed_extensions
                .iter()
                .any(|a| a.eq_ignore_ascii_case(ext))
        });
        if !allowed {
            return Err(IngestError::InvalidExtension {
                extension: extension.map(str::to_string),
            });
        }

        if let Some(size) = declared_size {
            if size > self.max_size_bytes {
                return Err(IngestError::FileTooLarge {
                    size,
                    max: self.max_size_bytes,
                });
            }
        }

        Ok(())
    }
}
