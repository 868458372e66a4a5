use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Source of the random token embedded in every file id. Injectable so tests
/// can substitute a deterministic sequence.
pub trait TokenSource: Send + Sync {
    fn token(&self) -> String;
}

/// Default source: v4 UUID in simple form, 32 hex characters carrying 122
/// random bits. Collisions within a project are negligible at any realistic
/// upload count, so generation never consults the filesystem.
#[derive(Debug, Default)]
pub struct UuidTokenSource;

impl TokenSource for UuidTokenSource {
    fn token(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Produces the unique file ids that double as storage keys.
pub struct FileIdGenerator {
    tokens: Box<dyn TokenSource>,
}

impl Default for FileIdGenerator {
    fn default() -> Self {
        Self::new(Box::new(UuidTokenSource))
    }
}

impl FileIdGenerator {
    pub fn new(tokens: Box<dyn TokenSource>) -> Self {
        Self { tokens }
    }

    /// Build a file id from the uploaded name: sanitized stem, `_`, a fresh
    /// token, and the original extension. Ids are immutable and never reused.
    pub fn generate(&self, original_name: &str) -> String {
        let (stem, extension) = split_name(original_name);
        let stem = sanitize_stem(stem);
        let token = self.tokens.token();
        match extension {
            Some(ext) => format!("{stem}_{token}.{ext}"),
            None => format!("{stem}_{token}"),
        }
    }
}

/// Where a stored upload lives: `<files_root>/<project_id>/<file_id>`.
pub fn storage_path(files_root: &Path, project_id: &str, file_id: &str) -> PathBuf {
    files_root.join(project_id).join(file_id)
}

fn split_name(name: &str) -> (&str, Option<&str>) {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (name, None),
    }
}

/// Keep `[A-Za-z0-9_-]`, map whitespace to `_`, drop everything else. An
/// empty result falls back to `"file"` so the id still has a readable stem.
fn sanitize_stem(stem: &str) -> String {
    let cleaned: String = stem
        .trim()
        .chars()
        .filter_map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                Some(c)
            } else if c.is_whitespace() {
                Some('_')
            } else {
                None
            }
        })
        .collect();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}
