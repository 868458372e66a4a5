use std::path::PathBuf;

/// Service configuration, built once at startup and moved into the shared
/// state. No global singleton; everything that needs a setting gets it from
/// here explicitly.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub app_name: String,
    pub app_version: String,
    pub bind_addr: String,
    /// Root under which per-project upload directories live.
    pub files_root: PathBuf,
    pub allowed_extensions: Vec<String>,
    pub max_upload_size_bytes: u64,
    /// Buffer size for the upload write path. I/O granularity only; nothing
    /// to do with the semantic chunk size used for processing.
    pub io_buffer_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            bind_addr: "0.0.0.0:3000".to_string(),
            files_root: PathBuf::from("data/files"),
            allowed_extensions: vec!["txt".to_string(), "md".to_string()],
            max_upload_size_bytes: 10 * 1024 * 1024,
            io_buffer_size: 512 * 1024,
        }
    }
}

impl AppConfig {
    /// Defaults with environment overrides applied on top.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(v) = std::env::var("APP_NAME") {
            config.app_name = v;
        }
        if let Ok(v) = std::env::var("BIND_ADDR") {
            config.bind_addr = v;
        }
        if let Ok(v) = std::env::var("FILES_ROOT") {
            config.files_root = PathBuf::from(v);
        }
        if let Ok(v) = std::env::var("ALLOWED_EXTENSIONS") {
            config.allowed_extensions = v
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(v) = std::env::var("MAX_UPLOAD_SIZE_BYTES") {
            if let Ok(n) = v.parse() {
                config.max_upload_size_bytes = n;
            }
        }
        if let Ok(v) = std::env::var("IO_BUFFER_SIZE") {
            if let Ok(n) = v.parse() {
                config.io_buffer_size = n;
            }
        }
        config
    }
}
