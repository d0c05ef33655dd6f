use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, VisionError>;

/// Everything a command can fail with. Only `Config` is fatal, and only at startup.
#[derive(Debug, thiserror::Error)]
pub enum VisionError {
    #[error("Image '{}' not found", .0.display())]
    FileNotFound(PathBuf),

    #[error(
        "Unsupported image format for '{}' (supported: .jpg, .jpeg, .png, .gif, .webp)",
        .0.display()
    )]
    UnsupportedFormat(PathBuf),

    #[error("Unable to read '{}': {source}", .path.display())]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Gateway error: {0}")]
    Gateway(String),

    #[error("{0}")]
    Usage(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl VisionError {
    pub fn io_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoRead {
            path: path.into(),
            source,
        }
    }
}
