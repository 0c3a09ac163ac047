use std::path::PathBuf;

use thiserror::Error;

/// Opaque failure reported by a [`RemoteSource`](crate::remote::RemoteSource).
pub type RemoteError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum PaletteError {
    #[error("no such file or directory: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("{} is not a JPEG or PNG image: {reason}", path.display())]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("no pixel data to cluster")]
    EmptyDataset,

    #[error("remote source failed for profile `{profile}`: {source}")]
    RemoteSourceFailure {
        profile: String,
        #[source]
        source: RemoteError,
    },

    #[error("cluster count must be between 1 and 256, got {0}")]
    InvalidClusterCount(usize),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T, E = PaletteError> = std::result::Result<T, E>;
