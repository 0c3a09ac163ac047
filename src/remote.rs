//! Contract for fetching a profile's recent images into a local directory.
//!
//! No network client ships with this crate. Callers plug in their own
//! [`RemoteSource`] and the pipeline takes care of the staging directory.

use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::{PaletteError, RemoteError, Result};

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Something that can download the most recent posts of a profile.
pub trait RemoteSource {
    /// Write up to `count` of the latest JPEG/PNG images posted by `profile`
    /// into `staging`, which exists and is empty when this is called.
    fn fetch_recent(
        &self,
        profile: &str,
        count: usize,
        credentials: Option<&Credentials>,
        staging: &Path,
    ) -> std::result::Result<(), RemoteError>;
}

/// Recreate `dir` as an empty directory, discarding anything a previous run
/// left behind.
pub fn prepare_staging(dir: &Path) -> Result<()> {
    let io_err = |source| PaletteError::Io {
        path: dir.to_path_buf(),
        source,
    };

    match fs::remove_dir_all(dir) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(io_err(e)),
    }
    fs::create_dir_all(dir).map_err(io_err)
}

/// Scratch directory holding one run's fetched images.
#[derive(Debug)]
pub enum StagingDir {
    /// A configured directory, emptied when the run starts.
    Fixed(PathBuf),
    /// A directory private to this run, removed on drop.
    Temp(TempDir),
}

impl StagingDir {
    /// Empty `configured` if given, otherwise create a fresh temporary
    /// directory that no other run can see.
    pub fn for_run(configured: Option<&Path>) -> Result<Self> {
        match configured {
            Some(dir) => {
                prepare_staging(dir)?;
                Ok(Self::Fixed(dir.to_path_buf()))
            }
            None => tempfile::Builder::new()
                .prefix("colour-palette-")
                .tempdir()
                .map(Self::Temp)
                .map_err(|source| PaletteError::Io {
                    path: std::env::temp_dir(),
                    source,
                }),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Self::Fixed(dir) => dir,
            Self::Temp(dir) => dir.path(),
        }
    }
}

/// Run `source` against an empty `staging` directory.
pub(crate) fn fetch_into(
    source: &dyn RemoteSource,
    profile: &str,
    count: usize,
    credentials: Option<&Credentials>,
    staging: &Path,
) -> Result<()> {
    log::debug!(
        "fetching {count} images for `{profile}` into {}",
        staging.display()
    );
    source
        .fetch_recent(profile, count, credentials, staging)
        .map_err(|source| PaletteError::RemoteSourceFailure {
            profile: profile.to_string(),
            source,
        })
}
