//! Dominant-colour palettes for images.
//!
//! A run goes: decode and resize every image ([`loader`]), concatenate the
//! pixels of all inputs ([`aggregate`]), run k-means over them and count the
//! samples nearest to each centre ([`cluster`]), then sort by count
//! ([`rank`]).
//!
//! ```no_run
//! use colour_palette::{ImageSource, PaletteConfig, Pipeline};
//!
//! let pipeline = Pipeline::new(PaletteConfig::default().with_cluster_count(6));
//! let palette = pipeline.run(&ImageSource::from("photo.jpg"))?;
//! for entry in &palette {
//!     println!("{} {}", entry.hex(), entry.count);
//! }
//! # Ok::<(), colour_palette::PaletteError>(())
//! ```

pub mod aggregate;
pub mod cluster;
pub mod error;
pub mod loader;
pub mod rank;
pub mod remote;
pub mod swatch;

use std::path::{Path, PathBuf};

pub use aggregate::{PixelDataset, PixelSample, aggregate};
pub use cluster::{ClusterSpace, KmeansParams, cluster};
pub use error::{PaletteError, Result};
pub use loader::{CANONICAL_SIZE, SAMPLES_PER_IMAGE, load_image};
pub use rank::{Centroid, Palette, PaletteEntry, rank};
pub use remote::{Credentials, RemoteSource, StagingDir};
pub use swatch::{Swatch, SwatchBoard};

/// Options for a palette run.
#[derive(Clone, Debug)]
pub struct PaletteConfig {
    /// Number of colours to cluster into (K).
    pub cluster_count: usize,
    /// Allow [`ImageSource::Profile`] inputs.
    pub use_remote_source: bool,
    /// How many recent posts to fetch for a profile.
    pub remote_image_count: usize,
    pub remote_credentials: Option<Credentials>,
    /// Fixed scratch directory for fetched images, wiped at the start of
    /// every remote run. `None` gives each run its own temporary directory.
    pub staging_dir: Option<PathBuf>,
    pub kmeans: KmeansParams,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            cluster_count: 6,
            use_remote_source: false,
            remote_image_count: 9,
            remote_credentials: None,
            staging_dir: None,
            kmeans: KmeansParams::default(),
        }
    }
}

impl PaletteConfig {
    pub fn with_cluster_count(mut self, k: usize) -> Self {
        self.cluster_count = k;
        self
    }

    pub fn with_remote_source(
        mut self,
        image_count: usize,
        credentials: Option<Credentials>,
    ) -> Self {
        self.use_remote_source = true;
        self.remote_image_count = image_count;
        self.remote_credentials = credentials;
        self
    }

    pub fn with_staging_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.staging_dir = Some(dir.into());
        self
    }

    pub fn with_kmeans(mut self, kmeans: KmeansParams) -> Self {
        self.kmeans = kmeans;
        self
    }
}

/// Where the pixels of a run come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ImageSource {
    /// An image file or a directory of images.
    Path(PathBuf),
    /// A profile handle, resolved through a [`RemoteSource`].
    Profile(String),
}

impl From<&str> for ImageSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

/// Runs the load, cluster and rank stages for one source at a time.
///
/// Holds no state between runs, so a failed run has no effect on the next.
pub struct Pipeline<'a> {
    config: PaletteConfig,
    remote: Option<&'a dyn RemoteSource>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: PaletteConfig) -> Self {
        Self { config, remote: None }
    }

    pub fn with_remote(mut self, remote: &'a dyn RemoteSource) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn config(&self) -> &PaletteConfig {
        &self.config
    }

    /// Resolve `source` into the combined pixel data of all its images.
    pub fn dataset(&self, source: &ImageSource) -> Result<PixelDataset> {
        match source {
            ImageSource::Path(path) => aggregate(path),
            ImageSource::Profile(profile) => {
                let remote = match self.remote {
                    Some(remote) if self.config.use_remote_source => remote,
                    _ => {
                        return Err(PaletteError::RemoteSourceFailure {
                            profile: profile.clone(),
                            source: "remote source is not enabled".into(),
                        });
                    }
                };
                let staging = StagingDir::for_run(self.config.staging_dir.as_deref())?;
                remote::fetch_into(
                    remote,
                    profile,
                    self.config.remote_image_count,
                    self.config.remote_credentials.as_ref(),
                    staging.path(),
                )?;
                aggregate(staging.path())
            }
        }
    }

    /// Extract the ranked palette of `source`.
    pub fn run(&self, source: &ImageSource) -> Result<Palette> {
        let dataset = self.dataset(source)?;
        let entries = cluster(&dataset, self.config.cluster_count, &self.config.kmeans)?;
        let palette = rank(entries);

        log::info!(
            "{} samples -> {} colours (dominant {})",
            dataset.len(),
            palette.len(),
            palette.dominant().map(PaletteEntry::hex).unwrap_or_default()
        );
        Ok(palette)
    }
}

/// Palette of the image or directory at `path` with default settings and
/// `k` colours.
pub fn extract_palette(path: impl AsRef<Path>, k: usize) -> Result<Palette> {
    Pipeline::new(PaletteConfig::default().with_cluster_count(k))
        .run(&ImageSource::Path(path.as_ref().to_path_buf()))
}
