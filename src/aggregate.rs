use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PaletteError, Result};
use crate::loader;

/// One pixel as `[r, g, b]`, each channel in `0.0..=255.0`.
pub type PixelSample = [f32; 3];

/// Row-major samples of one or more images, in the order they were loaded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PixelDataset {
    samples: Vec<PixelSample>,
}

impl PixelDataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[PixelSample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PixelSample> {
        self.samples.iter()
    }

    /// Move all samples of `other` onto the end of this dataset.
    pub fn append(&mut self, mut other: PixelDataset) {
        self.samples.append(&mut other.samples);
    }
}

impl From<Vec<PixelSample>> for PixelDataset {
    fn from(samples: Vec<PixelSample>) -> Self {
        Self { samples }
    }
}

impl FromIterator<PixelSample> for PixelDataset {
    fn from_iter<I: IntoIterator<Item = PixelSample>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}

/// Build one dataset from `path`, which may be a single image or a directory
/// of images.
///
/// A file is handed straight to the loader and its errors are returned as-is.
/// For a directory, direct children are visited in file-name order; anything
/// that is not a JPEG or PNG by content is skipped. A directory that yields no
/// usable image is an [`PaletteError::EmptyDataset`].
pub fn aggregate(path: &Path) -> Result<PixelDataset> {
    let meta = fs::metadata(path).map_err(|source| loader::io_error(path, source))?;

    if meta.is_dir() {
        aggregate_dir(path)
    } else if meta.is_file() {
        loader::load_image(path)
    } else {
        Err(PaletteError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

fn aggregate_dir(dir: &Path) -> Result<PixelDataset> {
    let io_err = |source| PaletteError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        // follows symlinks, unlike DirEntry::file_type
        if path.is_file() {
            entries.push(path);
        }
    }
    entries.sort();

    let mut dataset = PixelDataset::new();
    let mut used = 0usize;

    for path in &entries {
        match loader::sniff_format(path) {
            Ok(Some(_)) => {}
            Ok(None) => {
                log::debug!("skipping {}: not a JPEG or PNG", path.display());
                continue;
            }
            Err(e) => {
                log::warn!("skipping {}: {e}", path.display());
                continue;
            }
        }

        match loader::load_image(path) {
            Ok(pixels) => {
                dataset.append(pixels);
                used += 1;
            }
            Err(e) => log::warn!("skipping {e}"),
        }
    }

    log::debug!(
        "aggregated {used} of {} entries in {} ({} samples)",
        entries.len(),
        dir.display(),
        dataset.len()
    );

    if dataset.is_empty() {
        return Err(PaletteError::EmptyDataset);
    }
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let mut a = PixelDataset::from(vec![[1.0, 1.0, 1.0]]);
        let b: PixelDataset = vec![[2.0, 2.0, 2.0], [3.0, 3.0, 3.0]].into_iter().collect();
        a.append(b);
        assert_eq!(
            a.samples(),
            &[[1.0, 1.0, 1.0], [2.0, 2.0, 2.0], [3.0, 3.0, 3.0]]
        );
    }

    #[test]
    fn missing_path_is_not_found() {
        let err = aggregate(Path::new("/no/such/palette/source")).unwrap_err();
        assert!(matches!(err, PaletteError::NotFound { .. }));
    }

    #[test]
    fn empty_directory_is_empty_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let err = aggregate(dir.path()).unwrap_err();
        assert!(matches!(err, PaletteError::EmptyDataset));
    }
}
