use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::Path;

use image::{DynamicImage, ImageFormat, imageops::FilterType};

use crate::aggregate::PixelDataset;
use crate::error::{PaletteError, Result};

/// Side length every image is resized to before flattening.
///
/// Clustering cost grows with the sample count, so all inputs are brought to
/// the same 150×150 grid (22 500 samples per image) regardless of their
/// original dimensions.
pub const CANONICAL_SIZE: u32 = 150;

/// Number of samples a single image contributes to a dataset.
pub const SAMPLES_PER_IMAGE: usize = (CANONICAL_SIZE * CANONICAL_SIZE) as usize;

/// Raster formats accepted by the loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupportedFormat {
    Jpeg,
    Png,
}

impl From<SupportedFormat> for ImageFormat {
    fn from(format: SupportedFormat) -> Self {
        match format {
            SupportedFormat::Jpeg => ImageFormat::Jpeg,
            SupportedFormat::Png => ImageFormat::Png,
        }
    }
}

/// Identify the format of `bytes` from their magic number. The file name plays
/// no part in this.
pub fn detect_format(bytes: &[u8]) -> Option<SupportedFormat> {
    match image::guess_format(bytes) {
        Ok(ImageFormat::Jpeg) => Some(SupportedFormat::Jpeg),
        Ok(ImageFormat::Png) => Some(SupportedFormat::Png),
        _ => None,
    }
}

/// Leading bytes needed to recognise every supported format.
const HEADER_LEN: u64 = 32;

/// Identify the format of the file at `path` from its first few bytes,
/// without reading the rest of it.
pub fn sniff_format(path: &Path) -> Result<Option<SupportedFormat>> {
    let mut header = Vec::with_capacity(HEADER_LEN as usize);
    File::open(path)
        .and_then(|file| file.take(HEADER_LEN).read_to_end(&mut header))
        .map_err(|source| io_error(path, source))?;
    Ok(detect_format(&header))
}

pub(crate) fn io_error(path: &Path, source: std::io::Error) -> PaletteError {
    match source.kind() {
        ErrorKind::NotFound | ErrorKind::PermissionDenied => PaletteError::NotFound {
            path: path.to_path_buf(),
        },
        _ => PaletteError::Io {
            path: path.to_path_buf(),
            source,
        },
    }
}

/// Read the whole file, mapping "missing" and "unreadable" to `NotFound`.
pub(crate) fn read_source(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| io_error(path, source))
}

/// Decode the image at `path` into a [`PixelDataset`] of
/// [`SAMPLES_PER_IMAGE`] RGB samples.
pub fn load_image(path: &Path) -> Result<PixelDataset> {
    let bytes = read_source(path)?;
    decode_pixels(path, &bytes)
}

/// Decode already-read file contents. `path` is only used for error reporting.
pub(crate) fn decode_pixels(path: &Path, bytes: &[u8]) -> Result<PixelDataset> {
    let format = detect_format(bytes).ok_or_else(|| PaletteError::InvalidFormat {
        path: path.to_path_buf(),
        reason: "content is not recognised as JPEG or PNG".to_string(),
    })?;

    let img = image::load_from_memory_with_format(bytes, format.into()).map_err(|e| {
        PaletteError::InvalidFormat {
            path: path.to_path_buf(),
            reason: format!("unable to decode image: {e}"),
        }
    })?;

    log::debug!(
        "decoded {} ({:?}, {}x{})",
        path.display(),
        format,
        img.width(),
        img.height()
    );

    Ok(flatten(&img))
}

// Alpha is discarded so that RGB and RGBA inputs share one channel layout.
fn flatten(img: &DynamicImage) -> PixelDataset {
    let rgb = img.to_rgb8();
    let resized =
        image::imageops::resize(&rgb, CANONICAL_SIZE, CANONICAL_SIZE, FilterType::Nearest);

    resized
        .pixels()
        .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
        .collect()
}
