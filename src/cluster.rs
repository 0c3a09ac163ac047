use std::collections::HashSet;

use kmeans_colors::get_kmeans;
use palette::{IntoColor, Lab, LinSrgb, Srgb};

use crate::aggregate::{PixelDataset, PixelSample};
use crate::error::{PaletteError, Result};
use crate::rank::{Centroid, PaletteEntry};

/// Upper bound on K; k-means assignments are stored as `u8`.
pub const MAX_CLUSTERS: usize = 256;

/// Colour space the k-means iterations run in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClusterSpace {
    /// Euclidean distance on RGB channels.
    #[default]
    Rgb,
    /// Euclidean distance in CIE Lab, closer to perceived difference.
    Lab,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct KmeansParams {
    pub max_iterations: usize,
    /// Stop once the score changes by less than this between iterations.
    pub convergence: f32,
    pub seed: u64,
    pub space: ClusterSpace,
}

impl Default for KmeansParams {
    fn default() -> Self {
        Self {
            max_iterations: 20,
            convergence: 1e-4,
            seed: 0,
            space: ClusterSpace::Rgb,
        }
    }
}

/// Partition `dataset` into `k` colour clusters and count the samples nearest
/// to each centre.
///
/// If the dataset holds no more than `k` distinct colours those colours are
/// returned directly, so the result may be shorter than `k`. Otherwise exactly
/// `k` entries come back, including centres that no sample is closest to.
pub fn cluster(
    dataset: &PixelDataset,
    k: usize,
    params: &KmeansParams,
) -> Result<Vec<PaletteEntry>> {
    if k == 0 || k > MAX_CLUSTERS {
        return Err(PaletteError::InvalidClusterCount(k));
    }
    if dataset.is_empty() {
        return Err(PaletteError::EmptyDataset);
    }

    let samples = dataset.samples();
    let centroids = match distinct_colours(samples, k) {
        Some(colours) => {
            log::debug!("{} distinct colours <= k={k}, skipping k-means", colours.len());
            colours
        }
        None => {
            log::debug!(
                "k-means: k={k} samples={} space={:?} max_iter={} seed={}",
                samples.len(),
                params.space,
                params.max_iterations,
                params.seed
            );
            run_kmeans(samples, k, params)
        }
    };

    Ok(quantize(samples, &centroids))
}

/// The distinct colours of `samples` in first-seen order, or `None` once there
/// are more than `limit`.
fn distinct_colours(samples: &[PixelSample], limit: usize) -> Option<Vec<Centroid>> {
    let mut seen = HashSet::new();
    let mut colours = Vec::new();

    for s in samples {
        if seen.insert(s.map(f32::to_bits)) {
            if colours.len() == limit {
                return None;
            }
            colours.push(Centroid(*s));
        }
    }
    Some(colours)
}

fn run_kmeans(samples: &[PixelSample], k: usize, params: &KmeansParams) -> Vec<Centroid> {
    let to_srgb = |&[r, g, b]: &PixelSample| Srgb::new(r / 255.0, g / 255.0, b / 255.0);
    let from_srgb = |c: Srgb<f32>| Centroid::new(c.red * 255.0, c.green * 255.0, c.blue * 255.0);

    match params.space {
        ClusterSpace::Rgb => {
            let buf: Vec<Srgb> = samples.iter().map(to_srgb).collect();
            let result = get_kmeans(
                k,
                params.max_iterations,
                params.convergence,
                false,
                &buf,
                params.seed,
            );
            result.centroids.into_iter().map(from_srgb).collect()
        }
        ClusterSpace::Lab => {
            let buf: Vec<Lab> = samples
                .iter()
                .map(|s| {
                    let linear: LinSrgb = to_srgb(s).into_linear();
                    linear.into_color()
                })
                .collect();
            let result = get_kmeans(
                k,
                params.max_iterations,
                params.convergence,
                false,
                &buf,
                params.seed,
            );
            result
                .centroids
                .iter()
                .map(|&lab| {
                    let linear: LinSrgb = lab.into_color();
                    from_srgb(Srgb::from_linear(linear))
                })
                .collect()
        }
    }
}

/// Count, for every centroid, the samples closest to it. Ties go to the
/// lower index.
fn quantize(samples: &[PixelSample], centroids: &[Centroid]) -> Vec<PaletteEntry> {
    let mut counts = vec![0usize; centroids.len()];

    for s in samples {
        let mut best = 0;
        let mut best_dist = f32::INFINITY;
        for (idx, c) in centroids.iter().enumerate() {
            let dr = s[0] - c.0[0];
            let dg = s[1] - c.0[1];
            let db = s[2] - c.0[2];
            let dist = dr * dr + dg * dg + db * db;
            if dist < best_dist {
                best_dist = dist;
                best = idx;
            }
        }
        counts[best] += 1;
    }

    centroids
        .iter()
        .zip(counts)
        .map(|(&centroid, count)| PaletteEntry::new(centroid, count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(n: usize) -> PixelDataset {
        (0..n)
            .map(|i| {
                let v = (i * 255 / n) as f32;
                [v, 255.0 - v, (i % 7) as f32 * 30.0]
            })
            .collect()
    }

    #[test]
    fn uniform_image_is_forced() {
        let data = PixelDataset::from(vec![[255.0, 0.0, 0.0]; 100]);
        let entries = cluster(&data, 3, &KmeansParams::default()).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].count, 100);
        assert_eq!(entries[0].hex(), "#ff0000");
    }

    #[test]
    fn few_distinct_colours_are_returned_exactly() {
        let mut samples: Vec<PixelSample> = vec![[0.0, 0.0, 0.0]; 30];
        samples.extend(vec![[255.0, 255.0, 255.0]; 70]);
        let entries = cluster(&samples.into(), 6, &KmeansParams::default()).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], PaletteEntry::new(Centroid::new(0.0, 0.0, 0.0), 30));
        assert_eq!(entries[1], PaletteEntry::new(Centroid::new(255.0, 255.0, 255.0), 70));
    }

    #[test]
    fn kmeans_counts_cover_every_sample() {
        let data = gradient(2_000);
        for space in [ClusterSpace::Rgb, ClusterSpace::Lab] {
            let params = KmeansParams { space, ..KmeansParams::default() };
            let entries = cluster(&data, 5, &params).unwrap();
            assert_eq!(entries.len(), 5);
            assert_eq!(entries.iter().map(|e| e.count).sum::<usize>(), data.len());
        }
    }

    #[test]
    fn unused_centroids_keep_a_zero_count() {
        let samples = [[10.0, 10.0, 10.0], [12.0, 12.0, 12.0], [200.0, 0.0, 0.0]];
        let centroids = [
            Centroid::new(11.0, 11.0, 11.0),
            Centroid::new(0.0, 0.0, 250.0),
            Centroid::new(190.0, 5.0, 5.0),
        ];
        let counts: Vec<usize> = quantize(&samples, &centroids).iter().map(|e| e.count).collect();
        assert_eq!(counts, vec![2, 0, 1]);
    }

    #[test]
    fn rejects_empty_dataset_and_bad_k() {
        let params = KmeansParams::default();
        assert!(matches!(
            cluster(&PixelDataset::new(), 3, &params),
            Err(PaletteError::EmptyDataset)
        ));
        let data = gradient(10);
        assert!(matches!(
            cluster(&data, 0, &params),
            Err(PaletteError::InvalidClusterCount(0))
        ));
        assert!(matches!(
            cluster(&data, 257, &params),
            Err(PaletteError::InvalidClusterCount(257))
        ));
    }
}
