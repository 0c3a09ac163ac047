use std::fmt;

/// Lowercase `#rrggbb` for an 8-bit RGB triple.
pub fn hex_string([r, g, b]: [u8; 3]) -> String {
    format!("#{r:02x}{g:02x}{b:02x}")
}

/// A cluster centre in `0.0..=255.0` RGB space. Channels are fractional until
/// they are displayed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Centroid(pub [f32; 3]);

impl Centroid {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self([r, g, b])
    }

    /// Channels rounded to the nearest integer and clamped to `0..=255`.
    pub fn rgb(&self) -> [u8; 3] {
        self.0.map(|c| c.round().clamp(0.0, 255.0) as u8)
    }

    /// Lowercase `#rrggbb`.
    pub fn hex(&self) -> String {
        hex_string(self.rgb())
    }
}

impl fmt::Display for Centroid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaletteEntry {
    pub centroid: Centroid,
    pub count: usize,
}

impl PaletteEntry {
    pub fn new(centroid: Centroid, count: usize) -> Self {
        Self { centroid, count }
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.centroid.rgb()
    }

    pub fn hex(&self) -> String {
        self.centroid.hex()
    }
}

/// Palette entries ordered by descending occurrence count.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PaletteEntry> {
        self.entries.iter()
    }

    /// Sum of all counts; equals the number of clustered samples.
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Fraction of all samples that fell into `entry`.
    pub fn share(&self, entry: &PaletteEntry) -> f32 {
        match self.total() {
            0 => 0.0,
            total => entry.count as f32 / total as f32,
        }
    }

    /// The most frequent colour.
    pub fn dominant(&self) -> Option<&PaletteEntry> {
        self.entries.first()
    }

    pub fn hex_codes(&self) -> Vec<String> {
        self.entries.iter().map(PaletteEntry::hex).collect()
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a PaletteEntry;
    type IntoIter = std::slice::Iter<'a, PaletteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Order clusterer output by descending count.
///
/// The sort is stable: entries with equal counts keep the order in which the
/// clusterer produced them.
pub fn rank(mut entries: Vec<PaletteEntry>) -> Palette {
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    Palette { entries }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(v: f32, count: usize) -> PaletteEntry {
        PaletteEntry::new(Centroid::new(v, v, v), count)
    }

    #[test]
    fn hex_rounds_and_clamps() {
        assert_eq!(Centroid::new(173.4, 38.2, 30.1).hex(), "#ad261e");
        assert_eq!(Centroid::new(-3.0, 255.6, 0.5).hex(), "#00ff01");
        assert_eq!(Centroid::new(9.0, 178.0, 210.0).to_string(), "#09b2d2");
    }

    #[test]
    fn sorted_by_descending_count() {
        let palette = rank(vec![entry(1.0, 5), entry(2.0, 40), entry(3.0, 0), entry(4.0, 12)]);
        let counts: Vec<usize> = palette.iter().map(|e| e.count).collect();
        assert_eq!(counts, vec![40, 12, 5, 0]);
        assert_eq!(palette.total(), 57);
        assert_eq!(palette.dominant().unwrap().centroid, Centroid::new(2.0, 2.0, 2.0));
    }

    #[test]
    fn ties_keep_input_order() {
        let input = vec![entry(1.0, 7), entry(2.0, 9), entry(3.0, 7), entry(4.0, 7)];
        let palette = rank(input.clone());
        let order: Vec<f32> = palette.iter().map(|e| e.centroid.0[0]).collect();
        assert_eq!(order, vec![2.0, 1.0, 3.0, 4.0]);

        // ranking is idempotent
        assert_eq!(rank(palette.entries().to_vec()), palette);
        assert_eq!(rank(input), palette);
    }

    #[test]
    fn share_of_empty_palette_is_zero() {
        let palette = rank(vec![entry(0.0, 0)]);
        assert_eq!(palette.share(&palette.entries()[0]), 0.0);
    }
}
