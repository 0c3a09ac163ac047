use crate::rank::{Palette, hex_string};

/// Number of swatches shown for a palette.
pub const SWATCH_COUNT: usize = 6;

/// Colours shown before any palette has been extracted.
pub const DEFAULT_SWATCHES: [[u8; 3]; SWATCH_COUNT] = [
    [0xad, 0x26, 0x1e],
    [0x09, 0xb2, 0xd2],
    [0x1a, 0x73, 0xcd],
    [0xfc, 0xfd, 0xfc],
    [0xc7, 0x94, 0x37],
    [0x1f, 0x23, 0x2c],
];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Swatch {
    pub rgb: [u8; 3],
    pub label: String,
}

impl Swatch {
    pub fn new(rgb: [u8; 3]) -> Self {
        Self {
            rgb,
            label: hex_string(rgb),
        }
    }
}

/// Display state of the swatch row, one slot per position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SwatchBoard {
    slots: [Swatch; SWATCH_COUNT],
}

impl Default for SwatchBoard {
    fn default() -> Self {
        Self {
            slots: DEFAULT_SWATCHES.map(Swatch::new),
        }
    }
}

impl SwatchBoard {
    pub fn slots(&self) -> &[Swatch] {
        &self.slots
    }

    /// Write the leading palette entries into the slots in order. Slots past
    /// the end of a short palette keep whatever they showed before.
    ///
    /// Returns how many slots were updated.
    pub fn apply(&mut self, palette: &Palette) -> usize {
        let mut updated = 0;
        for (slot, entry) in self.slots.iter_mut().zip(palette) {
            *slot = Swatch::new(entry.rgb());
            updated += 1;
        }
        updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::{Centroid, PaletteEntry, rank};

    #[test]
    fn defaults_match_labels() {
        let board = SwatchBoard::default();
        assert_eq!(board.slots()[0].label, "#ad261e");
        assert_eq!(board.slots()[5].label, "#1f232c");
    }

    #[test]
    fn label_matches_centroid_hex() {
        let centroid = Centroid::new(173.4, 38.2, 30.1);
        let swatch = Swatch::new(centroid.rgb());
        assert_eq!(swatch.label, centroid.hex());
        assert_eq!(swatch.label, "#ad261e");
    }

    #[test]
    fn short_palette_leaves_tail_untouched() {
        let mut board = SwatchBoard::default();
        let palette = rank(vec![
            PaletteEntry::new(Centroid::new(0.0, 0.0, 0.0), 3),
            PaletteEntry::new(Centroid::new(255.0, 255.0, 255.0), 9),
        ]);

        assert_eq!(board.apply(&palette), 2);
        assert_eq!(board.slots()[0].label, "#ffffff");
        assert_eq!(board.slots()[1].label, "#000000");
        assert_eq!(board.slots()[2..], SwatchBoard::default().slots()[2..]);
    }

    #[test]
    fn long_palette_is_truncated() {
        let mut board = SwatchBoard::default();
        let palette = rank(
            (0..8)
                .map(|i| PaletteEntry::new(Centroid::new(i as f32, 0.0, 0.0), 100 - i))
                .collect(),
        );
        assert_eq!(board.apply(&palette), SWATCH_COUNT);
        assert_eq!(board.slots()[5].rgb, [5, 0, 0]);
    }
}
