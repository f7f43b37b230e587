use std::collections::BTreeMap;

use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Colour-blind safe base palette ("colorblind" ten-colour cycle).
const COLORBLIND: [(u8, u8, u8); 10] = [
    (1, 115, 178),
    (222, 143, 5),
    (2, 158, 115),
    (213, 94, 0),
    (204, 120, 188),
    (202, 145, 97),
    (251, 175, 228),
    (148, 148, 148),
    (236, 225, 51),
    (86, 180, 233),
];

/// `n` distinct colours: the base palette first, then evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<[u8; 3]> {
    let extra = n.saturating_sub(COLORBLIND.len());
    let base = COLORBLIND.iter().take(n).map(|&(r, g, b)| [r, g, b]);
    let hues = (0..extra).map(|i| {
        let hue = (i as f32 / extra as f32) * 360.0 + 15.0;
        let hsl = Hsl::new(hue, 0.75, 0.45);
        let rgb: Srgb = hsl.into_color();
        let rgb: Srgb<u8> = rgb.into_format();
        [rgb.red, rgb.green, rgb.blue]
    });
    base.chain(hues).collect()
}

// ---------------------------------------------------------------------------
// Stage colours: stage label → RGB
// ---------------------------------------------------------------------------

/// Assigns each stage label a colour, in legend order.
#[derive(Debug, Clone, Default)]
pub struct StagePalette {
    mapping: BTreeMap<String, [u8; 3]>,
    order: Vec<String>,
}

impl StagePalette {
    /// Build a palette for labels already in legend order.
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let mut order: Vec<String> = Vec::new();
        for label in labels {
            if !order.iter().any(|l| l == label) {
                order.push(label.to_string());
            }
        }
        let mapping = order
            .iter()
            .cloned()
            .zip(generate_palette(order.len()))
            .collect();
        StagePalette { mapping, order }
    }

    /// Look up the colour for a stage label.
    pub fn color_for(&self, label: &str) -> [u8; 3] {
        self.mapping.get(label).copied().unwrap_or([128, 128, 128])
    }

    /// Legend entries (label → colour) in legend order.
    pub fn legend_entries(&self) -> Vec<(String, [u8; 3])> {
        self.order
            .iter()
            .map(|l| (l.clone(), self.color_for(l)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_starts_with_base_colours() {
        let colors = generate_palette(3);
        assert_eq!(colors, vec![[1, 115, 178], [222, 143, 5], [2, 158, 115]]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn palette_extends_past_base() {
        let colors = generate_palette(14);
        assert_eq!(colors.len(), 14);
        for (i, a) in colors.iter().enumerate() {
            for b in &colors[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn stage_palette_keeps_legend_order() {
        let palette = StagePalette::new(["Initial", "Excavation", "Initial", "Backfill"]);
        let labels: Vec<String> = palette.legend_entries().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["Initial", "Excavation", "Backfill"]);
        assert_eq!(palette.color_for("Initial"), [1, 115, 178]);
        assert_eq!(palette.color_for("unknown"), [128, 128, 128]);
    }
}
