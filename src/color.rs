use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category label → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a categorical column (operators) to colours.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub const NULL_COLOR: Color32 = Color32::GRAY;

    pub fn new(values: &BTreeSet<String>) -> Self {
        let mapping = values
            .iter()
            .cloned()
            .zip(generate_palette(values.len()))
            .collect();
        ColorMap { mapping }
    }

    /// Colour for a value; null or unknown values are grey.
    pub fn color_for(&self, value: Option<&str>) -> Color32 {
        value
            .and_then(|v| self.mapping.get(v))
            .copied()
            .unwrap_or(Self::NULL_COLOR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_distinct_entries() {
        let colors = generate_palette(5);
        assert_eq!(colors.len(), 5);
        let unique: BTreeSet<[u8; 4]> = colors.iter().map(|c| c.to_array()).collect();
        assert_eq!(unique.len(), 5);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn nulls_and_unknowns_are_grey() {
        let values: BTreeSet<String> = ["OpA".to_string(), "OpB".to_string()].into();
        let map = ColorMap::new(&values);
        assert_ne!(map.color_for(Some("OpA")), map.color_for(Some("OpB")));
        assert_eq!(map.color_for(None), ColorMap::NULL_COLOR);
        assert_eq!(map.color_for(Some("OpZ")), ColorMap::NULL_COLOR);
    }
}
