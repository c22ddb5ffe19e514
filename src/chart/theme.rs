//! Colors and visual themes for chart specifications.

use serde::{Serialize, Serializer};

/// An sRGB color, serialized as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.hex())
    }
}

pub const DARK_SLATE_BLUE: Rgb = Rgb(72, 61, 139);
pub const TOMATO: Rgb = Rgb(255, 99, 71);

/// Named chart templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Plotly's default template.
    Plotly,
    Seaborn,
}

impl Theme {
    /// Default trace colors, cycled in order.
    pub fn colorway(self) -> &'static [Rgb] {
        match self {
            Theme::Plotly => &[
                Rgb(99, 110, 250),
                Rgb(239, 85, 59),
                Rgb(0, 204, 150),
                Rgb(171, 99, 250),
                Rgb(255, 161, 90),
                Rgb(25, 211, 243),
                Rgb(255, 102, 146),
                Rgb(182, 232, 128),
                Rgb(255, 151, 255),
                Rgb(254, 203, 82),
            ],
            Theme::Seaborn => &[
                Rgb(76, 114, 176),
                Rgb(221, 132, 82),
                Rgb(85, 168, 104),
                Rgb(196, 78, 82),
                Rgb(129, 114, 179),
                Rgb(147, 120, 96),
                Rgb(218, 139, 195),
                Rgb(140, 140, 140),
                Rgb(204, 185, 116),
                Rgb(100, 181, 205),
            ],
        }
    }

    pub fn series_color(self, idx: usize) -> Rgb {
        let colors = self.colorway();
        colors[idx % colors.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_formatting() {
        assert_eq!(TOMATO.hex(), "#ff6347");
        assert_eq!(DARK_SLATE_BLUE.hex(), "#483d8b");
    }

    #[test]
    fn colorway_cycles() {
        let t = Theme::Seaborn;
        assert_eq!(t.series_color(0), t.series_color(t.colorway().len()));
    }

    #[test]
    fn plotly_template_starts_blue_then_red() {
        assert_eq!(Theme::Plotly.series_color(0).hex(), "#636efa");
        assert_eq!(Theme::Plotly.series_color(1).hex(), "#ef553b");
    }
}
