use plotters::style::RGBColor;
use strum_macros::{Display, EnumIter, EnumString};

/// Colour maps available for surfaces and colour bars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ColorMapKind {
    #[default]
    Jet,
    Viridis,
    Coolwarm,
    Gray,
}

// anchor colours at equally spaced positions in [0, 1]
const JET: [(u8, u8, u8); 9] = [
    (0, 0, 128),
    (0, 0, 255),
    (0, 128, 255),
    (0, 255, 255),
    (128, 255, 128),
    (255, 255, 0),
    (255, 128, 0),
    (255, 0, 0),
    (128, 0, 0),
];
const VIRIDIS: [(u8, u8, u8); 6] = [
    (68, 1, 84),
    (65, 68, 135),
    (42, 120, 142),
    (34, 168, 132),
    (122, 209, 81),
    (253, 231, 37),
];
const COOLWARM: [(u8, u8, u8); 5] = [
    (59, 76, 192),
    (141, 176, 254),
    (221, 221, 221),
    (244, 154, 123),
    (180, 4, 38),
];
const GRAY: [(u8, u8, u8); 2] = [(0, 0, 0), (255, 255, 255)];

impl ColorMapKind {
    fn anchors(&self) -> &'static [(u8, u8, u8)] {
        match self {
            ColorMapKind::Jet => &JET,
            ColorMapKind::Viridis => &VIRIDIS,
            ColorMapKind::Coolwarm => &COOLWARM,
            ColorMapKind::Gray => &GRAY,
        }
    }

    /// colour of `h` in [0, 1], clamped
    pub fn color(&self, h: f64) -> RGBColor {
        let anchors = self.anchors();
        let h = if h.is_nan() { 0.0 } else { h.clamp(0.0, 1.0) };
        let pos = h * (anchors.len() - 1) as f64;
        let lo = (pos.floor() as usize).min(anchors.len() - 2);
        let frac = pos - lo as f64;
        let (a, b) = (anchors[lo], anchors[lo + 1]);
        let mix = |p: u8, q: u8| (p as f64 + (q as f64 - p as f64) * frac).round() as u8;
        RGBColor(mix(a.0, b.0), mix(a.1, b.1), mix(a.2, b.2))
    }

    /// colour of `value` on the scale [vmin, vmax]; a degenerate scale maps to its low end
    pub fn color_normalized(&self, value: f64, vmin: f64, vmax: f64) -> RGBColor {
        let span = vmax - vmin;
        if span <= 0.0 || !span.is_finite() {
            return self.color(0.0);
        }
        self.color((value - vmin) / span)
    }
}
