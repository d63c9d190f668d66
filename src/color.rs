use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Continuous colour scale
// ---------------------------------------------------------------------------

/// Early frames purple, late frames pink-red.
pub const TIME_SCALE_STOPS: [(f32, [u8; 3]); 6] = [
    (0.0, [0x44, 0x01, 0x54]),
    (0.2, [0x31, 0x68, 0x8e]),
    (0.4, [0x35, 0xb7, 0x79]),
    (0.6, [0xfd, 0xe7, 0x25]),
    (0.8, [0xfd, 0x97, 0x31]),
    (1.0, [0xcc, 0x47, 0x78]),
];

/// Fill of the variance-contribution bars.
pub const BAR_BLUE: Color32 = Color32::from_rgb(0x3b, 0x82, 0xf6);
/// Cumulative variance line.
pub const LINE_GREEN: Color32 = Color32::from_rgb(0x16, 0xa3, 0x4a);

/// Piecewise-linear gradient, interpolated in linear RGB.
#[derive(Debug, Clone)]
pub struct ColorScale {
    stops: Vec<(f32, LinSrgb)>,
}

impl ColorScale {
    /// `stops` must be sorted by position in `0..=1`.
    pub fn new(stops: &[(f32, [u8; 3])]) -> Self {
        let stops = stops
            .iter()
            .map(|&(pos, [r, g, b])| {
                let lin: LinSrgb = Srgb::new(r, g, b).into_format::<f32>().into_linear();
                (pos, lin)
            })
            .collect();
        ColorScale { stops }
    }

    pub fn time() -> Self {
        Self::new(&TIME_SCALE_STOPS)
    }

    /// Colour at normalised position `t` (clamped to `0..=1`).
    pub fn sample(&self, t: f32) -> Color32 {
        let Some(&(first_pos, first)) = self.stops.first() else {
            return Color32::GRAY;
        };
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        if t <= first_pos {
            return to_color32(first);
        }
        for pair in self.stops.windows(2) {
            let (p0, c0) = pair[0];
            let (p1, c1) = pair[1];
            if t <= p1 {
                let span = p1 - p0;
                let f = if span > 0.0 { (t - p0) / span } else { 1.0 };
                return to_color32(c0.mix(c1, f));
            }
        }
        self.stops
            .last()
            .map(|&(_, c)| to_color32(c))
            .unwrap_or(Color32::GRAY)
    }

    /// Colour for `value` normalised over `min..=max`. A flat range maps to the first stop.
    pub fn map(&self, value: f64, min: f64, max: f64) -> Color32 {
        let range = max - min;
        let t = if range.abs() < f64::EPSILON {
            0.0
        } else {
            ((value - min) / range) as f32
        };
        self.sample(t)
    }
}

fn to_color32(lin: LinSrgb) -> Color32 {
    let rgb: Srgb<u8> = Srgb::from_linear(lin);
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}
