use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

use crate::data::encode::ColorToken;

// ---------------------------------------------------------------------------
// Colour tokens → Color32
// ---------------------------------------------------------------------------

/// Resolve a CSS colour name or `#rrggbb` token. Unknown tokens are gray.
pub fn token_to_color32(token: ColorToken) -> Color32 {
    let s = token.as_str();
    let rgb: Option<Srgb<u8>> = if s.starts_with('#') {
        s.parse::<Srgb<u8>>().ok()
    } else {
        palette::named::from_str(s)
    };
    match rgb {
        Some(c) => Color32::from_rgb(c.red, c.green, c.blue),
        None => {
            log::warn!("Unknown colour token {s:?}");
            Color32::GRAY
        }
    }
}

/// Same colour with `opacity` in `0..=1`.
pub fn with_opacity(color: Color32, opacity: f32) -> Color32 {
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

// ---------------------------------------------------------------------------
// Earth colourscale
// ---------------------------------------------------------------------------

/// Stops of the "Earth" colourscale: deep blue through green and brown to
/// white.
const EARTH_STOPS: [(f32, (u8, u8, u8)); 6] = [
    (0.0, (0, 0, 130)),
    (0.1, (0, 180, 180)),
    (0.2, (40, 210, 40)),
    (0.4, (230, 230, 50)),
    (0.6, (120, 70, 20)),
    (1.0, (255, 255, 255)),
];

/// Sample the Earth colourscale at `t` in `0..=1` (clamped).
pub fn earth_color(t: f32) -> Color32 {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };

    let upper = EARTH_STOPS
        .iter()
        .position(|(stop, _)| *stop >= t)
        .unwrap_or(EARTH_STOPS.len() - 1)
        .max(1);
    let (t0, (r0, g0, b0)) = EARTH_STOPS[upper - 1];
    let (t1, (r1, g1, b1)) = EARTH_STOPS[upper];

    let from: LinSrgb = Srgb::new(r0, g0, b0).into_linear();
    let to: LinSrgb = Srgb::new(r1, g1, b1).into_linear();
    let mixed = from.mix(to, (t - t0) / (t1 - t0));

    let rgb: Srgb<u8> = Srgb::from_linear(mixed);
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

/// Linear map of a scalar domain onto the Earth colourscale.
#[derive(Debug, Clone, Copy)]
pub struct EarthScale {
    min: f64,
    max: f64,
}

impl EarthScale {
    pub fn new((min, max): (f64, f64)) -> Self {
        EarthScale { min, max }
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        let span = self.max - self.min;
        if span.abs() < f64::EPSILON {
            return earth_color(0.0);
        }
        earth_color(((value - self.min) / span) as f32)
    }
}
