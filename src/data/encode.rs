use std::fmt;

use super::model::QuakeFeature;

// ---------------------------------------------------------------------------
// Depth → colour
// ---------------------------------------------------------------------------

/// A colour as the map legend spells it: a CSS name or `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColorToken(&'static str);

impl ColorToken {
    pub const RED: ColorToken = ColorToken("red");
    pub const GREEN: ColorToken = ColorToken("green");
    pub const BLACK: ColorToken = ColorToken("black");
    pub const YELLOW: ColorToken = ColorToken("yellow");

    pub const fn new(token: &'static str) -> Self {
        ColorToken(token)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ColorToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

impl PartialEq<&str> for ColorToken {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Depth bands from deepest to shallowest: `(exclusive lower bound, colour)`.
/// Evaluated top-down; the first bound the depth exceeds wins.
const DEPTH_BANDS: [(f64, ColorToken); 5] = [
    (90.0, ColorToken::RED),
    (70.0, ColorToken::new("#fc4903")),
    (50.0, ColorToken::new("#fc8403")),
    (30.0, ColorToken::new("#fcad03")),
    (10.0, ColorToken::new("#cafc03")),
];

/// Depth of 10 km or less, negative depths included.
const SHALLOW_COLOR: ColorToken = ColorToken::GREEN;

/// Legend starts here, the shallowest depth the feed reports in practice.
const LEGEND_FLOOR: f64 = -10.0;

/// Colour of an earthquake marker by hypocentre depth in km.
pub fn color_for_depth(depth: f64) -> ColorToken {
    DEPTH_BANDS
        .iter()
        .find(|(lower, _)| depth > *lower)
        .map(|(_, color)| *color)
        .unwrap_or(SHALLOW_COLOR)
}

// ---------------------------------------------------------------------------
// Magnitude → radius
// ---------------------------------------------------------------------------

/// Marker radius for a magnitude.
///
/// Magnitude 0 maps to 1 so the event stays visible. Negative magnitudes
/// are scaled like any other and come out negative; the renderer clamps
/// what it draws.
pub fn radius_for_magnitude(magnitude: f64) -> f64 {
    if magnitude == 0.0 {
        1.0
    } else {
        magnitude * 5.0
    }
}

// ---------------------------------------------------------------------------
// Marker style and popup
// ---------------------------------------------------------------------------

/// Style of one earthquake circle marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    pub fill_color: ColorToken,
    pub outline: ColorToken,
    pub radius: f64,
    pub opacity: f32,
    pub fill_opacity: f32,
    pub stroke: bool,
}

/// Full marker style for a feature. A missing magnitude counts as 0.
pub fn marker_style(feature: &QuakeFeature) -> MarkerStyle {
    MarkerStyle {
        fill_color: color_for_depth(feature.depth),
        outline: ColorToken::BLACK,
        radius: radius_for_magnitude(feature.magnitude.unwrap_or(0.0)),
        opacity: 0.5,
        fill_opacity: 0.5,
        stroke: true,
    }
}

/// Popup text shown when hovering a marker.
pub fn popup_text(feature: &QuakeFeature) -> String {
    let magnitude = feature
        .magnitude
        .map(|m| m.to_string())
        .unwrap_or_else(|| "n/a".to_string());
    let place = feature.place.as_deref().unwrap_or("n/a");
    format!(
        "Magnitude: {magnitude}\nDepth: {}\nLocation: {place}",
        feature.depth
    )
}

/// Style of the tectonic plate overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: ColorToken,
    pub weight: f32,
}

pub const PLATE_STYLE: LineStyle = LineStyle {
    color: ColorToken::YELLOW,
    weight: 1.0,
};

// ---------------------------------------------------------------------------
// Legend
// ---------------------------------------------------------------------------

/// One legend row: `lower..upper` km drawn in `color`. The deepest band has
/// no upper bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LegendBand {
    pub lower: f64,
    pub upper: Option<f64>,
    pub color: ColorToken,
}

impl LegendBand {
    pub fn label(&self) -> String {
        match self.upper {
            Some(upper) => format!("{}–{} km", self.lower, upper),
            None => format!("{}+ km", self.lower),
        }
    }
}

/// The six legend bands, shallowest first.
pub fn legend_bands() -> Vec<LegendBand> {
    let mut bounds: Vec<(f64, ColorToken)> = vec![(LEGEND_FLOOR, SHALLOW_COLOR)];
    bounds.extend(DEPTH_BANDS.iter().rev().copied());

    bounds
        .iter()
        .enumerate()
        .map(|(i, (lower, color))| LegendBand {
            lower: *lower,
            upper: bounds.get(i + 1).map(|(next, _)| *next),
            color: *color,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn quake(depth: f64, magnitude: Option<f64>) -> QuakeFeature {
        QuakeFeature {
            longitude: -117.5,
            latitude: 35.7,
            depth,
            magnitude,
            place: Some("10 km SW of Searles Valley, CA".into()),
        }
    }

    #[test]
    fn test_color_for_depth_thresholds() {
        assert_eq!(color_for_depth(95.0), "red");
        assert_eq!(color_for_depth(90.0), "#fc4903");
        assert_eq!(color_for_depth(70.0), "#fc8403");
        assert_eq!(color_for_depth(50.0), "#fcad03");
        assert_eq!(color_for_depth(30.0), "#cafc03");
        assert_eq!(color_for_depth(10.5), "#cafc03");
        assert_eq!(color_for_depth(10.0), "green");
        assert_eq!(color_for_depth(-5.0), "green");
    }

    #[test]
    fn test_color_for_nan_depth_is_shallow() {
        assert_eq!(color_for_depth(f64::NAN), "green");
    }

    #[test]
    fn test_radius_for_magnitude() {
        assert_eq!(radius_for_magnitude(0.0), 1.0);
        assert_eq!(radius_for_magnitude(4.0), 20.0);
        assert_eq!(radius_for_magnitude(-2.0), -10.0);
        assert_eq!(radius_for_magnitude(1.5), 7.5);
    }

    #[test]
    fn test_marker_style_missing_magnitude() {
        let style = marker_style(&quake(12.0, None));
        assert_eq!(style.radius, 1.0);
        assert_eq!(style.fill_color, "#cafc03");
        assert_eq!(style.outline, "black");
        assert!(style.stroke);
    }

    #[test]
    fn test_popup_text() {
        assert_eq!(
            popup_text(&quake(8.2, Some(4.4))),
            "Magnitude: 4.4\nDepth: 8.2\nLocation: 10 km SW of Searles Valley, CA"
        );
        let mut unknown = quake(3.0, None);
        unknown.place = None;
        assert_eq!(popup_text(&unknown), "Magnitude: n/a\nDepth: 3\nLocation: n/a");
    }

    #[test]
    fn test_legend_bands() {
        let bands = legend_bands();
        let labels: Vec<String> = bands.iter().map(|b| b.label()).collect();
        assert_eq!(
            labels,
            vec!["-10–10 km", "10–30 km", "30–50 km", "50–70 km", "70–90 km", "90+ km"]
        );
        let colors: Vec<&str> = bands.iter().map(|b| b.color.as_str()).collect();
        assert_eq!(
            colors,
            vec!["green", "#cafc03", "#fcad03", "#fc8403", "#fc4903", "red"]
        );
    }

    #[test]
    fn test_legend_agrees_with_encoder() {
        for band in legend_bands() {
            let probe = match band.upper {
                Some(upper) => (band.lower + upper) / 2.0,
                None => band.lower + 10.0,
            };
            assert_eq!(color_for_depth(probe), band.color, "band {}", band.label());
        }
    }

    proptest! {
        #[test]
        fn prop_color_is_deterministic_and_monotone(a in -50.0f64..800.0, b in -50.0f64..800.0) {
            let rank = |c: ColorToken| legend_bands().iter().position(|band| band.color == c);
            prop_assert_eq!(color_for_depth(a), color_for_depth(a));
            if a <= b {
                prop_assert!(rank(color_for_depth(a)) <= rank(color_for_depth(b)));
            }
        }

        #[test]
        fn prop_nonzero_magnitude_scales_by_five(m in -3.0f64..10.0) {
            prop_assume!(m != 0.0);
            prop_assert_eq!(radius_for_magnitude(m), m * 5.0);
        }
    }
}
