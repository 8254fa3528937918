/// Map background styles. These are descriptions only; tiles are never
/// downloaded, the selected layer just tints the plot and supplies the
/// attribution line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseLayer {
    #[default]
    Default,
    Grayscale,
    Aerial,
    Topo,
    WaterColor,
}

/// Initial map centre `[lat, lon]`, over California.
pub const MAP_CENTER: [f64; 2] = [36.7783, -119.4179];

/// Initial zoom level of the map view.
pub const MAP_ZOOM: u8 = 5;

impl BaseLayer {
    pub const ALL: [BaseLayer; 5] = [
        BaseLayer::Default,
        BaseLayer::Grayscale,
        BaseLayer::Aerial,
        BaseLayer::Topo,
        BaseLayer::WaterColor,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            BaseLayer::Default => "Default",
            BaseLayer::Grayscale => "Grayscale",
            BaseLayer::Aerial => "Aerial",
            BaseLayer::Topo => "TopMap",
            BaseLayer::WaterColor => "Water Color",
        }
    }

    pub fn url_template(&self) -> &'static str {
        match self {
            BaseLayer::Default => "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
            BaseLayer::Grayscale => {
                "https://tiles.stadiamaps.com/tiles/stamen_toner_lite/{z}/{x}/{y}{r}.png"
            }
            BaseLayer::Aerial => {
                "https://server.arcgisonline.com/ArcGIS/rest/services/World_Imagery/MapServer/tile/{z}/{y}/{x}"
            }
            BaseLayer::Topo => "https://{s}.tile.opentopomap.org/{z}/{x}/{y}.png",
            BaseLayer::WaterColor => {
                "https://tiles.stadiamaps.com/tiles/stamen_watercolor/{z}/{x}/{y}.jpg"
            }
        }
    }

    pub fn attribution(&self) -> &'static str {
        match self {
            BaseLayer::Default | BaseLayer::Topo => "Map data: © OpenStreetMap contributors",
            BaseLayer::Grayscale | BaseLayer::WaterColor => {
                "© Stadia Maps © Stamen Design © OpenMapTiles © OpenStreetMap contributors"
            }
            BaseLayer::Aerial => {
                "Tiles © Esri — Source: Esri, i-cubed, USDA, USGS, AEX, GeoEye, Getmapping, Aerogrid, IGN, IGP, UPR-EGP, and the GIS User Community"
            }
        }
    }

    /// `(min, max)` zoom supported by the tile source.
    pub fn zoom_range(&self) -> (u8, u8) {
        match self {
            BaseLayer::Default | BaseLayer::Topo => (0, 19),
            BaseLayer::Grayscale | BaseLayer::Aerial => (0, 20),
            BaseLayer::WaterColor => (1, 16),
        }
    }

    /// Backdrop colour `(r, g, b)` standing in for the tiles.
    pub fn backdrop_rgb(&self) -> (u8, u8, u8) {
        match self {
            BaseLayer::Default => (170, 211, 223),
            BaseLayer::Grayscale => (221, 221, 221),
            BaseLayer::Aerial => (28, 42, 58),
            BaseLayer::Topo => (201, 221, 196),
            BaseLayer::WaterColor => (215, 232, 229),
        }
    }
}

/// Lon/lat window shown at [`MAP_ZOOM`] around [`MAP_CENTER`]:
/// `((lon_min, lon_max), (lat_min, lat_max))`.
pub fn initial_bounds() -> ((f64, f64), (f64, f64)) {
    // A 256px web-mercator tile spans 360° at zoom 0; the view is about
    // four tiles wide.
    let half_width = 360.0 / f64::from(1u32 << MAP_ZOOM) * 2.0;
    let half_height = half_width * 0.6;
    let [lat, lon] = MAP_CENTER;
    (
        (lon - half_width, lon + half_width),
        (lat - half_height, lat + half_height),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_layer_names_are_unique() {
        let mut names: Vec<&str> = BaseLayer::ALL.iter().map(|l| l.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), BaseLayer::ALL.len());
        assert_eq!(BaseLayer::default(), BaseLayer::Default);
    }

    #[test]
    fn test_initial_bounds_center_on_california() {
        let ((lon_min, lon_max), (lat_min, lat_max)) = initial_bounds();
        assert!(((lon_min + lon_max) / 2.0 - MAP_CENTER[1]).abs() < 1e-9);
        assert!(((lat_min + lat_max) / 2.0 - MAP_CENTER[0]).abs() < 1e-9);
        assert!(lon_max - lon_min > lat_max - lat_min);
    }
}
