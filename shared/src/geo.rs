//! Minimal GeoJSON model for the state boundary asset and its conversion to
//! SVG path data.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

/// Map centre of the contiguous United States.
pub const USA_CENTER: (f64, f64) = (-98.5795, 39.8283);

/// Contiguous United States, `(west, south, east, north)` in degrees.
pub const USA_BOUNDS: Bounds = Bounds {
    min_x: -125.0,
    min_y: 24.0,
    max_x: -66.5,
    max_y: 49.5,
};

/// A ring is a list of `[lon, lat]` (optionally `[lon, lat, alt]`) positions.
pub type Ring = Vec<Vec<f64>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<StateFeature>,
}

impl FeatureCollection {
    pub fn find(&self, name: &str) -> Option<&StateFeature> {
        self.features.iter().find(|f| f.name() == Some(name))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureProperties {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateFeature {
    #[serde(default)]
    pub properties: Option<FeatureProperties>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl StateFeature {
    /// Identifying property. `None` when missing or blank.
    pub fn name(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|p| p.name.as_deref())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon { coordinates: Vec<Ring> },
    MultiPolygon { coordinates: Vec<Vec<Ring>> },
    /// Points, lines and collections carry no fillable area.
    #[serde(other)]
    Unsupported,
}

impl Geometry {
    /// Every ring of the geometry, outer and holes alike.
    pub fn rings(&self) -> Vec<&Ring> {
        match self {
            Geometry::Polygon { coordinates } => coordinates.iter().collect(),
            Geometry::MultiPolygon { coordinates } => coordinates.iter().flatten().collect(),
            Geometry::Unsupported => Vec::new(),
        }
    }

    /// Lon/lat bounding box, `None` when the geometry has no positions.
    pub fn bounds(&self) -> Option<Bounds> {
        self.rings()
            .into_iter()
            .flatten()
            .filter_map(|position| lon_lat(position))
            .fold(None, |acc: Option<Bounds>, (lon, lat)| {
                Some(match acc {
                    Some(b) => b.including(lon, lat),
                    None => Bounds::point(lon, lat),
                })
            })
    }
}

fn lon_lat(position: &[f64]) -> Option<(f64, f64)> {
    match position {
        [lon, lat, ..] if lon.is_finite() && lat.is_finite() => Some((*lon, *lat)),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn point(x: f64, y: f64) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    pub fn including(self, x: f64, y: f64) -> Self {
        Self {
            min_x: self.min_x.min(x),
            min_y: self.min_y.min(y),
            max_x: self.max_x.max(x),
            max_y: self.max_y.max(y),
        }
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Bounds of the projected corners. Valid for projections that are
    /// monotonic in each axis, which every projection in this crate is.
    pub fn projected(&self, projection: &impl Projection) -> Bounds {
        let (x0, y0) = projection.project(self.min_x, self.min_y);
        let (x1, y1) = projection.project(self.max_x, self.max_y);
        Bounds::point(x0, y0).including(x1, y1)
    }
}

pub trait Projection {
    /// Map `(lon, lat)` in degrees to plane coordinates, y growing downwards.
    fn project(&self, lon: f64, lat: f64) -> (f64, f64);
}

/// Plate carrée with the x axis shrunk by `cos(reference latitude)`, so shapes
/// near the reference latitude keep their proportions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Equirectangular {
    x_scale: f64,
}

impl Equirectangular {
    pub fn new(reference_lat: f64) -> Self {
        Self {
            x_scale: reference_lat.to_radians().cos(),
        }
    }

    pub fn usa() -> Self {
        Self::new(USA_CENTER.1)
    }

    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        (x / self.x_scale, -y)
    }
}

impl Projection for Equirectangular {
    fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (lon * self.x_scale, -lat)
    }
}

/// SVG path data (`M x,y L x,y ... Z` per ring) for a geometry.
pub fn svg_path(geometry: &Geometry, projection: &impl Projection) -> String {
    let mut d = String::new();
    for ring in geometry.rings() {
        let mut first = true;
        for (lon, lat) in ring.iter().filter_map(|p| lon_lat(p)) {
            let (x, y) = projection.project(lon, lat);
            if !first {
                d.push_str(" L");
            } else if !d.is_empty() {
                d.push_str(" M");
            } else {
                d.push('M');
            }
            let _ = write!(d, "{},{}", round3(x), round3(y));
            first = false;
        }
        if !first {
            d.push_str(" Z");
        }
    }
    d
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Identity;

    impl Projection for Identity {
        fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
            (lon, lat)
        }
    }

    const COLLECTION: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"name": "Colorado", "density": 49.33},
             "geometry": {"type": "Polygon", "coordinates": [[[-109.0, 41.0], [-102.0, 41.0], [-102.0, 37.0], [-109.0, 37.0], [-109.0, 41.0]]]}},
            {"type": "Feature", "properties": {"name": "Hawaii"},
             "geometry": {"type": "MultiPolygon", "coordinates": [[[[-155.0, 19.0], [-155.5, 20.0], [-156.0, 19.5]]], [[[-157.8, 21.2], [-158.0, 21.5, 0.0], [-157.6, 21.6]]]]}},
            {"type": "Feature", "properties": {"density": 1.0},
             "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}},
            {"type": "Feature", "geometry": null}
        ]
    }"#;

    #[test]
    fn parses_polygons_multipolygons_and_degenerate_features() {
        let collection: FeatureCollection = serde_json::from_str(COLLECTION).unwrap();
        assert_eq!(collection.features.len(), 4);
        assert_eq!(collection.features[0].name(), Some("Colorado"));
        assert!(matches!(
            collection.features[1].geometry,
            Some(Geometry::MultiPolygon { .. })
        ));
        assert_eq!(collection.features[2].name(), None);
        assert_eq!(collection.features[2].geometry, Some(Geometry::Unsupported));
        assert_eq!(collection.features[3].geometry, None);
        assert!(collection.find("Hawaii").is_some());
    }

    #[test]
    fn blank_name_is_missing() {
        let feature = StateFeature {
            properties: Some(FeatureProperties {
                name: Some("  ".into()),
            }),
            geometry: None,
        };
        assert_eq!(feature.name(), None);
    }

    #[test]
    fn svg_path_closes_every_ring() {
        let collection: FeatureCollection = serde_json::from_str(COLLECTION).unwrap();
        let hawaii = collection.features[1].geometry.as_ref().unwrap();
        let d = svg_path(hawaii, &Identity);
        assert_eq!(
            d,
            "M-155,19 L-155.5,20 L-156,19.5 Z M-157.8,21.2 L-158,21.5 L-157.6,21.6 Z"
        );
        assert_eq!(svg_path(&Geometry::Unsupported, &Identity), "");
    }

    #[test]
    fn bounds_cover_all_rings() {
        let collection: FeatureCollection = serde_json::from_str(COLLECTION).unwrap();
        let bounds = collection.features[1]
            .geometry
            .as_ref()
            .and_then(Geometry::bounds)
            .unwrap();
        assert_eq!(bounds.min_x, -158.0);
        assert_eq!(bounds.max_x, -155.0);
        assert_eq!(bounds.min_y, 19.0);
        assert_eq!(bounds.max_y, 21.6);
        assert_eq!(Geometry::Unsupported.bounds(), None);
    }

    #[test]
    fn equirectangular_flips_y_and_round_trips() {
        let projection = Equirectangular::new(60.0);
        let (x, y) = projection.project(-100.0, 40.0);
        assert!((x - -50.0).abs() < 1e-9);
        assert_eq!(y, -40.0);
        let (lon, lat) = projection.unproject(x, y);
        assert!((lon - -100.0).abs() < 1e-9);
        assert_eq!(lat, 40.0);
    }
}
