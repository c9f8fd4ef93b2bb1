//! # Core Type Definitions
//!
//! The GeoJSON data model shared by every other module: coordinates, bounding
//! boxes, geometries, property bags and feature collections.
//!
//! ## Key Types
//!
//! - [`LonLat`] - A single longitude/latitude position
//! - [`BoundingBox`] - A normalized lon/lat rectangle
//! - [`Geometry`] - Point, line and polygon geometries plus their `Multi*` forms
//! - [`Feature`] / [`FeatureCollection`] - Geometries with their property bags
//!
//! Decoding is lenient at the geometry level: a feature whose geometry is
//! missing, of an unknown type, or carries coordinates that do not decode is
//! kept with [`Geometry::Unsupported`] instead of failing the whole layer.

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Coordinates
// ============================================================================

/// A position in longitude/latitude order, as GeoJSON stores it.
///
/// Decodes from any array with at least two numbers; a trailing altitude is
/// accepted and dropped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LonLat {
    /// Longitude in degrees
    pub lon: f64,
    /// Latitude in degrees
    pub lat: f64,
}

impl LonLat {
    /// Creates a new position.
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }
}

impl Serialize for LonLat {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(2))?;
        seq.serialize_element(&self.lon)?;
        seq.serialize_element(&self.lat)?;
        seq.end()
    }
}

impl<'de> Deserialize<'de> for LonLat {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PositionVisitor;

        impl<'de> Visitor<'de> for PositionVisitor {
            type Value = LonLat;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a GeoJSON position [lon, lat, ...]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<LonLat, A::Error> {
                let lon: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;
                let lat: f64 = seq
                    .next_element()?
                    .ok_or_else(|| de::Error::invalid_length(1, &self))?;
                // Altitude and any further ordinates are ignored.
                while seq.next_element::<de::IgnoredAny>()?.is_some() {}
                Ok(LonLat { lon, lat })
            }
        }

        deserializer.deserialize_seq(PositionVisitor)
    }
}

/// An axis-aligned longitude/latitude rectangle.
///
/// Always normalized: `min_lon <= max_lon` and `min_lat <= max_lat`. Every
/// constructor sorts its inputs, so a box built from two arbitrary drag
/// corners is valid regardless of drag direction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
}

impl BoundingBox {
    /// Creates a box from its four edges, swapping any inverted pair.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        let (min_lon, max_lon) = ordered(min_lon, max_lon);
        let (min_lat, max_lat) = ordered(min_lat, max_lat);
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Creates a box spanning two arbitrary corner points.
    pub fn from_corners(a: LonLat, b: LonLat) -> Self {
        Self::new(a.lon, a.lat, b.lon, b.lat)
    }

    /// Creates a degenerate box covering a single position.
    pub fn from_point(p: LonLat) -> Self {
        Self::new(p.lon, p.lat, p.lon, p.lat)
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// West-east extent in degrees.
    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    /// South-north extent in degrees.
    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Closed-interval containment: positions on an edge are inside.
    ///
    /// Any NaN ordinate compares false and is therefore outside.
    #[inline]
    pub fn contains(&self, p: LonLat) -> bool {
        p.lon >= self.min_lon && p.lon <= self.max_lon && p.lat >= self.min_lat && p.lat <= self.max_lat
    }

    /// Grows the box to cover `p`.
    pub fn extend(&mut self, p: LonLat) {
        self.min_lon = self.min_lon.min(p.lon);
        self.min_lat = self.min_lat.min(p.lat);
        self.max_lon = self.max_lon.max(p.lon);
        self.max_lat = self.max_lat.max(p.lat);
    }

    /// Whether all four edges are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.min_lon.is_finite()
            && self.min_lat.is_finite()
            && self.max_lon.is_finite()
            && self.max_lat.is_finite()
    }
}

impl fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{:.6}, {:.6}] - [{:.6}, {:.6}]",
            self.min_lon, self.min_lat, self.max_lon, self.max_lat
        )
    }
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

// ============================================================================
// Geometry
// ============================================================================

/// A GeoJSON geometry.
///
/// `Unsupported` stands in for anything the decoder could not model: a
/// `GeometryCollection`, an unknown type tag, a missing geometry, or
/// malformed coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: LonLat },
    LineString { coordinates: Vec<LonLat> },
    /// Rings; the first one is the outer ring, the rest are holes.
    Polygon { coordinates: Vec<Vec<LonLat>> },
    MultiPoint { coordinates: Vec<LonLat> },
    MultiLineString { coordinates: Vec<Vec<LonLat>> },
    MultiPolygon { coordinates: Vec<Vec<Vec<LonLat>>> },
    #[serde(skip_deserializing)]
    Unsupported,
}

impl Geometry {
    /// Decodes a raw JSON geometry, falling back to `Unsupported`.
    pub fn from_value(value: serde_json::Value) -> Self {
        serde_json::from_value(value).unwrap_or(Self::Unsupported)
    }

    /// The GeoJSON type name of this geometry.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Point { .. } => "Point",
            Self::LineString { .. } => "LineString",
            Self::Polygon { .. } => "Polygon",
            Self::MultiPoint { .. } => "MultiPoint",
            Self::MultiLineString { .. } => "MultiLineString",
            Self::MultiPolygon { .. } => "MultiPolygon",
            Self::Unsupported => "Unsupported",
        }
    }

    /// Whether the map draws this geometry as point markers.
    pub fn is_puntal(&self) -> bool {
        matches!(self, Self::Point { .. } | Self::MultiPoint { .. })
    }

    /// Visits every vertex of every part and ring, holes included.
    pub fn for_each_vertex(&self, mut f: impl FnMut(LonLat)) {
        match self {
            Self::Point { coordinates } => f(*coordinates),
            Self::LineString { coordinates } | Self::MultiPoint { coordinates } => {
                coordinates.iter().copied().for_each(f)
            }
            Self::Polygon { coordinates } | Self::MultiLineString { coordinates } => coordinates
                .iter()
                .flatten()
                .copied()
                .for_each(f),
            Self::MultiPolygon { coordinates } => coordinates
                .iter()
                .flatten()
                .flatten()
                .copied()
                .for_each(f),
            Self::Unsupported => {}
        }
    }
}

fn lenient_geometry<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Geometry, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(raw.map(Geometry::from_value).unwrap_or(Geometry::Unsupported))
}

// ============================================================================
// Properties
// ============================================================================

/// A single property value from a feature's property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    /// Arrays and nested objects, kept verbatim.
    Other(serde_json::Value),
}

impl PropertyValue {
    /// Null and empty text carry nothing to search.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Whether the value would display as "present": not null, not empty
    /// text, not `false`, not zero or NaN.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Null => false,
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0 && !n.is_nan(),
            Self::Text(s) => !s.is_empty(),
            Self::Other(_) => true,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) if *n == 0.0 => f.write_str("0"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Other(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

/// A feature's property bag, in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<(String, PropertyValue)>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a property by exact key.
    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Sets a property, replacing an existing value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropertyValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn values(&self) -> impl Iterator<Item = &PropertyValue> {
        self.0.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<PropertyValue>> FromIterator<(K, V)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Self::new();
        for (k, v) in iter {
            props.insert(k, v);
        }
        props
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PropertiesVisitor;

        impl<'de> Visitor<'de> for PropertiesVisitor {
            type Value = Properties;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a property object or null")
            }

            fn visit_unit<E: de::Error>(self) -> Result<Properties, E> {
                Ok(Properties::new())
            }

            fn visit_none<E: de::Error>(self) -> Result<Properties, E> {
                Ok(Properties::new())
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Properties, D::Error> {
                d.deserialize_any(self)
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Properties, A::Error> {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((k, v)) = map.next_entry::<String, PropertyValue>()? {
                    entries.push((k, v));
                }
                Ok(Properties(entries))
            }
        }

        deserializer.deserialize_option(PropertiesVisitor)
    }
}

// ============================================================================
// Features
// ============================================================================

/// A geometry with its property bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default = "unsupported", deserialize_with = "lenient_geometry")]
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Properties,
}

fn unsupported() -> Geometry {
    Geometry::Unsupported
}

impl Feature {
    /// Creates a feature with no id.
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Self {
            id: None,
            geometry,
            properties,
        }
    }

    /// Convenience constructor for a point feature.
    pub fn point(lon: f64, lat: f64, properties: Properties) -> Self {
        Self::new(
            Geometry::Point {
                coordinates: LonLat::new(lon, lat),
            },
            properties,
        )
    }
}

/// A GeoJSON `FeatureCollection` as served by the layer backend.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    /// Parses a GeoJSON document.
    pub fn from_json_str(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bounding_box_normalizes_corners() {
        let b = BoundingBox::from_corners(LonLat::new(114.4, 30.6), LonLat::new(114.3, 30.5));
        assert_eq!(b.min_lon(), 114.3);
        assert_eq!(b.min_lat(), 30.5);
        assert_eq!(b.max_lon(), 114.4);
        assert_eq!(b.max_lat(), 30.6);
    }

    #[test]
    fn test_bounding_box_edges_are_inside() {
        let b = BoundingBox::new(0.0, 0.0, 1.0, 1.0);
        assert!(b.contains(LonLat::new(0.0, 0.0)));
        assert!(b.contains(LonLat::new(1.0, 1.0)));
        assert!(b.contains(LonLat::new(1.0, 0.5)));
        assert!(!b.contains(LonLat::new(1.0000001, 0.5)));
        assert!(!b.contains(LonLat::new(f64::NAN, 0.5)));
    }

    #[test]
    fn test_position_accepts_altitude() {
        let p: LonLat = serde_json::from_value(json!([114.3, 30.5, 12.0])).unwrap();
        assert_eq!(p, LonLat::new(114.3, 30.5));
        assert!(serde_json::from_value::<LonLat>(json!([114.3])).is_err());
    }

    #[test]
    fn test_feature_collection_decodes_all_geometry_types() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": [1.0, 2.0]}, "properties": {"name": "a"}},
                {"type": "Feature", "geometry": {"type": "LineString", "coordinates": [[0, 0], [1, 1]]}, "properties": null},
                {"type": "Feature", "geometry": {"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [1, 1], [0, 0]]]}, "properties": {}},
                {"type": "Feature", "geometry": {"type": "MultiPoint", "coordinates": [[0, 0]]}},
                {"type": "Feature", "geometry": {"type": "MultiLineString", "coordinates": [[[0, 0], [1, 1]]]}},
                {"type": "Feature", "geometry": {"type": "MultiPolygon", "coordinates": [[[[0, 0], [1, 0], [0, 0]]]]}}
            ]
        });
        let fc: FeatureCollection = serde_json::from_value(doc).unwrap();
        let names: Vec<_> = fc.features.iter().map(|f| f.geometry.type_name()).collect();
        assert_eq!(
            names,
            ["Point", "LineString", "Polygon", "MultiPoint", "MultiLineString", "MultiPolygon"]
        );
        assert!(fc.features[1].properties.is_empty());
    }

    #[test]
    fn test_bad_geometry_becomes_unsupported() {
        let doc = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "geometry": null, "properties": {"name": "no geometry"}},
                {"type": "Feature", "properties": {"name": "missing geometry"}},
                {"type": "Feature", "geometry": {"type": "Circle", "coordinates": [0, 0]}},
                {"type": "Feature", "geometry": {"type": "Point", "coordinates": ["x", 0]}},
                {"type": "Feature", "geometry": {"type": "GeometryCollection", "geometries": []}}
            ]
        });
        let fc: FeatureCollection = serde_json::from_value(doc).unwrap();
        assert_eq!(fc.len(), 5);
        assert!(fc.features.iter().all(|f| f.geometry == Geometry::Unsupported));
        assert_eq!(
            fc.features[0].properties.get("name"),
            Some(&PropertyValue::from("no geometry"))
        );
    }

    #[test]
    fn test_properties_keep_document_order() {
        let props: Properties =
            serde_json::from_str(r#"{"zeta": 1, "alpha": "x", "mid": null, "flag": true}"#).unwrap();
        let keys: Vec<_> = props.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, ["zeta", "alpha", "mid", "flag"]);
        assert_eq!(props.get("zeta"), Some(&PropertyValue::Number(1.0)));
        assert_eq!(props.get("mid"), Some(&PropertyValue::Null));
        assert_eq!(props.get("flag"), Some(&PropertyValue::Bool(true)));
    }

    #[test]
    fn test_property_value_display() {
        assert_eq!(PropertyValue::Number(42.0).to_string(), "42");
        assert_eq!(PropertyValue::Number(1.5).to_string(), "1.5");
        assert_eq!(PropertyValue::Number(-0.0).to_string(), "0");
        assert_eq!(PropertyValue::Null.to_string(), "null");
        assert_eq!(PropertyValue::Bool(false).to_string(), "false");
        assert_eq!(PropertyValue::from("高等院校").to_string(), "高等院校");
    }

    #[test]
    fn test_property_value_truthiness() {
        assert!(!PropertyValue::Null.is_truthy());
        assert!(!PropertyValue::from("").is_truthy());
        assert!(!PropertyValue::Number(0.0).is_truthy());
        assert!(!PropertyValue::Bool(false).is_truthy());
        assert!(PropertyValue::Number(3.0).is_truthy());
        assert!(PropertyValue::from("x").is_truthy());

        assert!(PropertyValue::Null.is_blank());
        assert!(PropertyValue::from("").is_blank());
        assert!(!PropertyValue::Number(0.0).is_blank());
    }
}
