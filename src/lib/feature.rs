use super::error::Error;
use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use std::io::Read;

/// A `(longitude, latitude)` pair in WGS84 degrees.
pub type Position = (f64, f64);
pub type Ring = Vec<Position>;
pub type Properties = Map<String, Value>;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon {
        coordinates: Vec<Ring>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Ring>>,
    },
    /// Any other GeoJSON geometry type, or no geometry at all.
    #[serde(other)]
    Unsupported,
}

impl Default for Geometry {
    fn default() -> Self {
        Geometry::Unsupported
    }
}

impl Geometry {
    /// The geometry as a list of polygons, each a list of rings.
    pub fn polygons(&self) -> Vec<&[Ring]> {
        match self {
            Geometry::Polygon { coordinates } => vec![coordinates.as_slice()],
            Geometry::MultiPolygon { coordinates } => {
                coordinates.iter().map(|polygon| polygon.as_slice()).collect()
            }
            Geometry::Unsupported => vec![],
        }
    }

    /// All non-empty rings of all polygons, flattened into one list.
    ///
    /// Which polygon a ring belonged to, and whether it was an outer boundary
    /// or a hole, is not retained.
    pub fn rings(&self) -> Vec<&[Position]> {
        self.polygons()
            .into_iter()
            .flatten()
            .filter(|ring| !ring.is_empty())
            .map(|ring| ring.as_slice())
            .collect()
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct Feature {
    #[serde(default, deserialize_with = "null_as_default")]
    pub geometry: Geometry,
    #[serde(default, deserialize_with = "null_as_default")]
    pub properties: Properties,
}

impl Feature {
    pub fn new(geometry: Geometry, properties: Properties) -> Self {
        Feature {
            geometry,
            properties,
        }
    }

    /// The property rendered as text, `None` when it is missing or `null`.
    pub fn property(&self, key: &str) -> Option<String> {
        self.properties.get(key).and_then(value_text)
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn from_reader(reader: impl Read) -> Result<Self, Error> {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// Renders a scalar property value as text, `None` for `null`.
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod deserialize {
    use super::*;
    use serde_json::{from_str, json};

    #[test]
    fn polygon_feature() {
        let feature: Feature = from_str(
            r#"{
                "type": "Feature",
                "geometry": {"type": "Polygon", "coordinates": [[[153.0, -27.5], [153.1, -27.5], [153.1, -27.4]]]},
                "properties": {"lot": "3", "plan": "RP123456", "area": 812.5}
            }"#,
        )
        .unwrap();
        assert_eq!(
            feature.geometry,
            Geometry::Polygon {
                coordinates: vec![vec![(153.0, -27.5), (153.1, -27.5), (153.1, -27.4)]]
            }
        );
        assert_eq!(feature.property("lot"), Some("3".to_string()));
        assert_eq!(feature.property("area"), Some("812.5".to_string()));
    }

    #[test]
    fn properties_keep_document_order() {
        let feature: Feature = from_str(
            r#"{"geometry": null, "properties": {"planlabel": "DP1", "lotnumber": "4", "area": 1}}"#,
        )
        .unwrap();
        let keys: Vec<&String> = feature.properties.keys().collect();
        assert_eq!(keys, ["planlabel", "lotnumber", "area"]);
    }

    #[test]
    fn other_geometry_types_are_unsupported() {
        let feature: Feature = from_str(
            r#"{"geometry": {"type": "Point", "coordinates": [153.0, -27.5]}, "properties": {}}"#,
        )
        .unwrap();
        assert_eq!(feature.geometry, Geometry::Unsupported);
        assert!(feature.geometry.polygons().is_empty());
    }

    #[test]
    fn null_geometry_and_properties() {
        let feature: Feature = from_str(r#"{"geometry": null, "properties": null}"#).unwrap();
        assert_eq!(feature.geometry, Geometry::Unsupported);
        assert!(feature.properties.is_empty());
    }

    #[test]
    fn collection_from_reader() {
        let json = br#"{"type": "FeatureCollection", "features": [{"geometry": null, "properties": {}}]}"#;
        let collection = FeatureCollection::from_reader(&json[..]).unwrap();
        assert_eq!(collection.features.len(), 1);
        assert!(matches!(
            FeatureCollection::from_reader(&b"[1, 2"[..]),
            Err(Error::Json(_))
        ));
    }

    #[test]
    fn null_property_has_no_text() {
        let mut properties = Properties::new();
        properties.insert("sectionnumber".into(), json!(null));
        let feature = Feature::new(Geometry::Unsupported, properties);
        assert_eq!(feature.property("sectionnumber"), None);
        assert_eq!(feature.property("missing"), None);
    }
}

#[cfg(test)]
mod rings {
    use super::*;

    #[test]
    fn multi_polygon_rings_are_flattened() {
        let square = vec![(0., 0.), (1., 0.), (1., 1.), (0., 0.)];
        let hole = vec![(0.2, 0.2), (0.4, 0.2), (0.4, 0.4), (0.2, 0.2)];
        let geometry = Geometry::MultiPolygon {
            coordinates: vec![vec![square.clone(), hole.clone()], vec![square.clone()]],
        };
        assert_eq!(geometry.polygons().len(), 2);
        assert_eq!(
            geometry.rings(),
            vec![square.as_slice(), hole.as_slice(), square.as_slice()]
        );
    }

    #[test]
    fn empty_rings_are_dropped() {
        let geometry = Geometry::Polygon {
            coordinates: vec![vec![], vec![(0., 0.), (1., 1.), (0., 1.)]],
        };
        assert_eq!(geometry.rings().len(), 1);
    }
}
