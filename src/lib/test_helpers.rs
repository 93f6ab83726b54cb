use super::feature::{Feature, Geometry, Properties, Ring};
use serde_json::Value;

pub fn properties(pairs: &[(&str, &str)]) -> Properties {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_string(), Value::String((*value).to_string())))
        .collect()
}

/// An open unit square with its lower left corner at `(x, y)`.
pub fn square(x: f64, y: f64) -> Ring {
    vec![(x, y), (x + 1., y), (x + 1., y + 1.), (x, y + 1.)]
}

pub fn polygon_feature(rings: Vec<Ring>, pairs: &[(&str, &str)]) -> Feature {
    let geometry = Geometry::Polygon { coordinates: rings };
    Feature::new(geometry, properties(pairs))
}

pub fn multi_polygon_feature(polygons: Vec<Vec<Ring>>, pairs: &[(&str, &str)]) -> Feature {
    let geometry = Geometry::MultiPolygon {
        coordinates: polygons,
    };
    Feature::new(geometry, properties(pairs))
}
