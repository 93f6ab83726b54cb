//! Exports cadastral parcels as KML documents and zipped Shapefiles.
//!
//! Parcels arrive as GeoJSON features from the NSW or QLD cadastre. The two
//! entry points, [`generate_kml`] and [`generate_shapefile`], are pure
//! transformations of such a feature list into the bytes of a downloadable
//! file.

pub mod color;
pub mod download;
mod error;
pub mod feature;
pub mod kml;
pub mod output;
pub mod query;
pub mod region;
pub mod ring;
pub mod shapefile;

#[cfg(test)]
mod test_helpers;

pub use self::error::Error;
pub use self::feature::{Feature, FeatureCollection, Geometry, Position, Properties, Ring};
pub use self::kml::KmlStyle;
pub use self::region::{Attributes, Region};
use self::shapefile::storage::Storage;

/// Renders the features as a styled KML document.
///
/// # Example
///
/// ```
/// use parcel_export::{generate_kml, FeatureCollection, KmlStyle, Region};
///
/// let collection: FeatureCollection = serde_json::from_str(r#"{"features": [{
///     "geometry": {"type": "Polygon", "coordinates": [[[153.0, -27.5], [153.1, -27.5], [153.1, -27.4]]]},
///     "properties": {"lot": "3", "plan": "RP123456"}
/// }]}"#).unwrap();
/// let kml = generate_kml(&collection.features, Region::Qld, &KmlStyle::default());
/// assert!(kml.contains("<name>Lot 3 Plan RP123456</name>"));
/// ```
pub fn generate_kml(features: &[Feature], region: Region, style: &KmlStyle) -> String {
    kml::encode(features, region, style)
}

/// Encodes the features as a zip archive holding `{base_name}.shp`, `.shx`,
/// `.dbf` and `.prj`.
///
/// Scratch files live in a temporary directory that is removed before this
/// returns, whether encoding succeeds or not.
pub fn generate_shapefile(
    features: &[Feature],
    region: Region,
    base_name: &str,
) -> Result<Vec<u8>, Error> {
    shapefile::encode(features, region, base_name)
}

/// Like [`generate_shapefile`], with scratch files written to `storage`.
pub fn generate_shapefile_with<S: Storage>(
    storage: &mut S,
    features: &[Feature],
    region: Region,
    base_name: &str,
) -> Result<Vec<u8>, Error> {
    shapefile::encode_with(storage, features, region, base_name)
}
