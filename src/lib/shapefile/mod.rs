//! Zipped ESRI Shapefile export.
//!
//! Each parcel becomes one polygon record with a `LOT`, `SEC` and `PLAN`
//! attribute. Multi-polygons are written as a single record whose parts are
//! the rings of all member polygons, so which ring belonged to which polygon
//! is not preserved.

use crate::error::Error;
use crate::feature::Feature;
use crate::region::Region;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

pub mod dbf;
pub mod shp;
pub mod storage;
pub mod writer;

use self::storage::{Storage, TempDirStorage};
use self::writer::{ShapeWriter, ShpWriter};

pub const MEDIA_TYPE: &str = "application/zip";
pub const DEFAULT_BASE_NAME: &str = "parcels";

/// Archive members, in archive order.
pub const EXTENSIONS: [&str; 4] = [".shp", ".shx", ".dbf", ".prj"];

const FIELDS: [(&str, u8); 3] = [("LOT", 10), ("SEC", 10), ("PLAN", 15)];

// scratch files never carry the user's name, only the archive members do
const SCRATCH_STEM: &str = "scratch";

/// Coordinates are always WGS84 longitude/latitude.
pub const WGS84_PRJ: &str = concat!(
    r#"GEOGCS["WGS 84",DATUM["WGS_1984","#,
    r#"SPHEROID["WGS 84",6378137,298.257223563]],"#,
    r#"PRIMEM["Greenwich",0],UNIT["degree",0.0174532925199433]]"#
);

/// Replaces path separators and spaces; falls back to `parcels` when nothing
/// is left.
pub fn sanitize_base_name(base_name: &str) -> String {
    let safe: String = base_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ' ' => '_',
            c => c,
        })
        .collect();
    if safe.is_empty() {
        DEFAULT_BASE_NAME.to_string()
    } else {
        safe
    }
}

/// Builds the zip archive in a fresh temporary directory, which is removed
/// again before this returns.
pub fn encode(features: &[Feature], region: Region, base_name: &str) -> Result<Vec<u8>, Error> {
    let mut storage = TempDirStorage::new()?;
    encode_with(&mut storage, features, region, base_name)
}

/// Like [`encode`], with the scratch files going to `storage`.
pub fn encode_with<S: Storage>(
    storage: &mut S,
    features: &[Feature],
    region: Region,
    base_name: &str,
) -> Result<Vec<u8>, Error> {
    let base = sanitize_base_name(base_name);

    let mut writer = ShpWriter::open(storage, SCRATCH_STEM);
    write_features(&mut writer, features, region)?;
    writer.close()?;
    storage.write(&format!("{}.prj", SCRATCH_STEM), WGS84_PRJ.as_bytes())?;

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for ext in &EXTENSIONS {
        let contents = storage.read(&format!("{}{}", SCRATCH_STEM, ext))?;
        zip.start_file(format!("{}{}", base, ext), options)?;
        zip.write_all(&contents)?;
    }
    let archive = zip.finish()?.into_inner();

    debug!(
        features = features.len(),
        region = %region,
        base = %base,
        bytes = archive.len(),
        "encoded shapefile archive"
    );
    Ok(archive)
}

/// Declares the attribute fields and writes one record and one shape per
/// feature. Features without polygon geometry get a null shape.
pub fn write_features<W: ShapeWriter>(
    writer: &mut W,
    features: &[Feature],
    region: Region,
) -> Result<(), Error> {
    for (name, size) in &FIELDS {
        writer.add_field(name, *size)?;
    }
    for feature in features {
        let attributes = region.attributes(&feature.properties);
        writer.add_record(&[&attributes.lot, &attributes.section, &attributes.plan])?;

        let parts = feature.geometry.rings();
        if parts.is_empty() {
            writer.add_null()?;
        } else {
            writer.add_parts(&parts)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod sanitize_base_name {
    use super::*;

    #[test]
    fn replaces_separators_and_spaces() {
        assert_eq!(sanitize_base_name("my parcels/2024"), "my_parcels_2024");
        assert_eq!(sanitize_base_name(r"..\up"), ".._up");
    }

    #[test]
    fn empty_falls_back() {
        assert_eq!(sanitize_base_name(""), "parcels");
    }
}
