use super::error::Error;
use super::feature::Feature;
use super::kml::{self, KmlStyle};
use super::region::Region;
use super::shapefile;
use std::io::Write;

pub trait Output {
    fn write_kml(
        &self,
        region: Region,
        style: &KmlStyle,
        writer: &mut dyn Write,
    ) -> Result<(), Error>;
    fn write_shapefile(
        &self,
        region: Region,
        base_name: &str,
        writer: &mut dyn Write,
    ) -> Result<(), Error>;
}

impl Output for [Feature] {
    fn write_kml(
        &self,
        region: Region,
        style: &KmlStyle,
        writer: &mut dyn Write,
    ) -> Result<(), Error> {
        let document = kml::encode(self, region, style);
        writeln!(writer, "{}", document)?;
        Ok(())
    }

    fn write_shapefile(
        &self,
        region: Region,
        base_name: &str,
        writer: &mut dyn Write,
    ) -> Result<(), Error> {
        let archive = shapefile::encode(self, region, base_name)?;
        writer.write_all(&archive)?;
        Ok(())
    }
}
