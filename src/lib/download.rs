use super::error::Error;
use super::feature::Feature;
use super::kml::{self, KmlStyle};
use super::region::Region;
use super::shapefile;
use serde::Deserialize;
use std::num::NonZeroU32;
use tracing::debug;

/// Styling overrides as sent by a client; anything left out keeps the
/// default of [`KmlStyle`].
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
pub struct StyleOverrides {
    pub fill: Option<String>,
    pub outline: Option<String>,
    pub opacity: Option<f64>,
    pub weight: Option<NonZeroU32>,
}

/// The body of a download request.
#[derive(Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequest {
    pub features: Vec<Feature>,
    #[serde(default)]
    pub folder_name: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
    #[serde(default)]
    pub style: Option<StyleOverrides>,
}

/// An encoded file, ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct Download {
    pub content: Vec<u8>,
    pub media_type: &'static str,
    pub filename: String,
}

impl Download {
    /// The `Content-Disposition` header value, with the filename as a quoted
    /// string.
    pub fn content_disposition(&self) -> String {
        let quoted = self.filename.replace('\\', r"\\").replace('"', r#"\""#);
        format!(r#"attachment; filename="{}""#, quoted)
    }
}

impl DownloadRequest {
    fn folder_name(&self) -> Option<&str> {
        non_empty(&self.folder_name)
    }

    fn features(&self) -> Result<&[Feature], Error> {
        if self.features.is_empty() {
            return Err(Error::NoFeatures);
        }
        Ok(&self.features)
    }

    pub fn kml_style(&self) -> KmlStyle {
        let defaults = KmlStyle::default();
        let overrides = self.style.clone().unwrap_or_default();
        KmlStyle {
            fill: overrides.fill.unwrap_or(defaults.fill),
            fill_opacity: overrides.opacity.unwrap_or(defaults.fill_opacity),
            outline: overrides.outline.unwrap_or(defaults.outline),
            outline_weight: overrides.weight.unwrap_or(defaults.outline_weight),
            folder_name: self
                .folder_name()
                .map(str::to_string)
                .unwrap_or(defaults.folder_name),
        }
    }

    pub fn kml(&self) -> Result<Download, Error> {
        let features = self.features()?;
        let region = Region::detect(features);
        let document = kml::encode(features, region, &self.kml_style());
        let filename = attachment_name(non_empty(&self.file_name).unwrap_or("parcels.kml"), ".kml");
        debug!(%region, %filename, "prepared KML download");
        Ok(Download {
            content: document.into_bytes(),
            media_type: kml::MEDIA_TYPE,
            filename,
        })
    }

    pub fn shapefile(&self) -> Result<Download, Error> {
        let features = self.features()?;
        let region = Region::detect(features);
        let base_name = self
            .folder_name()
            .unwrap_or(shapefile::DEFAULT_BASE_NAME)
            .replace('/', "_");
        let content = shapefile::encode(features, region, &base_name)?;
        let default_name = format!("{}.zip", base_name);
        let filename = attachment_name(
            non_empty(&self.file_name).unwrap_or(&default_name),
            ".zip",
        );
        debug!(%region, %filename, "prepared shapefile download");
        Ok(Download {
            content,
            media_type: shapefile::MEDIA_TYPE,
            filename,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Strips path separators and makes sure the name ends in `extension`.
pub fn attachment_name(name: &str, extension: &str) -> String {
    let mut name = name.replace('/', "_");
    if !name.to_lowercase().ends_with(extension) {
        name.push_str(extension);
    }
    name
}
