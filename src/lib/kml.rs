use super::color::to_kml_color;
use super::feature::{value_text, Feature, Position, Properties, Ring};
use super::region::Region;
use super::ring::close_ring;
use itertools::Itertools;
use quick_xml::escape::escape;
use serde::Deserialize;
use std::num::NonZeroU32;
use tracing::debug;

pub const MEDIA_TYPE: &str = "application/vnd.google-earth.kml+xml";

const STYLE_ID: &str = "parcel";

const DEFAULT_OUTLINE_WEIGHT: NonZeroU32 = match NonZeroU32::new(2) {
    Some(weight) => weight,
    None => NonZeroU32::MIN,
};

/// Styling of the exported parcels, shared by every placemark.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct KmlStyle {
    pub fill: String,
    pub fill_opacity: f64,
    pub outline: String,
    pub outline_weight: NonZeroU32,
    pub folder_name: String,
}

impl Default for KmlStyle {
    fn default() -> Self {
        KmlStyle {
            fill: "#FF0000".into(),
            fill_opacity: 0.5,
            outline: "#000000".into(),
            outline_weight: DEFAULT_OUTLINE_WEIGHT,
            folder_name: "Parcels".into(),
        }
    }
}

/// Renders the features as a KML document with one placemark per feature.
///
/// Placemarks are named after the parcel's lot and plan and carry an HTML
/// table of the non-empty properties as their description. Features without
/// polygon geometry still get a placemark, just without a shape.
pub fn encode(features: &[Feature], region: Region, style: &KmlStyle) -> String {
    let fill = to_kml_color(&style.fill, style.fill_opacity);
    // outlines are always opaque
    let outline = to_kml_color(&style.outline, 1.0);

    let mut out: Vec<String> = vec![
        r#"<?xml version="1.0" encoding="UTF-8"?>"#.into(),
        r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#.into(),
        format!("  <Document><name>{}</name>", escape(style.folder_name.as_str())),
        format!(r#"    <Style id="{}">"#, STYLE_ID),
        format!(
            "      <LineStyle><color>{}</color><width>{}</width></LineStyle>",
            outline, style.outline_weight
        ),
        format!("      <PolyStyle><color>{}</color></PolyStyle>", fill),
        "    </Style>".into(),
    ];

    for feature in features {
        let attributes = region.attributes(&feature.properties);
        out.push("    <Placemark>".into());
        out.push(format!(
            "      <name>{}</name>",
            escape(attributes.display_name.as_str())
        ));
        out.push(format!("      <styleUrl>#{}</styleUrl>", STYLE_ID));
        out.push(format!(
            "      <description>{}</description>",
            description(&feature.properties)
        ));
        write_geometry(&mut out, feature);
        out.push("    </Placemark>".into());
    }

    out.push("  </Document></kml>".into());
    debug!(
        features = features.len(),
        region = %region,
        "encoded KML document"
    );
    out.join("\n")
}

/// An HTML table of all properties that have a value, wrapped in CDATA.
fn description(properties: &Properties) -> String {
    let rows = properties
        .iter()
        .filter_map(|(key, value)| {
            let text = value_text(value).filter(|text| !text.is_empty())?;
            Some(format!(
                "<tr><th>{}</th><td>{}</td></tr>",
                escape(key.as_str()),
                escape(text.as_str())
            ))
        })
        .join("");
    format!("<![CDATA[<table>{}</table>]]>", rows)
}

fn write_geometry(out: &mut Vec<String>, feature: &Feature) {
    let polygons: Vec<&[Ring]> = feature
        .geometry
        .polygons()
        .into_iter()
        .filter(|rings| !rings.is_empty())
        .collect();
    let multi = polygons.len() > 1;

    if multi {
        out.push("      <MultiGeometry>".into());
    }
    for rings in polygons {
        out.push("        <Polygon>".into());
        let (outer, holes) = (&rings[0], &rings[1..]);
        out.push("          <outerBoundaryIs><LinearRing>".into());
        write_ring(out, outer);
        out.push("          </LinearRing></outerBoundaryIs>".into());
        for hole in holes {
            out.push("          <innerBoundaryIs><LinearRing>".into());
            write_ring(out, hole);
            out.push("          </LinearRing></innerBoundaryIs>".into());
        }
        out.push("        </Polygon>".into());
    }
    if multi {
        out.push("      </MultiGeometry>".into());
    }
}

fn write_ring(out: &mut Vec<String>, ring: &[Position]) {
    out.push("            <coordinates>".into());
    out.extend(
        close_ring(ring)
            .iter()
            .map(|(x, y)| format!("              {},{},0", x, y)),
    );
    out.push("            </coordinates>".into());
}
