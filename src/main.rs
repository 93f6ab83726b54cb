use parcel_export::output::Output;
use parcel_export::{FeatureCollection, KmlStyle, Region};
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::num::NonZeroU32;
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy)]
enum Format {
    Kml,
    Shp,
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "kml" => Ok(Format::Kml),
            "shp" | "shapefile" | "zip" => Ok(Format::Shp),
            _ => Err(format!("unknown format {:?}, expected kml or shp", s)),
        }
    }
}

#[derive(StructOpt, Debug)]
#[structopt(name = "parcel_export")]
struct Opt {
    /// GeoJSON feature collection with the parcels
    #[structopt(short, long, parse(from_os_str))]
    input: PathBuf,

    /// File to write, stdout if omitted
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Output format: kml or shp (zipped shapefile)
    #[structopt(short, long, default_value = "kml")]
    format: Format,

    /// NSW or QLD, guessed from the feature properties if omitted
    #[structopt(short, long)]
    region: Option<Region>,

    /// KML folder name, or base name of the shapefile members
    #[structopt(short, long)]
    name: Option<String>,

    #[structopt(long, default_value = "#FF0000")]
    fill: String,

    #[structopt(long, default_value = "0.5")]
    opacity: f64,

    #[structopt(long, default_value = "#000000")]
    outline: String,

    /// Outline width
    #[structopt(long, default_value = "2")]
    weight: NonZeroU32,

    /// Verbosity, repeat for more
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();

    let filter = match opt.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let file = File::open(&opt.input)?;
    let collection = FeatureCollection::from_reader(BufReader::new(file))?;
    if collection.features.is_empty() {
        return Err("no features in input".into());
    }
    let features = collection.features.as_slice();
    let region = opt.region.unwrap_or_else(|| Region::detect(features));
    info!(features = features.len(), %region, "read parcels");

    let mut writer: Box<dyn Write> = match &opt.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout()),
    };

    match opt.format {
        Format::Kml => {
            let defaults = KmlStyle::default();
            let style = KmlStyle {
                fill: opt.fill.clone(),
                fill_opacity: opt.opacity,
                outline: opt.outline.clone(),
                outline_weight: opt.weight,
                folder_name: opt.name.clone().unwrap_or(defaults.folder_name),
            };
            features.write_kml(region, &style, &mut writer)?;
        }
        Format::Shp => {
            let base_name = opt.name.as_deref().unwrap_or("parcels");
            features.write_shapefile(region, base_name, &mut writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}
