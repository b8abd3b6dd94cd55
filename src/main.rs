extern crate log;
pub mod batch;
pub mod crs;
pub mod dataset;
pub mod geofile;
pub mod kml;
use crate::batch::run_dataset;
use crate::dataset::DatasetKind;
use anyhow::anyhow;
use clap::Parser;
use serde::Deserialize;
use std::path::PathBuf;
use std::{fs::read_to_string, path::Path};

/// Convert per-prefecture urban-planning shapefiles into KML overlays.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the input config file.
    #[arg(short, long)]
    config_filepath: String,
}

fn all_dataset_kinds() -> Vec<DatasetKind> {
    DatasetKind::ALL.to_vec()
}

#[derive(Deserialize, Debug)]
struct Config {
    /// Root directory with one subdirectory per prefecture.
    shape_root: PathBuf,
    /// Root directory receiving `<prefecture>/<dataset>/*.kml`.
    output_root: PathBuf,
    /// Dataset types to convert; all three when omitted.
    #[serde(default = "all_dataset_kinds")]
    datasets: Vec<DatasetKind>,
}

fn try_main() -> anyhow::Result<()> {
    let args = Args::try_parse()?;
    if !Path::new(&args.config_filepath).exists() {
        return Err(anyhow!("Config file {} not found", &args.config_filepath));
    }
    let config_contents = read_to_string(args.config_filepath)?;
    let config: Config = serde_yaml::from_str(&config_contents)?;

    for kind in &config.datasets {
        let spec = kind.spec();
        run_dataset(&spec, &config.shape_root, &config.output_root)?;
    }
    log::info!("All prefectures processed.");
    Ok(())
}

fn main() {
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    env_logger::init();
    if let Err(e) = try_main() {
        eprintln!("Error: {:?}", e);
        std::process::exit(1)
    }
}
