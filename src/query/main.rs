//! Query tool for resolving place descriptions against a flat-file
//! gazetteer directory.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use alder::engine::Geocoder;
use alder::gazetteer::{FlatFileAddressTable, FlatFileGazetteer};
use alder::EngineConfig;

#[derive(Parser, Debug)]
#[command(name = "query")]
#[command(about = "Resolve place descriptions against a flat-file gazetteer")]
struct Args {
    /// Location string to resolve (or free text with --scan)
    location: String,

    /// Directory holding the gazetteer tables
    #[arg(short, long, default_value = "data")]
    data_dir: PathBuf,

    /// Engine configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Report all matches, most confident first
    #[arg(long)]
    list: bool,

    /// Scan free text for address-like fragments
    #[arg(long)]
    scan: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    info!("Loading gazetteer from {}", args.data_dir.display());
    let gazetteer = FlatFileGazetteer::load_from_dir(&args.data_dir)?;
    let address_table = FlatFileAddressTable::load_from_dir(&args.data_dir)?;

    let mut geocoder =
        Geocoder::new(Arc::new(gazetteer)).with_address_table(Arc::new(address_table));
    if let Some(path) = &args.config {
        geocoder = geocoder.with_config(EngineConfig::load_from_file(path)?);
    }

    if args.scan {
        let results = geocoder.scan(&args.location).await?;
        info!("{} address-like fragment(s) found", results.len());
        for result in &results {
            println!("{}", serde_json::to_string(result)?);
        }
    } else if args.list {
        let results = geocoder.geocode_all(&args.location).await?;
        info!("{} match(es) found", results.len());
        for result in &results {
            println!("{}", serde_json::to_string(result)?);
        }
    } else {
        match geocoder.geocode(&args.location).await? {
            Some(result) => println!("{}", serde_json::to_string_pretty(&result)?),
            None => info!("No match for '{}'", args.location),
        }
    }

    Ok(())
}
