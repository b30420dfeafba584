use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use lotledger::{
    export_to_artifact, export_to_writer, AppConfig, AssetLots, Method, PnlCalculator,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON file with an array of assets, each carrying its lots and current price
    #[arg(short, long)]
    lots: PathBuf,

    /// Lot accounting method (overrides the config file)
    #[arg(short, long, value_enum)]
    method: Option<Method>,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the lot export to this CSV file
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Write the lot export to a temporary artifact and print its path
    #[arg(long, default_value_t = false)]
    artifact: bool,
}

fn load_assets(path: &Path) -> Result<Vec<AssetLots>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read lots file {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse lots file {}", path.display()))
}

fn main() -> Result<()> {
    env_logger::init();

    let started = Instant::now();
    let args = Args::parse();

    // from_file validates; defaults are valid as is
    let config = match &args.config {
        Some(path) => AppConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AppConfig::default(),
    };
    let method = args.method.unwrap_or(config.method);

    let assets = load_assets(&args.lots)?;
    log::info!("Loaded {} assets from {}", assets.len(), args.lots.display());

    let calculator = PnlCalculator::new();
    let portfolio = calculator
        .calculate_portfolio(&assets, method)
        .context("PnL calculation failed")?;
    println!("{}", portfolio.summary_table());

    if let Some(out) = &args.out {
        let file = File::create(out)
            .with_context(|| format!("Failed to create {}", out.display()))?;
        let rows = portfolio.export_rows()?;
        let (_, count) = export_to_writer(rows, BufWriter::new(file), &config.export)
            .context("Failed to write CSV export")?;
        println!("Wrote {} rows to {}", count, out.display());
    }

    if args.artifact {
        let artifact = export_to_artifact(portfolio.export_rows()?, &config.export)
            .context("Failed to create export artifact")?;
        let rows = artifact.rows();
        let id = artifact.id();
        let path = artifact.keep()?;
        println!("Export artifact {}: {} rows at {}", id, rows, path.display());
    }

    log::info!(
        "Total execution time: {:.2} seconds",
        started.elapsed().as_secs_f64()
    );

    Ok(())
}
