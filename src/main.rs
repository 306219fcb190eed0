//! Referendum Map - regional referendum results on a choropleth
//!
//! Joins referendum results with region/department references, prints the
//! per-region totals and opens the map.

use anyhow::Context;
use clap::Parser;
use referendum_map::{gui, pipeline, PipelineConfig};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration; the fixed `data/` paths are used without one
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    // Print every region, not polars' truncated preview.
    std::env::set_var("POLARS_FMT_MAX_ROWS", "-1");

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => PipelineConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration {:?}", path))?,
        None => PipelineConfig::default(),
    };

    let output = pipeline::run(&config).context("Referendum pipeline failed")?;
    println!("{}", output.region_results);

    if config.output.display {
        gui::show_map(output.map, (config.output.width, config.output.height))?;
    }

    Ok(())
}
