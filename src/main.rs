//! Plot the points of a CSV file, save the figure to `x.ps` and show it.

use std::path::PathBuf;
use anyhow::{Context, Result};
use clap::Parser;
use plot_points::{PlotConfig, PointPlotter};

#[derive(Parser)]
#[command(name = "plot-points")]
#[command(about = "Scatter plot fields 2 (horizontal) and 1 (vertical) \
                   of each CSV row into x.ps")]
#[command(version)]
struct Cli {
    /// Header-less CSV file with at least 3 fields per row
    input: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let plotter = PointPlotter::new(PlotConfig::default());
    let summary = plotter.run(&cli.input)
        .with_context(|| format!("cannot plot {}", cli.input.display()))?;
    tracing::info!(points = summary.points,
                   output = %summary.output.display(), "done");
    Ok(())
}
