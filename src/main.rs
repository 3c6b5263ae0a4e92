//! PurgeKit CLI — the main entry point.
//!
//! Reads a G-code file (or stdin), relocates tool changes per the
//! configured thresholds, and writes the result to a file (or stdout).

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use purgekit::{init_logging, Overrides, StreamProcessor};

#[derive(Parser)]
#[command(
    name = "purgekit",
    about = "Relocates tool changes in multi-tool G-code so planned extrusion replaces physical purges",
    version
)]
struct Cli {
    /// Input G-code file; reads stdin when absent or "-"
    input: Option<PathBuf>,

    /// Output file; writes stdout when absent
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Settings file (.json or .toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Minimum mm of extrusion between a relocated tool change and its
    /// original position (overrides the settings file)
    #[arg(long)]
    threshold: Option<f64>,

    /// Comment out tool changes whose following segment extrudes less
    /// than this many mm (overrides the settings file)
    #[arg(long)]
    skip_threshold: Option<f64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let overrides = Overrides {
        threshold: cli.threshold,
        skip_threshold: cli.skip_threshold,
    };
    let config = purgekit_settings::resolve(cli.config.as_deref(), &overrides)?;
    let processor = StreamProcessor::new(config)?;

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) if path.as_os_str() != "-" => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("cannot read {}", path.display()))?,
        )),
        _ => Box::new(io::stdin().lock()),
    };

    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("cannot write {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    processor.process(reader, writer)?;
    Ok(())
}
