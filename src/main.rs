mod batch;
mod cli;
mod logger;
mod metadata;
mod parser;

use crate::batch::BatchProcessor;
use crate::cli::Cli;
use crate::logger::Logger;
use crate::metadata::{PresetMetadata, TagWriter};
use clap::Parser;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if !cli.directory.is_dir() {
        anyhow::bail!("Invalid directory: {}", cli.directory.display());
    }

    let logger = Logger::new(cli.quiet, cli.output);
    let preset = PresetMetadata::default();
    logger.announce_presets(&preset);

    let processor = BatchProcessor::new(TagWriter::new(preset));
    processor.run(&cli.directory, &logger)?;

    Ok(())
}
