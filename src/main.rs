//! CLI entry point for the fractal image codec

use clap::Parser;
use fractile::io::cli::{Cli, FileProcessor};

fn main() -> fractile::Result<()> {
    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
