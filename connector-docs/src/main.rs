use clap::Parser;
use std::path::PathBuf;

use connector_docs::{load_metadata, write_docs};

#[derive(Parser, Debug)]
#[command(name = "connector-docs", about = "Generate connector documentation pages")]
struct Args {
    /// JSON file with the extracted connector metadata
    #[arg(long)]
    metadata: PathBuf,

    /// Directory holding one folder per connector
    #[arg(long)]
    output: PathBuf,

    /// Restrict generation to these connectors
    #[arg(long, num_args = 1..)]
    only: Vec<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .without_time()
        .with_file(false)
        .with_line_number(false)
        .with_target(false)
        .init();

    let args = Args::parse();
    let metadata = load_metadata(&args.metadata)?;
    let summary = write_docs(&metadata, &args.output, &args.only)?;

    tracing::info!(
        "Wrote {} connector pages ({} created, {} replaced, {} appended)",
        summary.total(),
        summary.created,
        summary.replaced,
        summary.appended
    );
    Ok(())
}
