// VirtualWisdom entity import tools - CLI binary
// Run with: cargo run --bin vw-import -- [args]

use clap::Parser;
use vw_import_tools::cli::{runner, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    vw_import_tools::init_logging(cli.verbose);

    if cli.verbose {
        tracing::info!("Verbose mode enabled");
    }

    runner::run(cli).await
}
