use clap::Parser;
use kubectl_cleaner::cli::Cli;
use std::process;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run() -> kubectl_cleaner::Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    cli.init_logging();

    kubectl_cleaner::run_command(cli).await
}
