use clap::Parser;
use tiered_cacheable::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    cli::cache::run(cli.command).await
}
