use anyhow::Result;
use clap::Parser;
use crumena::cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli.run()
}
