use clap::Parser;
use color_eyre::Result;
use linestage_tui::Cli;
use linestage_tui::run_main;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    run_main(cli).await
}
