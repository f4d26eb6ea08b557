use anyhow::Context;
use clap::Parser;
use dotenvy::dotenv;
use plant_analytics::cli::Cli;
use plant_analytics::{commands, logging};
use plant_store::open_repository;

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    logging::init();

    let cli = Cli::parse();
    let store_config = cli.store_config()?;
    tracing::info!("儲存設定: {:?}", store_config);

    let repo = open_repository(&store_config).context("無法開啟儲存庫")?;
    let output = commands::execute(&cli.command, repo.as_ref(), cli.analytics_config())?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
