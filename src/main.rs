pub mod types;
pub mod config;
pub mod data;
pub mod ranking;
pub mod feed;
pub mod server;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the cities and write the JSON feed
    Rank {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
    /// Serve the ranking over HTTP
    Serve {
        #[arg(short, long, value_name = "FILE", default_value = "config.toml")]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Rank { config } => {
            println!("Ranking cities with config: {:?}", config);
            let app_config = config::AppConfig::load_from_file(config)?;

            // 1. Load Data
            let records = data::load_city_records(&app_config)?;

            // 2. Rank Data
            let ranking = ranking::rank_records(&app_config, records)?;

            // 3. Write Feed
            feed::write_feed(&app_config, &ranking)?;

            println!("Ranking complete!");
        }
        Commands::Serve { config } => {
            println!("Serving ranking with config: {:?}", config);
            let app_config = config::AppConfig::load_from_file(config)?;

            // Rank from source rather than reading back the feed file, so the
            // API always reflects the current CSV.
            let records = data::load_city_records(&app_config)?;
            let ranking = ranking::rank_records(&app_config, records)?;

            server::start_server(app_config, ranking).await?;
        }
    }

    Ok(())
}
