//! # Cotacao
//!
//! Binary that wires together all the components:
//! - `server`: open the store, build the upstream provider and the quote
//!   service, serve `GET /cotacao`
//! - `client`: fetch the bid from a running server and write it to a file

mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use exchange_rates::AwesomeApiProvider;
use quote_client::{CotacaoClient, save_current_quote};
use quote_hex::{QuoteService, inbound::HttpServer};
use quote_repo::build_repo;

use config::{ClientConfig, ServerConfig};

#[derive(Parser)]
#[command(name = "cotacao")]
#[command(author, version, about = "USD/BRL quote server and client", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the current USD/BRL bid on GET /cotacao
    Server(ServerConfig),
    /// Fetch the bid from a running server and save it to a file
    Client(ClientConfig),
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "info,quote_hex=debug,exchange_rates=debug,quote_repo=debug,quote_client=debug".into()
    });

    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(config) => run_server(config).await,
        Commands::Client(config) => run_client(config).await,
    }
}

async fn run_server(config: ServerConfig) -> Result<()> {
    let database_url = config.database_url();
    tracing::info!("Using database: {}", database_url);

    // Build repository (handles connection and schema creation)
    let repo = build_repo(&database_url).await?;

    let fetcher =
        AwesomeApiProvider::with_url(&config.upstream_url).with_timeout(config.upstream_timeout());

    let service = QuoteService::new(fetcher, repo).with_store_timeout(config.store_timeout());

    HttpServer::new(service).run(&config.bind_addr()).await
}

async fn run_client(config: ClientConfig) -> Result<()> {
    let client = CotacaoClient::new(config.base_url()).with_timeout(config.timeout());

    let bid = match save_current_quote(&client, &config.output).await {
        Ok(bid) => bid,
        Err(e) if e.kind().is_timeout() => {
            tracing::error!("Request to {} timed out after {:?}", client.endpoint(), client.timeout());
            std::process::exit(1);
        }
        Err(e) => {
            tracing::error!(kind = %e.kind(), error = %e, "failed to save quote to {}", config.output.display());
            std::process::exit(1);
        }
    };

    tracing::info!("File {} saved with bid {}", config.output.display(), bid);
    Ok(())
}
