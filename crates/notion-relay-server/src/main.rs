use std::net::SocketAddr;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use notion_relay_client::DEFAULT_API_BASE;
use notion_relay_core::RelaySettings;
use notion_relay_server::validate::{print_report, validate};
use notion_relay_server::{AppState, router};
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LISTEN: &str = "0.0.0.0:8787";

#[derive(Parser)]
#[command(name = "notion-relay")]
#[command(about = "Relay JSON webhooks into a Notion database")]
#[command(version)]
struct Cli {
    /// Notion integration token
    #[arg(long, env = "NOTION_TOKEN", global = true, hide_env_values = true)]
    notion_token: Option<String>,

    /// Target database ID, dashed or as 32 hex characters
    #[arg(long, env = "NOTION_DB_ID", global = true)]
    notion_db_id: Option<String>,

    /// Notion API base URL
    #[arg(long, env = "NOTION_API_BASE", global = true, default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// Address to listen on
    #[arg(long, env = "RELAY_LISTEN", global = true, default_value = DEFAULT_LISTEN)]
    listen: SocketAddr,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the webhook endpoint (default)
    Serve,

    /// Check the configuration and exit non-zero on errors
    ValidateConfig,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env before clap reads the environment.
    let env_file_found = dotenv::dotenv().is_ok();
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = RelaySettings {
        notion_token: cli.notion_token,
        database_id: cli.notion_db_id,
    };

    if let Some(Commands::ValidateConfig) = cli.command {
        let report = validate(&settings, &cli.api_base, env_file_found);
        print_report(&report);
        return Ok(if report.is_valid() {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        });
    }

    info!("notion-relay v{}", env!("CARGO_PKG_VERSION"));
    let app = router(AppState::new(settings, cli.api_base));
    let listener = tokio::net::TcpListener::bind(cli.listen).await?;
    info!(addr = %listener.local_addr()?, "listening for webhooks");
    axum::serve(listener, app).await?;

    Ok(ExitCode::SUCCESS)
}
