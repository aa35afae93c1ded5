use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use jeju_barrier::config::{Config, DEFAULT_ORS_BASE_URL, DEFAULT_SHEETS_BASE_URL};
use jeju_barrier::server::serve;
use jeju_barrier::sheets::SheetClient;

#[derive(Parser)]
#[command(name = "jeju-barrier")]
#[command(about = "Barrier-free accessibility API for places in Jeju", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Spreadsheet holding the accessibility records
    #[arg(
        long,
        env = "SHEETS_SPREADSHEET_ID",
        global = true,
        default_value = "1DbZ7G7mrWEVPiaA-x7CU-LOV0_huNMFz5o_moGtROQ8"
    )]
    spreadsheet_id: String,

    /// A1-notation range of the record rows
    #[arg(long, env = "SHEETS_RANGE", global = true, default_value = "시트1!A2:AI")]
    sheet_range: String,

    /// Google Sheets API key
    #[arg(long, env = "GOOGLE_SHEETS_API_KEY", global = true, default_value = "")]
    sheets_api_key: String,

    /// OpenRouteService API key
    #[arg(long, env = "OPENROUTE_API_KEY", global = true, default_value = "")]
    ors_api_key: String,

    /// Google Sheets base URL
    #[arg(long, env = "SHEETS_BASE_URL", global = true, default_value = DEFAULT_SHEETS_BASE_URL)]
    sheets_base_url: String,

    /// OpenRouteService base URL
    #[arg(long, env = "ORS_BASE_URL", global = true, default_value = DEFAULT_ORS_BASE_URL)]
    ors_base_url: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server with OpenAPI docs
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// Fetch the record set once and print it as JSON
    Fetch,
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            spreadsheet_id: self.spreadsheet_id.clone(),
            sheet_range: self.sheet_range.clone(),
            sheets_api_key: self.sheets_api_key.clone(),
            sheets_base_url: self.sheets_base_url.clone(),
            ors_api_key: self.ors_api_key.clone(),
            ors_base_url: self.ors_base_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let config = cli.config();

    match cli.command {
        Commands::Serve { port } => serve(config, port).await,
        Commands::Fetch => {
            let client = SheetClient::new(
                &config.sheets_base_url,
                &config.spreadsheet_id,
                &config.sheet_range,
                &config.sheets_api_key,
            );
            let records = client.fetch_records().await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
            Ok(())
        }
    }
}
