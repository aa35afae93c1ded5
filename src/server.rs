//! Server state and startup.
//!
//! State holds only the configured upstream clients. Each request fetches
//! its own copy of the record set, so there is no shared mutable state and
//! no locking anywhere in the request path.

use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use crate::api::build_router;
use crate::config::Config;
use crate::directions::DirectionsClient;
use crate::sheets::SheetClient;

/// Shared immutable state for request handlers.
pub struct AppState {
    pub sheets: SheetClient,
    pub directions: DirectionsClient,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            sheets: SheetClient::new(
                &config.sheets_base_url,
                &config.spreadsheet_id,
                &config.sheet_range,
                &config.sheets_api_key,
            ),
            directions: DirectionsClient::new(&config.ors_base_url, &config.ors_api_key),
        }
    }
}

/// Build the router and serve until shutdown.
pub async fn serve(config: Config, port: u16) -> Result<()> {
    let state = Arc::new(AppState::from_config(&config));
    let app = build_router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let bound = listener.local_addr()?;
    info!("server listening on http://{bound}");
    info!("swagger ui at http://{bound}/swagger-ui/");

    axum::serve(listener, app).await?;

    Ok(())
}
