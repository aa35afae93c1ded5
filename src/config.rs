//! Startup configuration.
//!
//! Credentials and upstream endpoints are injected once at startup (CLI
//! flags or environment) and carried in [`Config`]; nothing reads secrets
//! per call.

/// Google Sheets REST endpoint.
pub const DEFAULT_SHEETS_BASE_URL: &str = "https://sheets.googleapis.com";

/// OpenRouteService endpoint.
pub const DEFAULT_ORS_BASE_URL: &str = "https://api.openrouteservice.org";

/// Everything the server needs to talk to its upstreams.
#[derive(Debug, Clone)]
pub struct Config {
    /// Spreadsheet holding the accessibility records
    pub spreadsheet_id: String,
    /// A1-notation range of the record rows
    pub sheet_range: String,
    /// Google Sheets API key
    pub sheets_api_key: String,
    /// Google Sheets base URL (overridable for tests)
    pub sheets_base_url: String,
    /// OpenRouteService API key, sent bearer-prefixed
    pub ors_api_key: String,
    /// OpenRouteService base URL (overridable for tests)
    pub ors_base_url: String,
}
