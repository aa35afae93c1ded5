//! Barrier-free accessibility API for places in Jeju.
//!
//! Records live in a Google Sheets spreadsheet acting as a makeshift
//! database and are fetched fresh on every request. The core of the crate
//! is the filtering & ranking engine in [`filter`]: great-circle distance
//! plus keyword matching over free-text accessibility hints. Routing and
//! elevation queries are proxied to OpenRouteService unmodified.

pub mod api;
pub mod config;
pub mod directions;
pub mod error;
pub mod filter;
pub mod geo;
pub mod model;
pub mod server;
pub mod sheets;

pub use config::Config;
pub use error::{Error, Result};
pub use filter::{apply_filter, Category, FilterCriteria, UserType};
pub use model::AccessibilityRecord;
pub use sheets::SheetClient;
