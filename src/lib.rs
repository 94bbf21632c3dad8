//! Hotel booking API
//!
//! Payment, invoicing and housekeeping endpoints for a hotel front end, backed
//! by a business platform reached through the [`RecordStore`] port.

pub mod app;
pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;

// Re-export commonly used types
pub use app::AppState;
pub use modules::records::{self, RecordStore};
pub use modules::reservations;
