pub mod auth;
pub mod cors;
pub mod error_handler;
pub mod request_id;

pub use auth::{hash_api_key, verify_api_key, ApiKeyAuth};
pub use cors::Cors;
pub use error_handler::path_error_handler;
pub use request_id::{RequestId, RequestIdLogger};
