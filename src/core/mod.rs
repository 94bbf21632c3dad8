pub mod error;
pub mod response;
pub mod timezone;

pub use error::{AppError, Result};
pub use response::{Data, Envelope};
pub use timezone::HotelClock;
