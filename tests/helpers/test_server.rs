// Test Server Helpers
//
// Spawns a real HTTP server with the full application configuration on a
// random port, backed by the seeded in-memory record store.

use std::sync::Arc;

use actix_web::App;
use hotel_api::app::{self, AppState};
use hotel_api::config::{CorsPolicy, SecurityConfig};
use hotel_api::core::HotelClock;
use hotel_api::records::{InMemoryRecordStore, RecordStore};

pub use actix_test::TestServer;
pub use hotel_api::middleware::auth::API_KEY_HEADER;

pub const TEST_API_KEY: &str = "test-front-desk-key";
pub const TEST_BILL_REPORT: &str = "aac_hotel_api.report_booking_receipt";

/// Seeded store: booking 3 (checkin, 320.00 due), booking 5
/// (cleaning_needed, paid) and booking 42 (confirmed, paid)
pub fn seeded_store() -> Arc<InMemoryRecordStore> {
    Arc::new(InMemoryRecordStore::seeded(HotelClock::utc()))
}

pub fn test_state(store: Arc<dyn RecordStore>) -> AppState {
    AppState::new(
        store,
        TEST_BILL_REPORT,
        SecurityConfig::plain(TEST_API_KEY),
        CorsPolicy::default(),
    )
}

/// Spawn the application over `store`
///
/// The server stops when the returned `TestServer` drops.
pub fn spawn_app(store: Arc<dyn RecordStore>) -> TestServer {
    let state = test_state(store);
    actix_test::start(move || App::new().configure(app::configure(state.clone())))
}

/// Spawn the application over a fresh seeded store, keeping a handle on the
/// store for assertions
pub fn spawn_seeded_app() -> (Arc<InMemoryRecordStore>, TestServer) {
    let store = seeded_store();
    let srv = spawn_app(store.clone());
    (store, srv)
}

pub fn reserva_path(booking_id: impl std::fmt::Display, action: &str) -> String {
    format!("/api/hotel/reserva/{}/{}", booking_id, action)
}
