// Test Helper Modules
//
// Shared setup for contract and integration tests. Test binaries pull this in
// with `#[path = "../helpers/mod.rs"] mod helpers;` and use what they need.
//
// Example:
//   #[actix_web::test]
//   async fn test_print_bill() {
//       let (store, srv) = spawn_seeded_app();
//       let mut response = srv.post("/api/hotel/reserva/3/print_bill")
//           .insert_header((API_KEY_HEADER, TEST_API_KEY))
//           .send()
//           .await
//           .unwrap();
//       assert_eq!(response.status(), 200);
//   }
#![allow(dead_code)]

pub mod test_server;

pub use assertions::*;
pub use test_server::*;
