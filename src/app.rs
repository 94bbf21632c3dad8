use std::sync::Arc;

use actix_web::web;

use crate::config::{Config, CorsPolicy, SecurityConfig};
use crate::modules::health;
use crate::modules::records::RecordStore;
use crate::modules::reservations::{self, AdvancePaymentService, ReservationService};

/// Shared services handed to every worker
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub advance_payments: Arc<AdvancePaymentService>,
    pub reservations: Arc<ReservationService>,
    pub security: SecurityConfig,
    pub cors: CorsPolicy,
}

impl AppState {
    pub fn new(
        store: Arc<dyn RecordStore>,
        bill_report: impl Into<String>,
        security: SecurityConfig,
        cors: CorsPolicy,
    ) -> Self {
        Self {
            advance_payments: Arc::new(AdvancePaymentService::new(store.clone())),
            reservations: Arc::new(ReservationService::new(store.clone(), bill_report)),
            store,
            security,
            cors,
        }
    }

    pub fn from_config(config: &Config, store: Arc<dyn RecordStore>) -> Self {
        Self::new(
            store,
            config.store.bill_report.clone(),
            config.security.clone(),
            config.cors.clone(),
        )
    }
}

/// Register services and routes on an `App`
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(state.store.clone()))
            .app_data(web::Data::new(state.advance_payments.clone()))
            .app_data(web::Data::new(state.reservations.clone()))
            .configure(health::configure)
            .configure(reservations::configure(state.security, state.cors));
    }
}
