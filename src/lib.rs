pub mod activity;
pub mod config;
pub mod conversion;
pub mod error;
pub mod handlers;
pub mod history;
pub mod ledger;
pub mod models;
pub mod rates;
pub mod service;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
pub use crate::service::CurrencyService;

pub fn app_router(service: CurrencyService) -> Router {
    Router::new()
        .route("/", get(|| async { "OK" }))
        .route("/taxa", get(handler_current_rate).put(handler_update_rate))
        .route("/conversoes", post(handler_conversion))
        .route("/transacoes", get(handler_transaction_history))
        .layer(TraceLayer::new_for_http())
        .with_state(service)
}
