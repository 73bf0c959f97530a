//! Stand-in for the simulation backend.
//!
//! Serves every catalogue route under [`API_PREFIX`] and answers by echoing
//! the request as `{"action": <id>, "status": "ok", ...}`. Useful for
//! exercising the console without the real engine.

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;

use axum::routing::{MethodRouter, get, post};
use axum::{Json, Router};
use tokio::net::TcpListener;

use crate::catalogue::{ActionKind, Relay};
use crate::client::API_PREFIX;

pub use types::ErrorResponse;
use types::ItemsBody;

/// Builds the stub router with all catalogue routes nested under the API prefix.
pub fn router() -> Router {
    let mut api = Router::new()
        .route("/sym-type", post(handlers::sym_type))
        .route("/load-type", ack(ActionKind::LoadType))
        .route("/disable-avr", ack(ActionKind::DisableAvr))
        .route("/generator-control", ack(ActionKind::GeneratorControl))
        .route("/loading-level", post(handlers::loading_level))
        .route(
            "/initial-generation-level",
            post(handlers::initial_generation_level),
        )
        .route("/line-rating", ack(ActionKind::LineRating))
        .route("/random-cases", post(handlers::random_cases))
        .route("/run-n2-contingencies", ack(ActionKind::RunN2Contingencies))
        .route("/matching", ack(ActionKind::Matching))
        .route("/simulation", get(handlers::simulation))
        .route("/lookupdid", get(handlers::lookup_did));

    for relay in Relay::ALL {
        let (add, remove) = relay.kinds();
        api = api.route(
            relay.path(),
            post(move |body: Json<ItemsBody>| handlers::relay_items(add, body))
                .delete(move |body: Json<ItemsBody>| handlers::relay_items(remove, body)),
        );
    }

    Router::new().nest(API_PREFIX, api)
}

/// Route that acknowledges a body-less action.
fn ack(kind: ActionKind) -> MethodRouter {
    post(move || handlers::ack(kind))
}

/// Binds to `addr` and serves the stub until the process exits.
///
/// # Errors
///
/// Returns the I/O error if the listener cannot bind or the server fails.
pub async fn serve(addr: SocketAddr) -> io::Result<()> {
    let listener = TcpListener::bind(addr).await?;
    log::info!("stub backend listening on http://{addr}{API_PREFIX}");
    axum::serve(listener, router()).await
}
