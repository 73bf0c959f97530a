//! Shared fixtures for integration tests.

use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

/// Serves `router` on an ephemeral local port and returns its address.
///
/// The server runs until the test's runtime shuts down.
pub async fn spawn_server(router: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    addr
}

/// Origin for a spawned server, e.g. `http://127.0.0.1:34567`.
pub fn origin(addr: SocketAddr) -> String {
    format!("http://{addr}")
}
