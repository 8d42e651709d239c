use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::api::{data, stats};
use crate::frontend;
use crate::service::DataService;

/// Build the HTTP routes over a shared service
pub fn router(service: Arc<DataService>) -> Router {
    Router::new()
        .route("/api/data", get(data::list).post(data::save))
        .route("/api/data/", get(data::missing_key).delete(data::missing_key))
        .route("/api/data/{key}", get(data::get).delete(data::delete))
        .route("/api/stats", get(stats::stats))
        .fallback(frontend::serve)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(service)
}

/// HTTP server
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    service: Arc<DataService>,
}

impl Server {
    /// Create and bind HTTP server to specified address
    pub async fn bind(addr: SocketAddr, service: Arc<DataService>) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server bound to {}", local_addr);

        Ok(Self {
            listener,
            local_addr,
            service,
        })
    }

    /// Get local listening address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve until `shutdown` is cancelled, then drain in-flight requests for
    /// at most `drain_timeout`.
    pub async fn run(self, shutdown: CancellationToken, drain_timeout: Duration) -> std::io::Result<()> {
        info!("Server started on http://{}", self.local_addr);
        info!("  POST   /api/data        - Store key-value pair");
        info!("  GET    /api/data        - Get all data");
        info!("  GET    /api/data/{{key}}  - Get one value");
        info!("  DELETE /api/data/{{key}}  - Delete by key");
        info!("  GET    /api/stats       - Get server statistics");

        let app = router(self.service);
        let serve = axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown.clone().cancelled_owned())
            .into_future();
        tokio::pin!(serve);

        tokio::select! {
            res = &mut serve => return res,
            _ = shutdown.cancelled() => {}
        }

        match tokio::time::timeout(drain_timeout, serve).await {
            Ok(res) => res,
            Err(_) => {
                warn!(timeout = ?drain_timeout, "Graceful drain timed out, dropping open connections");
                Ok(())
            }
        }
    }
}
