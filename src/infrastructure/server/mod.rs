//! Liveness endpoint for hosting platform port detection

use std::net::SocketAddr;

use axum::routing::get;
use axum::Router;

/// Minimal HTTP listener answering `GET /` with a fixed string
pub struct LivenessServer {
    port: u16,
    banner: String,
}

impl LivenessServer {
    pub fn new(port: u16, bot_name: &str) -> Self {
        Self {
            port,
            banner: format!("{} bot is running!", bot_name),
        }
    }

    /// Bind and serve in a background task.
    ///
    /// Returns the bound address (useful with port 0) and the server task handle.
    pub async fn start(self) -> Result<(SocketAddr, tokio::task::JoinHandle<()>), std::io::Error> {
        let banner = self.banner;
        let app = Router::new().route("/", get(move || {
            let banner = banner.clone();
            async move { banner }
        }));

        let addr = SocketAddr::from(([0, 0, 0, 0], self.port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("Web server listening on port {}", local_addr.port());

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::warn!("Liveness server error: {}", e);
            }
        });

        Ok((local_addr, handle))
    }
}
