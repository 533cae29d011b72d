//! Connection handling

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use hyper::Request;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use sheetgate_lib::diagnostics::Diagnostics;
use sheetgate_lib::source::SheetRef;
use sheetgate_lib::source::SourceConnector;
use tokio::net::TcpListener;

use crate::routes::route;

/// Where the expected API key comes from.
#[derive(Debug, Clone)]
pub enum ApiKey {
    /// Read from this environment variable on every request.
    Env(String),
    /// A fixed value; `None` means no key is configured.
    Fixed(Option<String>),
}

impl ApiKey {
    /// The key currently expected, if any.
    pub fn current(&self) -> Option<String> {
        match self {
            Self::Env(name) => std::env::var(name).ok().filter(|key| !key.is_empty()),
            Self::Fixed(key) => key.clone(),
        }
    }
}

/// Everything a request handler needs.
///
/// Holds no data and no connections: each request acquires its own source
/// through `connector`.
pub struct AppState {
    pub api_key: ApiKey,
    pub connector: Arc<dyn SourceConnector>,
    pub diagnostics: Arc<dyn Diagnostics>,
    /// Sheet served by the transactions endpoint.
    pub budget_sheet: SheetRef,
}

/// Accepts connections until Ctrl-C, serving each on its own task.
pub async fn serve(listener: TcpListener, state: Arc<AppState>) -> std::io::Result<()> {
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result?;
                log::info!("Shutdown signal received, no longer accepting connections");
                return Ok(());
            }
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, peer)) => spawn_connection(stream, peer, state.clone()),
                    Err(e) => log::warn!("Accept failed: {}", e),
                }
            }
        }
    }
}

fn spawn_connection(stream: tokio::net::TcpStream, peer: SocketAddr, state: Arc<AppState>) {
    tokio::spawn(async move {
        let io = TokioIo::new(stream);

        let service = service_fn(move |req: Request<Incoming>| {
            let state = state.clone();
            async move { Ok::<_, Infallible>(route(req, &state).await) }
        });

        // Clients closing early is routine.
        if let Err(e) = http1::Builder::new().serve_connection(io, service).await {
            log::debug!("Connection from {} ended with error: {}", peer, e);
        }
    });
}
