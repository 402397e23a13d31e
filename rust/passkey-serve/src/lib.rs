//! Local static file server for the passkey demo.
//!
//! WebAuthn only runs in a secure context. Browsers treat `localhost` and
//! loopback addresses as secure without TLS, so serving the Trunk build
//! output over plain HTTP on a loopback address is enough to try the demo.
//! Any other bind address will load the page but the credential API will
//! refuse to run.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::Parser;
use hyper::server::conn::http1;
use hyper_util::rt::TokioIo;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{Trace, TraceLayer};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8443;

/// Command line options.
#[derive(Debug, Clone, Parser)]
#[command(name = "passkey-serve")]
#[command(bin_name = "passkey-serve")]
#[command(about = "Serve the built passkey demo on localhost", long_about = None)]
pub struct ServeConfig {
    /// Address to bind
    #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
    pub host: IpAddr,

    /// Port to bind; 0 picks a free one
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Directory holding the built demo (`trunk build` output)
    #[arg(long, default_value = "dist")]
    pub root: PathBuf,
}

impl ServeConfig {
    /// The socket address to bind.
    pub fn address(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// The HTTP service: files under the root, `index.html` for anything else.
pub type DemoService = Trace<ServeDir<ServeFile>, SharedClassifier<ServerErrorsAsFailures>>;

/// Build the service serving `root`.
pub fn service(root: &Path) -> DemoService {
    let index = ServeFile::new(root.join("index.html"));
    ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .service(ServeDir::new(root).fallback(index))
}

/// A running server.
pub struct DevServer {
    address: SocketAddr,
    shutdown_tx: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl DevServer {
    /// Bind and start serving in the background.
    pub async fn start(config: &ServeConfig) -> anyhow::Result<Self> {
        if !config.root.is_dir() {
            bail!(
                "{} is not a directory; build the demo with `trunk build` first",
                config.root.display()
            );
        }
        if !config.host.is_loopback() {
            tracing::warn!(
                host = %config.host,
                "Not a loopback address; browsers will not expose WebAuthn over plain HTTP here"
            );
        }

        let listener = TcpListener::bind(config.address())
            .await
            .with_context(|| format!("failed to bind {}", config.address()))?;
        let address = listener.local_addr()?;
        let service = service(&config.root);

        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = listener.accept() => {
                        match result {
                            Ok((stream, peer)) => {
                                let hyper_service = TowerToHyperService::new(service.clone());
                                tokio::spawn(async move {
                                    if let Err(error) = http1::Builder::new()
                                        .serve_connection(TokioIo::new(stream), hyper_service)
                                        .await
                                    {
                                        tracing::debug!(%peer, %error, "Connection closed with error");
                                    }
                                });
                            }
                            Err(error) => tracing::warn!(%error, "Failed to accept connection"),
                        }
                    }
                }
            }
        });

        Ok(Self {
            address,
            shutdown_tx,
            task,
        })
    }

    /// The bound address.
    pub fn address(&self) -> SocketAddr {
        self.address
    }

    /// Where to point a browser.
    pub fn url(&self) -> String {
        if self.address.ip().is_loopback() {
            format!("http://localhost:{}", self.address.port())
        } else {
            format!("http://{}", self.address)
        }
    }

    /// Stop accepting connections and wait for the accept loop to exit.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        if let Err(error) = self.task.await {
            tracing::warn!(%error, "Server task did not shut down cleanly");
        }
    }
}
