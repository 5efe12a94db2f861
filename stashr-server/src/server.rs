//! Listener setup, serving and graceful shutdown.

use stashr_core::Store;
use stashr_proto::kv_store_server::KvStoreServer as KVStoreServer;
use std::future::Future;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinSet;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

use crate::config::Config;
use crate::error::ServerError;
use crate::grpc::KvStoreService;
use crate::http;

/// Bound listeners for the enabled front-ends
pub struct Listeners {
    http: Option<TcpListener>,
    grpc: Option<TcpListener>,
}

impl Listeners {
    /// Binds every enabled front-end. Failing to bind any of them is fatal.
    pub async fn bind(config: &Config) -> Result<Self, ServerError> {
        config.validate()?;

        let http = match config.http_addr() {
            Some(addr) => Some(bind_one("HTTP", addr).await?),
            None => None,
        };
        let grpc = match config.grpc_addr() {
            Some(addr) => Some(bind_one("gRPC", addr).await?),
            None => None,
        };

        Ok(Self { http, grpc })
    }

    /// Local address of the HTTP listener, useful when binding port 0
    pub fn http_addr(&self) -> Option<SocketAddr> {
        self.http.as_ref().and_then(|l| l.local_addr().ok())
    }

    /// Local address of the gRPC listener
    pub fn grpc_addr(&self) -> Option<SocketAddr> {
        self.grpc.as_ref().and_then(|l| l.local_addr().ok())
    }
}

async fn bind_one(protocol: &'static str, addr: SocketAddr) -> Result<TcpListener, ServerError> {
    TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind {
            protocol,
            addr,
            source,
        })
}

async fn wait_for_shutdown(mut shutdown_rx: watch::Receiver<bool>) {
    let _ = shutdown_rx.wait_for(|stop| *stop).await;
}

/// Serves the bound front-ends until `shutdown` resolves or one of them fails,
/// then drains both gracefully.
///
/// The store is not stopped here; that is the caller's job.
pub async fn serve<F>(store: Store, listeners: Listeners, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send,
{
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut servers = JoinSet::new();

    if let Some(listener) = listeners.grpc {
        let service = KVStoreServer::new(KvStoreService::new(store.clone()));
        // Reflection lets tools like grpcurl discover `kvstore.KVStore`.
        let reflection_v1 = tonic_reflection::server::Builder::configure()
            .register_encoded_file_descriptor_set(stashr_proto::FILE_DESCRIPTOR_SET)
            .build_v1()?;
        let reflection_v1alpha = tonic_reflection::server::Builder::configure()
            .register_encoded_file_descriptor_set(stashr_proto::FILE_DESCRIPTOR_SET)
            .build_v1alpha()?;
        let signal = wait_for_shutdown(shutdown_rx.clone());
        if let Ok(addr) = listener.local_addr() {
            tracing::info!("gRPC server listening on {}", addr);
        }

        servers.spawn(async move {
            Server::builder()
                .add_service(service)
                .add_service(reflection_v1)
                .add_service(reflection_v1alpha)
                .serve_with_incoming_shutdown(TcpListenerStream::new(listener), signal)
                .await
                .map_err(ServerError::from)
        });
    }

    if let Some(listener) = listeners.http {
        let router = http::router(store.clone());
        let signal = wait_for_shutdown(shutdown_rx.clone());
        if let Ok(addr) = listener.local_addr() {
            tracing::info!("HTTP server listening on {}", addr);
        }

        servers.spawn(async move {
            axum::serve(listener, router)
                .with_graceful_shutdown(signal)
                .await
                .map_err(ServerError::Http)
        });
    }

    let mut result = Ok(());
    tokio::select! {
        _ = shutdown => {
            tracing::info!("shutting down...");
        }
        Some(joined) = servers.join_next() => {
            // A server exited before shutdown was requested.
            result = joined.map_err(ServerError::from).and_then(|r| r);
            if let Err(err) = &result {
                tracing::error!("{}", err);
            }
        }
    }

    let _ = shutdown_tx.send(true);
    while let Some(joined) = servers.join_next().await {
        if let Err(err) = joined.map_err(ServerError::from).and_then(|r| r) {
            tracing::error!("{}", err);
            if result.is_ok() {
                result = Err(err);
            }
        }
    }

    result
}

/// Runs the whole server: creates the store, binds, serves until `shutdown`,
/// and stops the store's sweeper on every exit path.
pub async fn run<F>(config: Config, shutdown: F) -> Result<(), ServerError>
where
    F: Future<Output = ()> + Send,
{
    config.validate()?;

    let store = Store::with_config(config.store_config());
    tracing::info!("Sweep interval: {}ms", config.sweep_interval_ms);

    let result = match Listeners::bind(&config).await {
        Ok(listeners) => serve(store.clone(), listeners, shutdown).await,
        Err(err) => Err(err),
    };

    store.stop().await;
    result
}

/// Resolves on SIGINT (Ctrl+C) or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
