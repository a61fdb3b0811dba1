use crate::{error::ServerError, router::build_router, state::ServerState, webhook::WebhookEvent};
use frame_manifest::FrameManifest;
use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::Arc,
};
use tokio::{net::TcpListener, sync::oneshot, task::JoinHandle};

/// Default port of the frame server.
pub const DEFAULT_PORT: u16 = 3000;

/// Where the server listens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    /// `0` picks a free port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: IpAddr::V4(Ipv4Addr::LOCALHOST), port: DEFAULT_PORT }
    }
}

impl ServerConfig {
    pub fn new(host: IpAddr, port: u16) -> Self {
        Self { host, port }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Serves the manifest and receives host webhooks.
#[derive(Debug)]
pub struct FrameServer {
    config: ServerConfig,
    state: Arc<ServerState>,
    /// Address actually bound, known once started.
    local_addr: Option<SocketAddr>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl FrameServer {
    pub fn new(config: ServerConfig, manifest: FrameManifest) -> Self {
        Self {
            config,
            state: Arc::new(ServerState::new(manifest)),
            local_addr: None,
            shutdown: None,
            task: None,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn manifest(&self) -> &FrameManifest {
        &self.state.manifest
    }

    /// The bound port once started, the configured one before.
    pub fn port(&self) -> u16 {
        self.local_addr.map_or(self.config.port, |addr| addr.port())
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Webhook events received so far, oldest first.
    pub fn events(&self) -> Vec<WebhookEvent> {
        self.state.events.recent()
    }

    /// Binds the listener and starts serving in the background.
    pub async fn start(&mut self) -> Result<(), ServerError> {
        if self.is_running() {
            return Err(ServerError::AlreadyRunning);
        }

        let addr = self.config.socket_addr();
        let listener =
            TcpListener::bind(addr).await.map_err(|source| ServerError::Bind { addr, source })?;
        let local_addr = listener.local_addr()?;

        let router = build_router(self.state.clone());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let task = tokio::spawn(async move {
            let shutdown = async move {
                let _ = shutdown_rx.await;
            };
            if let Err(err) = axum::serve(listener, router).with_graceful_shutdown(shutdown).await {
                error!(target: "frame::server", %err, "server stopped unexpectedly");
            }
        });

        info!(target: "frame::server", %local_addr, "frame server listening");
        self.local_addr = Some(local_addr);
        self.shutdown = Some(shutdown_tx);
        self.task = Some(task);
        Ok(())
    }

    /// Shuts down gracefully and waits for in-flight requests to finish.
    pub async fn stop(&mut self) -> Result<(), ServerError> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            task.await?;
            debug!(target: "frame::server", "frame server stopped");
        }
        self.local_addr = None;
        Ok(())
    }

    /// Serves until ctrl-c is received, then shuts down gracefully.
    pub async fn run_until_ctrl_c(&mut self) -> Result<(), ServerError> {
        if !self.is_running() {
            self.start().await?;
        }
        tokio::signal::ctrl_c().await?;
        info!(target: "frame::server", "received ctrl-c, shutting down");
        self.stop().await
    }
}
