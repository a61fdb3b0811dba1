mod manifest;
mod webhook;

#[allow(unused)]
pub(crate) fn init_tracing() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

/// Starts a server for `base_url` on a free port.
pub(crate) async fn spawn(base_url: &str) -> frame_server::FrameServer {
    init_tracing();
    let config = frame_manifest::ManifestConfig::default();
    let manifest = frame_manifest::FrameManifest::with_base_url(&config, base_url);
    let mut server = frame_server::FrameServer::new(
        frame_server::ServerConfig::new([127, 0, 0, 1].into(), 0),
        manifest,
    );
    server.start().await.unwrap();
    server
}

/// Absolute URL of `path` on a running server.
pub(crate) fn url(server: &frame_server::FrameServer, path: &str) -> String {
    format!("http://{}{path}", server.local_addr().unwrap())
}

fn main() {}
