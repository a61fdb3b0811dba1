//! Command line options of the `frame-server` binary.

use crate::server::{DEFAULT_PORT, FrameServer, ServerConfig};
use clap::{Args, Parser, Subcommand};
use eyre::{Result, WrapErr};
use frame_client::{
    ClientContext, Frame, FrameContext, FrameOptions, FramePhase, LocalHost, PROJECT_TITLE,
};
use frame_manifest::{CONFIG_PATH_ENV, FrameManifest, ManifestConfig, ManifestError};
use std::{net::IpAddr, path::PathBuf, time::Duration};

/// Serve the frame manifest and receive host webhooks.
#[derive(Clone, Debug, Parser)]
#[command(name = "frame-server", version, args_conflicts_with_subcommands = true)]
pub struct FrameServerArgs {
    #[command(flatten)]
    pub serve: ServeArgs,

    #[command(subcommand)]
    pub cmd: Option<FrameSubcommand>,
}

#[derive(Clone, Debug, Subcommand)]
pub enum FrameSubcommand {
    /// Serve the manifest and the webhook endpoints. This is the default.
    Serve(ServeArgs),

    /// Print the manifest JSON to stdout.
    Manifest(ManifestArgs),

    /// Render the frame against a local host and print it.
    Preview(PreviewArgs),
}

/// Where the manifest config comes from.
#[derive(Clone, Debug, Default, Args)]
pub struct ManifestArgs {
    /// Path to the TOML config file.
    #[arg(long, value_name = "PATH", env = CONFIG_PATH_ENV)]
    pub config: Option<PathBuf>,

    /// Base URL of the deployment. Takes precedence over `NEXT_PUBLIC_URL` and `VERCEL_URL`.
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,
}

impl ManifestArgs {
    pub fn load_config(&self) -> Result<ManifestConfig, ManifestError> {
        let config = match &self.config {
            Some(path) => ManifestConfig::load_from(path)?,
            None => ManifestConfig::load()?,
        };
        Ok(match &self.base_url {
            Some(url) => config.with_base_url(url),
            None => config,
        })
    }

    pub fn manifest(&self) -> Result<FrameManifest, ManifestError> {
        FrameManifest::build(&self.load_config()?)
    }

    /// Prints the manifest exactly as it is served.
    pub fn run(self) -> Result<()> {
        let manifest = self.manifest()?;
        println!("{}", manifest.to_json()?);
        Ok(())
    }
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long, value_name = "IP", default_value = "127.0.0.1", env = "FRAME_HOST")]
    pub host: IpAddr,

    /// Port to listen on, `0` picks a free one.
    #[arg(long, short, value_name = "PORT", default_value_t = DEFAULT_PORT, env = "FRAME_PORT")]
    pub port: u16,

    #[command(flatten)]
    pub manifest: ManifestArgs,
}

impl ServeArgs {
    pub fn server_config(&self) -> ServerConfig {
        ServerConfig::new(self.host, self.port)
    }

    /// Serves until interrupted.
    pub async fn run(self) -> Result<()> {
        let manifest = self.manifest.manifest()?;
        info!(target: "frame::server", base_url = %manifest.frame.home_url, "resolved manifest");

        let mut server = FrameServer::new(self.server_config(), manifest);
        server.run_until_ctrl_c().await.wrap_err("frame server failed")
    }
}

#[derive(Clone, Debug, Args)]
pub struct PreviewArgs {
    /// Recently visited link reported by the host. May be repeated.
    #[arg(long = "recent-link", value_name = "URL")]
    pub recent_links: Vec<String>,

    /// Title rendered above the links.
    #[arg(long, default_value = PROJECT_TITLE)]
    pub title: String,

    /// Also render the raw host context.
    #[arg(long)]
    pub show_context: bool,
}

impl PreviewArgs {
    /// Mounts the frame against a [`LocalHost`] and renders it to text.
    pub async fn render(self) -> Result<String> {
        let context = FrameContext {
            client: ClientContext {
                recent_links: (!self.recent_links.is_empty()).then_some(self.recent_links),
                ..Default::default()
            },
            ..Default::default()
        };
        let host = LocalHost::new(Some(context));
        let frame = Frame::new(host, FrameOptions::default().with_title(self.title));

        frame.mount();
        let phase = tokio::time::timeout(Duration::from_secs(5), frame.settled())
            .await
            .wrap_err("frame did not finish loading")?;
        if phase != FramePhase::Ready {
            eyre::bail!("frame settled in {phase:?}");
        }
        if self.show_context {
            frame.toggle_context();
        }

        let view = frame.render().to_string();
        frame.unmount();
        Ok(view)
    }

    pub async fn run(self) -> Result<()> {
        print!("{}", self.render().await?);
        Ok(())
    }
}
