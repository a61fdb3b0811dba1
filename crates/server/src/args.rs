use crate::opts::{FrameServerArgs, FrameSubcommand};
use clap::Parser;
use eyre::Result;
use tracing_subscriber::EnvFilter;

/// Run the `frame-server` command line interface.
pub fn run() -> Result<()> {
    setup()?;

    let args = FrameServerArgs::parse();
    run_command(args)
}

/// Setup the error handler and logging.
pub fn setup() -> Result<()> {
    color_eyre::install()?;
    init_tracing();
    Ok(())
}

/// Installs the global subscriber, filtered by `RUST_LOG` and defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Run the subcommand.
pub fn run_command(args: FrameServerArgs) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread().enable_all().build()?;
    match args.cmd {
        None => runtime.block_on(args.serve.run()),
        Some(FrameSubcommand::Serve(serve)) => runtime.block_on(serve.run()),
        Some(FrameSubcommand::Manifest(manifest)) => manifest.run(),
        Some(FrameSubcommand::Preview(preview)) => runtime.block_on(preview.run()),
    }
}
