//! The `frame-server` CLI: serves the frame manifest and receives host webhooks.

fn main() {
    if let Err(err) = frame_server::args::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
