//! CLI entry point for gtasks.

mod app;
mod cli;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    init_tracing(args.verbose);
    let code = app::entry::run(args).await;
    std::process::exit(code);
}

/// Log to stderr. `GTASKS_LOG` wins over `RUST_LOG`; `--verbose` raises the
/// default from `warn` to `debug`.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = std::env::var("GTASKS_LOG")
        .ok()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
