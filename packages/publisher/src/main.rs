//! CLI entry point for the bill publisher.

use parlamento_publisher::cli;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Logs go to stderr so --dry-run output stays clean JSON lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = cli::run().await {
        tracing::error!(error = %e, "import failed");
        std::process::exit(1);
    }
}
