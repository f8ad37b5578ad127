use clap::Parser;
use rescue_match::cli;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = match cli::Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Usage errors exit 1; --help and --version exit 0
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));

    // Diagnostics go to stderr; stdout carries only match blocks
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = option_env!("GIT_HASH").unwrap_or("dev"),
        profile = option_env!("BUILD_PROFILE").unwrap_or("unknown"),
        "rescue-match starting"
    );

    let cancel_token = CancellationToken::new();
    tokio::spawn({
        let token = cancel_token.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                token.cancel();
            }
        }
    });

    if let Err(e) = cli::handle_run(cli, cancel_token).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}
