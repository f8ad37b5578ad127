use std::time::Duration;
use tokio_util::sync::CancellationToken;
use crate::cli::commands::Cli;
use crate::config::{self, FileConfig, MatchConfig};
use crate::errors::MatchError;
use crate::pipeline::MatchOrchestrator;
use tracing::{debug, info};

pub async fn handle_run(cli: Cli, cancel_token: CancellationToken) -> Result<(), MatchError> {
    let file_config = match &cli.config {
        Some(path) => Some(config::parse_config(path).await?),
        None => None,
    };

    let match_config = build_match_config(&cli, file_config.as_ref());
    debug!(?match_config, "Resolved configuration");

    let orchestrator = MatchOrchestrator::new(match_config)
        .await?
        .with_cancel_token(cancel_token);

    let mut stdout = std::io::stdout();
    let summary = orchestrator.run(&mut stdout).await?;

    info!(
        copied = summary.copied,
        failures = summary.failures + summary.copy_failures,
        "Run finished"
    );
    Ok(())
}

/// CLI flags win over config file values, which win over defaults.
pub fn build_match_config(cli: &Cli, file_config: Option<&FileConfig>) -> MatchConfig {
    let file = file_config.cloned().unwrap_or_default();
    let mut config = MatchConfig::new(&cli.left_tree, &cli.right_tree);

    if let Some(min_ratio) = cli.min_ratio.or(file.min_ratio) {
        config.min_ratio = min_ratio;
    }
    config.mimetype_filter = cli.mimetype_filter || file.mimetype_filter.unwrap_or(false);
    config.copy_dest = cli.copy_dest.clone().or(file.copy_dest);
    config.copy_least_matching = cli.copy_least_matching || file.copy_least_matching.unwrap_or(false);
    if let Some(jobs) = cli.jobs.or(file.jobs) {
        config.jobs = jobs;
    }
    config.timeout = cli.timeout.or(file.timeout_secs).map(Duration::from_secs);
    if let Some(engine) = cli.diff_engine.or(file.diff_engine) {
        config.diff_engine = engine;
    }
    if let Some(program) = cli.diff_program.clone().or(file.diff_program) {
        config.diff_program = program;
    }
    if let Some(sniffer) = cli.mime_sniffer.or(file.mime_sniffer) {
        config.mime_sniffer = sniffer;
    }
    if let Some(format) = cli.format.or(file.format) {
        config.format = format;
    }
    config.quiet = cli.quiet;
    config
}
