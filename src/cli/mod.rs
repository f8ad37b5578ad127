pub mod commands;
pub mod run;

pub use commands::Cli;
pub use run::{build_match_config, handle_run};
