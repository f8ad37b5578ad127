pub mod orchestrator;
pub mod state;

pub use orchestrator::MatchOrchestrator;
pub use state::{MatchStats, RunSummary};
