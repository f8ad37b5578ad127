pub mod ed_script;
pub mod engine;
pub mod external;
pub mod builtin;

use std::path::Path;
use std::sync::Arc;
use serde::Deserialize;

pub use builtin::BuiltinDiff;
pub use ed_script::{EditKind, EditOperation};
pub use engine::{count_raw_lines, DiffEngine, LineDiff};
pub use external::ExternalDiff;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DiffEngineKind {
    Builtin,
    #[default]
    External,
}

pub fn create_engine(kind: DiffEngineKind, program: &Path) -> Arc<dyn DiffEngine> {
    match kind {
        DiffEngineKind::Builtin => Arc::new(BuiltinDiff::new()),
        DiffEngineKind::External => Arc::new(ExternalDiff::new(program)),
    }
}
