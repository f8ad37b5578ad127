pub mod cache;
pub mod sniffer;

use std::sync::Arc;
use serde::Deserialize;

pub use cache::MimetypeCache;
pub use sniffer::{BuiltinSniffer, FileCommandSniffer, MimeSniffer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MimeSnifferKind {
    #[default]
    File,
    Builtin,
}

pub fn create_sniffer(kind: MimeSnifferKind) -> Arc<dyn MimeSniffer> {
    match kind {
        MimeSnifferKind::File => Arc::new(FileCommandSniffer::default()),
        MimeSnifferKind::Builtin => Arc::new(BuiltinSniffer),
    }
}
