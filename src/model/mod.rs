//! Data model types for filebox

mod checksum;
mod size;
mod tree;

pub use checksum::Checksum;
pub use size::SizeReport;
pub(crate) use tree::kind_name;
pub use tree::{ConfigTree, JsonValue};
