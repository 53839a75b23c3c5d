//! Logging: the store's event sink and the process-wide logger

mod memory;
mod setup;
mod traits;

pub use memory::MemorySink;
pub use setup::{bracket_format, init, LogConfig};
pub use traits::{EventSink, LogSink};
