//! Event sink trait definition

/// Receives the one-line informational events the store emits
///
/// Implementations can:
/// - forward to the `log` facade ([`LogSink`])
/// - record messages in memory for tests
pub trait EventSink: Send + Sync {
    /// Record an informational event
    fn info(&self, message: &str);
}

/// Forwards events to `log::info!`
#[derive(Clone, Copy, Debug, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn info(&self, message: &str) {
        log::info!("{}", message);
    }
}
