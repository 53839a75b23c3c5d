//! Process-wide logger installation

use crate::Result;
use flexi_logger::{DeferredNow, Duplicate, FileSpec, Logger, LoggerHandle};
use log::Record;
use std::io::Write;
use std::path::PathBuf;

/// Where and how much to log
#[derive(Clone, Debug)]
pub struct LogConfig {
    /// Directory holding the log file
    pub directory: PathBuf,
    /// Log file name without the `.log` suffix
    pub basename: String,
    /// Level spec, overridden by `RUST_LOG`
    pub spec: String,
    pub log_to_file: bool,
    /// Echo every line to stderr
    pub echo: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            directory: PathBuf::from("logs"),
            basename: "running_logs".to_string(),
            spec: "info".to_string(),
            log_to_file: true,
            echo: true,
        }
    }
}

impl LogConfig {
    /// Full path of the log file this config writes to
    pub fn file_path(&self) -> PathBuf {
        self.directory.join(format!("{}.log", self.basename))
    }
}

/// `[timestamp: LEVEL: module: message]`
pub fn bracket_format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &Record,
) -> std::io::Result<()> {
    write!(
        w,
        "[{}: {}: {}: {}]",
        now.format("%Y-%m-%d %H:%M:%S,%3f"),
        record.level(),
        record.module_path().unwrap_or("<unnamed>"),
        record.args()
    )
}

/// Install the global logger. Keep the handle alive for the life of the process.
pub fn init(config: &LogConfig) -> Result<LoggerHandle> {
    let logger = Logger::try_with_env_or_str(&config.spec)?.format(bracket_format);

    let logger = if config.log_to_file {
        let logger = logger
            .log_to_file(
                FileSpec::default()
                    .directory(&config.directory)
                    .basename(&config.basename)
                    .suffix("log")
                    .suppress_timestamp(),
            )
            .append();
        if config.echo {
            logger.duplicate_to_stderr(Duplicate::All)
        } else {
            logger
        }
    } else if config.echo {
        logger.log_to_stderr()
    } else {
        logger.do_not_log()
    };

    Ok(logger.start()?)
}
