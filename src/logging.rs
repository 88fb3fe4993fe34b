use anyhow::{Context, Result};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::mpsc::Sender;
use std::sync::Mutex;
use std::time::Instant;
use tracing_appender::rolling::{RollingFileAppender, Rotation};

/// Log target prefix of this crate's own records
const OWN_TARGET: &str = "regdesk";

/// Ceiling for records from dependencies (reqwest, hyper, ...) in the log file
const DEPENDENCY_FILE_LEVEL: LevelFilter = LevelFilter::Warn;

/// Flash message for TUI display
#[derive(Debug, Clone)]
pub struct FlashMessage {
    pub level: Level,
    pub message: String,
    pub timestamp: Instant,
}

/// Where a record goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub file: bool,
    pub flash: bool,
}

/// Level thresholds for the two sinks
///
/// The flash line only ever shows regdesk's own records, so turning
/// `flash_level` up to `debug` does not fill the screen with HTTP client
/// chatter. Dependencies still reach the file, capped at warnings unless
/// `log_level` is stricter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogRouting {
    pub file_level: LevelFilter,
    pub flash_level: LevelFilter,
}

impl LogRouting {
    pub fn new(file_level: &str, flash_level: &str) -> Self {
        LogRouting {
            file_level: parse_level(file_level),
            flash_level: parse_level(flash_level),
        }
    }

    pub fn route(&self, level: Level, target: &str) -> Route {
        let own = is_own_target(target);
        let file_ceiling = if own {
            self.file_level
        } else {
            self.file_level.min(DEPENDENCY_FILE_LEVEL)
        };
        Route {
            file: level <= file_ceiling,
            flash: own && level <= self.flash_level,
        }
    }

    /// Most verbose level either sink accepts
    pub fn max_level(&self) -> LevelFilter {
        self.file_level.max(self.flash_level)
    }
}

fn is_own_target(target: &str) -> bool {
    target
        .strip_prefix(OWN_TARGET)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with("::"))
}

/// Logger for the TUI: rotating log file plus the flash message channel
/// (stderr can't be used while the terminal is in raw mode)
struct RegdeskLogger {
    file_writer: Mutex<RollingFileAppender>,
    flash_tx: Option<Mutex<Sender<FlashMessage>>>,
    routing: LogRouting,
}

impl Log for RegdeskLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let route = self.routing.route(metadata.level(), metadata.target());
        route.file || route.flash
    }

    fn log(&self, record: &Record) {
        let route = self.routing.route(record.level(), record.target());
        if !(route.file || route.flash) {
            return;
        }

        let message = record.args().to_string();

        if route.file
            && let Ok(mut writer) = self.file_writer.lock()
        {
            let _ = writeln!(
                writer,
                "{} [{}] {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.level(),
                record.target(),
                message
            );
        }

        if route.flash
            && let Some(tx) = &self.flash_tx
            && let Ok(tx) = tx.lock()
        {
            let _ = tx.send(FlashMessage {
                level: record.level(),
                message,
                timestamp: Instant::now(),
            });
        }
    }

    fn flush(&self) {
        if let Ok(mut writer) = self.file_writer.lock() {
            let _ = writer.flush();
        }
    }
}

/// Parse a config level name, falling back to info
pub fn parse_level(level_str: &str) -> LevelFilter {
    level_str.trim().parse().unwrap_or(LevelFilter::Info)
}

/// Install the TUI logger: `regdesk.log` rotated daily (3 files kept) and,
/// when `flash_tx` is given, regdesk's own records as flash messages
pub fn init_logger(
    log_file_path: &Path,
    flash_tx: Option<Sender<FlashMessage>>,
    routing: LogRouting,
) -> Result<()> {
    let log_dir = log_file_path
        .parent()
        .context("Log file path has no parent directory")?;
    fs::create_dir_all(log_dir).context("Failed to create log directory")?;

    let file_stem = log_file_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(OWN_TARGET);

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .max_log_files(3)
        .filename_prefix(file_stem)
        .filename_suffix("log")
        .build(log_dir)
        .context("Failed to create rotating file appender")?;

    let logger = RegdeskLogger {
        file_writer: Mutex::new(file_appender),
        flash_tx: flash_tx.map(Mutex::new),
        routing,
    };

    log::set_boxed_logger(Box::new(logger)).context("Failed to set global logger")?;
    log::set_max_level(routing.max_level());

    Ok(())
}
