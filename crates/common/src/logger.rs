use crate::error::StudyCardsError;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Name of the log file written under the log directory
pub const LOG_FILE_NAME: &str = "studycards.log";

/// HTTP stack crates held at `warn` unless RUST_LOG says otherwise
const QUIET_TARGETS: [&str; 4] = ["hyper", "h2", "reqwest", "actix_server"];

/// Where log lines go
#[derive(Debug, Clone, Copy)]
pub enum LogOutput<'a> {
    /// Long-running server: console plus `<dir>/studycards.log`
    Server { log_dir: &'a Path },
    /// One-shot CLI command: stderr only, stdout is reserved for results
    Cli,
}

/// Install the global subscriber for the given output
pub fn init_logging(output: LogOutput<'_>, log_level: &str) -> Result<(), StudyCardsError> {
    match output {
        LogOutput::Server { log_dir } => init_server(log_dir, log_level),
        LogOutput::Cli => init_cli(log_level),
    }
}

fn init_server(log_dir: &Path, log_level: &str) -> Result<(), StudyCardsError> {
    let (log_file, log_file_path) = open_log_file(log_dir)?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_line_number(true)
        .with_filter(build_filter(log_level));

    // Span close events go to the file only
    let file_layer = fmt::layer()
        .with_writer(log_file)
        .with_target(true)
        .with_thread_ids(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_span_events(FmtSpan::CLOSE)
        .with_filter(build_filter(log_level));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| StudyCardsError::config(format!("Failed to initialize logging: {}", e)))?;

    tracing::info!(
        "Logging initialized: level={}, log_file={}",
        parse_log_level(log_level),
        log_file_path.display()
    );
    Ok(())
}

fn init_cli(log_level: &str) -> Result<(), StudyCardsError> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(build_filter(log_level))
        .try_init()
        .map_err(|e| StudyCardsError::config(format!("Failed to initialize logging: {}", e)))
}

fn open_log_file(log_dir: &Path) -> Result<(File, PathBuf), StudyCardsError> {
    std::fs::create_dir_all(log_dir)?;
    let path = log_dir.join(LOG_FILE_NAME);
    let file = OpenOptions::new().create(true).append(true).open(&path)?;
    Ok((file, path))
}

/// RUST_LOG wins; otherwise the configured level with the HTTP stack quieted
fn build_filter(log_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directives(log_level)))
}

/// Filter directives for a configured level, e.g. `info,hyper=warn,...`
pub fn filter_directives(log_level: &str) -> String {
    let level = parse_log_level(log_level);
    let mut directives = vec![level.to_string().to_lowercase()];
    // Only more verbose levels compare greater; warn and error need no override
    if level > Level::WARN {
        directives.extend(QUIET_TARGETS.iter().map(|target| format!("{}=warn", target)));
    }
    directives.join(",")
}

/// Parse string to tracing Level
pub fn parse_log_level(level: &str) -> Level {
    match level.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => {
            eprintln!("Invalid log level '{}', defaulting to INFO", level);
            Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert_eq!(parse_log_level("trace"), Level::TRACE);
        assert_eq!(parse_log_level("debug"), Level::DEBUG);
        assert_eq!(parse_log_level("info"), Level::INFO);
        assert_eq!(parse_log_level("warn"), Level::WARN);
        assert_eq!(parse_log_level("error"), Level::ERROR);
        assert_eq!(parse_log_level("invalid"), Level::INFO);
        assert_eq!(parse_log_level(" INFO "), Level::INFO);
        assert_eq!(parse_log_level("WARNING"), Level::WARN);
    }

    #[test]
    fn test_filter_directives_quiet_http_stack() {
        assert_eq!(
            filter_directives("info"),
            "info,hyper=warn,h2=warn,reqwest=warn,actix_server=warn"
        );
        assert!(filter_directives("debug").contains("reqwest=warn"));
    }

    #[test]
    fn test_filter_directives_keep_stricter_levels() {
        assert_eq!(filter_directives("warn"), "warn");
        assert_eq!(filter_directives("error"), "error");
    }

    #[test]
    fn test_open_log_file_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let (_file, path) = open_log_file(&dir.path().join("nested")).unwrap();
        assert!(path.ends_with(LOG_FILE_NAME));
        assert!(path.exists());
    }
}
