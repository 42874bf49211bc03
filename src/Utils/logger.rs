//! Console + optional file logging for the render pipelines
use chrono::Local;
use simplelog::*;
use std::fs::File;
use std::io;
use std::path::PathBuf;

/// maps the task-document level name to a filter
pub fn parse_level(level: &str) -> Result<LevelFilter, String> {
    match level.to_ascii_lowercase().as_str() {
        "debug" => Ok(LevelFilter::Debug),
        "info" => Ok(LevelFilter::Info),
        "warn" => Ok(LevelFilter::Warn),
        "error" => Ok(LevelFilter::Error),
        "off" => Ok(LevelFilter::Off),
        other => Err(format!(
            "loglevel must be debug, info, warn, error or off, got '{}'",
            other
        )),
    }
}

/// name of the log file for the current moment: log_YYYY-mm-dd_HH-MM-SS.txt
pub fn log_file_name() -> String {
    let date_and_time = Local::now().format("%Y-%m-%d_%H-%M-%S");
    format!("log_{}.txt", date_and_time)
}

/// Terminal logger plus, if `log_to_file`, a file logger in the working directory.
/// Returns the log file path when one was created. A logger that is already
/// installed stays in place.
pub fn init_logger(level: LevelFilter, log_to_file: bool) -> io::Result<Option<PathBuf>> {
    let mut loggers: Vec<Box<dyn SharedLogger>> = vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )];
    let mut log_path = None;
    if log_to_file {
        let name = PathBuf::from(log_file_name());
        loggers.push(WriteLogger::new(level, Config::default(), File::create(&name)?));
        log_path = Some(name);
    }
    // second initialisation in the same process is not an error for us
    let _ = CombinedLogger::init(loggers);
    Ok(log_path)
}
