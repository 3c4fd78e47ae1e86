use std::{
    fmt::Display,
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::Path,
    str::FromStr,
    sync::Mutex,
};

use chrono::Local;
use colored::{ColoredString, Colorize};
use serde::{Deserialize, Serialize};

use crate::config::LoggerConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn to_colored(&self) -> ColoredString {
        match self {
            LogLevel::Debug => "DBG".bright_cyan(),
            LogLevel::Info => "INF".bright_green(),
            LogLevel::Warn => "WAR".yellow(),
            LogLevel::Error => "ERR".bright_red(),
        }
    }

    pub fn to_string_no_color(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DBG",
            LogLevel::Info => "INF",
            LogLevel::Warn => "WAR",
            LogLevel::Error => "ERR",
        }
    }

    /// Whether a message at level `self` passes a logger set to `threshold`.
    pub fn show(&self, threshold: &LogLevel) -> bool {
        self >= threshold
    }

    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "info" | "inf" => Ok(LogLevel::Info),
            "warn" | "warning" | "war" => Ok(LogLevel::Warn),
            "error" | "err" => Ok(LogLevel::Error),
            _ => Err(format!("Invalid log level: {}", s)),
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "Debug"),
            LogLevel::Info => write!(f, "Info"),
            LogLevel::Warn => write!(f, "Warn"),
            LogLevel::Error => write!(f, "Error"),
        }
    }
}

/// Leveled logger writing to stderr and, optionally, to a log file.
///
/// Every message goes to the file regardless of level, only messages at or
/// above the configured level are printed.
#[derive(Debug)]
pub struct Logger {
    level: LogLevel,
    file: Option<Mutex<BufWriter<File>>>,
    prefixes: [String; 4],
    prefixes_no_color: [String; 4],
}

fn level_slot(level: LogLevel) -> usize {
    match level {
        LogLevel::Debug => 0,
        LogLevel::Info => 1,
        LogLevel::Warn => 2,
        LogLevel::Error => 3,
    }
}

impl Logger {
    const LEVELS: [LogLevel; 4] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
    ];

    pub fn new<P: AsRef<Path>>(
        level: LogLevel,
        name: String,
        log_file_path: Option<P>,
    ) -> io::Result<Self> {
        let n = format!("{name}:").dimmed();
        let n_no_color = format!("{name}:");
        let file = match log_file_path {
            Some(path) => {
                if let Some(dir) = path.as_ref().parent() {
                    fs::create_dir_all(dir)?;
                }
                Some(Mutex::new(BufWriter::new(File::create(path)?)))
            }
            None => None,
        };

        Ok(Logger {
            level,
            file,
            prefixes: Self::LEVELS.map(|l| format!("[{}] {}", l.to_colored(), n)),
            prefixes_no_color: Self::LEVELS
                .map(|l| format!("[{}] {}", l.to_string_no_color(), n_no_color)),
        })
    }

    pub fn from_config(config: &LoggerConfig, name: String) -> anyhow::Result<Option<Self>> {
        if !*config.get_enabled() {
            return Ok(None);
        }

        let log_file_path = if *config.get_log_file() {
            Some(format!(
                "./logs/fstencode_run_{}.txt",
                Local::now().format("%Y-%m-%d_%H-%M-%S")
            ))
        } else {
            None
        };

        Ok(Some(Logger::new(
            *config.get_log_level(),
            name,
            log_file_path,
        )?))
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn get_prefix(&self, level: &LogLevel) -> &str {
        &self.prefixes[level_slot(*level)]
    }

    pub fn get_prefix_no_color(&self, level: &LogLevel) -> &str {
        &self.prefixes_no_color[level_slot(*level)]
    }

    pub fn log(&self, level: LogLevel, message: &str) {
        let msg_no_color = format!("{} {}", self.get_prefix_no_color(&level), message);
        self.writeln_to_file(&msg_no_color);

        if level.show(&self.level) {
            eprintln!("{} {}", self.get_prefix(&level), message);
        }
    }

    pub fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    pub fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    pub fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    pub fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }

    pub fn empty(&self, level: LogLevel) {
        self.writeln_to_file("");
        if level.show(&self.level) {
            eprintln!();
        }
    }

    fn writeln_to_file(&self, string: &str) {
        let Some(file) = &self.file else {
            return;
        };
        // A poisoned lock still holds a usable writer.
        let mut f = file.lock().unwrap_or_else(|e| e.into_inner());
        if let Err(e) = writeln!(f, "{string}") {
            tracing::warn!("failed to write to log file: {e}");
        }
    }

    pub fn object<'a>(&'a self, name: &'a str) -> ObjectBuilder<'a> {
        ObjectBuilder::new(name, self)
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Some(file) = &self.file {
            let mut f = file.lock().unwrap_or_else(|e| e.into_inner());
            let _ = f.flush();
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObjectBuilder<'a> {
    logger: &'a Logger,
    name: &'a str,
    fields: Vec<(&'a str, String)>,
}

impl<'a> ObjectBuilder<'a> {
    fn new(name: &'a str, logger: &'a Logger) -> Self {
        ObjectBuilder {
            logger,
            name,
            fields: vec![],
        }
    }

    pub fn add_field(mut self, name: &'a str, value: impl Display) -> Self {
        self.fields.push((name, value.to_string()));

        self
    }

    fn build(&self) -> String {
        let mut result = format!("{} {{", self.name);
        for (name, value) in &self.fields {
            result.push_str(&format!("\n  {}: {}", name, value));
        }
        result.push_str("\n}");
        result
    }

    pub fn log(&self, level: LogLevel) {
        self.logger.log(level, &self.build());
    }
}

#[test]
fn test_log_level_threshold() {
    assert!(LogLevel::Error.show(&LogLevel::Warn));
    assert!(LogLevel::Warn.show(&LogLevel::Warn));
    assert!(!LogLevel::Info.show(&LogLevel::Warn));
    assert!(LogLevel::Debug.show(&LogLevel::Debug));
    assert_eq!("warning".parse::<LogLevel>(), Ok(LogLevel::Warn));
}

#[test]
fn test_logger_writes_file() {
    let path = std::env::temp_dir().join(format!("wfst_logger_{}.txt", std::process::id()));
    {
        let logger = Logger::new(LogLevel::Error, "Test".into(), Some(&path)).unwrap();
        logger.debug("quiet");
        logger
            .object("Summary")
            .add_field("codes", 3)
            .log(LogLevel::Info);
    }
    let content = std::fs::read_to_string(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert!(content.contains("[DBG] Test: quiet"));
    assert!(content.contains("codes: 3"));
}
