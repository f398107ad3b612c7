//! Logging setup for the native library
//!
//! All code logs through `tracing`. On Android the events are forwarded to logcat
//! through the `log` facade (`tracing`'s `log` feature) and `android_logger`;
//! elsewhere a `tracing-subscriber` fmt layer writes to stderr or to rolling files.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::Level;
use tracing_appender::{
    non_blocking::WorkerGuard,
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    filter::Directive,
    fmt::{self, format::FmtSpan, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

use crate::config::LoggingConfig;
use crate::errors::{BridgeError, BridgeResult};

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable multi-line format
    Pretty,
    /// Single-line format
    #[default]
    Compact,
    /// JSON format for structured logging
    Json,
}

/// Log output destination
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    /// Standard error
    Stderr,
    /// File with rotation (daily)
    File { directory: String, prefix: String },
    /// Android logcat under the given tag
    Logcat { tag: String },
}

/// Logging configuration
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level
    pub level: Level,
    /// Output format (ignored by logcat)
    pub format: LogFormat,
    /// Output destination
    pub output: LogOutput,
    /// Whether to include span events
    pub span_events: bool,
    /// Custom filter directives (e.g., "sfm_native=debug,jni=warn")
    pub filter: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Compact,
            output: default_output("sfm_native"),
            span_events: false,
            filter: None,
        }
    }
}

impl LogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub fn with_format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    pub fn with_output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    pub fn with_span_events(mut self, enabled: bool) -> Self {
        self.span_events = enabled;
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Runtime settings for the `[logging]` config section.
    pub fn from_settings(settings: &LoggingConfig) -> BridgeResult<Self> {
        let output = match &settings.directory {
            Some(directory) => LogOutput::File {
                directory: directory.clone(),
                prefix: settings.tag.clone(),
            },
            None => default_output(&settings.tag),
        };

        Ok(Self {
            level: settings.level()?,
            format: settings.format,
            output,
            span_events: settings.span_events,
            filter: settings.filter.clone(),
        })
    }
}

#[cfg(target_os = "android")]
fn default_output(tag: &str) -> LogOutput {
    LogOutput::Logcat { tag: tag.to_string() }
}

#[cfg(not(target_os = "android"))]
fn default_output(_tag: &str) -> LogOutput {
    LogOutput::Stderr
}

/// Install the global logger.
///
/// Returns the `WorkerGuard` of the non-blocking writer when one is used; keep it
/// alive for as long as logs should be flushed. Fails if the output cannot be
/// opened, a filter directive is invalid, or a global logger is already installed.
pub fn init_logging(config: LogConfig) -> BridgeResult<Option<WorkerGuard>> {
    match &config.output {
        LogOutput::Stderr => {
            let filter = build_filter(&config)?;
            let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
            install(fmt_layer(writer, &config), filter)?;
            Ok(Some(guard))
        }
        LogOutput::File { directory, prefix } => {
            let filter = build_filter(&config)?;
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix(prefix)
                .build(directory)
                .map_err(|e| BridgeError::logging(format!("cannot log to {}: {}", directory, e)))?;
            let (writer, guard) = tracing_appender::non_blocking(file_appender);
            install(fmt_layer(writer, &config), filter)?;
            Ok(Some(guard))
        }
        LogOutput::Logcat { tag } => {
            init_logcat(&config, tag)?;
            Ok(None)
        }
    }
}

fn fmt_layer<W>(writer: W, config: &LogConfig) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_span_events(span_events_config(config.span_events));

    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}

fn install(layer: Box<dyn Layer<Registry> + Send + Sync>, filter: EnvFilter) -> BridgeResult<()> {
    tracing_subscriber::registry()
        .with(layer.with_filter(filter))
        .try_init()
        .map_err(|e| BridgeError::logging(e.to_string()))
}

/// Parse comma-separated filter directives, skipping empty entries.
pub fn parse_directives(filter: &str) -> BridgeResult<Vec<Directive>> {
    filter
        .split(',')
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .map(|directive| {
            Directive::from_str(directive).map_err(|e| {
                BridgeError::config(format!("invalid filter directive '{}': {}", directive, e))
            })
        })
        .collect()
}

pub(crate) fn build_filter(config: &LogConfig) -> BridgeResult<EnvFilter> {
    let base_filter = EnvFilter::from_default_env()
        .add_directive(config.level.into());

    match &config.filter {
        Some(filter_str) => Ok(parse_directives(filter_str)?
            .into_iter()
            .fold(base_filter, |filter, directive| filter.add_directive(directive))),
        None => Ok(base_filter),
    }
}

fn span_events_config(enabled: bool) -> FmtSpan {
    if enabled {
        FmtSpan::NEW | FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    }
}

#[cfg(target_os = "android")]
fn init_logcat(config: &LogConfig, tag: &str) -> BridgeResult<()> {
    let max_level = log::LevelFilter::from_str(config.level.as_str())
        .unwrap_or(log::LevelFilter::Info);

    let mut logcat = android_logger::Config::default()
        .with_max_level(max_level)
        .with_tag(tag);

    if let Some(filter) = &config.filter {
        logcat = logcat.with_filter(android_logger::FilterBuilder::new().parse(filter).build());
    }

    // No-op on every call after the first
    android_logger::init_once(logcat);
    Ok(())
}

#[cfg(not(target_os = "android"))]
fn init_logcat(_config: &LogConfig, tag: &str) -> BridgeResult<()> {
    Err(BridgeError::logging(format!(
        "logcat output (tag '{}') is only available on Android",
        tag
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_builder() {
        let config = LogConfig::new()
            .with_level(Level::DEBUG)
            .with_format(LogFormat::Json)
            .with_output(LogOutput::Stderr)
            .with_span_events(true)
            .with_filter("sfm_native=trace");

        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.format, LogFormat::Json);
        assert_eq!(config.output, LogOutput::Stderr);
        assert!(config.span_events);
        assert_eq!(config.filter, Some("sfm_native=trace".to_string()));
    }

    #[test]
    fn test_from_settings() {
        let settings = LoggingConfig {
            level: "warn".to_string(),
            format: LogFormat::Pretty,
            filter: Some("jni=error".to_string()),
            span_events: true,
            ..LoggingConfig::default()
        };

        let config = LogConfig::from_settings(&settings).unwrap();
        assert_eq!(config.level, Level::WARN);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.filter.as_deref(), Some("jni=error"));
        assert!(config.span_events);
        assert_eq!(config.output, default_output("sfm_native"));
    }

    #[test]
    fn test_from_settings_with_directory() {
        let settings = LoggingConfig {
            directory: Some("/data/local/tmp/logs".to_string()),
            ..LoggingConfig::default()
        };

        let config = LogConfig::from_settings(&settings).unwrap();
        assert_eq!(
            config.output,
            LogOutput::File {
                directory: "/data/local/tmp/logs".to_string(),
                prefix: "sfm_native".to_string(),
            }
        );
    }

    #[test]
    fn test_from_settings_rejects_bad_level() {
        let settings = LoggingConfig {
            level: "chatty".to_string(),
            ..LoggingConfig::default()
        };
        assert!(LogConfig::from_settings(&settings).is_err());
    }

    #[test]
    fn test_span_events_config() {
        assert_eq!(span_events_config(false), FmtSpan::NONE);
        assert_eq!(span_events_config(true), FmtSpan::NEW | FmtSpan::CLOSE);
    }

    #[test]
    fn test_parse_directives_skips_empty_entries() {
        let directives = parse_directives("sfm_native=debug, ,jni=warn,").unwrap();
        assert_eq!(directives.len(), 2);
    }

    #[test]
    fn test_parse_directives_rejects_bad_level() {
        let err = parse_directives("sfm_native=debug,jni=loud").unwrap_err();
        assert!(matches!(err, BridgeError::Config(_)));
        assert!(err.to_string().contains("jni=loud"));
    }

    #[test]
    fn test_build_filter_keeps_directives() {
        let config = LogConfig::new().with_filter("sfm_native=debug");
        let filter = build_filter(&config).unwrap();
        assert!(filter.to_string().contains("sfm_native=debug"));
    }

    #[cfg(not(target_os = "android"))]
    #[test]
    fn test_bad_filter_fails_before_install() {
        let config = LogConfig::new().with_filter("sfm_native=loud");
        assert!(matches!(init_logging(config), Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_unusable_log_directory_is_an_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let directory = file.path().join("logs").to_string_lossy().to_string();

        let config = LogConfig::new().with_output(LogOutput::File {
            directory,
            prefix: "sfm_native".to_string(),
        });

        let err = init_logging(config).unwrap_err();
        assert!(matches!(err, BridgeError::Logging(_)));
    }

    #[cfg(not(target_os = "android"))]
    #[test]
    fn test_logcat_unavailable_off_device() {
        let config = LogConfig::new().with_output(LogOutput::Logcat { tag: "sfm".to_string() });
        let err = init_logging(config).unwrap_err();
        assert!(matches!(err, BridgeError::Logging(_)));
    }
}
