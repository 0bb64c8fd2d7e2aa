//! Logging setup for the signer binaries.
//!
//! Logs go to stderr so the stdout of a command stays machine readable.

use dotenvy::dotenv;
use std::{env, io::stderr, str::FromStr};
use strum::EnumString;
use tracing_appender::{
    non_blocking::{NonBlocking, WorkerGuard},
    rolling::{RollingFileAppender, Rotation},
};
use tracing_subscriber::{
    filter::LevelFilter, fmt, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

const LOG_FILE: &str = "MINTSIG_LOG_FILE";
const LOG_DIR: &str = "MINTSIG_LOG_DIR";
const LOG_FORMAT_FILE: &str = "MINTSIG_LOG_FORMAT_FILE";
const LOG_FORMAT_STDERR: &str = "MINTSIG_LOG_FORMAT_STDERR";

/// Log line format.
#[derive(EnumString, strum::Display, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum LogFormat {
    /// human readable
    #[default]
    Text,
    /// one JSON object per line
    Json,
}

/// A boxed layer for tracing
pub type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Where and how to log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// file name to write logs to, `None` to skip the file target
    pub file: Option<String>,
    /// directory holding `file`
    pub dir: String,
    /// format of the file target
    pub file_format: LogFormat,
    /// format of the stderr target
    pub stderr_format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: None,
            dir: ".".to_string(),
            file_format: LogFormat::Json,
            stderr_format: LogFormat::Text,
        }
    }
}

impl LogConfig {
    /// Read the config from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read the config through `lookup`. Unset or unparsable values fall back to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let format = |key: &str, default: LogFormat| {
            lookup(key).and_then(|f| LogFormat::from_str(&f).ok()).unwrap_or(default)
        };

        Self {
            file: lookup(LOG_FILE).filter(|f| !f.is_empty()),
            dir: lookup(LOG_DIR).filter(|d| !d.is_empty()).unwrap_or(defaults.dir),
            file_format: format(LOG_FORMAT_FILE, defaults.file_format),
            stderr_format: format(LOG_FORMAT_STDERR, defaults.stderr_format),
        }
    }

    /// Install the global subscriber. Keep the guards alive until exit so buffered lines flush.
    pub fn init(self) -> eyre::Result<Vec<WorkerGuard>> {
        let (stderr_writer, stderr_guard) = tracing_appender::non_blocking(stderr());

        let mut guards = vec![stderr_guard];
        let mut layers: Vec<BoxedLayer<Registry>> =
            vec![apply_layer_format(self.stderr_format, stderr_writer)];

        if let Some(file) = &self.file {
            let appender = RollingFileAppender::new(Rotation::NEVER, &self.dir, file);
            let (file_writer, file_guard) = tracing_appender::non_blocking(appender);
            guards.push(file_guard);
            layers.push(apply_layer_format(self.file_format, file_writer));
        }

        tracing_subscriber::registry().with(layers).try_init()?;

        tracing::debug!(
            MINTSIG_LOG_FILE = self.file.as_deref().unwrap_or_default(),
            MINTSIG_LOG_DIR = self.dir,
            MINTSIG_LOG_FORMAT_FILE = %self.file_format,
            MINTSIG_LOG_FORMAT_STDERR = %self.stderr_format,
            RUST_LOG = env::var("RUST_LOG").unwrap_or_default(),
            "Logging options configured via env vars: "
        );

        Ok(guards)
    }
}

/// Initialize logging.
///
/// By default this will initialize WARN text to stderr.
///
/// Env var options, also read from a `.env` file:
/// - `MINTSIG_LOG_FILE` - file name to write logs to. If empty, will not write logs to file.
/// - `MINTSIG_LOG_DIR` - directory to write logs to. If empty will write logs to current
///   directory.
/// - `MINTSIG_LOG_FORMAT_FILE` - logging format for file target. Defaults to `json`. One of json,
///   text.
/// - `MINTSIG_LOG_FORMAT_STDERR` - logging format for stderr target. Defaults to `text`. One of
///   json, text.
/// - `RUST_LOG` - filter directives.
pub fn init_logging() -> eyre::Result<Vec<WorkerGuard>> {
    dotenv().ok();
    LogConfig::from_env().init()
}

fn apply_layer_format(log_format: LogFormat, writer: NonBlocking) -> BoxedLayer<Registry> {
    let filter = || {
        EnvFilter::builder().with_default_directive(LevelFilter::WARN.into()).from_env_lossy()
    };

    match log_format {
        LogFormat::Json => fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .json()
            .with_writer(writer)
            .with_filter(filter())
            .boxed(),
        LogFormat::Text => fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_ansi(false)
            .with_writer(writer)
            .with_filter(filter())
            .boxed(),
    }
}

#[cfg(test)]
mod test {
    use super::{LogConfig, LogFormat};
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> LogConfig {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        LogConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults() {
        assert_eq!(config(&[]), LogConfig::default());
        assert_eq!(config(&[]).file, None);
        assert_eq!(config(&[]).file_format, LogFormat::Json);
        assert_eq!(config(&[]).stderr_format, LogFormat::Text);
    }

    #[test]
    fn reads_vars() {
        let config = config(&[
            ("MINTSIG_LOG_FILE", "signer.log"),
            ("MINTSIG_LOG_DIR", "/var/log/mintsig"),
            ("MINTSIG_LOG_FORMAT_FILE", "text"),
            ("MINTSIG_LOG_FORMAT_STDERR", "json"),
        ]);
        assert_eq!(config.file.as_deref(), Some("signer.log"));
        assert_eq!(config.dir, "/var/log/mintsig");
        assert_eq!(config.file_format, LogFormat::Text);
        assert_eq!(config.stderr_format, LogFormat::Json);
    }

    #[test]
    fn bad_values_fall_back() {
        let config = config(&[
            ("MINTSIG_LOG_FILE", ""),
            ("MINTSIG_LOG_DIR", ""),
            ("MINTSIG_LOG_FORMAT_STDERR", "yaml"),
        ]);
        assert_eq!(config, LogConfig::default());
    }
}
