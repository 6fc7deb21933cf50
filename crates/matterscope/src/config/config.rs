use serde::Deserialize;
use std::collections::HashMap;
use std::net::IpAddr;
use std::path::PathBuf;

use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::filter::Targets;

use super::diagnostics::{format_diagnostics, Diagnostic, Error, ValidationError};
use super::partial::{PartialConfig, PartialMqttConfig};
use crate::score::ScoreWeights;

#[derive(Debug, Default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub server: ServerConfig,
    pub scoring: ScoringConfig,
    pub ingest: IngestConfig,
}

// LogLevel needs Deserialize because it's used in PartialLoggingConfig with toml::Spanned
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Default)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: LogLevel,

    /// Per-target level overrides, e.g. `"matterscope::api" = "debug"`.
    pub overrides: HashMap<String, LogLevel>,
}

impl LoggingConfig {
    /// Build the tracing filter for this logging configuration.
    pub fn targets(&self) -> Targets {
        let mut targets = Targets::new().with_default(LevelFilter::from(self.level));
        for (target, level) in &self.overrides {
            targets = targets.with_target(target.clone(), LevelFilter::from(*level));
        }
        targets
    }
}

#[derive(Debug)]
pub struct ServerConfig {
    /// The IP address the HTTP API binds to.
    pub listen: String,

    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: "127.0.0.1".to_string(),
            port: 8686,
        }
    }
}

/// Tunable constants of the score formula. The defaults are the shipped
/// weighting; overriding them changes every score in the same proportion, so
/// they stay fixed for a deployment.
#[derive(Debug)]
pub struct ScoringConfig {
    pub mandatory_weight: f64,
    pub optional_weight: f64,
    pub client_bonus_per_cluster: f64,
    pub client_bonus_max: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let weights = ScoreWeights::default();
        Self {
            mandatory_weight: weights.mandatory,
            optional_weight: weights.optional,
            client_bonus_per_cluster: weights.client_bonus_per_cluster,
            client_bonus_max: weights.client_bonus_max,
        }
    }
}

impl ScoringConfig {
    pub fn weights(&self) -> ScoreWeights {
        ScoreWeights {
            mandatory: self.mandatory_weight,
            optional: self.optional_weight,
            client_bonus_per_cluster: self.client_bonus_per_cluster,
            client_bonus_max: self.client_bonus_max,
        }
    }
}

#[derive(Debug, Default)]
pub struct IngestConfig {
    pub mqtt: Option<MqttConfig>,
}

#[derive(Debug, Clone)]
pub struct MqttConfig {
    /// MQTT broker hostname or IP address
    pub broker: String,

    pub port: u16,

    pub client_id: String,

    /// Leading topic segment; the source subscribes to
    /// `<topic_prefix>/+/endpoints`.
    pub topic_prefix: String,

    pub username: Option<String>,

    pub password: Option<String>,
}

impl Config {
    /// Load configuration from multiple TOML files with import resolution
    ///
    /// Supports multiple config files (e.g., base + secrets), import
    /// statements within config files, conflict detection across all
    /// sources, and validation with all errors and warnings reported
    /// together.
    ///
    /// Returns Ok((Config, diagnostics)) where diagnostics contains warnings
    /// and errors. Only returns Err if there are actual errors (not just
    /// warnings).
    pub fn from_files(
        paths: &[PathBuf],
    ) -> Result<(Self, Vec<Diagnostic>), Box<dyn std::error::Error>> {
        let configs = PartialConfig::load_with_imports(paths)?;

        // Merge with first-wins semantics, collecting diagnostics
        let (partial, diagnostics) = PartialConfig::merge(configs);

        Self::from_partial(partial, diagnostics)
    }

    /// Convert a PartialConfig to a Config, validating all fields
    pub fn from_partial(
        partial: PartialConfig,
        mut diagnostics: Vec<Diagnostic>,
    ) -> Result<(Self, Vec<Diagnostic>), Box<dyn std::error::Error>> {
        let logging = if let Some(partial_logging) = partial.logging {
            LoggingConfig {
                level: partial_logging
                    .level
                    .map(|s| *s.get_ref())
                    .unwrap_or_default(),
                overrides: partial_logging
                    .overrides
                    .map(|hm| hm.into_iter().map(|(k, v)| (k, *v.get_ref())).collect())
                    .unwrap_or_default(),
            }
        } else {
            LoggingConfig::default()
        };

        let server = if let Some(partial_server) = partial.server {
            let defaults = ServerConfig::default();
            let listen = partial_server
                .listen
                .map(|s| s.into_inner())
                .unwrap_or(defaults.listen);
            if listen.parse::<IpAddr>().is_err() {
                diagnostics.push(validation_error(
                    "server.listen",
                    format!("'{}' is not a valid IP address", listen),
                ));
            }
            ServerConfig {
                listen,
                port: partial_server
                    .port
                    .map(|s| s.into_inner())
                    .unwrap_or(defaults.port),
            }
        } else {
            ServerConfig::default()
        };

        let scoring = if let Some(partial_scoring) = partial.scoring {
            let defaults = ScoringConfig::default();
            let scoring = ScoringConfig {
                mandatory_weight: partial_scoring
                    .mandatory_weight
                    .map(|s| s.into_inner())
                    .unwrap_or(defaults.mandatory_weight),
                optional_weight: partial_scoring
                    .optional_weight
                    .map(|s| s.into_inner())
                    .unwrap_or(defaults.optional_weight),
                client_bonus_per_cluster: partial_scoring
                    .client_bonus_per_cluster
                    .map(|s| s.into_inner())
                    .unwrap_or(defaults.client_bonus_per_cluster),
                client_bonus_max: partial_scoring
                    .client_bonus_max
                    .map(|s| s.into_inner())
                    .unwrap_or(defaults.client_bonus_max),
            };
            for (field, value) in [
                ("scoring.mandatory_weight", scoring.mandatory_weight),
                ("scoring.optional_weight", scoring.optional_weight),
            ] {
                if !(0.0..=1.0).contains(&value) {
                    diagnostics.push(validation_error(
                        field,
                        format!("{} is outside [0, 1]", value),
                    ));
                }
            }
            for (field, value) in [
                (
                    "scoring.client_bonus_per_cluster",
                    scoring.client_bonus_per_cluster,
                ),
                ("scoring.client_bonus_max", scoring.client_bonus_max),
            ] {
                if value < 0.0 {
                    diagnostics.push(validation_error(field, format!("{} is negative", value)));
                }
            }
            scoring
        } else {
            ScoringConfig::default()
        };

        let ingest = if let Some(partial_ingest) = partial.ingest {
            IngestConfig {
                mqtt: match partial_ingest.mqtt {
                    Some(partial_mqtt) => match Self::validate_mqtt(partial_mqtt) {
                        Ok(mqtt) => Some(mqtt),
                        Err(errors) => {
                            diagnostics.extend(
                                errors
                                    .into_iter()
                                    .map(|e| Diagnostic::Error(Error::Validation(e))),
                            );
                            None
                        }
                    },
                    None => None,
                },
            }
        } else {
            IngestConfig::default()
        };

        let config = Config {
            logging,
            server,
            scoring,
            ingest,
        };

        if let Err(message) = config.validate() {
            diagnostics.push(validation_error("scoring", message));
        }

        let has_errors = diagnostics.iter().any(|d| d.is_error());

        if has_errors {
            Err(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format_diagnostics(&diagnostics),
            )))
        } else {
            Ok((config, diagnostics))
        }
    }

    fn validate_mqtt(partial: PartialMqttConfig) -> Result<MqttConfig, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let broker = match partial.broker {
            Some(broker) if !broker.is_empty() => broker,
            _ => {
                errors.push(ValidationError {
                    field_path: "ingest.mqtt.broker".to_string(),
                    message: "broker is required".to_string(),
                });
                String::new() // Default for error recovery
            }
        };

        let mqtt = MqttConfig {
            broker,
            port: partial.port.unwrap_or(1883),
            client_id: partial
                .client_id
                .unwrap_or_else(|| "matterscope".to_string()),
            topic_prefix: partial.topic_prefix.unwrap_or_else(|| "matter".to_string()),
            username: partial.username,
            password: partial.password,
        };

        if errors.is_empty() {
            Ok(mqtt)
        } else {
            Err(errors)
        }
    }

    /// Validate cross-field constraints.
    pub fn validate(&self) -> Result<(), String> {
        let sum = self.scoring.mandatory_weight + self.scoring.optional_weight;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(format!(
                "mandatory_weight + optional_weight must sum to 1.0, got {}",
                sum
            ));
        }
        Ok(())
    }
}

fn validation_error(field_path: &str, message: String) -> Diagnostic {
    Diagnostic::Error(Error::Validation(ValidationError {
        field_path: field_path.to_string(),
        message,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use std::path::Path;

    fn write_config(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        write!(file, "{}", content).unwrap();
        path
    }

    #[test]
    fn test_defaults_from_minimal_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "minimal.toml", "[server]\nport = 9000\n");

        let (config, diagnostics) = Config::from_files(&[path]).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.listen, "127.0.0.1");
        assert_eq!(config.logging.level, LogLevel::Info);
        assert_eq!(config.scoring.mandatory_weight, 0.70);
        assert_eq!(config.scoring.optional_weight, 0.30);
        assert!(config.ingest.mqtt.is_none());
    }

    #[test]
    fn test_merge_non_overlapping_configs() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_config(
            dir.path(),
            "base.toml",
            r#"
[logging]
level = "debug"

[scoring]
mandatory_weight = 0.8
optional_weight = 0.2
"#,
        );
        let extra = write_config(
            dir.path(),
            "extra.toml",
            r#"
[logging.overrides]
"matterscope::api" = "trace"

[server]
port = 9000
"#,
        );

        let (config, diagnostics) = Config::from_files(&[base, extra]).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(
            config.logging.overrides.get("matterscope::api"),
            Some(&LogLevel::Trace)
        );
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.scoring.weights().mandatory, 0.8);
    }

    #[test]
    fn test_conflict_detection() {
        let dir = tempfile::tempdir().unwrap();
        let base = write_config(
            dir.path(),
            "base.toml",
            "[scoring]\nmandatory_weight = 0.7\noptional_weight = 0.3\n",
        );
        let conflict = write_config(
            dir.path(),
            "conflict.toml",
            "[scoring]\nmandatory_weight = 0.9\n",
        );

        let result = Config::from_files(&[base, conflict]);
        assert!(result.is_err());

        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("Merge conflict"));
        assert!(err_msg.contains("scoring.mandatory_weight"));
    }

    #[test]
    fn test_import_resolution() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "base.toml", "[logging]\nlevel = \"warn\"\n");
        let main = write_config(
            dir.path(),
            "main.toml",
            "imports = [\"base.toml\"]\n\n[server]\nport = 9000\n",
        );

        let (config, _diagnostics) = Config::from_files(&[main]).unwrap();
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_import_cycle_detection() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            "a.toml",
            "imports = [\"b.toml\"]\n\n[logging]\nlevel = \"info\"\n",
        );
        let a = dir.path().join("a.toml");
        write_config(dir.path(), "b.toml", "imports = [\"a.toml\"]\n");

        let result = Config::from_files(&[a]);
        assert!(result.is_err());

        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("cycle") || err_msg.contains("Import"));
    }

    #[test]
    fn test_empty_config_file_warns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "empty.toml", "");

        let (config, diagnostics) = Config::from_files(&[path]).unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].is_warning());
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "bad.toml",
            "[scoring]\nmandatory_weight = 0.9\noptional_weight = 0.3\n",
        );

        let result = Config::from_files(&[path]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("sum to 1.0"));
    }

    #[test]
    fn test_invalid_listen_address_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "bad.toml",
            "[server]\nlisten = \"not-an-address\"\n",
        );

        let result = Config::from_files(&[path]);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("server.listen"));
    }

    #[test]
    fn test_mqtt_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "mqtt.toml",
            "[ingest.mqtt]\nbroker = \"mqtt.local\"\n",
        );

        let (config, _diagnostics) = Config::from_files(&[path]).unwrap();
        let mqtt = config.ingest.mqtt.expect("mqtt section");
        assert_eq!(mqtt.broker, "mqtt.local");
        assert_eq!(mqtt.port, 1883);
        assert_eq!(mqtt.client_id, "matterscope");
        assert_eq!(mqtt.topic_prefix, "matter");
        assert!(mqtt.username.is_none());
    }

    #[test]
    fn test_mqtt_requires_broker() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "mqtt.toml", "[ingest.mqtt]\nport = 1884\n");

        let result = Config::from_files(&[path]);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("ingest.mqtt.broker"));
    }

    #[test]
    fn test_missing_file_error() {
        let missing = PathBuf::from("/nonexistent/matterscope.toml");

        let result = Config::from_files(&[missing]);
        assert!(result.is_err());

        let err_msg = result.unwrap_err().to_string();
        assert!(err_msg.contains("Failed to read"));
        assert!(err_msg.contains("/nonexistent/matterscope.toml"));
    }

    #[test]
    fn test_log_level_filter_mapping() {
        assert_eq!(LevelFilter::from(LogLevel::Trace), LevelFilter::TRACE);
        assert_eq!(LevelFilter::from(LogLevel::Error), LevelFilter::ERROR);
        // Building a filter from overrides must not panic.
        let logging = LoggingConfig {
            level: LogLevel::Info,
            overrides: HashMap::from([("matterscope::api".to_string(), LogLevel::Debug)]),
        };
        let _ = logging.targets();
    }
}
