//! Settings built from a [`ConfigPort`], validated before any command runs.
//!
//! Every key is optional. A key that is present but unparseable, or parses
//! to an out-of-range value, is a [`MiloError::ConfigInvalid`].

use std::path::PathBuf;

use crate::domain::error::MiloError;
use crate::domain::pipeline::ProtocolParams;
use crate::domain::risk::{DEFAULT_REWARD_MULTIPLIER, MIN_REWARD_RATIO};
use crate::domain::toxicity::{
    DEFAULT_ATR_CONTEXT_THRESHOLD, DEFAULT_MAX_LOSS_RATE, DEFAULT_MIN_SAMPLE, ToxicityConfig,
};
use crate::ports::config_port::ConfigPort;

pub const DEFAULT_JSON_LEDGER: &str = "cci_operations.json";
pub const DEFAULT_SQLITE_LEDGER: &str = "cci_operations.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerBackend {
    Json,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerSettings {
    pub backend: LedgerBackend,
    pub path: PathBuf,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        LedgerSettings {
            backend: LedgerBackend::Json,
            path: PathBuf::from(DEFAULT_JSON_LEDGER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Settings {
    pub protocol: ProtocolParams,
    pub toxicity: ToxicityConfig,
    pub ledger: LedgerSettings,
}

impl Settings {
    pub fn from_config(config: &dyn ConfigPort) -> Result<Self, MiloError> {
        Ok(Settings {
            protocol: load_protocol(config)?,
            toxicity: load_toxicity(config)?,
            ledger: load_ledger(config)?,
        })
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> MiloError {
    MiloError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn read_double(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: f64,
) -> Result<f64, MiloError> {
    if let Some(raw) = config.get_string(section, key) {
        if raw.trim().parse::<f64>().is_err() {
            return Err(invalid(section, key, format!("'{raw}' is not a number")));
        }
    }
    Ok(config.get_double(section, key, default))
}

fn read_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, MiloError> {
    if let Some(raw) = config.get_string(section, key) {
        if raw.trim().parse::<i64>().is_err() {
            return Err(invalid(section, key, format!("'{raw}' is not an integer")));
        }
    }
    Ok(config.get_int(section, key, default))
}

pub fn load_protocol(config: &dyn ConfigPort) -> Result<ProtocolParams, MiloError> {
    let reward_multiplier = read_double(
        config,
        "protocol",
        "reward_multiplier",
        DEFAULT_REWARD_MULTIPLIER,
    )?;
    if !reward_multiplier.is_finite() || reward_multiplier < MIN_REWARD_RATIO {
        return Err(invalid(
            "protocol",
            "reward_multiplier",
            format!("reward_multiplier must be at least {MIN_REWARD_RATIO}"),
        ));
    }
    Ok(ProtocolParams { reward_multiplier })
}

pub fn load_toxicity(config: &dyn ConfigPort) -> Result<ToxicityConfig, MiloError> {
    let min_sample = read_int(config, "toxicity", "min_sample", DEFAULT_MIN_SAMPLE as i64)?;
    let min_sample = usize::try_from(min_sample)
        .ok()
        .filter(|&n| n >= 1)
        .ok_or_else(|| invalid("toxicity", "min_sample", "min_sample must be at least 1"))?;

    let max_loss_rate = read_double(config, "toxicity", "max_loss_rate", DEFAULT_MAX_LOSS_RATE)?;
    if !(max_loss_rate > 0.0 && max_loss_rate < 1.0) {
        return Err(invalid(
            "toxicity",
            "max_loss_rate",
            "max_loss_rate must be between 0 and 1",
        ));
    }

    let atr_context_threshold = read_double(
        config,
        "toxicity",
        "atr_context_threshold",
        DEFAULT_ATR_CONTEXT_THRESHOLD,
    )?;
    if !atr_context_threshold.is_finite() || atr_context_threshold < 0.0 {
        return Err(invalid(
            "toxicity",
            "atr_context_threshold",
            "atr_context_threshold must be non-negative",
        ));
    }

    Ok(ToxicityConfig {
        min_sample,
        max_loss_rate,
        atr_context_threshold,
    })
}

pub fn load_ledger(config: &dyn ConfigPort) -> Result<LedgerSettings, MiloError> {
    let backend = match config.get_string("ledger", "backend") {
        None => LedgerBackend::Json,
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "json" => LedgerBackend::Json,
            "sqlite" => LedgerBackend::Sqlite,
            other => {
                return Err(invalid(
                    "ledger",
                    "backend",
                    format!("unknown backend '{other}', expected json or sqlite"),
                ));
            }
        },
    };

    let path = match config.get_string("ledger", "path") {
        Some(p) if !p.trim().is_empty() => PathBuf::from(p.trim()),
        Some(_) => return Err(invalid("ledger", "path", "path must not be empty")),
        None => PathBuf::from(match backend {
            LedgerBackend::Json => DEFAULT_JSON_LEDGER,
            LedgerBackend::Sqlite => DEFAULT_SQLITE_LEDGER,
        }),
    };

    Ok(LedgerSettings { backend, path })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn empty_config_yields_defaults() {
        let settings = Settings::from_config(&FileConfigAdapter::empty()).unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.ledger.path, PathBuf::from("cci_operations.json"));
    }

    #[test]
    fn full_config_is_read() {
        let config = make_config(
            r#"
[protocol]
reward_multiplier = 3.0

[toxicity]
min_sample = 10
max_loss_rate = 0.6
atr_context_threshold = 1500

[ledger]
backend = sqlite
path = trades.db
"#,
        );
        let settings = Settings::from_config(&config).unwrap();
        assert_eq!(settings.protocol.reward_multiplier, 3.0);
        assert_eq!(settings.toxicity.min_sample, 10);
        assert_eq!(settings.toxicity.max_loss_rate, 0.6);
        assert_eq!(settings.toxicity.atr_context_threshold, 1500.0);
        assert_eq!(settings.ledger.backend, LedgerBackend::Sqlite);
        assert_eq!(settings.ledger.path, PathBuf::from("trades.db"));
    }

    #[test]
    fn multiplier_below_two_fails() {
        let config = make_config("[protocol]\nreward_multiplier = 1.5\n");
        let err = load_protocol(&config).unwrap_err();
        assert!(matches!(err, MiloError::ConfigInvalid { key, .. } if key == "reward_multiplier"));
    }

    #[test]
    fn multiplier_not_a_number_fails() {
        let config = make_config("[protocol]\nreward_multiplier = double\n");
        let err = load_protocol(&config).unwrap_err();
        assert!(matches!(err, MiloError::ConfigInvalid { key, .. } if key == "reward_multiplier"));
    }

    #[test]
    fn min_sample_zero_fails() {
        let config = make_config("[toxicity]\nmin_sample = 0\n");
        let err = load_toxicity(&config).unwrap_err();
        assert!(matches!(err, MiloError::ConfigInvalid { key, .. } if key == "min_sample"));
    }

    #[test]
    fn min_sample_negative_fails() {
        let config = make_config("[toxicity]\nmin_sample = -3\n");
        assert!(load_toxicity(&config).is_err());
    }

    #[test]
    fn loss_rate_out_of_range_fails() {
        for value in ["0", "1", "1.2", "-0.1"] {
            let config = make_config(&format!("[toxicity]\nmax_loss_rate = {value}\n"));
            let err = load_toxicity(&config).unwrap_err();
            assert!(
                matches!(err, MiloError::ConfigInvalid { ref key, .. } if key == "max_loss_rate"),
                "value {value}"
            );
        }
    }

    #[test]
    fn negative_threshold_fails() {
        let config = make_config("[toxicity]\natr_context_threshold = -1\n");
        let err = load_toxicity(&config).unwrap_err();
        assert!(
            matches!(err, MiloError::ConfigInvalid { key, .. } if key == "atr_context_threshold")
        );
    }

    #[test]
    fn unknown_backend_fails() {
        let config = make_config("[ledger]\nbackend = postgres\n");
        let err = load_ledger(&config).unwrap_err();
        assert!(matches!(err, MiloError::ConfigInvalid { key, .. } if key == "backend"));
    }

    #[test]
    fn sqlite_backend_default_path() {
        let config = make_config("[ledger]\nbackend = SQLite\n");
        let ledger = load_ledger(&config).unwrap();
        assert_eq!(ledger.backend, LedgerBackend::Sqlite);
        assert_eq!(ledger.path, PathBuf::from("cci_operations.db"));
    }
}
