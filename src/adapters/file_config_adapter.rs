//! INI file configuration adapter.

use crate::domain::error::MiloError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, MiloError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| MiloError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, MiloError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| MiloError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// An adapter with no sections; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.config
            .getint(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.config
            .getfloat(section, key)
            .ok()
            .flatten()
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn from_string_parses_config() {
        let content = r#"
[protocol]
reward_multiplier = 2.5

[ledger]
backend = sqlite
path = /tmp/ops.db
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("ledger", "backend"),
            Some("sqlite".to_string())
        );
        assert_eq!(
            adapter.get_string("ledger", "path"),
            Some("/tmp/ops.db".to_string())
        );
        assert_eq!(adapter.get_double("protocol", "reward_multiplier", 0.0), 2.5);
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[ledger]\nbackend = json\n").unwrap();
        assert_eq!(adapter.get_string("ledger", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_int_returns_value() {
        let adapter = FileConfigAdapter::from_string("[toxicity]\nmin_sample = 30\n").unwrap();
        assert_eq!(adapter.get_int("toxicity", "min_sample", 0), 30);
    }

    #[test]
    fn get_int_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[toxicity]\n").unwrap();
        assert_eq!(adapter.get_int("toxicity", "missing", 42), 42);
    }

    #[test]
    fn get_int_returns_default_for_non_numeric() {
        let adapter = FileConfigAdapter::from_string("[toxicity]\nmin_sample = abc\n").unwrap();
        assert_eq!(adapter.get_int("toxicity", "min_sample", 42), 42);
    }

    #[test]
    fn get_double_returns_default_for_missing() {
        let adapter = FileConfigAdapter::from_string("[toxicity]\n").unwrap();
        assert_eq!(adapter.get_double("toxicity", "missing", 99.9), 99.9);
    }

    #[test]
    fn get_double_returns_default_for_non_numeric() {
        let adapter =
            FileConfigAdapter::from_string("[toxicity]\nmax_loss_rate = lots\n").unwrap();
        assert_eq!(adapter.get_double("toxicity", "max_loss_rate", 0.8), 0.8);
    }

    #[test]
    fn empty_adapter_uses_defaults() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("ledger", "path"), None);
        assert_eq!(adapter.get_int("toxicity", "min_sample", 20), 20);
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[toxicity]\natr_context_threshold = 3000\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_double("toxicity", "atr_context_threshold", 0.0),
            3000.0
        );
    }

    #[test]
    fn empty_adapter_debug_output() {
        let adapter = FileConfigAdapter::empty();
        assert!(format!("{adapter:?}").starts_with("FileConfigAdapter"));
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/config.ini").unwrap_err();
        assert!(matches!(err, MiloError::ConfigParse { file, .. } if file.contains("config.ini")));
    }
}
