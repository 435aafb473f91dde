//! INI file configuration adapter.

use crate::ports::config_port::{ConfigPort, parse_bool};
use configparser::ini::Ini;
use std::path::Path;

pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        let mut config = Ini::new();
        config.load(path).map_err(std::io::Error::other)?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, String> {
        let mut config = Ini::new();
        config.read(content.to_string())?;
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

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(parse_bool)
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
[evaluation]
variant = strict
max_trades_per_day = 20

[logging]
level = info
"#;
        let adapter = FileConfigAdapter::from_string(content).unwrap();
        assert_eq!(
            adapter.get_string("evaluation", "variant"),
            Some("strict".to_string())
        );
        assert_eq!(
            adapter.get_string("evaluation", "max_trades_per_day"),
            Some("20".to_string())
        );
        assert_eq!(
            adapter.get_string("logging", "level"),
            Some("info".to_string())
        );
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string("[evaluation]\nvariant = base\n").unwrap();
        assert_eq!(adapter.get_string("evaluation", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_bool_returns_true_values() {
        let adapter =
            FileConfigAdapter::from_string("[evaluation]\na = true\nb = yes\nc = 1\n").unwrap();
        assert!(adapter.get_bool("evaluation", "a", false));
        assert!(adapter.get_bool("evaluation", "b", false));
        assert!(adapter.get_bool("evaluation", "c", false));
    }

    #[test]
    fn get_bool_returns_false_values() {
        let adapter =
            FileConfigAdapter::from_string("[evaluation]\na = false\nb = no\nc = 0\n").unwrap();
        assert!(!adapter.get_bool("evaluation", "a", true));
        assert!(!adapter.get_bool("evaluation", "b", true));
        assert!(!adapter.get_bool("evaluation", "c", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing_or_garbage() {
        let adapter = FileConfigAdapter::from_string("[evaluation]\nx = maybe\n").unwrap();
        assert!(adapter.get_bool("evaluation", "missing", true));
        assert!(!adapter.get_bool("evaluation", "x", false));
    }

    #[test]
    fn empty_adapter_has_no_values() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("evaluation", "variant"), None);
        assert!(adapter.get_bool("evaluation", "include_portfolio_valuation", true));
    }

    #[test]
    fn from_file_reads_config() {
        let file = create_temp_config("[logging]\nlevel = trace\n");
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(
            adapter.get_string("logging", "level"),
            Some("trace".to_string())
        );
    }

    #[test]
    fn from_file_returns_error_for_missing_file() {
        let result = FileConfigAdapter::from_file("/nonexistent/path/config.ini");
        assert!(result.is_err());
    }
}
