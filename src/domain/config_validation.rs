//! Configuration validation.
//!
//! Validates the `[evaluation]` and `[logging]` sections before any input is
//! read, so a bad config never produces a score.

use crate::domain::error::TradescoreError;
use crate::domain::replay::Variant;
use crate::ports::config_port::{ConfigPort, parse_bool};

pub const EVALUATION_SECTION: &str = "evaluation";
pub const LOGGING_SECTION: &str = "logging";
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

pub fn validate_evaluation_config(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    validate_variant(config)?;
    validate_flag(config, "include_portfolio_valuation")?;
    validate_flag(config, "reject_duplicate_security_per_day")?;
    parse_max_trades_per_day(config)?;
    Ok(())
}

pub fn validate_logging_config(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    match config.get_string(LOGGING_SECTION, "level") {
        Some(level) if !LOG_LEVELS.contains(&level.trim().to_lowercase().as_str()) => {
            Err(TradescoreError::ConfigInvalid {
                section: LOGGING_SECTION.to_string(),
                key: "level".to_string(),
                reason: format!("level must be one of {}", LOG_LEVELS.join(", ")),
            })
        }
        _ => Ok(()),
    }
}

fn validate_variant(config: &dyn ConfigPort) -> Result<(), TradescoreError> {
    if let Some(value) = config.get_string(EVALUATION_SECTION, "variant") {
        value
            .parse::<Variant>()
            .map_err(|e| TradescoreError::ConfigInvalid {
                section: EVALUATION_SECTION.to_string(),
                key: "variant".to_string(),
                reason: e.to_string(),
            })?;
    }
    Ok(())
}

fn validate_flag(config: &dyn ConfigPort, key: &str) -> Result<(), TradescoreError> {
    match config.get_string(EVALUATION_SECTION, key) {
        Some(value) if parse_bool(&value).is_none() => Err(TradescoreError::ConfigInvalid {
            section: EVALUATION_SECTION.to_string(),
            key: key.to_string(),
            reason: format!("{key} must be true or false"),
        }),
        _ => Ok(()),
    }
}

/// Reads `max_trades_per_day`.
///
/// `Ok(None)` when the key is absent, `Ok(Some(None))` when it is explicitly
/// `none` (no ceiling), `Ok(Some(Some(n)))` for a positive ceiling.
pub fn parse_max_trades_per_day(
    config: &dyn ConfigPort,
) -> Result<Option<Option<usize>>, TradescoreError> {
    let Some(raw) = config.get_string(EVALUATION_SECTION, "max_trades_per_day") else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("none") {
        return Ok(Some(None));
    }
    match raw.parse::<usize>() {
        Ok(n) if n > 0 => Ok(Some(Some(n))),
        _ => Err(TradescoreError::ConfigInvalid {
            section: EVALUATION_SECTION.to_string(),
            key: "max_trades_per_day".to_string(),
            reason: "max_trades_per_day must be a positive integer or none".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    fn make_config(content: &str) -> FileConfigAdapter {
        FileConfigAdapter::from_string(content).unwrap()
    }

    #[test]
    fn valid_evaluation_config_passes() {
        let config = make_config(
            r#"
[evaluation]
variant = strict
include_portfolio_valuation = false
reject_duplicate_security_per_day = yes
max_trades_per_day = 15

[logging]
level = debug
"#,
        );
        assert!(validate_evaluation_config(&config).is_ok());
        assert!(validate_logging_config(&config).is_ok());
    }

    #[test]
    fn empty_config_passes() {
        let config = make_config("");
        assert!(validate_evaluation_config(&config).is_ok());
        assert!(validate_logging_config(&config).is_ok());
    }

    #[test]
    fn unknown_variant_fails() {
        let config = make_config("[evaluation]\nvariant = lenient\n");
        let err = validate_evaluation_config(&config).unwrap_err();
        assert!(matches!(err, TradescoreError::ConfigInvalid { key, .. } if key == "variant"));
    }

    #[test]
    fn non_boolean_flag_fails() {
        let config = make_config("[evaluation]\ninclude_portfolio_valuation = sometimes\n");
        let err = validate_evaluation_config(&config).unwrap_err();
        assert!(matches!(
            err,
            TradescoreError::ConfigInvalid { key, .. } if key == "include_portfolio_valuation"
        ));
    }

    #[test]
    fn max_trades_must_be_positive() {
        for value in ["0", "-3", "many"] {
            let config = make_config(&format!("[evaluation]\nmax_trades_per_day = {value}\n"));
            let err = validate_evaluation_config(&config).unwrap_err();
            assert!(matches!(
                err,
                TradescoreError::ConfigInvalid { key, .. } if key == "max_trades_per_day"
            ));
        }
    }

    #[test]
    fn max_trades_none_disables_ceiling() {
        let config = make_config("[evaluation]\nmax_trades_per_day = none\n");
        assert_eq!(parse_max_trades_per_day(&config).unwrap(), Some(None));

        let config = make_config("[evaluation]\nmax_trades_per_day = 5\n");
        assert_eq!(parse_max_trades_per_day(&config).unwrap(), Some(Some(5)));

        let config = make_config("[evaluation]\n");
        assert_eq!(parse_max_trades_per_day(&config).unwrap(), None);
    }

    #[test]
    fn unknown_log_level_fails() {
        let config = make_config("[logging]\nlevel = chatty\n");
        let err = validate_logging_config(&config).unwrap_err();
        assert!(matches!(err, TradescoreError::ConfigInvalid { key, .. } if key == "level"));
    }
}
