//! Environment variable expansion for configuration strings.

use std::borrow::Cow;

use crate::ConfigError;

/// Expand `${VAR}` and `${VAR:-default}` references in a config value.
///
/// `field` names the config key in error messages.
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    shellexpand::env(value)
        .map(Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: e.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_is_unchanged() {
        assert_eq!(expand_env("docs", "docs.source_dir").unwrap(), "docs");
    }

    #[test]
    fn test_default_value() {
        assert_eq!(
            expand_env("${DOCU_EXPAND_TEST_UNSET:-fallback}", "docs.title").unwrap(),
            "fallback"
        );
    }

    #[test]
    fn test_missing_variable() {
        let err = expand_env("${DOCU_EXPAND_TEST_MISSING}", "server.host").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("server.host"));
        assert!(msg.contains("DOCU_EXPAND_TEST_MISSING"));
    }
}
