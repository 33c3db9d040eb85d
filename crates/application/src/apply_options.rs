use std::env;
use std::str::FromStr;

use formwork_core::{AppError, AppResult};
use serde::{Deserialize, Serialize};

/// Environment variable read by [`ApplyOptions::from_env`].
pub const ERROR_ON_PERMISSION_ENV: &str = "FORMWORK_ERROR_ON_PERMISSION";

/// Handling of submitted fields that are missing from the permitted list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionMode {
    /// Drop the field silently.
    #[default]
    None,
    /// Drop the field and log a warning. Useful while developing a form to
    /// spot inputs that are never used.
    Warn,
    /// Drop the field and record a field error.
    Fail,
}

impl PermissionMode {
    /// Returns stable configuration value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Warn => "warn",
            Self::Fail => "fail",
        }
    }
}

impl FromStr for PermissionMode {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(Self::None),
            "warn" => Ok(Self::Warn),
            "fail" => Ok(Self::Fail),
            other => Err(AppError::Configuration(format!(
                "unknown permission mode '{other}'"
            ))),
        }
    }
}

/// Options for a single application of a form definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplyOptions {
    /// How to treat submitted fields that are not permitted.
    pub error_on_permission: PermissionMode,
}

impl ApplyOptions {
    /// Creates options with the given permission mode.
    #[must_use]
    pub fn with_permission_mode(error_on_permission: PermissionMode) -> Self {
        Self {
            error_on_permission,
        }
    }

    /// Loads options from the process environment.
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> AppResult<Self> {
        let error_on_permission = lookup(ERROR_ON_PERMISSION_ENV)
            .map(|value| {
                value.parse::<PermissionMode>().map_err(|error| {
                    AppError::Configuration(format!("invalid {ERROR_ON_PERMISSION_ENV}: {error}"))
                })
            })
            .transpose()?
            .unwrap_or_default();

        Ok(Self {
            error_on_permission,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{ApplyOptions, ERROR_ON_PERMISSION_ENV, PermissionMode};

    #[test]
    fn permission_mode_parses_known_values() {
        for mode in [PermissionMode::None, PermissionMode::Warn, PermissionMode::Fail] {
            let parsed: PermissionMode = mode.as_str().parse().unwrap_or_else(|_| unreachable!());
            assert_eq!(parsed, mode);
        }
        assert_eq!(" WARN ".parse::<PermissionMode>().ok(), Some(PermissionMode::Warn));
        assert_eq!("".parse::<PermissionMode>().ok(), Some(PermissionMode::None));
        assert!("loud".parse::<PermissionMode>().is_err());
    }

    #[test]
    fn lookup_defaults_to_none_when_unset() {
        let options = ApplyOptions::from_lookup(|_| None).unwrap_or_else(|_| unreachable!());
        assert_eq!(options, ApplyOptions::default());
    }

    #[test]
    fn lookup_reads_permission_mode() {
        let options = ApplyOptions::from_lookup(|key| {
            (key == ERROR_ON_PERMISSION_ENV).then(|| "fail".to_owned())
        })
        .unwrap_or_else(|_| unreachable!());
        assert_eq!(options.error_on_permission, PermissionMode::Fail);
    }

    #[test]
    fn lookup_rejects_unknown_mode() {
        let result = ApplyOptions::from_lookup(|_| Some("sometimes".to_owned()));
        assert!(result.is_err());
    }

    #[test]
    fn options_deserialize_with_defaults() {
        let options: ApplyOptions = serde_json::from_str(r#"{"error_on_permission":"warn"}"#)
            .unwrap_or_else(|_| unreachable!());
        assert_eq!(options, ApplyOptions::with_permission_mode(PermissionMode::Warn));

        let empty: ApplyOptions = serde_json::from_str("{}").unwrap_or_else(|_| unreachable!());
        assert_eq!(empty.error_on_permission, PermissionMode::None);
    }
}
