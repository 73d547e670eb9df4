//! Environment variable expansion for configuration strings.
//!
//! Only the braced forms are expanded:
//! - `${VAR}` - value of VAR, error if unset
//! - `${VAR:-default}` - value of VAR, or `default` if unset
//!
//! Strings without `${` are returned unchanged, so a bare `$` in a title
//! needs no escaping.

use std::env::VarError;

use crate::ConfigError;

/// Expand `${...}` references in `value`.
///
/// `field` names the config key in error messages (e.g. `locales./en/.title`).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, ConfigError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| std::env::var(var).map(Some))
        .map(std::borrow::Cow::into_owned)
        .map_err(|e| ConfigError::EnvVar {
            field: field.to_owned(),
            message: match e.cause {
                VarError::NotPresent => format!("${{{}}} not set", e.var_name),
                VarError::NotUnicode(_) => format!("${{{}}} is not valid UTF-8", e.var_name),
            },
        })
}

/// Expand an owned string field in place.
pub(crate) fn expand_field(value: &mut String, field: &str) -> Result<(), ConfigError> {
    *value = expand_env(value, field)?;
    Ok(())
}

/// Expand an optional string field in place.
pub(crate) fn expand_optional(value: &mut Option<String>, field: &str) -> Result<(), ConfigError> {
    if let Some(inner) = value {
        expand_field(inner, field)?;
    }
    Ok(())
}
