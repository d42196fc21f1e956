//! `${VAR}` substitution applied to the raw YAML before deserialization.
//!
//! Only allowlisted variables and `ERRFLOW_*` prefixed ones are resolved.

use regex::Regex;
use std::sync::LazyLock;

/// Matches `${VAR_NAME}` or `${VAR_NAME:-default_value}`.
static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-((?:[^}\\]|\\.)*))?}")
        .expect("env-var substitution regex is a compile-time constant and must be valid")
});

/// Environment variables that config files may reference.
pub const ALLOWED_ENV_VARS: &[&str] = &[
    "HOME",
    "USER",
    "USERNAME",
    "USERPROFILE",
    "XDG_CONFIG_HOME",
    "XDG_DATA_HOME",
    "XDG_CACHE_HOME",
    "PATH",
    "TMPDIR",
    "TEMP",
    "TMP",
    "OPENAI_API_KEY",
    "OPENAI_BASE_URL",
    "GEMINI_API_KEY",
];

/// Whether `${var_name}` may be resolved from the environment.
pub fn is_env_var_allowed(var_name: &str) -> bool {
    ALLOWED_ENV_VARS.contains(&var_name) || var_name.starts_with("ERRFLOW_")
}

/// Substitute `${VAR}` patterns with environment variable values.
///
/// - Unset variables keep their placeholder unless a `:-default` is given.
/// - `$${VAR}` is an escape producing the literal `${VAR}`.
/// - Non-allowlisted variables are left as-is and a warning is logged.
pub fn substitute_variables(input: &str) -> String {
    let escaped_placeholder = "\x00ESC_DOLLAR\x00";
    let working = input.replace("$${", escaped_placeholder);

    let result = ENV_VAR_PATTERN.replace_all(&working, |caps: &regex::Captures| {
        let var_name = &caps[1];

        if !is_env_var_allowed(var_name) {
            log::warn!("Config references non-allowlisted environment variable ${{{var_name}}}, skipped");
            return caps[0].to_string();
        }

        match std::env::var(var_name) {
            Ok(val) => val,
            Err(_) => caps
                .get(2)
                .map(|m| m.as_str().replace("\\}", "}"))
                .unwrap_or_else(|| caps[0].to_string()),
        }
    });

    result.replace(escaped_placeholder, "${")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_value_for_unset_variable() {
        let out = substitute_variables("model: ${ERRFLOW_TEST_SURELY_UNSET_VAR:-gpt-4o}");
        assert_eq!(out, "model: gpt-4o");
    }

    #[test]
    fn test_unset_without_default_keeps_placeholder() {
        let out = substitute_variables("key: ${ERRFLOW_TEST_ANOTHER_UNSET_VAR}");
        assert_eq!(out, "key: ${ERRFLOW_TEST_ANOTHER_UNSET_VAR}");
    }

    #[test]
    fn test_escaped_dollar_is_literal() {
        assert_eq!(substitute_variables("x: $${HOME}"), "x: ${HOME}");
    }

    #[test]
    fn test_non_allowlisted_variable_is_untouched() {
        assert_eq!(
            substitute_variables("secret: ${AWS_SECRET_ACCESS_KEY:-nope}"),
            "secret: ${AWS_SECRET_ACCESS_KEY:-nope}"
        );
    }

    #[test]
    fn test_allowlist() {
        assert!(is_env_var_allowed("OPENAI_API_KEY"));
        assert!(is_env_var_allowed("ERRFLOW_MODEL"));
        assert!(!is_env_var_allowed("GITHUB_TOKEN"));
    }
}
