//! Configuration utility functions
//!
//! Helpers for reading override values from environment variables. Each
//! returns `None` when the variable is unset or its value is unusable, so the
//! caller keeps whatever the settings file said.

use std::path::PathBuf;
use std::str::FromStr;

/// Get a path value from an environment variable (empty values are ignored)
pub fn env_path(key: &str) -> Option<PathBuf> {
    std::env::var_os(key)
        .filter(|val| !val.is_empty())
        .map(PathBuf::from)
}

/// Get a boolean value from an environment variable
///
/// Accepts `true/1/on/yes` and `false/0/off/no`, case-insensitively.
pub fn env_bool(key: &str) -> Option<bool> {
    let val = std::env::var(key).ok()?;
    let parsed = parse_bool(&val);
    if parsed.is_none() {
        log::warn!("Ignoring {key}={val}: expected a boolean");
    }
    parsed
}

/// Get a value of any parsable type from an environment variable
pub fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    let val = std::env::var(key).ok()?;
    match val.trim().parse() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            log::warn!("Ignoring {key}={val}: invalid value");
            None
        }
    }
}

/// Parses the boolean spellings accepted in overrides and on the command line.
pub fn parse_bool(val: &str) -> Option<bool> {
    match val.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "on" | "yes" => Some(true),
        "false" | "0" | "off" | "no" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_spellings() {
        for yes in ["true", "1", "ON", "Yes"] {
            assert_eq!(parse_bool(yes), Some(true), "{yes}");
        }
        for no in ["false", "0", "off", "NO"] {
            assert_eq!(parse_bool(no), Some(false), "{no}");
        }
        assert_eq!(parse_bool("maybe"), None);
    }

    #[test]
    fn test_env_helpers_read_variables() {
        // Variable names are unique to this test to avoid cross-test races.
        unsafe {
            std::env::set_var("SONOVID_TEST_UTILS_BOOL", "off");
            std::env::set_var("SONOVID_TEST_UTILS_NUM", "8");
            std::env::set_var("SONOVID_TEST_UTILS_BAD", "eight");
            std::env::set_var("SONOVID_TEST_UTILS_PATH", "/tmp/x");
        }

        assert_eq!(env_bool("SONOVID_TEST_UTILS_BOOL"), Some(false));
        assert_eq!(env_parse::<usize>("SONOVID_TEST_UTILS_NUM"), Some(8));
        assert_eq!(env_parse::<usize>("SONOVID_TEST_UTILS_BAD"), None);
        assert_eq!(env_path("SONOVID_TEST_UTILS_PATH"), Some(PathBuf::from("/tmp/x")));
        assert_eq!(env_path("SONOVID_TEST_UTILS_UNSET"), None);

        unsafe {
            std::env::remove_var("SONOVID_TEST_UTILS_BOOL");
            std::env::remove_var("SONOVID_TEST_UTILS_NUM");
            std::env::remove_var("SONOVID_TEST_UTILS_BAD");
            std::env::remove_var("SONOVID_TEST_UTILS_PATH");
        }
    }
}
