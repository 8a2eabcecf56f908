//! Environment variable parsing utilities for configuration.

use crate::errors::Error;
use std::path::PathBuf;
use std::str::FromStr;

use super::paths;

/// Reject empty or whitespace-only values.
fn non_blank<'a>(name: &str, value: &'a str) -> Result<&'a str, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Config(format!("{name} cannot be empty")));
    }
    Ok(trimmed)
}

/// Parse environment variable value as a string.
pub fn parse_env_string(name: &str, value: &str) -> Result<String, Error> {
    Ok(non_blank(name, value)?.to_string())
}

/// Parse environment variable as a path, expanding tilde.
pub fn parse_env_path(name: &str, value: &str) -> Result<PathBuf, Error> {
    let value = non_blank(name, value)?;
    Ok(paths::expand_tilde_path(&PathBuf::from(value)))
}

/// Parse environment variable as any `FromStr` value. Range checks happen in validation.
pub fn parse_env_value<T>(name: &str, value: &str) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    non_blank(name, value)?
        .parse()
        .map_err(|e| Error::Config(format!("Invalid {name} value: {e}")))
}

/// Read `name` and, when set, overwrite `target` with the parsed value.
pub fn apply_override<T>(
    name: &str,
    target: &mut T,
    parse: fn(&str, &str) -> Result<T, Error>,
) -> Result<(), Error> {
    if let Ok(val) = std::env::var(name) {
        *target = parse(name, &val)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_string_empty() {
        let result = parse_env_string("TEST_VAR", "");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_env_string_whitespace() {
        let result = parse_env_string("TEST_VAR", "   ");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_env_string_valid() {
        assert_eq!(parse_env_string("TEST_VAR", "valid").unwrap(), "valid");
    }

    #[test]
    fn test_parse_env_float_invalid() {
        let result = parse_env_value::<f64>("TEST_FLOAT", "invalid");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_env_float_valid() {
        assert_eq!(parse_env_value::<f64>("TEST_FLOAT", " 0.5 ").unwrap(), 0.5);
    }

    #[test]
    fn test_parse_env_usize_rejects_negative() {
        let result = parse_env_value::<usize>("TEST_COUNT", "-1");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_parse_env_path_absolute() {
        assert_eq!(
            parse_env_path("TEST_PATH", "/var/lib/longmem").unwrap(),
            PathBuf::from("/var/lib/longmem")
        );
    }
}
