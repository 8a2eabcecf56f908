//! Identity resolution for the command-line front end.

use std::env;

/// Identity used when nothing else is available.
pub const DEFAULT_IDENTITY: &str = "default";

/// Resolve the identity whose memories the CLI operates on.
///
/// Detection priority (checked in order):
/// 1. Explicit override parameter (if provided and non-whitespace)
/// 2. `LONGMEM_USER` environment variable (if set and non-whitespace)
/// 3. The operating-system user (`USER`, then `USERNAME`)
/// 4. `"default"`
///
/// The result is opaque to the store: it only selects a storage location and
/// is never written in clear.
///
/// # Example
/// ```no_run
/// use longmem::detect_identity;
///
/// assert_eq!(detect_identity(Some("alice")), "alice");
/// println!("Acting as: {}", detect_identity(None));
/// ```
pub fn detect_identity(explicit: Option<&str>) -> String {
    if let Some(identity) = explicit.and_then(non_blank) {
        return identity;
    }

    ["LONGMEM_USER", "USER", "USERNAME"]
        .iter()
        .find_map(|name| env::var(name).ok().as_deref().and_then(non_blank))
        .unwrap_or_else(|| DEFAULT_IDENTITY.to_string())
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::tests_utils::{remove_env, set_env, ENV_MUTEX};

    fn with_env<F: FnOnce()>(vars: &[(&str, Option<&str>)], test: F) {
        let _guard = ENV_MUTEX.lock().unwrap();
        let saved: Vec<(String, Option<String>)> = vars
            .iter()
            .map(|(name, _)| (name.to_string(), env::var(name).ok()))
            .collect();
        for (name, value) in vars {
            match value {
                Some(v) => set_env(name, v),
                None => remove_env(name),
            }
        }

        test();

        for (name, value) in saved {
            match value {
                Some(v) => set_env(&name, &v),
                None => remove_env(&name),
            }
        }
    }

    #[test]
    fn test_explicit_override() {
        assert_eq!(detect_identity(Some("alice")), "alice");
        assert_eq!(detect_identity(Some("  alice  ")), "alice");
    }

    #[test]
    fn test_blank_override_falls_back_to_env() {
        with_env(&[("LONGMEM_USER", Some("from-env"))], || {
            assert_eq!(detect_identity(Some("   \t ")), "from-env");
        });
    }

    #[test]
    fn test_env_beats_os_user() {
        with_env(
            &[("LONGMEM_USER", Some("from-env")), ("USER", Some("os-user"))],
            || assert_eq!(detect_identity(None), "from-env"),
        );
    }

    #[test]
    fn test_os_user_fallback() {
        with_env(
            &[
                ("LONGMEM_USER", None),
                ("USER", None),
                ("USERNAME", Some("win-user")),
            ],
            || assert_eq!(detect_identity(None), "win-user"),
        );
    }

    #[test]
    fn test_default_when_nothing_set() {
        with_env(
            &[("LONGMEM_USER", Some("  ")), ("USER", None), ("USERNAME", None)],
            || assert_eq!(detect_identity(None), DEFAULT_IDENTITY),
        );
    }
}
