//! Shared test utilities for config module tests.

use std::sync::Mutex;

/// Mutex to serialize environment variable tests and prevent race conditions.
pub static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Every environment variable longmem config reads.
pub const ENV_VARS: [&str; 9] = [
    "LONGMEM_STORAGE_BACKEND",
    "LONGMEM_STORAGE_ROOT",
    "LONGMEM_DATABASE_PATH",
    "LONGMEM_EMBEDDING_MODEL",
    "LONGMEM_MODEL_CACHE",
    "LONGMEM_DEDUP_THRESHOLD",
    "LONGMEM_DEDUP_MIN_MEMORIES",
    "LONGMEM_DEDUP_INTERVAL_HOURS",
    "LONGMEM_DEDUP_NEIGHBOR_LIMIT",
];

/// Clean up environment variables used by longmem config.
pub fn cleanup_env_vars() {
    for var in ENV_VARS {
        // SAFETY: callers hold ENV_MUTEX.
        unsafe { std::env::remove_var(var) };
    }
}

/// Set an environment variable for the duration of a test.
pub fn set_env(name: &str, value: &str) {
    // SAFETY: callers hold ENV_MUTEX.
    unsafe { std::env::set_var(name, value) };
}

/// Remove an environment variable for the duration of a test.
pub fn remove_env(name: &str) {
    // SAFETY: callers hold ENV_MUTEX.
    unsafe { std::env::remove_var(name) };
}
