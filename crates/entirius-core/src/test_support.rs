use std::sync::Mutex;

// Shared lock for tests that touch ENTIRIUS_CONFIG or other process-wide environment variables.
pub static ENV_LOCK: Mutex<()> = Mutex::new(());
