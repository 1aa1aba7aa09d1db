use tracing_subscriber::EnvFilter;

use crate::error::{AdminError, Result};

/// Logs go to stderr so command output on stdout stays scriptable.
pub fn init(level: &str) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(format!(
            "carbonboard_admin={level},client={level},engine={level}"
        )))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| AdminError::Logging(err.to_string()))
}
