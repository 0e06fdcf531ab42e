//! Structured logging setup using `tracing-subscriber`.
//!
//! Both binaries log to stderr. `RUST_LOG` takes precedence over the
//! configured level. Under Lambda, ANSI colours and timestamps are turned
//! off since CloudWatch stamps every line itself.

use tracing_subscriber::EnvFilter;

use crate::config::LogFormat;

/// Set by the Lambda execution environment.
const LAMBDA_FUNCTION_ENV: &str = "AWS_LAMBDA_FUNCTION_NAME";

/// Initialise the global subscriber.
///
/// Safe to call more than once; later calls are no-ops.
pub fn init(log_level: &str, format: LogFormat) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    let in_lambda = std::env::var_os(LAMBDA_FUNCTION_ENV).is_some();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(!in_lambda)
        .with_target(false);

    let result = match (format, in_lambda) {
        (LogFormat::Json, true) => builder.json().without_time().try_init(),
        (LogFormat::Json, false) => builder.json().try_init(),
        (LogFormat::Text, true) => builder.without_time().try_init(),
        (LogFormat::Text, false) => builder.try_init(),
    };

    if result.is_err() {
        tracing::debug!("Global tracing subscriber already installed.");
    }
}
