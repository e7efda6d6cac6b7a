//! Command-line handling for the load generator.

use std::time::Duration;

/// Run length used when the argument is missing or unparseable.
pub const DEFAULT_DURATION: Duration = Duration::from_secs(300);

/// Interpret the single positional argument as a run length in seconds.
///
/// Falls back to [`DEFAULT_DURATION`] with a warning when the argument is
/// absent or is not a non-negative integer.
#[must_use]
pub fn parse_duration_arg(arg: Option<&str>) -> Duration {
    let Some(raw) = arg else {
        tracing::warn!(
            default_secs = DEFAULT_DURATION.as_secs(),
            "no duration given, using default"
        );
        return DEFAULT_DURATION;
    };
    match raw.trim().parse::<u64>() {
        Ok(secs) => Duration::from_secs(secs),
        Err(err) => {
            tracing::warn!(
                argument = raw,
                error = %err,
                default_secs = DEFAULT_DURATION.as_secs(),
                "invalid duration, using default"
            );
            DEFAULT_DURATION
        }
    }
}
