use std::time::Duration;

/// Idle time below this many seconds means the user is active (strict `<`).
pub const IDLE_THRESHOLD_SECS: f64 = 5.0;

/// Hard cap on the external idle-time query so a wedged native subsystem
/// can never stall the caller's poll cycle.
pub const IDLE_QUERY_TIMEOUT: Duration = Duration::from_secs(1);

const NANOS_PER_SEC: f64 = 1_000_000_000.0;

/// One reading of the platform idle counter.
///
/// `reliable` is false when the source answered but the reading cannot be
/// trusted (e.g. the reporting shape changed under a locked screen).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IdleMeasurement {
    pub idle_secs: f64,
    pub reliable: bool,
}

impl IdleMeasurement {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn from_nanos(nanos: u64) -> Self {
        Self {
            idle_secs: nanos as f64 / NANOS_PER_SEC,
            reliable: true,
        }
    }
}

/// Fold an idle reading into the activity verdict.
///
/// Fails open: no reading, or an unreliable one, counts as active. A wrong
/// "active" wastes one capture; a wrong "idle" silently loses data.
#[must_use]
pub fn user_active_verdict(measurement: Option<IdleMeasurement>) -> bool {
    match measurement {
        Some(m) if m.reliable => m.idle_secs < IDLE_THRESHOLD_SECS,
        _ => true,
    }
}

/// Extract the `HIDIdleTime` nanosecond counter from `ioreg` output.
///
/// Scans for the first line mentioning the key and parses everything after
/// the last `=`. Returns `None` when the key is absent (ioreg drops it
/// while the screen is locked) or the value does not parse.
#[must_use]
pub fn parse_hid_idle_nanos(ioreg_output: &str) -> Option<u64> {
    for line in ioreg_output.lines() {
        if line.contains("HIDIdleTime") {
            return line.rsplit('=').next()?.trim().parse::<u64>().ok();
        }
    }
    None
}
