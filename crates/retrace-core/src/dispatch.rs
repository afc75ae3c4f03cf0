use std::sync::OnceLock;

use crate::probe::{create_probe, ActivityProbe, ActivitySnapshot, ProbeError};

static PROBE: OnceLock<Box<dyn ActivityProbe>> = OnceLock::new();

/// The process-wide probe, resolved on first use and immutable after.
fn probe() -> &'static dyn ActivityProbe {
    PROBE
        .get_or_init(|| {
            log::debug!("resolving activity probe for '{}'", std::env::consts::OS);
            create_probe()
        })
        .as_ref()
}

/// Name of the focused application.
///
/// # Errors
///
/// Returns [`ProbeError::UnsupportedPlatform`] when the running OS has no
/// probe implementation.
pub async fn active_app_name() -> Result<String, ProbeError> {
    probe().active_app_name().await
}

/// Title of the focused application's frontmost normal window.
///
/// # Errors
///
/// Returns [`ProbeError::UnsupportedPlatform`] when the running OS has no
/// probe implementation.
pub async fn active_window_title() -> Result<String, ProbeError> {
    probe().active_window_title().await
}

/// Whether the operator interacted with the machine recently.
///
/// # Errors
///
/// Returns [`ProbeError::UnsupportedPlatform`] when the running OS has no
/// probe implementation.
pub async fn is_user_active() -> Result<bool, ProbeError> {
    probe().is_user_active().await
}

/// All three queries in one pass.
///
/// # Errors
///
/// Returns [`ProbeError::UnsupportedPlatform`] when the running OS has no
/// probe implementation.
pub async fn snapshot() -> Result<ActivitySnapshot, ProbeError> {
    probe().snapshot().await
}

#[cfg(test)]
mod tests {
    use super::*;

    // The resolved variant depends on the host; only the unsupported
    // contract can be asserted portably.
    #[cfg(not(target_os = "macos"))]
    #[tokio::test]
    async fn test_unsupported_host_signals_on_every_query() {
        assert!(matches!(
            active_app_name().await,
            Err(ProbeError::UnsupportedPlatform(_))
        ));
        assert!(matches!(
            active_window_title().await,
            Err(ProbeError::UnsupportedPlatform(_))
        ));
        assert!(matches!(
            is_user_active().await,
            Err(ProbeError::UnsupportedPlatform(_))
        ));
        assert!(matches!(
            snapshot().await,
            Err(ProbeError::UnsupportedPlatform(_))
        ));
    }

    #[test]
    fn test_probe_resolves_once() {
        let first: *const dyn ActivityProbe = probe();
        let second: *const dyn ActivityProbe = probe();
        assert!(std::ptr::eq(first.cast::<()>(), second.cast::<()>()));
    }
}
