use async_trait::async_trait;

use super::{ActivityProbe, ProbeError};

/// Probe variant for operating systems with no implementation.
///
/// Every operation signals [`ProbeError::UnsupportedPlatform`] instead of
/// returning sentinel values; silently pretending support would mislead
/// the scheduler about coverage.
pub struct UnsupportedProbe {
    os: String,
}

impl UnsupportedProbe {
    #[must_use]
    pub fn new(os: &str) -> Self {
        Self { os: os.to_string() }
    }

    /// Probe tagged with the running operating system's identifier.
    #[must_use]
    pub fn current() -> Self {
        Self::new(std::env::consts::OS)
    }

    fn unsupported(&self) -> ProbeError {
        ProbeError::UnsupportedPlatform(self.os.clone())
    }
}

#[async_trait]
impl ActivityProbe for UnsupportedProbe {
    async fn active_app_name(&self) -> Result<String, ProbeError> {
        Err(self.unsupported())
    }

    async fn active_window_title(&self) -> Result<String, ProbeError> {
        Err(self.unsupported())
    }

    async fn is_user_active(&self) -> Result<bool, ProbeError> {
        Err(self.unsupported())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_every_operation_signals_unsupported() {
        let probe = UnsupportedProbe::new("plan9");
        let expected = ProbeError::UnsupportedPlatform("plan9".to_string());

        assert_eq!(probe.active_app_name().await, Err(expected.clone()));
        assert_eq!(probe.active_window_title().await, Err(expected.clone()));
        assert_eq!(probe.is_user_active().await, Err(expected.clone()));
        assert_eq!(probe.snapshot().await, Err(expected));
    }

    #[tokio::test]
    async fn test_current_reports_the_running_os() {
        let probe = UnsupportedProbe::current();
        let Err(ProbeError::UnsupportedPlatform(os)) = probe.active_app_name().await else {
            panic!("expected UnsupportedPlatform");
        };
        assert_eq!(os, std::env::consts::OS);
    }
}
