use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[cfg(target_os = "macos")]
pub mod macos;

pub mod unsupported;

/// The one probe failure that reaches callers.
///
/// Partial capability loss inside a supported platform degrades to the
/// empty-string sentinel instead; a missing platform variant is a build
/// gap the caller should surface, not paper over.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("no activity probe implemented for platform '{0}'")]
    UnsupportedPlatform(String),
}

/// Foreground activity at a single polling instant.
///
/// Empty strings mean "no information", never a real value; callers must
/// not display them as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivitySnapshot {
    pub app_name: String,
    pub window_title: String,
    pub is_user_active: bool,
}

/// One entry from the platform's front-to-back on-screen window list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowInfo {
    pub owner_name: String,
    pub layer: i32,
    pub title: Option<String>,
}

/// Per-platform activity probe.
///
/// Every operation is best-effort: native lookup failures inside a
/// supported platform become sentinel values, and only
/// [`ProbeError::UnsupportedPlatform`] propagates.
#[async_trait]
pub trait ActivityProbe: Send + Sync {
    /// Display name of the application holding input focus, or `""`.
    async fn active_app_name(&self) -> Result<String, ProbeError>;

    /// Title of the focused application's frontmost normal window, or `""`.
    async fn active_window_title(&self) -> Result<String, ProbeError>;

    /// Whether the operator interacted with the machine recently.
    async fn is_user_active(&self) -> Result<bool, ProbeError>;

    /// All three queries in one pass.
    async fn snapshot(&self) -> Result<ActivitySnapshot, ProbeError> {
        Ok(ActivitySnapshot {
            app_name: self.active_app_name().await?,
            window_title: self.active_window_title().await?,
            is_user_active: self.is_user_active().await?,
        })
    }
}

/// Create the probe for the running operating system.
///
/// Platforms without an implementation get [`unsupported::UnsupportedProbe`],
/// whose operations all signal rather than silently returning defaults.
#[must_use]
pub fn create_probe() -> Box<dyn ActivityProbe> {
    #[cfg(target_os = "macos")]
    {
        Box::new(macos::MacProbe::new())
    }

    #[cfg(not(target_os = "macos"))]
    {
        Box::new(unsupported::UnsupportedProbe::current())
    }
}

/// Pick the title of the focused application's real visible window.
///
/// Scans the front-to-back list and takes the first window that belongs to
/// the focused app, sits on the normal layer (0), and has a non-empty
/// title. Matching windows with empty titles are skipped so the focused
/// app's invisible and utility windows do not shadow its visible one.
#[must_use]
pub fn select_window_title(app_name: &str, windows: &[WindowInfo]) -> Option<String> {
    windows.iter().find_map(|window| {
        if window.owner_name != app_name || window.layer != 0 {
            return None;
        }
        match &window.title {
            Some(title) if !title.is_empty() => Some(title.clone()),
            _ => None,
        }
    })
}

/// Resolve a window title for `app_name`, skipping enumeration entirely
/// when the app name is already unknown.
pub fn window_title_for<F>(app_name: &str, enumerate: F) -> String
where
    F: FnOnce() -> Option<Vec<WindowInfo>>,
{
    if app_name.is_empty() {
        return String::new();
    }
    enumerate()
        .and_then(|windows| select_window_title(app_name, &windows))
        .unwrap_or_default()
}
