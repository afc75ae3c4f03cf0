use async_trait::async_trait;
use cocoa::base::{id, nil};
use cocoa::foundation::NSAutoreleasePool;
use core_foundation::array::{CFArray, CFArrayRef};
use core_foundation::base::{CFType, TCFType};
use core_foundation::dictionary::CFDictionary;
use core_foundation::number::CFNumber;
use core_foundation::string::CFString;
use objc::{class, msg_send, sel, sel_impl};
use tokio::process::Command;
use tokio::time::timeout;

use super::{window_title_for, ActivityProbe, ProbeError, WindowInfo};
use crate::idle::{self, IdleMeasurement, IDLE_QUERY_TIMEOUT};

#[link(name = "CoreGraphics", kind = "framework")]
extern "C" {
    fn CGWindowListCopyWindowInfo(option: u32, relative_to_window: u32) -> CFArrayRef;
}

const K_CG_WINDOW_LIST_OPTION_ON_SCREEN_ONLY: u32 = 1;
const K_CG_NULL_WINDOW_ID: u32 = 0;

/// Which native subsystems answered at startup.
///
/// Checked once in `MacProbe::new`; operations consult the record instead
/// of re-probing on every call. Each capability degrades exactly one
/// snapshot field when absent.
struct Capabilities {
    workspace: bool,
    window_list: bool,
    idle_counter: bool,
}

impl Capabilities {
    fn detect() -> Self {
        // AppKit and CoreGraphics are linked at build time, so the focus
        // and window-list facilities are present whenever this variant
        // compiles. The idle counter rides on the external ioreg tool.
        let idle_counter = which::which("ioreg").is_ok();
        if !idle_counter {
            log::warn!("ioreg not found on PATH; idle detection degrades to always-active");
        }
        Self {
            workspace: true,
            window_list: true,
            idle_counter,
        }
    }
}

/// macOS activity probe: NSWorkspace for focus, the CGWindow list for
/// titles, the IOKit HID idle counter for activity.
pub struct MacProbe {
    caps: Capabilities,
}

impl MacProbe {
    #[must_use]
    pub fn new() -> Self {
        Self {
            caps: Capabilities::detect(),
        }
    }

    /// Display name of the frontmost application, or `""`.
    fn frontmost_app_name() -> String {
        unsafe {
            let _pool = NSAutoreleasePool::new(nil);

            let workspace: id = msg_send![class!(NSWorkspace), sharedWorkspace];
            let frontmost: id = msg_send![workspace, frontmostApplication];
            if frontmost == nil {
                return String::new();
            }

            let name: id = msg_send![frontmost, localizedName];
            nsstring_to_string(name).unwrap_or_default()
        }
    }

    /// On-screen windows front-to-back, reduced to the fields the
    /// selection rule needs. `None` when the window server does not answer.
    fn on_screen_windows() -> Option<Vec<WindowInfo>> {
        unsafe {
            let list_ref = CGWindowListCopyWindowInfo(
                K_CG_WINDOW_LIST_OPTION_ON_SCREEN_ONLY,
                K_CG_NULL_WINDOW_ID,
            );
            if list_ref.is_null() {
                log::warn!("CGWindowListCopyWindowInfo returned no window list");
                return None;
            }

            let list: CFArray<CFDictionary> = CFArray::wrap_under_create_rule(list_ref);
            let owner_key = CFString::from_static_string("kCGWindowOwnerName");
            let layer_key = CFString::from_static_string("kCGWindowLayer");
            let title_key = CFString::from_static_string("kCGWindowName");

            let mut windows = Vec::new();
            for i in 0..list.len() {
                let Some(info) = list.get(i) else { continue };

                let owner_name = dict_string(&info, &owner_key).unwrap_or_default();
                let layer = dict_i32(&info, &layer_key).unwrap_or(-1);
                let title = dict_string(&info, &title_key);

                windows.push(WindowInfo {
                    owner_name,
                    layer,
                    title,
                });
            }
            Some(windows)
        }
    }

    /// One reading of the HID idle counter, `None` on any failure.
    ///
    /// `ioreg` runs as a short-lived subprocess under a hard 1 second cap;
    /// the scheduler must never wait on a wedged IOKit.
    async fn query_idle(&self) -> Option<IdleMeasurement> {
        if !self.caps.idle_counter {
            return None;
        }

        let invocation = Command::new("ioreg")
            .args(["-c", "IOHIDSystem", "-r", "-k", "HIDIdleTime"])
            .kill_on_drop(true)
            .output();

        let output = match timeout(IDLE_QUERY_TIMEOUT, invocation).await {
            Ok(Ok(output)) => output,
            Ok(Err(err)) => {
                log::warn!("ioreg invocation failed ({err}); assuming user is active");
                return None;
            }
            Err(_) => {
                log::warn!(
                    "ioreg timed out after {IDLE_QUERY_TIMEOUT:?}; assuming user is active"
                );
                return None;
            }
        };

        if !output.status.success() {
            log::warn!(
                "ioreg exited with {}; assuming user is active",
                output.status
            );
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        match idle::parse_hid_idle_nanos(&stdout) {
            Some(nanos) => Some(IdleMeasurement::from_nanos(nanos)),
            None => {
                // ioreg drops the key while the screen is locked
                log::warn!("HIDIdleTime missing from ioreg output; assuming user is active");
                None
            }
        }
    }
}

impl Default for MacProbe {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActivityProbe for MacProbe {
    async fn active_app_name(&self) -> Result<String, ProbeError> {
        if !self.caps.workspace {
            return Ok(String::new());
        }
        Ok(Self::frontmost_app_name())
    }

    async fn active_window_title(&self) -> Result<String, ProbeError> {
        if !self.caps.window_list {
            return Ok(String::new());
        }
        let app_name = self.active_app_name().await?;
        Ok(window_title_for(&app_name, Self::on_screen_windows))
    }

    async fn is_user_active(&self) -> Result<bool, ProbeError> {
        Ok(idle::user_active_verdict(self.query_idle().await))
    }
}

/// Bridge an NSString to an owned Rust string.
unsafe fn nsstring_to_string(ns_string: id) -> Option<String> {
    if ns_string.is_null() {
        return None;
    }
    let utf8: *const std::os::raw::c_char = msg_send![ns_string, UTF8String];
    if utf8.is_null() {
        return None;
    }
    Some(
        std::ffi::CStr::from_ptr(utf8)
            .to_string_lossy()
            .into_owned(),
    )
}

fn dict_string(dict: &CFDictionary, key: &CFString) -> Option<String> {
    dict.find(key.as_CFTypeRef() as *const _)
        .map(|value| unsafe { CFType::wrap_under_get_rule(value.cast()) })
        .and_then(|value| value.downcast::<CFString>())
        .map(|value| value.to_string())
}

fn dict_i32(dict: &CFDictionary, key: &CFString) -> Option<i32> {
    dict.find(key.as_CFTypeRef() as *const _)
        .map(|value| unsafe { CFType::wrap_under_get_rule(value.cast()) })
        .and_then(|value| value.downcast::<CFNumber>())
        .and_then(|value| value.to_i32())
}
