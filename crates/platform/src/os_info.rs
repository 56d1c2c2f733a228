//! Operating-system identity for the handshake document.
//!
//! The server only requires the OS family; name, version and architecture
//! are best-effort. On Unix all three come from `uname(2)`. On other targets
//! the answers are derived from compile-time target facts, with absent
//! fields left as `None` rather than guessed.

use serde::Serialize;

/// Operating-system facts gathered at client start-up.
///
/// `os_type` is always present and falls back to `"unknown"` on targets the
/// driver has no mapping for. The optional fields are reported verbatim as
/// the platform supplied them; the handshake record clamps them to their
/// wire limits when it takes ownership.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct OsInfo {
    /// Broad OS family, e.g. `"Linux"`, `"Darwin"`, `"Windows"`.
    pub os_type: String,
    /// Kernel or product name as reported by the platform.
    pub os_name: Option<String>,
    /// Kernel release or product version.
    pub os_version: Option<String>,
    /// Hardware architecture, e.g. `"x86_64"`.
    pub os_architecture: Option<String>,
}

/// Broad OS family derived from the compilation target.
const fn os_type() -> &'static str {
    if cfg!(target_os = "linux") {
        "Linux"
    } else if cfg!(target_os = "macos") {
        "Darwin"
    } else if cfg!(windows) {
        "Windows"
    } else if cfg!(any(
        target_os = "freebsd",
        target_os = "netbsd",
        target_os = "openbsd",
        target_os = "dragonfly"
    )) {
        "BSD"
    } else if cfg!(unix) {
        "Unix"
    } else {
        "unknown"
    }
}

impl OsInfo {
    /// Gathers OS identity from the running system.
    ///
    /// Never fails: a syscall error leaves the affected optional fields
    /// absent and emits a diagnostic, mirroring the driver's policy that
    /// metadata assembly must not block a connection.
    #[must_use]
    pub fn detect() -> Self {
        let mut info = Self {
            os_type: os_type().to_string(),
            ..Self::default()
        };
        fill_from_system(&mut info);
        info
    }
}

#[cfg(unix)]
fn fill_from_system(info: &mut OsInfo) {
    match nix::sys::utsname::uname() {
        Ok(uts) => {
            info.os_name = uts.sysname().to_str().map(str::to_owned);
            info.os_version = uts.release().to_str().map(str::to_owned);
            info.os_architecture = uts.machine().to_str().map(str::to_owned);
        }
        Err(errno) => {
            tracing::warn!(%errno, "uname failed; omitting os name/version/architecture");
        }
    }
}

#[cfg(windows)]
fn fill_from_system(info: &mut OsInfo) {
    info.os_name = Some("Windows".to_string());
    info.os_architecture = target_architecture().map(str::to_owned);
}

#[cfg(not(any(unix, windows)))]
fn fill_from_system(info: &mut OsInfo) {
    info.os_architecture = target_architecture().map(str::to_owned);
}

#[cfg(not(unix))]
fn target_architecture() -> Option<&'static str> {
    if cfg!(target_arch = "x86_64") {
        Some("x86_64")
    } else if cfg!(target_arch = "aarch64") {
        Some("aarch64")
    } else if cfg!(target_arch = "x86") {
        Some("x86")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn os_type_is_always_present() {
        let info = OsInfo::detect();
        assert!(!info.os_type.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn unix_detection_reports_uname_fields() {
        let info = OsInfo::detect();
        assert!(info.os_name.is_some());
        assert!(info.os_version.is_some());
        assert!(info.os_architecture.is_some());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn linux_family_is_linux() {
        assert_eq!(OsInfo::detect().os_type, "Linux");
    }

    #[test]
    fn serializes_to_json() {
        let info = OsInfo {
            os_type: "Linux".to_string(),
            os_name: Some("Linux".to_string()),
            os_version: None,
            os_architecture: Some("x86_64".to_string()),
        };
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["os_type"], "Linux");
        assert!(json["os_version"].is_null());
    }
}
