//! Renders the build configuration into the handshake platform string.
//!
//! The output format is:
//! `cfg=<hex>[ posix=<ver>][ edition=<edition>] CC=<compiler>[ <version>][ CFLAGS=<...>][ LDFLAGS=<...>]`
//! with each optional segment omitted when its source datum is absent. The
//! string is rendered in full; truncation against the live wire budget is
//! the document builder's job, not this renderer's.

use std::fmt::Write as _;

use crate::build_info::BuildInfo;

/// POSIX revision the host libc advertises, if any.
#[cfg(unix)]
#[allow(unsafe_code)]
fn posix_version() -> Option<i64> {
    // sysconf(_SC_VERSION) cannot fault; a negative result means "no answer".
    let version = unsafe { libc::sysconf(libc::_SC_VERSION) };
    (version > 0).then(|| i64::from(version))
}

#[cfg(not(unix))]
fn posix_version() -> Option<i64> {
    None
}

/// Produces the descriptive platform string for a build configuration.
///
/// Pure with respect to its input; the only ambient datum is the host's
/// POSIX revision, folded in on Unix targets.
#[must_use]
pub fn render_platform_string(build: &BuildInfo) -> String {
    let mut out = String::new();
    let _ = write!(out, "cfg=0x{:x}", build.flags);

    if let Some(posix) = posix_version() {
        let _ = write!(out, " posix={posix}");
    }

    let _ = write!(out, " edition={}", build.edition);
    let _ = write!(out, " CC={}", build.compiler);

    if let Some(version) = build.compiler_version {
        let _ = write!(out, " {version}");
    }

    if let Some(flags) = build.build_flags {
        let _ = write!(out, " CFLAGS={flags}");
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_info::ConfigFlags;

    fn build(flags: ConfigFlags, version: Option<&'static str>) -> BuildInfo {
        BuildInfo {
            compiler: "rustc",
            compiler_version: version,
            edition: "2024",
            flags,
            build_flags: None,
        }
    }

    #[test]
    fn starts_with_config_bitfield() {
        let rendered = render_platform_string(&build(ConfigFlags::TLS, None));
        assert!(rendered.starts_with("cfg=0x1"));
    }

    #[test]
    fn includes_compiler_and_version() {
        let rendered = render_platform_string(&build(
            ConfigFlags::EMPTY,
            Some("rustc 1.88.0 (6b00bc388 2025-06-23)"),
        ));
        assert!(rendered.contains("CC=rustc rustc 1.88.0"));
    }

    #[test]
    fn omits_version_segment_when_absent() {
        let rendered = render_platform_string(&build(ConfigFlags::EMPTY, None));
        assert!(rendered.ends_with("CC=rustc"));
    }

    #[test]
    fn includes_build_flags_when_present() {
        let mut info = build(ConfigFlags::EMPTY, None);
        info.build_flags = Some("-C target-cpu=native");
        let rendered = render_platform_string(&info);
        assert!(rendered.contains("CFLAGS=-C target-cpu=native"));
    }

    #[cfg(unix)]
    #[test]
    fn unix_builds_advertise_posix_revision() {
        let rendered = render_platform_string(&build(ConfigFlags::EMPTY, None));
        assert!(rendered.contains(" posix="));
    }
}
