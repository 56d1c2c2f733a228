//! Build-configuration facts advertised through the handshake.
//!
//! The handshake platform string carries a `cfg=<hex>` bitfield describing
//! which optional capabilities were compiled in, followed by the compiler
//! identity and any user-supplied build flags. [`ConfigFlags`] is the typed
//! view of that bitfield; [`BuildInfo`] bundles it with the compiler facts
//! recorded by this crate's build script.

use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::Serialize;

/// Typed view of the build-configuration bitfield.
///
/// Each bit records one optional capability compiled into the driver. The
/// raw value is rendered as `cfg=<hex>` in the platform string, so bit
/// positions are wire-stable: new capabilities append, existing ones never
/// move.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ConfigFlags(u32);

impl ConfigFlags {
    /// No optional capabilities compiled in.
    pub const EMPTY: Self = Self(0);
    /// TLS transport support.
    pub const TLS: Self = Self(1 << 0);
    /// zstd wire compression.
    pub const COMPRESS_ZSTD: Self = Self(1 << 1);
    /// snappy wire compression.
    pub const COMPRESS_SNAPPY: Self = Self(1 << 2);
    /// SASL authentication mechanisms.
    pub const SASL: Self = Self(1 << 3);

    /// Collects the bitfield for the current build's feature selection.
    #[must_use]
    pub const fn from_build() -> Self {
        let mut bits = 0;
        if cfg!(feature = "tls") {
            bits |= Self::TLS.0;
        }
        if cfg!(feature = "compress-zstd") {
            bits |= Self::COMPRESS_ZSTD.0;
        }
        if cfg!(feature = "compress-snappy") {
            bits |= Self::COMPRESS_SNAPPY.0;
        }
        if cfg!(feature = "sasl") {
            bits |= Self::SASL.0;
        }
        Self(bits)
    }

    /// Returns the raw bit pattern.
    #[must_use]
    pub const fn bits(self) -> u32 {
        self.0
    }

    /// Reports whether every bit in `other` is set in `self`.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for ConfigFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for ConfigFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ConfigFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self(self.0 & rhs.0)
    }
}

impl fmt::LowerHex for ConfigFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::LowerHex::fmt(&self.0, f)
    }
}

/// Compiler and build-flag identity captured at compile time.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BuildInfo {
    /// Compiler family, always `"rustc"` for this implementation.
    pub compiler: &'static str,
    /// Full `rustc --version` line, absent if the build script could not
    /// invoke the compiler.
    pub compiler_version: Option<&'static str>,
    /// Language edition the workspace compiles under.
    pub edition: &'static str,
    /// Capability bitfield for this build.
    pub flags: ConfigFlags,
    /// `RUSTFLAGS` in effect at build time, absent when empty.
    pub build_flags: Option<&'static str>,
}

fn non_empty(value: &'static str) -> Option<&'static str> {
    if value.is_empty() { None } else { Some(value) }
}

impl BuildInfo {
    /// Captures the build configuration of the running binary.
    #[must_use]
    pub fn capture() -> Self {
        Self {
            compiler: "rustc",
            compiler_version: non_empty(env!("PLATFORM_RUSTC_VERSION")),
            edition: "2024",
            flags: ConfigFlags::from_build(),
            build_flags: non_empty(env!("PLATFORM_RUSTFLAGS")),
        }
    }
}
