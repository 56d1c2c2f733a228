//! The client metadata record carried in every handshake.
//!
//! [`ClientMetadata`] owns the strings that describe the driver, the host
//! OS and the build configuration. Population clamps every field to its
//! wire limit, so the per-field invariants hold from the moment a record
//! exists; the one exception is `platform`, which is stored in full and
//! trimmed against the live budget at serialization or override time.

use serde::Serialize;

use platform::OsInfo;

use crate::limits::{
    DRIVER_NAME_MAX, DRIVER_VERSION_MAX, OS_ARCHITECTURE_MAX, OS_NAME_MAX, OS_TYPE_MAX,
    OS_VERSION_MAX,
};
use crate::truncate::truncate_to_boundary;

/// Default driver name advertised to servers.
pub const DRIVER_NAME: &str = "docdb-rs";

/// Driver version advertised to servers, taken from the crate version.
pub const DRIVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Snapshot of the client identity sent during connection negotiation.
///
/// Invariant: every field except `platform` is at most its `*_MAX` limit
/// (see [`crate::limits`]) whenever the record was produced by
/// [`ClientMetadata::collect`] or extended through
/// [`HandshakeContext::apply_overrides`](crate::HandshakeContext::apply_overrides).
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ClientMetadata {
    /// Broad OS family; `"unknown"` when undetected.
    pub os_type: String,
    /// OS name, when the platform reports one.
    pub os_name: Option<String>,
    /// OS version, when the platform reports one.
    pub os_version: Option<String>,
    /// Hardware architecture, when the platform reports one.
    pub os_architecture: Option<String>,
    /// Driver name, optionally extended by a wrapping library's override.
    pub driver_name: String,
    /// Driver version, optionally extended by a wrapping library's override.
    pub driver_version: String,
    /// Build-configuration descriptor; stored unclamped, budgeted on the
    /// way out.
    pub platform: Option<String>,
}

fn clamp(value: &str, max: usize) -> String {
    truncate_to_boundary(value, max).to_owned()
}

fn clamp_opt(value: Option<&str>, max: usize) -> Option<String> {
    value.map(|v| clamp(v, max))
}

impl ClientMetadata {
    /// Populates a record from detected OS facts, the rendered platform
    /// string and the driver's own identity, clamping each bounded field
    /// to its wire limit.
    #[must_use]
    pub fn collect(os: &OsInfo, platform_string: Option<&str>) -> Self {
        Self {
            os_type: clamp(&os.os_type, OS_TYPE_MAX),
            os_name: clamp_opt(os.os_name.as_deref(), OS_NAME_MAX),
            os_version: clamp_opt(os.os_version.as_deref(), OS_VERSION_MAX),
            os_architecture: clamp_opt(os.os_architecture.as_deref(), OS_ARCHITECTURE_MAX),
            driver_name: clamp(DRIVER_NAME, DRIVER_NAME_MAX),
            driver_version: clamp(DRIVER_VERSION, DRIVER_VERSION_MAX),
            platform: platform_string.map(str::to_owned),
        }
    }

    /// Combined byte length of every bounded field, the quantity the
    /// dynamic platform-override budget is computed against.
    #[must_use]
    pub(crate) fn bounded_fields_len(&self) -> usize {
        let opt_len = |v: &Option<String>| v.as_deref().map_or(0, str::len);
        self.os_type.len()
            + opt_len(&self.os_name)
            + opt_len(&self.os_version)
            + opt_len(&self.os_architecture)
            + self.driver_name.len()
            + self.driver_version.len()
    }
}
