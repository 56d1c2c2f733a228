//! Process-wide handshake metadata context.
//!
//! # Overview
//!
//! Exactly one [`HandshakeContext`] exists per client-library handle. The
//! process-level handle constructs it at start-up and passes it by shared
//! reference into every connection-establishment call site, so there is no
//! hidden global and tests can run any number of independent contexts.
//!
//! # Concurrency
//!
//! The record lives behind an [`RwLock`] together with its frozen flag.
//! [`HandshakeContext::apply_overrides`] holds the write lock across its
//! entire check-frozen, mutate, freeze sequence, so two racing override
//! attempts serialize: one wins, the other observes
//! [`HandshakeError::AlreadyFrozen`]. Document builds snapshot under the
//! read lock and can therefore never see a partially applied override.
//!
//! # Lifecycle
//!
//! Construction populates the record, unfrozen; dropping the last reference
//! releases every owned string. Freezing
//! happens exactly once, inside the single permitted override, and is never
//! undone during a run.

use std::sync::RwLock;

use platform::{BuildInfo, OsInfo, render_platform_string};

use crate::document::{HandshakeDocument, build_handshake_document};
use crate::error::HandshakeError;
use crate::limits::{DRIVER_NAME_MAX, DRIVER_VERSION_MAX, METADATA_MAX_SIZE};
use crate::record::ClientMetadata;
use crate::truncate::append_and_truncate;

struct Inner {
    record: ClientMetadata,
    frozen: bool,
}

/// Shared owner of the client metadata record.
pub struct HandshakeContext {
    inner: RwLock<Inner>,
}

impl HandshakeContext {
    /// Populates a fresh, unfrozen context from the running system: OS
    /// facts from the platform, driver identity from this crate, and the
    /// rendered build-configuration string.
    #[must_use]
    pub fn new() -> Self {
        let os = OsInfo::detect();
        let platform_string = render_platform_string(&BuildInfo::capture());
        Self::from_metadata(ClientMetadata::collect(&os, Some(&platform_string)))
    }

    /// Wraps an already-populated record. Unfrozen; used by the default
    /// constructor and by tests that need full control over field contents.
    #[must_use]
    pub fn from_metadata(record: ClientMetadata) -> Self {
        Self {
            inner: RwLock::new(Inner {
                record,
                frozen: false,
            }),
        }
    }

    /// Extends the driver identity and platform strings, then freezes the
    /// record. Permitted at most once per context; all arguments are
    /// independently optional.
    ///
    /// Driver name and version merge under their fixed limits. The platform
    /// suffix merges under the *dynamic* budget left over once every other
    /// bounded field has been accounted against [`METADATA_MAX_SIZE`]. A
    /// field whose existing value leaves no room for its suffix keeps its
    /// current value; the remaining overrides still apply and the record
    /// still freezes.
    ///
    /// # Errors
    ///
    /// [`HandshakeError::AlreadyFrozen`] when the record has already been
    /// frozen by an earlier call. The record is left unchanged and a
    /// diagnostic is logged; callers proceed with the existing metadata.
    pub fn apply_overrides(
        &self,
        driver_name: Option<&str>,
        driver_version: Option<&str>,
        platform: Option<&str>,
    ) -> Result<(), HandshakeError> {
        let mut inner = self.inner.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        if inner.frozen {
            tracing::warn!("handshake metadata already frozen; ignoring override");
            return Err(HandshakeError::AlreadyFrozen);
        }

        merge_field(
            &mut inner.record.driver_name,
            driver_name,
            DRIVER_NAME_MAX,
            "driver.name",
        );
        merge_field(
            &mut inner.record.driver_version,
            driver_version,
            DRIVER_VERSION_MAX,
            "driver.version",
        );

        // The platform allowance is whatever the other fields leave of the
        // document ceiling, not a fixed constant.
        let platform_budget =
            METADATA_MAX_SIZE.saturating_sub(inner.record.bounded_fields_len());
        match append_and_truncate(
            inner.record.platform.as_deref(),
            platform,
            platform_budget,
            "platform",
        ) {
            Ok(merged) => inner.record.platform = merged,
            Err(err) => tracing::warn!(%err, "skipping platform override"),
        }

        inner.frozen = true;
        Ok(())
    }

    /// Serializes the current record into a handshake document.
    ///
    /// Pure read path; see [`build_handshake_document`] for the budget
    /// semantics. Safe to call from any number of connection attempts
    /// concurrently.
    pub fn build_document(
        &self,
        app_name: Option<&str>,
    ) -> Result<HandshakeDocument, HandshakeError> {
        let inner = self.inner.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        build_handshake_document(&inner.record, app_name)
    }

    /// Owned copy of the current record, for diagnostics and tests.
    #[must_use]
    pub fn snapshot(&self) -> ClientMetadata {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .record
            .clone()
    }

    /// Reports whether the one permitted override has been consumed.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .frozen
    }
}

impl Default for HandshakeContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Merges one override suffix into a mandatory field under a fixed limit.
/// An overflowing merge keeps the existing value and logs the rejection.
fn merge_field(field: &mut String, suffix: Option<&str>, max: usize, key: &'static str) {
    match append_and_truncate(Some(field.as_str()), suffix, max, key) {
        Ok(Some(merged)) => *field = merged,
        Ok(None) => {}
        Err(err) => tracing::warn!(%err, "skipping field override"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> HandshakeContext {
        let os = OsInfo {
            os_type: "Linux".to_string(),
            os_name: Some("Linux".to_string()),
            os_version: Some("6.8.0".to_string()),
            os_architecture: Some("x86_64".to_string()),
        };
        HandshakeContext::from_metadata(ClientMetadata::collect(&os, Some("cfg=0x0 CC=rustc")))
    }

    #[test]
    fn new_context_is_unfrozen() {
        assert!(!context().is_frozen());
    }

    #[test]
    fn overrides_extend_and_freeze() {
        let ctx = context();
        ctx.apply_overrides(Some("wrapper"), Some("1.2.3"), Some("extra=1"))
            .unwrap();
        assert!(ctx.is_frozen());

        let record = ctx.snapshot();
        assert_eq!(record.driver_name, "docdb-rs / wrapper");
        assert!(record.driver_version.ends_with(" / 1.2.3"));
        assert!(record.platform.unwrap().ends_with(" / extra=1"));
    }

    #[test]
    fn all_absent_overrides_still_freeze() {
        let ctx = context();
        ctx.apply_overrides(None, None, None).unwrap();
        assert!(ctx.is_frozen());
        assert_eq!(ctx.snapshot().driver_name, "docdb-rs");
    }

    #[test]
    fn second_override_is_rejected_and_changes_nothing() {
        let ctx = context();
        ctx.apply_overrides(Some("first"), None, None).unwrap();
        let before = ctx.snapshot();

        let err = ctx.apply_overrides(Some("second"), None, None).unwrap_err();
        assert_eq!(err, HandshakeError::AlreadyFrozen);
        assert_eq!(ctx.snapshot(), before);
    }

    #[test]
    fn snapshot_serializes_to_json_for_diagnostics() {
        let ctx = context();
        ctx.apply_overrides(Some("wrapper"), None, None).unwrap();

        let json = serde_json::to_value(ctx.snapshot()).unwrap();
        assert_eq!(json["driver_name"], "docdb-rs / wrapper");
        assert_eq!(json["os_type"], "Linux");
        assert_eq!(json["os_architecture"], "x86_64");
        assert_eq!(json["platform"], "cfg=0x0 CC=rustc");
        assert!(json["os_version"].is_string());
    }

    #[test]
    fn overflowing_driver_name_is_skipped_but_rest_applies() {
        let mut record = ClientMetadata::collect(
            &OsInfo {
                os_type: "Linux".to_string(),
                ..OsInfo::default()
            },
            None,
        );
        record.driver_name = "n".repeat(DRIVER_NAME_MAX);
        let ctx = HandshakeContext::from_metadata(record);

        ctx.apply_overrides(Some("suffix"), Some("9.9"), None).unwrap();
        let after = ctx.snapshot();
        assert_eq!(after.driver_name.len(), DRIVER_NAME_MAX);
        assert!(after.driver_version.ends_with(" / 9.9"));
        assert!(ctx.is_frozen());
    }
}
