//! Errors surfaced by handshake metadata assembly.
//!
//! Every variant is recoverable: the handshake layer proceeds with a smaller
//! or absent metadata section, never aborting the connection. Nothing in this
//! subsystem is fatal to the process.

use thiserror::Error;

use crate::limits::{APPNAME_MAX, METADATA_MAX_SIZE};

/// Error taxonomy for handshake metadata operations.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum HandshakeError {
    /// An override was attempted after the record was frozen. The record is
    /// unchanged; the caller proceeds with the existing metadata.
    #[error("handshake metadata is frozen; overrides may be applied at most once")]
    AlreadyFrozen,

    /// A field's existing value already consumes its entire budget, leaving
    /// no room for the override delimiter or any suffix content. The caller
    /// should skip that field's override.
    #[error("field {field:?} is already {len} of {max} bytes; no room for an override suffix")]
    FieldOverflow {
        /// Wire key of the field that rejected the override.
        field: &'static str,
        /// Current stored length of the field in bytes.
        len: usize,
        /// The field's byte budget.
        max: usize,
    },

    /// The mandatory application/driver/os sections alone exceed the
    /// document ceiling. There is nothing left to trim; the handshake
    /// proceeds without a metadata section.
    #[error(
        "mandatory handshake sections serialize to {size} bytes, \
         above the {METADATA_MAX_SIZE}-byte ceiling"
    )]
    DocumentTooLarge {
        /// Serialized size of the mandatory sections.
        size: usize,
    },

    /// The caller-configured application name exceeds [`APPNAME_MAX`].
    /// Rejected before any document is built.
    #[error("application name is {len} bytes, above the {APPNAME_MAX}-byte limit")]
    InvalidAppName {
        /// Byte length of the rejected name.
        len: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_field() {
        let err = HandshakeError::FieldOverflow {
            field: "driver.name",
            len: 64,
            max: 64,
        };
        let text = err.to_string();
        assert!(text.contains("driver.name"));
        assert!(text.contains("64"));
    }

    #[test]
    fn display_mentions_the_ceiling() {
        let err = HandshakeError::DocumentTooLarge { size: 600 };
        assert!(err.to_string().contains("512"));
    }
}
