#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! Client handshake metadata for the docdb wire protocol. When a connection
//! is established, the driver attaches a small BSON sub-document to the
//! initial handshake command describing itself: driver name and version,
//! operating system, and build configuration. Servers log it; nothing about
//! the connection depends on it, so assembly here is best-effort and every
//! error is recoverable.
//!
//! # Design
//!
//! The subsystem is a process-wide record plus two guarded paths over it:
//!
//! - [`HandshakeContext`] owns the [`ClientMetadata`] record. It is
//!   populated once at start-up from the [`platform`] crate's OS and
//!   build-configuration providers, with every bounded field clamped to its
//!   limit from [`limits`].
//! - A wrapping library may call [`HandshakeContext::apply_overrides`]
//!   exactly once, before any connection exists, to extend the driver
//!   identity and platform strings. The call is atomic: it merges, then
//!   freezes the record, and any later attempt observes
//!   [`HandshakeError::AlreadyFrozen`].
//! - Every connection attempt calls [`HandshakeContext::build_document`],
//!   a pure read path that serializes the record and guarantees the result
//!   never exceeds [`limits::METADATA_MAX_SIZE`], trimming or omitting the
//!   `platform` field to stay under the ceiling.
//!
//! # Examples
//!
//! ```
//! use handshake::{HandshakeContext, is_app_name_valid};
//!
//! let ctx = HandshakeContext::new();
//! ctx.apply_overrides(Some("my-wrapper"), Some("2.1"), None).unwrap();
//!
//! assert!(is_app_name_valid("inventory-service"));
//! let doc = ctx.build_document(Some("inventory-service")).unwrap();
//! assert!(doc.len() <= handshake::limits::METADATA_MAX_SIZE);
//! ```
//!
//! # See also
//!
//! - [`platform`] for the OS/build introspection feeding the record.

mod context;
mod document;
mod error;
pub mod limits;
mod record;
mod truncate;

pub use context::HandshakeContext;
pub use document::{HandshakeDocument, build_handshake_document};
pub use error::HandshakeError;
pub use record::{ClientMetadata, DRIVER_NAME, DRIVER_VERSION};
pub use truncate::{append_and_truncate, truncate_to_boundary};

/// Reports whether an application name fits the handshake's
/// [`limits::APPNAME_MAX`] byte limit.
///
/// ```
/// use handshake::{is_app_name_valid, limits::APPNAME_MAX};
///
/// assert!(is_app_name_valid(&"a".repeat(APPNAME_MAX)));
/// assert!(!is_app_name_valid(&"a".repeat(APPNAME_MAX + 1)));
/// ```
#[must_use]
pub fn is_app_name_valid(name: &str) -> bool {
    name.len() <= limits::APPNAME_MAX
}
