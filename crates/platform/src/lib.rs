#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(missing_docs)]

//! # Overview
//!
//! OS and build-configuration introspection for the docdb-driver handshake.
//! The handshake metadata subsystem describes the connecting client to the
//! server: which operating system it runs on, which compiler produced it and
//! with which feature selection. This crate supplies those raw facts as
//! opaque strings and a typed bitfield; all length clamping and wire-size
//! budgeting happens later, in the `handshake` crate.
//!
//! # Design
//!
//! Detection is split into two providers plus a pure renderer:
//!
//! - [`OsInfo::detect`] queries `uname(2)` on Unix and compile-time target
//!   facts elsewhere. Every field except the OS family is optional; a failed
//!   syscall degrades to an absent field, never an error.
//! - [`BuildInfo::capture`] folds the crate's feature selection into a
//!   [`ConfigFlags`] bitfield and reads the compiler identity recorded by the
//!   build script.
//! - [`render_platform_string`] turns a [`BuildInfo`] into the single
//!   descriptive string carried in the handshake document. No truncation is
//!   performed here; the caller owns the byte budget.
//!
//! # Examples
//!
//! ```
//! use platform::{BuildInfo, OsInfo, render_platform_string};
//!
//! let os = OsInfo::detect();
//! assert!(!os.os_type.is_empty());
//!
//! let build = BuildInfo::capture();
//! let platform = render_platform_string(&build);
//! assert!(platform.starts_with("cfg=0x"));
//! ```

mod build_info;
mod os_info;
mod platform_string;

pub use build_info::{BuildInfo, ConfigFlags};
pub use os_info::OsInfo;
pub use platform_string::render_platform_string;
