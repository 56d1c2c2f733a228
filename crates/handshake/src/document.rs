//! BSON serialization of the handshake metadata document.
//!
//! # Overview
//!
//! The handshake command embeds the client description as a BSON
//! sub-document. Only two element types ever appear in it, UTF-8 strings
//! and embedded documents, so this module carries a purpose-built writer
//! for exactly those rather than a general BSON dependency. Keeping the
//! encoder local also keeps the byte-budget arithmetic honest: every size
//! check below runs against the real encoded length, framing included.
//!
//! # Design
//!
//! [`DocumentWriter`] is append-only. The buffer starts with a four-byte
//! length placeholder that [`DocumentWriter::finish`] patches once the
//! trailing NUL is in place, mirroring BSON's
//! `int32 length, elements..., 0x00` framing. A string element is
//! `0x02 key 0x00 int32(len+1) bytes 0x00`; an embedded document is
//! `0x03 key 0x00 <document bytes>`.
//!
//! [`build_handshake_document`] is the budgeted read path over a
//! [`ClientMetadata`]: mandatory sections first, then a hard ceiling check,
//! then the `platform` field trimmed to whatever budget remains. It never
//! mutates the record.

use crate::error::HandshakeError;
use crate::limits::{APPNAME_MAX, METADATA_MAX_SIZE};
use crate::record::ClientMetadata;
use crate::truncate::truncate_to_boundary;

/// Element tag for a UTF-8 string.
const TAG_UTF8: u8 = 0x02;
/// Element tag for an embedded document.
const TAG_DOCUMENT: u8 = 0x03;

/// Wire key of the platform field.
const PLATFORM_KEY: &str = "platform";

/// Serialized handshake metadata, guaranteed to fit the wire ceiling.
///
/// Transient: built once per connection attempt, embedded into the outgoing
/// handshake command, then dropped. The bytes are a complete BSON document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct HandshakeDocument(Vec<u8>);

impl HandshakeDocument {
    /// Returns the encoded document.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the document, yielding the encoded bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Serialized size in bytes. Always ≤ [`METADATA_MAX_SIZE`].
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Reports whether the document is empty. Never true for a document
    /// produced by [`build_handshake_document`]; present for completeness.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Append-only writer for the two BSON element types the handshake uses.
#[derive(Debug)]
pub(crate) struct DocumentWriter {
    buf: Vec<u8>,
}

impl DocumentWriter {
    /// Starts a document with the four-byte length placeholder.
    pub(crate) fn new() -> Self {
        Self { buf: vec![0; 4] }
    }

    fn push_key(&mut self, tag: u8, key: &str) {
        debug_assert!(!key.as_bytes().contains(&0), "BSON keys must be NUL-free");
        self.buf.push(tag);
        self.buf.extend_from_slice(key.as_bytes());
        self.buf.push(0);
    }

    /// Appends a UTF-8 string element.
    pub(crate) fn append_str(&mut self, key: &str, value: &str) {
        self.push_key(TAG_UTF8, key);
        let len = u32::try_from(value.len() + 1).unwrap_or(u32::MAX);
        self.buf.extend_from_slice(&len.to_le_bytes());
        self.buf.extend_from_slice(value.as_bytes());
        self.buf.push(0);
    }

    /// Appends a finished writer as an embedded document element.
    pub(crate) fn append_document(&mut self, key: &str, child: Self) {
        self.push_key(TAG_DOCUMENT, key);
        self.buf.extend_from_slice(&child.finish());
    }

    /// Size the document would have if finished now.
    pub(crate) fn encoded_len(&self) -> usize {
        self.buf.len() + 1
    }

    /// Patches the length prefix and appends the trailing NUL.
    pub(crate) fn finish(mut self) -> Vec<u8> {
        self.buf.push(0);
        let len = u32::try_from(self.buf.len()).unwrap_or(u32::MAX);
        self.buf[..4].copy_from_slice(&len.to_le_bytes());
        self.buf
    }
}

/// Framing overhead of a string element beyond the value bytes: tag, key,
/// key NUL, four-byte length prefix, value NUL.
fn string_element_overhead(key: &str) -> usize {
    1 + key.len() + 1 + 4 + 1
}

/// Serializes a metadata record into the handshake document.
///
/// The mandatory sections are appended first: `application.name` when an
/// application name is configured, then `driver` and `os`. If those alone
/// exceed [`METADATA_MAX_SIZE`] there is nothing left to trim and the build
/// fails with [`HandshakeError::DocumentTooLarge`]; the caller sends the
/// handshake without a metadata section. Otherwise the `platform` string is
/// appended last, truncated to the remaining budget or omitted outright
/// when not even one byte of it fits. A successful build is therefore
/// always within the ceiling.
///
/// Pure read path: `metadata` is never mutated.
pub fn build_handshake_document(
    metadata: &ClientMetadata,
    app_name: Option<&str>,
) -> Result<HandshakeDocument, HandshakeError> {
    if let Some(name) = app_name
        && name.len() > APPNAME_MAX
    {
        return Err(HandshakeError::InvalidAppName { len: name.len() });
    }

    let mut doc = DocumentWriter::new();

    if let Some(name) = app_name {
        let mut application = DocumentWriter::new();
        application.append_str("name", name);
        doc.append_document("application", application);
    }

    let mut driver = DocumentWriter::new();
    driver.append_str("name", &metadata.driver_name);
    driver.append_str("version", &metadata.driver_version);
    doc.append_document("driver", driver);

    let mut os = DocumentWriter::new();
    os.append_str("type", &metadata.os_type);
    if let Some(name) = metadata.os_name.as_deref() {
        os.append_str("name", name);
    }
    if let Some(version) = metadata.os_version.as_deref() {
        os.append_str("version", version);
    }
    if let Some(architecture) = metadata.os_architecture.as_deref() {
        os.append_str("architecture", architecture);
    }
    doc.append_document("os", os);

    let size = doc.encoded_len();
    if size > METADATA_MAX_SIZE {
        // The mandatory sections are already bounded at record-population
        // time, so overflow here means the record was built outside this
        // crate's clamping path. Nothing can be trimmed.
        return Err(HandshakeError::DocumentTooLarge { size });
    }

    if let Some(platform) = metadata.platform.as_deref() {
        append_platform(&mut doc, platform);
    }

    let document = HandshakeDocument(doc.finish());
    debug_assert!(document.len() <= METADATA_MAX_SIZE);
    Ok(document)
}

/// Appends the platform string trimmed to the live remaining budget, or
/// omits it when nothing fits. The document stays valid either way.
fn append_platform(doc: &mut DocumentWriter, platform: &str) {
    let consumed = doc.encoded_len() + string_element_overhead(PLATFORM_KEY);
    let Some(budget) = METADATA_MAX_SIZE.checked_sub(consumed).filter(|b| *b > 0) else {
        tracing::debug!(platform_len = platform.len(), "no budget left; omitting platform field");
        return;
    };

    let trimmed = truncate_to_boundary(platform, budget);
    if trimmed.is_empty() {
        // A budget smaller than the first character carries no information.
        tracing::debug!(
            platform_len = platform.len(),
            budget,
            "budget below one character; omitting platform field"
        );
        return;
    }
    if trimmed.len() < platform.len() {
        tracing::debug!(
            platform_len = platform.len(),
            budget,
            "truncating platform field to fit the metadata ceiling"
        );
    }
    doc.append_str(PLATFORM_KEY, trimmed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_is_five_bytes() {
        let doc = DocumentWriter::new();
        assert_eq!(doc.encoded_len(), 5);
        assert_eq!(doc.finish(), vec![5, 0, 0, 0, 0]);
    }

    #[test]
    fn string_element_encodes_bson_framing() {
        let mut doc = DocumentWriter::new();
        doc.append_str("a", "bc");
        let bytes = doc.finish();
        // length 4 + tag 1 + "a\0" 2 + len 4 + "bc\0" 3 + trailer 1 = 15.
        assert_eq!(
            bytes,
            vec![
                15, 0, 0, 0, // document length
                0x02, b'a', 0, // tag + key
                3, 0, 0, 0, // value length including NUL
                b'b', b'c', 0, // value
                0, // trailer
            ]
        );
    }

    #[test]
    fn embedded_document_nests_verbatim() {
        let mut child = DocumentWriter::new();
        child.append_str("name", "app");
        let mut doc = DocumentWriter::new();
        doc.append_document("application", child);
        let bytes = doc.finish();
        assert_eq!(bytes[4], TAG_DOCUMENT);
        assert_eq!(&bytes[5..16], b"application");
        assert_eq!(bytes[16], 0);
        // Embedded document length prefix sits right after the key.
        let child_len = u32::from_le_bytes([bytes[17], bytes[18], bytes[19], bytes[20]]);
        assert_eq!(child_len as usize, bytes.len() - 17 - 1);
    }

    #[test]
    fn encoded_len_tracks_the_finished_size() {
        let mut doc = DocumentWriter::new();
        doc.append_str("platform", "cfg=0x0");
        let predicted = doc.encoded_len();
        assert_eq!(doc.finish().len(), predicted);
    }

    #[test]
    fn overhead_matches_encoded_growth() {
        let mut doc = DocumentWriter::new();
        let before = doc.encoded_len();
        doc.append_str(PLATFORM_KEY, "");
        assert_eq!(
            doc.encoded_len() - before,
            string_element_overhead(PLATFORM_KEY)
        );
    }
}
