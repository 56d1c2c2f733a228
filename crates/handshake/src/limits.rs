//! Wire-size limits for the handshake metadata document.
//!
//! Every limit is a *byte* length of the UTF-8 encoding, not a character
//! count. The per-field limits bound what the record stores; the overall
//! ceiling bounds what [`build_handshake_document`](crate::build_handshake_document)
//! emits. The values are wire constants shared with every other driver the
//! server speaks to, so they never change within a protocol revision.

/// Maximum stored length of the OS family field.
pub const OS_TYPE_MAX: usize = 32;

/// Maximum stored length of the OS name field.
pub const OS_NAME_MAX: usize = 32;

/// Maximum stored length of the OS version field.
pub const OS_VERSION_MAX: usize = 32;

/// Maximum stored length of the OS architecture field.
pub const OS_ARCHITECTURE_MAX: usize = 32;

/// Maximum stored length of the driver name, including any override suffix.
pub const DRIVER_NAME_MAX: usize = 64;

/// Maximum stored length of the driver version, including any override suffix.
pub const DRIVER_VERSION_MAX: usize = 32;

/// Maximum length of a caller-configured application name.
pub const APPNAME_MAX: usize = 128;

/// Hard ceiling on the serialized size of the handshake metadata document.
pub const METADATA_MAX_SIZE: usize = 512;

/// Delimiter inserted between an existing field value and an override suffix.
pub const OVERRIDE_DELIMITER: &str = " / ";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_field_limits_leave_room_under_the_ceiling() {
        let fixed = OS_TYPE_MAX
            + OS_NAME_MAX
            + OS_VERSION_MAX
            + OS_ARCHITECTURE_MAX
            + DRIVER_NAME_MAX
            + DRIVER_VERSION_MAX;
        assert!(fixed < METADATA_MAX_SIZE);
    }

    #[test]
    fn delimiter_is_three_bytes() {
        assert_eq!(OVERRIDE_DELIMITER.len(), 3);
    }
}
