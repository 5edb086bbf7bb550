// Licensed under the Apache-2.0 license

//! Packed binary-coded-decimal helpers for RTC register values.

/// Convert a packed BCD byte (two decimal digits) to its value, `0..=99`.
///
/// Nibbles above 9 are not rejected; use [`is_valid_bcd`] first when the
/// source is untrusted.
#[must_use]
pub const fn bcd_to_decimal(bcd: u8) -> u8 {
    (bcd & 0x0F) + (bcd >> 4) * 10
}

/// Convert `0..=99` to packed BCD. Returns `None` for larger values.
#[must_use]
pub const fn decimal_to_bcd(value: u8) -> Option<u8> {
    if value > 99 {
        return None;
    }
    Some(((value / 10) << 4) | (value % 10))
}

#[must_use]
pub const fn is_valid_bcd(bcd: u8) -> bool {
    bcd & 0x0F <= 9 && bcd >> 4 <= 9
}
