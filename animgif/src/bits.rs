// bits.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Byte and bit field helpers for GIF blocks
use crate::error::{Error, Result};

/// Get the `n_bytes` least-significant bytes of a value (little-endian)
///
/// Fails if the value does not fit in `n_bytes`.
pub fn le_bytes(value: u32, n_bytes: usize) -> Result<Vec<u8>> {
    let fits = n_bytes >= 4 || (value as u64) < (1u64 << (8 * n_bytes));
    if !fits {
        return Err(Error::ByteOverflow { value, n_bytes });
    }
    Ok((0..n_bytes)
        .map(|i| value.checked_shr(8 * i as u32).unwrap_or(0) as u8)
        .collect())
}

/// Pack fields into the low `width` bits of an integer
fn pack_fields(fields: &[(u32, u8)], width: u32) -> Result<u32> {
    let mut packed = 0;
    let mut shift = 0;
    for &(value, bits) in fields.iter().rev() {
        let n_bits = u32::from(bits);
        if shift + n_bits > width || u64::from(value) >= (1u64 << n_bits) {
            return Err(Error::FieldOverflow { value, bits });
        }
        packed |= (u64::from(value) << shift) as u32;
        shift += n_bits;
    }
    Ok(packed)
}

/// Pack `(value, bits)` fields into one integer
///
/// The first field occupies the most significant bits.
pub fn pack_bits(fields: &[(u32, u8)]) -> Result<u32> {
    pack_fields(fields, u32::BITS)
}

/// Pack fields into one flag byte
pub(crate) fn pack_byte(fields: &[(u32, u8)]) -> Result<u8> {
    Ok(pack_fields(fields, u8::BITS)? as u8)
}
