/*!
Interchange pack/unpack: the bit-for-bit IEEE 754 layout of sign,
biased exponent, and significand, for formats whose parameters put that
layout on a byte boundary.

Grounded on `ieee754.py`'s `pack`/`unpack`/`unpack_value`. Only formats for
which [`BinaryFormat::is_interchange`] holds may be packed or unpacked;
everything else is a [`ProgrammerError::NotInterchange`].
*/

use rug::Integer;

use crate::error::ProgrammerError;
use crate::format::BinaryFormat;
use crate::value::Binary;

/// Byte order of a packed interchange value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endianness {
    Little,
    Big,
}

fn int_to_bytes(value: &Integer, nbytes: usize, endianness: Endianness) -> Vec<u8> {
    let mut v = value.clone();
    let mut le = Vec::with_capacity(nbytes);
    for _ in 0..nbytes {
        let byte = Integer::from(&v & 0xffu32).to_u32_wrapping() as u8;
        le.push(byte);
        v >>= 8u32;
    }
    if endianness == Endianness::Big {
        le.reverse();
    }
    le
}

fn bytes_to_int(bytes: &[u8], endianness: Endianness) -> Integer {
    let mut le: Vec<u8> = bytes.to_vec();
    if endianness == Endianness::Big {
        le.reverse();
    }
    let mut v = Integer::from(0);
    for (i, byte) in le.iter().enumerate() {
        v |= Integer::from(*byte) << (8 * i as u32);
    }
    v
}

/// The IEEE biased exponent field this value would be packed with: `0`
/// for zero/subnormal, `2*e_max+1` for infinity/NaN, the internal biased
/// exponent otherwise (the internal and IEEE conventions coincide for
/// every finite value except the subnormal corner, see the `value` module
/// docs).
fn ieee_exponent_field(v: &Binary) -> u64 {
    let format = v.format();
    if v.is_nan() || v.is_infinite() {
        (2 * format.e_max() + 1) as u64
    } else if v.is_zero() || v.is_subnormal() {
        0
    } else {
        v.e_biased() as u64
    }
}

/// The significand field (without the implicit integer bit, unless the
/// format stores that bit explicitly).
fn significand_field(v: &Binary) -> Integer {
    let format = v.format();
    let int_bit = format.int_bit();
    if format.has_explicit_int_bit() {
        if v.is_infinite() {
            int_bit
        } else if v.is_nan() {
            Integer::from(v.significand() | &int_bit)
        } else {
            v.significand().clone()
        }
    } else if v.is_infinite() || v.is_zero() {
        Integer::from(0)
    } else if v.is_nan() || v.is_subnormal() {
        v.significand().clone()
    } else {
        Integer::from(v.significand() - &int_bit)
    }
}

/// Serialize `value` into its interchange-format byte encoding. Fails if
/// `value`'s format is not an interchange format.
pub fn pack(value: &Binary, endianness: Endianness) -> Result<Vec<u8>, ProgrammerError> {
    let format = value.format();
    let width = format.require_interchange()?;
    let sig_width = if format.has_explicit_int_bit() {
        format.precision()
    } else {
        format.precision() - 1
    };

    let mut bits = significand_field(value);
    bits |= Integer::from(ieee_exponent_field(value)) << sig_width;
    if value.sign() {
        bits |= Integer::from(1) << (sig_width + format.e_width());
    }

    Ok(int_to_bytes(&bits, (width / 8) as usize, endianness))
}

/// Invert [`pack`]: split a byte string back into `(sign, ieee biased
/// exponent, significand field without the implicit integer bit)`.
/// Fails if `bytes`'s length does not match `format`'s interchange width,
/// or if `format` is not an interchange format.
pub fn unpack(format: &BinaryFormat, bytes: &[u8], endianness: Endianness) -> Result<(bool, u64, Integer), ProgrammerError> {
    let width = format.require_interchange()?;
    if bytes.len() * 8 != width as usize {
        return Err(ProgrammerError::bad_argument(format!(
            "expected {} bytes for this format's interchange width, got {}",
            width / 8,
            bytes.len()
        )));
    }

    let sig_width = if format.has_explicit_int_bit() {
        format.precision()
    } else {
        format.precision() - 1
    };
    let e_width = format.e_width();

    let bits = bytes_to_int(bytes, endianness);
    let sig_mask = (Integer::from(1) << sig_width) - 1;
    let significand = Integer::from(&bits & &sig_mask);
    let e_mask = (Integer::from(1) << e_width) - 1;
    let e_ieee = Integer::from(&bits >> sig_width) & &e_mask;
    let sign = Integer::from(&bits >> (sig_width + e_width)) & 1u32 != 0;

    Ok((sign, e_ieee.to_u32_wrapping() as u64, significand))
}

/// Lift an unpacked `(sign, ieee exponent, significand field)` triple (as
/// returned by [`unpack`]) into a [`Binary`] value.
pub fn unpack_value(format: &BinaryFormat, sign: bool, e_ieee: u64, significand_field: Integer) -> Binary {
    let int_bit = format.int_bit();
    let max_e_ieee = (2 * format.e_max() + 1) as u64;

    if e_ieee == max_e_ieee {
        let raw = if format.has_explicit_int_bit() {
            Integer::from(&significand_field & Integer::from(&int_bit - 1))
        } else {
            significand_field
        };
        if raw.cmp0() == std::cmp::Ordering::Equal {
            return Binary::infinity(format.clone(), sign);
        }
        let quiet_bit = format.quiet_bit();
        let quiet = Integer::from(&raw & &quiet_bit).cmp0() != std::cmp::Ordering::Equal;
        let payload = Integer::from(&raw & Integer::from(&quiet_bit - 1));
        return Binary::nan(format.clone(), sign, quiet, payload);
    }

    if e_ieee == 0 {
        if significand_field.cmp0() == std::cmp::Ordering::Equal {
            return Binary::zero(format.clone(), sign);
        }
        return Binary::from_parts(format.clone(), sign, 1, significand_field);
    }

    let s = if format.has_explicit_int_bit() {
        significand_field
    } else {
        significand_field + &int_bit
    };
    Binary::from_parts(format.clone(), sign, e_ieee as i64, s)
}

/// Round-trip convenience: unpack `bytes` directly into a [`Binary`].
pub fn unpack_to_value(format: &BinaryFormat, bytes: &[u8], endianness: Endianness) -> Result<Binary, ProgrammerError> {
    let (sign, e_ieee, sig) = unpack(format, bytes, endianness)?;
    Ok(unpack_value(format, sign, e_ieee, sig))
}
