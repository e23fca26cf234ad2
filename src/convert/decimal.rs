/*!
Decimal string parsing: the lexical scanner for the standard
sign/integer/fraction/exponent/`inf`/`nan` grammar, and the correctly-rounded
decimal-to-binary conversion it bottoms out in.

Grounded on `ieee754.py`'s `DEC_FLOAT_REGEX` and `_decimal_to_binary`. The
reference's `_decimal_to_binary` iteratively widens an intermediate
calculation format and uses Clinger's error-bound lemma to decide when it has
used enough precision to round correctly. This port cannot be run to check
that loop terminates with the right error bookkeeping, so it takes a
different, simpler route to the same correctly-rounded result: scale the
decimal significand into an exact integer ratio (`sig * 10^exponent` is
already exact when `exponent >= 0`; otherwise it is `sig / 10^-exponent`) and
perform that division with a wide, fixed guard-bit margin using the same
sticky-bit trick [`crate::ops::div`] uses, before handing the (inexact only
in its lowest guard bits) result to [`normalize`] for the one real rounding
step. The guard margin is generous enough (64 bits beyond the format's own
precision) that it cannot itself introduce a second rounding error.
*/

use rug::Integer;

use crate::context::Context;
use crate::error::{ParseError, ProgrammerError};
use crate::format::BinaryFormat;
use crate::ops::normalize;
use crate::signal::SignalRaised;
use crate::value::Binary;

fn pow10(mut n: u64) -> Integer {
    let mut result = Integer::from(1);
    let mut base = Integer::from(10);
    while n > 0 {
        if n & 1 == 1 {
            result *= &base;
        }
        base = Integer::from(&base * &base);
        n >>= 1;
    }
    result
}

fn digits_to_integer(digits: &str) -> Integer {
    digits.bytes().fold(Integer::from(0), |acc, b| acc * 10 + (b - b'0') as u32)
}

/// Correctly-rounded conversion of `sign * int(sig_str) * 10^exponent` into
/// `format`. `sig_str` must be non-empty decimal digits with no leading
/// zeroes (other than a lone "0").
pub fn decimal_to_binary(
    ctx: &mut Context,
    format: &BinaryFormat,
    sign: bool,
    exponent: i64,
    sig_str: &str,
) -> Result<Binary, SignalRaised> {
    let sig = digits_to_integer(sig_str);
    if sig.cmp0() == std::cmp::Ordering::Equal {
        return Ok(Binary::zero(format.clone(), sign));
    }

    if exponent >= 0 {
        let magnitude = Integer::from(&sig * pow10(exponent as u64));
        return normalize(ctx, format, sign, 0, magnitude);
    }

    let guard_bits = format.precision() as u32 + 64;
    let denom = pow10((-exponent) as u64);
    let numerator = Integer::from(&sig << guard_bits);
    let mut quotient = Integer::from(&numerator / &denom);
    let remainder = numerator - Integer::from(&quotient * &denom);
    if remainder.cmp0() != std::cmp::Ordering::Equal && quotient.is_even() {
        quotient += 1;
    }
    normalize(ctx, format, sign, -(guard_bits as i64), quotient)
}

/// A decimal literal's special (non-finite) payload, distinguished from a
/// finite significand/exponent pair by [`scan`].
enum Special {
    Infinity,
    NaN { signalling: bool, payload: Option<Integer> },
}

fn scan_digits(bytes: &[u8], pos: &mut usize) -> String {
    let start = *pos;
    while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
        *pos += 1;
    }
    String::from_utf8_lossy(&bytes[start..*pos]).into_owned()
}

/// Hand-written scanner for the grammar:
/// `[+-]? ( digits? '.' digits | digits '.'? ) ('e' [+-]? digits)?`, or
/// `[+-]? 'inf' 'inity'?`, or `[+-]? 's'? 'nan' ( '0x' hex-digits | digits )?`
/// (all case-insensitive).
fn scan(s: &str) -> Result<(bool, Result<(i64, String), Special>), ProgrammerError> {
    let bytes = s.as_bytes();
    let mut pos = 0;
    let sign = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let rest = &s[pos..];
    let lower = rest.to_ascii_lowercase();

    if lower == "inf" || lower == "infinity" {
        return Ok((sign, Err(Special::Infinity)));
    }

    if let Some(tail) = lower.strip_prefix("snan").or_else(|| lower.strip_prefix("nan")) {
        let signalling = lower.starts_with("snan");
        let payload = if tail.is_empty() {
            None
        } else if let Some(hex) = tail.strip_prefix("0x") {
            if hex.is_empty() || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(ProgrammerError::syntax(format!("invalid NaN payload: {}", s)));
            }
            Some(hex.bytes().fold(Integer::from(0), |acc, b| {
                acc * 16 + (b as char).to_digit(16).unwrap()
            }))
        } else {
            if tail.is_empty() || !tail.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ProgrammerError::syntax(format!("invalid NaN payload: {}", s)));
            }
            Some(digits_to_integer(tail))
        };
        return Ok((sign, Err(Special::NaN { signalling, payload })));
    }

    let bytes = rest.as_bytes();
    let mut pos = 0;
    let int_part = scan_digits(bytes, &mut pos);
    let frac_part = if bytes.get(pos) == Some(&b'.') {
        pos += 1;
        scan_digits(bytes, &mut pos)
    } else {
        String::new()
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ProgrammerError::syntax(format!("invalid floating point literal: {}", s)));
    }

    let mut exponent: i64 = 0;
    if matches!(bytes.get(pos), Some(b'e') | Some(b'E')) {
        let mut exp_pos = pos + 1;
        let exp_sign = match bytes.get(exp_pos) {
            Some(b'-') => {
                exp_pos += 1;
                -1
            }
            Some(b'+') => {
                exp_pos += 1;
                1
            }
            _ => 1,
        };
        let exp_digits = scan_digits(bytes, &mut exp_pos);
        if exp_digits.is_empty() || exp_pos != bytes.len() {
            return Err(ProgrammerError::syntax(format!("invalid exponent: {}", s)));
        }
        exponent = exp_sign * exp_digits.parse::<i64>().map_err(|_| ProgrammerError::syntax("exponent too large"))?;
    } else if pos != bytes.len() {
        return Err(ProgrammerError::syntax(format!("invalid floating point literal: {}", s)));
    }

    let trimmed_int = int_part.trim_start_matches('0');
    let combined = format!("{}{}", trimmed_int, frac_part);
    let sig_str = combined.trim_end_matches('0');
    let sig_str = if sig_str.is_empty() { "0" } else { sig_str };
    exponent += trimmed_int.len() as i64 - sig_str.len() as i64;

    Ok((sign, Ok((exponent, sig_str.to_string()))))
}

/// Parse a decimal (or `inf`/`nan`) literal into `format`, rounding under
/// `ctx`.
pub fn parse(ctx: &mut Context, format: &BinaryFormat, s: &str) -> Result<Binary, ParseError> {
    let (sign, body) = scan(s)?;
    match body {
        Ok((exponent, sig_str)) => Ok(decimal_to_binary(ctx, format, sign, exponent, &sig_str)?),
        Err(Special::Infinity) => Ok(Binary::infinity(format.clone(), sign)),
        Err(Special::NaN { signalling, payload }) => {
            let payload = payload.unwrap_or_else(|| Integer::from(signalling as u32));
            Ok(Binary::nan(format.clone(), sign, !signalling, payload))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt() -> BinaryFormat {
        BinaryFormat::from_ieee(64).unwrap()
    }

    #[test]
    fn parses_simple_integer() {
        let mut ctx = Context::new();
        let f = fmt();
        let v = parse(&mut ctx, &f, "42").unwrap();
        let expected = normalize(&mut Context::new(), &f, false, 0, Integer::from(42)).unwrap();
        assert_eq!(*v.significand(), *expected.significand());
        assert_eq!(v.exponent(), expected.exponent());
    }

    #[test]
    fn parses_fraction_with_exponent() {
        let mut ctx = Context::new();
        let f = fmt();
        let v = parse(&mut ctx, &f, "-1.5e2").unwrap();
        assert!(v.sign());
        // -1.5e2 == -150
        let expected = decimal_to_binary(&mut Context::new(), &f, true, 0, "150").unwrap();
        assert_eq!(*v.significand(), *expected.significand());
        assert_eq!(v.exponent(), expected.exponent());
    }

    #[test]
    fn parses_infinity_case_insensitively() {
        let mut ctx = Context::new();
        let f = fmt();
        let v = parse(&mut ctx, &f, "-INFINITY").unwrap();
        assert!(v.is_infinite());
        assert!(v.sign());
    }

    #[test]
    fn parses_signalling_nan_with_payload() {
        let mut ctx = Context::new();
        let f = fmt();
        let v = parse(&mut ctx, &f, "snan123").unwrap();
        assert!(v.is_signalling_nan());
        assert_eq!(v.nan_payload(), Some(Integer::from(123)));
    }

    #[test]
    fn rejects_malformed_literal() {
        let mut ctx = Context::new();
        let f = fmt();
        assert!(parse(&mut ctx, &f, "1.2.3").is_err());
    }

    #[test]
    fn one_tenth_is_inexact_to_nearest() {
        let mut ctx = Context::new();
        let f = fmt();
        let v = decimal_to_binary(&mut ctx, &f, false, -1, "1").unwrap();
        assert!(ctx.flags().inexact);
        assert!(v.is_finite());
    }
}
