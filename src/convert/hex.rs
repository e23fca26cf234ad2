/*!
Hex-float literal parsing and rendering: `[+-]? 0x ( H*\.H+ | H+\.? ) p [+-]?D+`.

Unlike the decimal grammar, every hex digit is worth exactly 4 bits, so
parsing never needs the iteratively-widened rounding loop decimal parsing
does -- the literal's value is already an exact `(sign, integer exponent,
integer significand)` triple, which [`crate::ops::normalize`] rounds
exactly as any other constructive operation would. Rendering is the same
idea in reverse: split the significand at its leading bit and re-express
the remaining bits as hex digits, padding the final nibble with zero bits
so the round trip is exact.

Grounded on `ieee754.py`'s hex-literal regex and its `to_string` hex path.
*/

use rug::Integer;

use crate::context::Context;
use crate::error::{ParseError, ProgrammerError};
use crate::format::BinaryFormat;
use crate::ops::normalize;
use crate::value::Binary;

fn hex_digit_value(b: u8) -> Option<u32> {
    (b as char).to_digit(16)
}

/// Parse the digits of a hex-float literal (the part after `0x` and
/// before `p`), returning the exact integer significand and the number of
/// fractional hex digits (each worth -4 to the final binary exponent).
fn parse_hex_digits(s: &str) -> Result<(Integer, u32), ProgrammerError> {
    let bytes = s.as_bytes();
    let dot = bytes.iter().position(|&b| b == b'.');
    let (int_part, frac_part) = match dot {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    };

    if int_part.is_empty() && frac_part.is_empty() {
        return Err(ProgrammerError::syntax("hex literal has no digits"));
    }
    if !int_part.bytes().all(|b| b.is_ascii_hexdigit()) || !frac_part.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ProgrammerError::syntax(format!("invalid hex digits: {}", s)));
    }

    let mut sig = Integer::from(0);
    for b in int_part.bytes().chain(frac_part.bytes()) {
        sig = sig * 16 + hex_digit_value(b).unwrap();
    }
    Ok((sig, frac_part.len() as u32))
}

/// Parse `[+-]? 0x <digits> p [+-]? <decimal exponent>` into the exact
/// `(sign, binary integer exponent, integer significand)` triple.
pub fn parse_exact(s: &str) -> Result<(bool, i64, Integer), ProgrammerError> {
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
    let lower_prefix: String = rest.chars().take(2).collect::<String>().to_ascii_lowercase();
    if lower_prefix != "0x" {
        return Err(ProgrammerError::syntax(format!("hex literal must start with 0x: {}", s)));
    }
    let rest = &rest[2..];

    let p_pos = rest
        .bytes()
        .position(|b| b == b'p' || b == b'P')
        .ok_or_else(|| ProgrammerError::syntax(format!("hex literal missing binary exponent: {}", s)))?;
    let (digits, exp_str) = (&rest[..p_pos], &rest[p_pos + 1..]);

    let exp_bytes = exp_str.as_bytes();
    let mut exp_pos = 0;
    let exp_sign = match exp_bytes.first() {
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
    let exp_digits = &exp_str[exp_pos..];
    if exp_digits.is_empty() || !exp_digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProgrammerError::syntax(format!("invalid binary exponent: {}", s)));
    }
    let p_exponent: i64 =
        exp_sign * exp_digits.parse::<i64>().map_err(|_| ProgrammerError::syntax("binary exponent too large"))?;

    let (sig, frac_digits) = parse_hex_digits(digits)?;
    let e_int = p_exponent - 4 * frac_digits as i64;
    Ok((sign, e_int, sig))
}

/// Parse a hex-float literal into `format`, rounding under `ctx`. The
/// literal already names an exact value, so rounding only does work when
/// `format`'s precision is smaller than the literal's digit count.
pub fn parse(ctx: &mut Context, format: &BinaryFormat, s: &str) -> Result<Binary, ParseError> {
    let (sign, e_int, sig) = parse_exact(s)?;
    Ok(normalize(ctx, format, sign, e_int, sig)?)
}

/// Render the magnitude of a finite, non-zero value as `<leading>.<frac>p<exp>`
/// (without sign or `0x` prefix; the caller assembles those). `min_digits`,
/// if given, pads the fraction with trailing zeroes to at least that many
/// hex digits; `None` strips trailing zero digits entirely (but always
/// keeps at least one digit after the point when the value is inexactly
/// representable in fewer).
pub fn render_magnitude(a: &Binary, upper_case: bool) -> (u32, String, i64) {
    let format = a.format();
    let precision = format.precision();
    let frac_bits = precision - 1;
    let int_bit = format.int_bit();

    let leading: u32 = if Integer::from(a.significand() & &int_bit).cmp0() != std::cmp::Ordering::Equal {
        1
    } else {
        0
    };
    let fraction = Integer::from(a.significand() & Integer::from(&int_bit - 1));

    let hex_digit_count = (frac_bits + 3) / 4;
    let pad_bits = hex_digit_count * 4 - frac_bits;
    let padded = Integer::from(&fraction << pad_bits);

    let mut digits = String::new();
    let mut rem = padded;
    let mut place = Integer::from(1) << ((hex_digit_count - 1) * 4);
    for _ in 0..hex_digit_count {
        let digit = Integer::from(&rem / &place);
        let d = digit.to_u32_wrapping();
        digits.push(std::char::from_digit(d, 16).unwrap());
        rem -= Integer::from(&digit * &place);
        place >>= 4u32;
    }
    if upper_case {
        digits = digits.to_uppercase();
    }

    (leading, digits, a.exponent().unwrap())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::format::BinaryFormat;
    use crate::ops::normalize;

    fn fmt() -> BinaryFormat {
        BinaryFormat::from_ieee(64).unwrap()
    }

    #[test]
    fn parses_three_exactly() {
        let (sign, e_int, sig) = parse_exact("0x1.8p+1").unwrap();
        assert!(!sign);
        // 1.8(hex) = 1 + 8/16 = 1.5; *2^1 = 3.0
        let mut ctx = Context::new();
        let result = normalize(&mut ctx, &fmt(), sign, e_int, sig).unwrap();
        assert!(!ctx.flags().inexact);
        let three = normalize(&mut Context::new(), &fmt(), false, 0, Integer::from(3)).unwrap();
        assert_eq!(*result.significand(), *three.significand());
        assert_eq!(result.exponent(), three.exponent());
    }

    #[test]
    fn rejects_missing_binary_exponent() {
        assert!(parse_exact("0x1.8").is_err());
    }

    #[test]
    fn render_round_trips_through_parse() {
        let mut ctx = Context::new();
        let f = fmt();
        let v = normalize(&mut ctx, &f, true, -4, Integer::from(0b11001)).unwrap();
        let (leading, frac, exp) = render_magnitude(&v, false);
        let literal = format!("0x{}.{}p{}", leading, frac, exp);
        let (sign, e_int, sig) = parse_exact(&literal).unwrap();
        let back = normalize(&mut Context::new(), &f, sign || v.sign(), e_int, sig).unwrap();
        assert_eq!(*back.significand(), *v.significand());
        assert_eq!(back.exponent(), v.exponent());
    }

    #[test]
    fn parse_rounds_under_context() {
        let mut ctx = Context::new();
        let v = parse(&mut ctx, &fmt(), "0x1.8p+1").unwrap();
        assert!(!ctx.flags().inexact);
        let three = normalize(&mut Context::new(), &fmt(), false, 0, Integer::from(3)).unwrap();
        assert_eq!(*v.significand(), *three.significand());
        assert_eq!(v.exponent(), three.exponent());
    }
}
