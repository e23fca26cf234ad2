/*!
Binary-to-decimal conversion: a fixed number of correctly-rounded digits, an
exact (terminating) expansion, or the Steele-White shortest digit string
that round-trips under round-to-nearest.

Grounded on `ieee754.py`'s `Binary._to_decimal_parts`.
*/

use rug::Integer;

use crate::round::{round_up, LostFraction, RoundingMode};
use crate::value::Binary;

/// Subtractive division of `numerator` by `s`, returning a single decimal
/// digit. Callers maintain the loop invariant `numerator < 10 * s`, so the
/// digit is always in `0..=9` and the loop below runs at most nine times.
fn next_digit(numerator: Integer, s: &Integer) -> (u8, Integer) {
    let mut digit = 0u8;
    let mut rem = numerator;
    while &rem >= s {
        rem -= s;
        digit += 1;
    }
    (digit, rem)
}

/// Decimal digits of the finite, non-zero value `a`.
///
/// - `precision > 0`: exactly that many significant digits, correctly
///   rounded under `rounding`.
/// - `precision == 0`: the shortest digit string that round-trips back to
///   `a` under round-to-nearest (Steele & White, "How to Print
///   Floating-Point Numbers Accurately").
/// - `precision < 0`: the exact decimal expansion (always finite, since a
///   binary fraction's denominator only has 2 as a prime factor).
///
/// Returns `(exponent of the leading digit, digit string, was inexact)`.
pub fn to_decimal_parts(a: &Binary, precision: i64, rounding: RoundingMode) -> (i64, String, bool) {
    assert!(a.is_finite() && !a.is_zero(), "to_decimal_parts requires a finite, non-zero value");

    let e_p = a.exponent_int().unwrap();
    let up_shift = e_p.max(0) as u32;
    let down_shift = (-e_p).max(0) as u32;
    let mut r = Integer::from(a.significand() << up_shift);
    let mut m = Integer::from(1) << up_shift;
    let mut s = Integer::from(1) << down_shift;

    // Scale (R, S) until R/S is in [0.1, 1) decimal, tracking the exponent
    // of the leading digit.
    let mut exponent: i64 = -1;
    while Integer::from(&r * 10u32) < s {
        exponent -= 1;
        r *= 10;
        m *= 10;
    }
    while Integer::from(&r * 2u32) + &m >= Integer::from(&s * 2u32) {
        s *= 10;
        exponent += 1;
    }

    let (mut digits, inexact) = if precision != 0 {
        let limit = (precision > 0).then_some(precision as usize);
        let mut digits = Vec::new();
        while r.cmp0() != std::cmp::Ordering::Equal && limit.map_or(true, |lim| digits.len() < lim) {
            let (digit, rem) = next_digit(Integer::from(&r * 10u32), &s);
            digits.push(digit);
            r = rem;
        }

        let mut inexact = false;
        if r.cmp0() != std::cmp::Ordering::Equal {
            inexact = true;
            let doubled = Integer::from(&r * 2u32);
            let lost = match doubled.cmp(&s) {
                std::cmp::Ordering::Less => LostFraction::LessThanHalf,
                std::cmp::Ordering::Equal => LostFraction::ExactlyHalf,
                std::cmp::Ordering::Greater => LostFraction::MoreThanHalf,
            };
            let last_odd = digits.last().map_or(false, |d| d % 2 == 1);
            if round_up(rounding, lost, a.sign(), last_odd) {
                round_digits_up(&mut digits, &mut exponent);
            }
        }
        (digits, inexact)
    } else {
        (shortest_digits(&mut r, &mut s, &mut m, a), r.cmp0() != std::cmp::Ordering::Equal)
    };

    if precision > 0 {
        digits.resize(precision as usize, 0);
    }

    let digit_string: String = digits.iter().map(|d| (b'0' + d) as char).collect();
    (exponent, digit_string, inexact)
}

/// Increment the trailing digit, carrying leftwards; carrying out of the
/// leading digit inserts a new leading `1` and bumps `exponent`.
fn round_digits_up(digits: &mut Vec<u8>, exponent: &mut i64) {
    let mut pos = digits.len();
    loop {
        pos -= 1;
        digits[pos] += 1;
        if digits[pos] != 10 {
            return;
        }
        digits[pos] = 0;
        if pos == 0 {
            digits.insert(0, 1);
            *exponent += 1;
            return;
        }
    }
}

/// The Steele-White loop: keep generating digits from `r`/`s` until the
/// remaining uncertainty (tracked by `m`, one ULP in the original value)
/// means round-to-nearest of the digits so far is guaranteed to recover
/// `a`.
fn shortest_digits(r: &mut Integer, s: &mut Integer, m: &mut Integer, a: &Binary) -> Vec<u8> {
    let low_shift: u32 = if *a.significand() == a.format().int_bit() { 2 } else { 1 };
    let is_even = a.significand().is_even();
    let bias = Integer::from(is_even as u32);

    let mut digits = Vec::new();
    loop {
        let (digit, rem) = next_digit(Integer::from(&*r * 10u32), s);
        *m *= 10;
        *r = rem;

        let low = Integer::from(&*r << low_shift) < Integer::from(&*m + &bias);
        let high = Integer::from(&(Integer::from(&*s - &*r)) * 2u32) < Integer::from(&*m + &bias);
        if !(low || high) {
            digits.push(digit);
            continue;
        }

        let mut last = digit;
        if high && !low {
            last += 1;
        } else if !(low && !high) {
            let doubled = Integer::from(&*r * 2u32);
            match doubled.cmp(s) {
                std::cmp::Ordering::Greater => last += 1,
                std::cmp::Ordering::Equal if last % 2 == 1 => last += 1,
                _ => {}
            }
        }
        digits.push(last);
        return digits;
    }
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

    fn from_u64(format: &BinaryFormat, ctx: &mut Context, v: u64) -> Binary {
        normalize(ctx, format, false, 0, Integer::from(v)).unwrap()
    }

    #[test]
    fn shortest_digits_of_one_point_five() {
        let mut ctx = Context::new();
        let f = fmt();
        let one_and_half = normalize(&mut ctx, &f, false, -1, Integer::from(0b11)).unwrap();
        let (exponent, digits, inexact) = to_decimal_parts(&one_and_half, 0, RoundingMode::HalfEven);
        assert_eq!(exponent, 0);
        assert_eq!(digits, "15");
        assert!(!inexact);
    }

    #[test]
    fn exact_expansion_of_one_quarter() {
        let mut ctx = Context::new();
        let f = fmt();
        let quarter = normalize(&mut ctx, &f, false, -2, Integer::from(1)).unwrap();
        let (exponent, digits, inexact) = to_decimal_parts(&quarter, -1, RoundingMode::HalfEven);
        assert_eq!(exponent, -1);
        assert_eq!(digits, "25");
        assert!(!inexact);
    }

    #[test]
    fn fixed_precision_pads_trailing_zeroes() {
        let mut ctx = Context::new();
        let f = fmt();
        let two = from_u64(&f, &mut ctx, 2);
        let (_, digits, inexact) = to_decimal_parts(&two, 4, RoundingMode::HalfEven);
        assert_eq!(digits, "2000");
        assert!(!inexact);
    }

    #[test]
    fn shortest_digits_round_trip_for_integer() {
        let mut ctx = Context::new();
        let f = fmt();
        let seven = from_u64(&f, &mut ctx, 7);
        let (exponent, digits, _) = to_decimal_parts(&seven, 0, RoundingMode::HalfEven);
        assert_eq!(exponent, 0);
        assert_eq!(digits, "7");
    }
}
