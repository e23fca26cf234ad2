use rug::Integer;

use ieee754::context::Context;
use ieee754::convert::{pack, parse_decimal, parse_hex, unpack_to_value, Endianness};
use ieee754::formats::binary64;
use ieee754::ops;
use ieee754::round::RoundingMode;
use ieee754::value::Binary;

fn ctx() -> Context {
    Context::new()
}

#[test]
fn decimal_tenth_rounds_inexactly() {
    let mut c = ctx();
    let f = binary64();
    let tenth = parse_decimal(&mut c, &f, "0.1").unwrap();
    assert!(c.flags().inexact);
    // 0.1 in binary64 packs to the well-known bit pattern.
    let bytes = pack(&tenth, Endianness::Little).unwrap();
    assert_eq!(bytes, vec![0x9a, 0x99, 0x99, 0x99, 0x99, 0x99, 0xb9, 0x3f]);
}

#[test]
fn hex_literal_three_is_exact() {
    let mut c = ctx();
    let f = binary64();
    let three = parse_hex(&mut c, &f, "0x1.8p+1").unwrap();
    assert!(!c.flags().inexact);
    let expected = parse_decimal(&mut Context::new(), &f, "3").unwrap();
    assert_eq!(*three.significand(), *expected.significand());
    assert_eq!(three.exponent(), expected.exponent());
}

#[test]
fn overflow_past_binary64_range_rounds_to_infinity() {
    let mut c = ctx();
    let f = binary64();
    let huge = parse_decimal(&mut c, &f, "1e308").unwrap();
    let ten = parse_decimal(&mut c, &f, "10").unwrap();
    c.clear_flags();
    let product = ops::multiply(&mut c, &f, &huge, &ten).unwrap();
    assert!(product.is_infinite());
    assert!(!product.sign());
    assert!(c.flags().overflow);
    assert!(c.flags().inexact);
}

#[test]
fn sqrt_of_two_is_inexact_and_matches_known_bytes() {
    let mut c = ctx();
    let f = binary64();
    let two = parse_decimal(&mut c, &f, "2").unwrap();
    c.clear_flags();
    let root = ops::sqrt(&mut c, &f, &two).unwrap();
    assert!(c.flags().inexact);
    let bytes = pack(&root, Endianness::Little).unwrap();
    // sqrt(2) = 0x3FF6A09E667F3BCD
    assert_eq!(bytes, vec![0xcd, 0x3b, 0x7f, 0x66, 0x9e, 0xa0, 0xf6, 0x3f]);
}

#[test]
fn fma_avoids_the_double_rounding_that_separate_multiply_add_would_hit() {
    let mut c = ctx();
    let f = binary64();
    let a = parse_decimal(&mut c, &f, "1e16").unwrap();
    let b = parse_hex(&mut c, &f, "0x1.0000000000001p+0").unwrap(); // 1 + 2^-52
    let neg_a = a.negate();
    let result = ops::fma(&mut c, &f, &a, &b, &neg_a).unwrap();
    let expected = parse_decimal(&mut Context::new(), &f, "2").unwrap();
    assert_eq!(*result.significand(), *expected.significand());
    assert_eq!(result.exponent(), expected.exponent());
}

#[test]
fn remainder_rounds_to_nearest_even_quotient_but_fmod_does_not() {
    let mut c = ctx();
    let f = binary64();
    let five = parse_decimal(&mut c, &f, "5").unwrap();
    let three = parse_decimal(&mut c, &f, "3").unwrap();

    let rem = ops::remainder(&mut c, &f, &five, &three).unwrap();
    let neg_one = parse_decimal(&mut Context::new(), &f, "-1").unwrap();
    assert_eq!(*rem.significand(), *neg_one.significand());
    assert_eq!(rem.sign(), neg_one.sign());

    let modded = ops::fmod(&mut c, &f, &five, &three).unwrap();
    let two = parse_decimal(&mut Context::new(), &f, "2").unwrap();
    assert_eq!(*modded.significand(), *two.significand());
    assert!(!modded.sign());
}

#[test]
fn min_num_ignores_a_quiet_nan_but_signals_on_a_signalling_one() {
    let mut c = ctx();
    let f = binary64();
    let one = parse_decimal(&mut c, &f, "1").unwrap();
    let qnan = Binary::nan(f.clone(), false, true, Integer::from(0));
    let snan = Binary::nan(f.clone(), false, false, Integer::from(1));

    c.clear_flags();
    let picked = ops::min_num(&mut c, &one, &qnan).unwrap();
    assert_eq!(*picked.significand(), *one.significand());
    assert!(!c.flags().invalid);

    c.clear_flags();
    let picked = ops::min_num(&mut c, &one, &snan).unwrap();
    assert_eq!(*picked.significand(), *one.significand());
    assert!(c.flags().invalid);
}

#[test]
fn total_order_distinguishes_signed_zero() {
    let f = binary64();
    let pos_zero = Binary::zero(f.clone(), false);
    let neg_zero = Binary::zero(f, true);
    assert_eq!(ops::compare(&pos_zero, &neg_zero), ops::FloatOrdering::Equal);
    assert_eq!(ops::compare_total(&neg_zero, &pos_zero), std::cmp::Ordering::Less);
}

#[test]
fn pack_and_unpack_round_trip_every_special_case() {
    let f = binary64();
    let mut c = ctx();
    let values = vec![
        parse_decimal(&mut c, &f, "1.5").unwrap(),
        parse_decimal(&mut c, &f, "-0").unwrap(),
        Binary::infinity(f.clone(), true),
        Binary::nan(f.clone(), false, true, Integer::from(42)),
    ];
    for v in values {
        for endianness in [Endianness::Little, Endianness::Big] {
            let bytes = pack(&v, endianness).unwrap();
            let back = unpack_to_value(&f, &bytes, endianness).unwrap();
            assert_eq!(back.sign(), v.sign());
            assert_eq!(back.is_nan(), v.is_nan());
            assert_eq!(back.is_infinite(), v.is_infinite());
            if !v.is_nan() {
                assert_eq!(*back.significand(), *v.significand());
                assert_eq!(back.exponent(), v.exponent());
            }
        }
    }
}

#[test]
fn round_to_integral_uses_the_context_rounding_mode() {
    let mut c = ctx().with_rounding(RoundingMode::Down);
    let f = binary64();
    let value = parse_decimal(&mut c, &f, "2.75").unwrap();
    let rounded = ops::round_to_integral(&mut c, &f, &value).unwrap();
    let two = parse_decimal(&mut Context::new(), &f, "2").unwrap();
    assert_eq!(*rounded.significand(), *two.significand());
    assert_eq!(rounded.exponent(), two.exponent());
}

#[test]
fn next_up_of_one_steps_by_one_ulp() {
    let mut c = ctx();
    let f = binary64();
    let one = parse_decimal(&mut c, &f, "1").unwrap();
    let up = ops::next_up(&mut c, &f, &one).unwrap();
    assert!(ops::compare(&up, &one) == ops::FloatOrdering::GreaterThan);

    let bytes = pack(&up, Endianness::Little).unwrap();
    // 1.0 + 1ulp = 0x3FF0000000000001
    assert_eq!(bytes, vec![1, 0, 0, 0, 0, 0, 0xF0, 0x3F]);
}
