/*!
The four-valued comparison relation and its derived predicates.

Grounded on `ieee754.py`'s comparison predicate section: infinities compare
by sign, any NaN makes the pair unordered, and signed zeros compare equal.
[`compare_total`] additionally distinguishes signed zero and orders NaNs,
giving callers a genuine total order when they need one.
*/

use crate::context::Context;
use crate::signal::{SignalClass, SignalRaised};
use crate::value::Binary;

/// The result of comparing two floating-point values.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Ordering {
    LessThan,
    Equal,
    GreaterThan,
    Unordered,
}

/// Numerical comparison (signed zeros compare equal; any NaN is `Unordered`).
pub fn compare(a: &Binary, b: &Binary) -> Ordering {
    if a.is_nan() || b.is_nan() {
        return Ordering::Unordered;
    }
    if a.is_zero() && b.is_zero() {
        return Ordering::Equal;
    }
    if a.is_infinite() && b.is_infinite() {
        return match (a.sign(), b.sign()) {
            (false, false) | (true, true) => Ordering::Equal,
            (false, true) => Ordering::GreaterThan,
            (true, false) => Ordering::LessThan,
        };
    }
    if a.is_infinite() {
        return if a.sign() { Ordering::LessThan } else { Ordering::GreaterThan };
    }
    if b.is_infinite() {
        return if b.sign() { Ordering::GreaterThan } else { Ordering::LessThan };
    }

    // both finite, at least one nonzero
    if a.sign() != b.sign() {
        return if a.sign() { Ordering::LessThan } else { Ordering::GreaterThan };
    }
    let sign = a.sign();
    let a_exp = a.exponent().unwrap_or(i64::MIN);
    let b_exp = b.exponent().unwrap_or(i64::MIN);
    let magnitude_order = if a.is_zero() {
        if b.is_zero() {
            std::cmp::Ordering::Equal
        } else {
            std::cmp::Ordering::Less
        }
    } else if b.is_zero() {
        std::cmp::Ordering::Greater
    } else if a_exp != b_exp {
        a_exp.cmp(&b_exp)
    } else {
        a.significand().cmp(b.significand())
    };

    match (magnitude_order, sign) {
        (std::cmp::Ordering::Equal, _) => Ordering::Equal,
        (std::cmp::Ordering::Less, false) => Ordering::LessThan,
        (std::cmp::Ordering::Greater, false) => Ordering::GreaterThan,
        (std::cmp::Ordering::Less, true) => Ordering::GreaterThan,
        (std::cmp::Ordering::Greater, true) => Ordering::LessThan,
    }
}

/// A total order: unlike [`compare`], `-0 < +0` and NaNs are ordered
/// (negative signalling < negative quiet < ... < positive quiet), by
/// payload within a sign/quiet class.
pub fn compare_total(a: &Binary, b: &Binary) -> std::cmp::Ordering {
    use std::cmp::Ordering::*;

    fn rank(x: &Binary) -> i32 {
        if x.is_nan() {
            4
        } else if x.is_infinite() {
            3
        } else {
            2
        }
    }

    let (a_sign, b_sign) = (a.sign(), b.sign());
    if a_sign != b_sign {
        return if a_sign { Less } else { Greater };
    }

    let ord = match (a.is_nan(), b.is_nan()) {
        (true, true) => {
            let a_quiet = a.is_quiet_nan();
            let b_quiet = b.is_quiet_nan();
            if a_quiet != b_quiet {
                if a_quiet {
                    Greater
                } else {
                    Less
                }
            } else {
                a.nan_payload().cmp(&b.nan_payload())
            }
        }
        (true, false) => rank(a).cmp(&rank(b)),
        (false, true) => rank(a).cmp(&rank(b)),
        (false, false) => match compare(a, b) {
            Ordering::Equal => Equal,
            Ordering::LessThan => Less,
            Ordering::GreaterThan => Greater,
            Ordering::Unordered => unreachable!("neither operand is NaN"),
        },
    };

    if a_sign {
        ord.reverse()
    } else {
        ord
    }
}

macro_rules! predicate {
    ($name:ident, $signalling_name:ident, $matches:expr) => {
        /// Total function of [`compare`]. Raises `SignallingNaNOperand`
        /// (without affecting the returned boolean) if either operand is
        /// a signalling NaN; does not raise for a quiet-NaN-caused
        /// `Unordered` result.
        pub fn $name(ctx: &mut Context, a: &Binary, b: &Binary) -> Result<bool, SignalRaised> {
            if a.is_signalling_nan() || b.is_signalling_nan() {
                ctx.note_signal(SignalClass::SignallingNaNOperand, "signalling NaN operand to comparison")?;
            }
            let f: fn(Ordering) -> bool = $matches;
            Ok(f(compare(a, b)))
        }

        /// Like `$name`, but raises `InvalidComparison` whenever the
        /// result is `Unordered` (quiet NaN included), per the IEEE 754
        /// "signaling" comparison predicates.
        pub fn $signalling_name(ctx: &mut Context, a: &Binary, b: &Binary) -> Result<bool, SignalRaised> {
            let result = compare(a, b);
            if result == Ordering::Unordered {
                ctx.note_signal(SignalClass::InvalidComparison, "unordered comparison")?;
            }
            let f: fn(Ordering) -> bool = $matches;
            Ok(f(result))
        }
    };
}

predicate!(eq, eq_signalling, |o| o == Ordering::Equal);
predicate!(ne, ne_signalling, |o| o != Ordering::Equal);
predicate!(lt, lt_signalling, |o| o == Ordering::LessThan);
predicate!(le, le_signalling, |o| matches!(o, Ordering::LessThan | Ordering::Equal));
predicate!(gt, gt_signalling, |o| o == Ordering::GreaterThan);
predicate!(ge, ge_signalling, |o| matches!(o, Ordering::GreaterThan | Ordering::Equal));
predicate!(un, un_signalling, |o| o == Ordering::Unordered);
predicate!(or, or_signalling, |o| o != Ordering::Unordered);
/// Greater-than-or-unordered.
predicate!(gu, gu_signalling, |o| matches!(o, Ordering::GreaterThan | Ordering::Unordered));
/// Less-than-or-unordered.
predicate!(lu, lu_signalling, |o| matches!(o, Ordering::LessThan | Ordering::Unordered));
/// Not-greater-than (less-than, equal, or unordered).
predicate!(ng, ng_signalling, |o| !matches!(o, Ordering::GreaterThan));
/// Not-less-than (greater-than, equal, or unordered).
predicate!(nl, nl_signalling, |o| !matches!(o, Ordering::LessThan));
