/*!
Arithmetic, comparison, and introspection operations over [`crate::value::Binary`].

Each constructive operation handles its non-finite special cases directly
and funnels the finite case through [`normalize`].
*/

mod normalize;

pub mod add;
pub mod compare;
pub mod div;
pub mod fma;
pub mod minmax;
pub mod mul;
pub mod nextafter;
pub mod remainder;
pub mod round_to_integral;
pub mod sqrt;

pub(crate) use normalize::{make_overflow_value, make_underflow_value, normalize};

use crate::format::BinaryFormat;
use crate::value::Binary;

/// NaN propagation (ieee754.py's operand-scan): pick the first operand
/// whose payload fits the destination format, quiet it, and report whether
/// any scanned operand was signalling (callers use this to decide whether
/// to additionally raise `SignallingNaNOperand`).
pub(crate) fn propagate_nan(format: &BinaryFormat, operands: &[&Binary]) -> Option<(Binary, bool)> {
    let max_payload = rug::Integer::from(&format.quiet_bit() - 1);
    let any_signalling = operands.iter().any(|op| op.is_signalling_nan());

    let chosen = operands
        .iter()
        .find(|op| op.is_nan() && op.nan_payload().map_or(false, |p| p <= max_payload))
        .or_else(|| operands.iter().find(|op| op.is_nan()))?;

    let payload = chosen.nan_payload().unwrap();
    Some((Binary::nan(format.clone(), chosen.sign(), true, payload), any_signalling))
}

pub use add::{add, subtract};
pub use compare::{
    compare, compare_total, eq, eq_signalling, ge, ge_signalling, gt, gt_signalling, gu, gu_signalling, le,
    le_signalling, lt, lt_signalling, lu, lu_signalling, ne, ne_signalling, ng, ng_signalling, nl, nl_signalling, or,
    or_signalling, un, un_signalling, Ordering as FloatOrdering,
};
pub use div::divide;
pub use fma::fma;
pub use minmax::{max_mag, max_num, max_num_mag, max_value, min_mag, min_num, min_num_mag, min_value};
pub use mul::multiply;
pub use nextafter::{logb, logb_integral, next_down, next_up, scaleb};
pub use remainder::{fmod, remainder};
pub use round_to_integral::{convert_to_integer, convert_to_integer_exact, round_to_integral, round_to_integral_exact};
pub use sqrt::sqrt;
