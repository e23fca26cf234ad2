/*!
[`TextFormat`]: a pure formatter controlling how a [`crate::value::Binary`]
is rendered as hex or decimal text. Formatting never rounds (decimal
rendering with an explicit precision aside, which funnels through
[`crate::convert::to_decimal`] the same way parsing funnels through
[`crate::ops::normalize`]); this module only assembles digits that other
modules already computed into the requested surface syntax.

Grounded on `ieee754.py`'s `to_string` and its format-option handling.
*/

use crate::context::Context;
use crate::convert::hex;
use crate::convert::to_decimal::to_decimal_parts;
use crate::round::RoundingMode;
use crate::signal::{SignalClass, SignalRaised};
use crate::value::Binary;

/// Which radix to render in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Radix {
    Hex,
    Decimal,
}

/// How to render a NaN's payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NanPayloadDisplay {
    /// Omit the payload entirely.
    None,
    Hex,
    Decimal,
}

/// Formatting options. Every field has a sensible default via
/// [`TextFormat::new`]; use the `with_*` builders to change one at a time.
#[derive(Clone, Debug)]
pub struct TextFormat {
    /// Non-negative: always print the exponent with at least this many
    /// digits (`0` suppresses the exponent entirely for decimal).
    /// Negative: printf `%g`-style minimum digit count computed from
    /// `|value|` (hex treats any negative value as `1`).
    pub exp_digits: i32,
    pub force_exp_sign: bool,
    pub force_leading_sign: bool,
    pub force_point: bool,
    pub upper_case: bool,
    pub rstrip_zeroes: bool,
    pub inf: String,
    pub qnan: String,
    /// Empty means "emit as quiet and raise `InvalidToString`".
    pub snan: String,
    pub nan_payload: NanPayloadDisplay,
}

impl Default for TextFormat {
    fn default() -> Self {
        TextFormat {
            exp_digits: -1,
            force_exp_sign: false,
            force_leading_sign: false,
            force_point: false,
            upper_case: false,
            rstrip_zeroes: false,
            inf: "inf".to_string(),
            qnan: "nan".to_string(),
            snan: "snan".to_string(),
            nan_payload: NanPayloadDisplay::None,
        }
    }
}

impl TextFormat {
    pub fn new() -> Self {
        TextFormat::default()
    }

    pub fn with_exp_digits(mut self, n: i32) -> Self {
        self.exp_digits = n;
        self
    }

    pub fn with_upper_case(mut self, v: bool) -> Self {
        self.upper_case = v;
        self
    }

    pub fn with_rstrip_zeroes(mut self, v: bool) -> Self {
        self.rstrip_zeroes = v;
        self
    }

    pub fn with_nan_payload(mut self, v: NanPayloadDisplay) -> Self {
        self.nan_payload = v;
        self
    }

    fn sign_prefix(&self, sign: bool) -> &'static str {
        if sign {
            "-"
        } else if self.force_leading_sign {
            "+"
        } else {
            ""
        }
    }

    fn format_exponent(&self, exp: i64, min_digits_hint: u32) -> String {
        let sign_char = if exp < 0 {
            "-"
        } else if self.force_exp_sign {
            "+"
        } else {
            ""
        };
        let magnitude = exp.unsigned_abs();
        let digits = if self.exp_digits >= 0 {
            self.exp_digits as u32
        } else {
            min_digits_hint.max(1)
        };
        format!("{}{:0width$}", sign_char, magnitude, width = digits as usize)
    }

    fn nan_suffix(&self, payload: Option<rug::Integer>) -> String {
        match (self.nan_payload, payload) {
            (NanPayloadDisplay::None, _) | (_, None) => String::new(),
            (NanPayloadDisplay::Hex, Some(p)) => format!("0x{:x}", p),
            (NanPayloadDisplay::Decimal, Some(p)) => p.to_string(),
        }
    }

    /// Render `value` under `radix`. `precision` only affects decimal
    /// rendering: `0` is shortest round-tripping, negative is the exact
    /// expansion, positive is that many significant digits (all per
    /// [`to_decimal_parts`]).
    pub fn format(
        &self,
        ctx: &mut Context,
        value: &Binary,
        radix: Radix,
        precision: i64,
    ) -> Result<String, SignalRaised> {
        if value.is_nan() {
            let signalling = value.is_signalling_nan();
            let placeholder = if signalling { &self.snan } else { &self.qnan };
            let (text, quieted) = if signalling && self.snan.is_empty() {
                (self.qnan.clone(), true)
            } else {
                (placeholder.clone(), false)
            };
            if quieted {
                ctx.signal(SignalClass::InvalidToString, "signalling NaN has no text form", value.clone(), false)?;
            }
            let suffix = self.nan_suffix(value.nan_payload());
            return Ok(format!("{}{}{}", self.sign_prefix(value.sign()), text, suffix));
        }

        if value.is_infinite() {
            return Ok(format!("{}{}", self.sign_prefix(value.sign()), self.inf));
        }

        if value.is_zero() {
            return Ok(self.format_zero(value.sign(), radix));
        }

        match radix {
            Radix::Hex => Ok(self.format_hex(value)),
            Radix::Decimal => Ok(self.format_decimal(value, precision)),
        }
    }

    fn format_zero(&self, sign: bool, radix: Radix) -> String {
        let prefix = self.sign_prefix(sign);
        match radix {
            Radix::Hex => {
                let point = if self.force_point { "." } else { "" };
                if self.exp_digits == 0 {
                    format!("{}0x0{}", prefix, point)
                } else {
                    let exp = self.format_exponent(0, 1);
                    format!("{}0x0{}p{}", prefix, point, exp)
                }
            }
            Radix::Decimal => {
                let point = if self.force_point { "." } else { "" };
                if self.exp_digits == 0 {
                    format!("{}0{}", prefix, point)
                } else {
                    let exp = self.format_exponent(0, 1);
                    format!("{}0{}e{}", prefix, point, exp)
                }
            }
        }
    }

    fn format_hex(&self, value: &Binary) -> String {
        let (leading, mut frac, exp) = hex::render_magnitude(value, self.upper_case);
        if self.rstrip_zeroes {
            frac = frac.trim_end_matches('0').to_string();
        }
        let point = if !frac.is_empty() || self.force_point { "." } else { "" };
        let min_digits = if self.exp_digits < 0 { 1 } else { self.exp_digits as u32 };
        let exp_str = self.format_exponent(exp, min_digits);
        let prefix_x = if self.upper_case { "0X" } else { "0x" };
        let p_char = if self.upper_case { "P" } else { "p" };
        format!(
            "{}{}{}{}{}{}{}",
            self.sign_prefix(value.sign()),
            prefix_x,
            leading,
            point,
            frac,
            p_char,
            exp_str
        )
    }

    fn format_decimal(&self, value: &Binary, precision: i64) -> String {
        let (exp_of_leading, mut digits, _inexact) = to_decimal_parts(value, precision, RoundingMode::HalfEven);
        if self.rstrip_zeroes && precision != 0 {
            let trimmed = digits.trim_end_matches('0');
            digits = if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() };
        }

        let min_digits_hint = {
            let n = digits.len() as u32;
            (format!("{}", n)).len() as u32
        };

        if self.exp_digits == 0 {
            // Suppress scientific notation: render a plain fixed-point number.
            return self.format_decimal_fixed(value.sign(), exp_of_leading, &digits);
        }

        let mut mantissa = String::new();
        mantissa.push(digits.as_bytes()[0] as char);
        let rest = &digits[1..];
        if !rest.is_empty() || self.force_point {
            mantissa.push('.');
            mantissa.push_str(rest);
        }

        let exp_str = self.format_exponent(exp_of_leading, min_digits_hint);
        format!("{}{}e{}", self.sign_prefix(value.sign()), mantissa, exp_str)
    }

    fn format_decimal_fixed(&self, sign: bool, exp_of_leading: i64, digits: &str) -> String {
        let prefix = self.sign_prefix(sign);
        if exp_of_leading >= 0 {
            let int_len = (exp_of_leading + 1) as usize;
            if digits.len() <= int_len {
                let mut s = digits.to_string();
                s.push_str(&"0".repeat(int_len - digits.len()));
                if self.force_point {
                    s.push('.');
                }
                format!("{}{}", prefix, s)
            } else {
                let (int_part, frac_part) = digits.split_at(int_len);
                format!("{}{}.{}", prefix, int_part, frac_part)
            }
        } else {
            let leading_zeroes = (-exp_of_leading - 1) as usize;
            format!("{}0.{}{}", prefix, "0".repeat(leading_zeroes), digits)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::BinaryFormat;
    use crate::ops::normalize;
    use rug::Integer;

    fn fmt() -> BinaryFormat {
        BinaryFormat::from_ieee(64).unwrap()
    }

    fn from_u64(format: &BinaryFormat, ctx: &mut Context, v: u64) -> Binary {
        normalize(ctx, format, false, 0, Integer::from(v)).unwrap()
    }

    #[test]
    fn renders_infinity_and_nan_placeholders() {
        let mut ctx = Context::new();
        let f = fmt();
        let tf = TextFormat::new();
        let inf = Binary::infinity(f.clone(), true);
        assert_eq!(tf.format(&mut ctx, &inf, Radix::Decimal, 0).unwrap(), "-inf");
        let nan = Binary::nan(f, false, true, Integer::from(0));
        assert_eq!(tf.format(&mut ctx, &nan, Radix::Decimal, 0).unwrap(), "nan");
    }

    #[test]
    fn empty_snan_placeholder_quiets_and_signals() {
        let mut ctx = Context::new();
        let f = fmt();
        let tf = TextFormat::new();
        let snan = Binary::nan(f, false, false, Integer::from(3));
        let rendered = tf.format(&mut ctx, &snan, Radix::Decimal, 0).unwrap();
        assert_eq!(rendered, "nan");
        assert!(ctx.flags().invalid);
    }

    #[test]
    fn decimal_scientific_round_trips_digits() {
        let mut ctx = Context::new();
        let f = fmt();
        let tf = TextFormat::new();
        let v = from_u64(&f, &mut ctx, 150);
        let rendered = tf.format(&mut ctx, &v, Radix::Decimal, 0).unwrap();
        assert_eq!(rendered, "1.5e2");
    }

    #[test]
    fn decimal_fixed_suppresses_exponent() {
        let mut ctx = Context::new();
        let f = fmt();
        let tf = TextFormat::new().with_exp_digits(0);
        let v = from_u64(&f, &mut ctx, 150);
        let rendered = tf.format(&mut ctx, &v, Radix::Decimal, 0).unwrap();
        assert_eq!(rendered, "150");
    }

    #[test]
    fn hex_renders_with_prefix() {
        let mut ctx = Context::new();
        let f = fmt();
        let tf = TextFormat::new();
        let v = from_u64(&f, &mut ctx, 3);
        let rendered = tf.format(&mut ctx, &v, Radix::Hex, 0).unwrap();
        assert!(rendered.starts_with("0x1.8"));
    }
}
