/*!
A generic, parameterized implementation of IEEE 754-2019 binary
floating-point arithmetic.

Unlike a hardwired `f32`/`f64` implementation, every operation here is
generic over a [`BinaryFormat`](format::BinaryFormat): precision and
exponent range are runtime values, so the same arithmetic, rounding,
and text-conversion code serves `binary16` through `binary128`, the
legacy x87 extended format, and any other format a caller constructs.

This is the API documentation.

A value is a [`Binary`](value::Binary) tagged with the
[`BinaryFormat`](format::BinaryFormat) it belongs to. Every constructive
operation -- arithmetic, conversion, rounding -- funnels through
[`ops::normalize`], the single point where rounding and the IEEE
exception signals (invalid, division by zero, overflow, underflow,
inexact) are decided. Signal *handling* (whether a signal sets a sticky
flag, substitutes a value, or aborts with an error) is configured per
thread through a [`Context`](context::Context); [`ContextGuard`] scopes
a temporary override.

Supported operations include the arithmetic operations (add, subtract,
multiply, divide, fused multiply-add, square root, remainder/fmod),
comparisons and the IEEE min/max family, rounding to an integer and
conversion to a fixed-width two's-complement integer, `scaleb`/`logb`/
`nextUp`/`nextDown`, decimal and hexadecimal text conversion, and the
interchange binary encoding ([`convert::pack`]/[`convert::unpack`]).
*/

pub mod context;
pub mod convert;
pub mod error;
pub mod format;
pub mod formats;
pub mod integer_format;
pub mod ops;
pub mod round;
pub mod signal;
pub mod text;
pub mod value;

pub use crate::context::{Context, ContextGuard, Flags, TininessDetection};
pub use crate::error::{ParseError, ProgrammerError};
pub use crate::format::BinaryFormat;
pub use crate::formats::{binary128, binary16, binary32, binary64, x87_double, x87_extended, x87_single};
pub use crate::integer_format::IntegerFormat;
pub use crate::round::RoundingMode;
pub use crate::signal::{Signal, SignalClass, SignalRaised, StatusFlag};
pub use crate::text::{NanPayloadDisplay, Radix, TextFormat};
pub use crate::value::Binary;
