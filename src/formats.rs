/*!
Well-known binary formats: the IEEE 754 interchange widths and the
80387-style "x87" extended/double/single formats used by legacy x86 FPUs.

Grounded on `ieee754.py`'s module-level `IEEE754_BinaryFormat`/`x87*`
constructors.
*/

use crate::format::BinaryFormat;

/// IEEE 754 binary16 (precision 11, 5-bit exponent field).
pub fn binary16() -> BinaryFormat {
    BinaryFormat::from_ieee(16).expect("binary16 parameters are always valid")
}

/// IEEE 754 binary32 (precision 24, 8-bit exponent field).
pub fn binary32() -> BinaryFormat {
    BinaryFormat::from_ieee(32).expect("binary32 parameters are always valid")
}

/// IEEE 754 binary64 (precision 53, 11-bit exponent field).
pub fn binary64() -> BinaryFormat {
    BinaryFormat::from_ieee(64).expect("binary64 parameters are always valid")
}

/// IEEE 754 binary128 (precision 113, 15-bit exponent field).
pub fn binary128() -> BinaryFormat {
    BinaryFormat::from_ieee(128).expect("binary128 parameters are always valid")
}

/// x87 80-bit double extended: an explicit 64-bit significand (no implicit
/// integer bit) and a 15-bit exponent field, matching the historical
/// `long double` layout.
pub fn x87_extended() -> BinaryFormat {
    BinaryFormat::from_precision_extended(64, 15).expect("x87 extended parameters are always valid")
}

/// x87 FPU register contents truncated to `double` precision (53 bits)
/// but retaining the 15-bit exponent field of the extended format.
pub fn x87_double() -> BinaryFormat {
    BinaryFormat::from_precision_extended(53, 15).expect("x87 double parameters are always valid")
}

/// x87 FPU register contents truncated to `single` precision (24 bits)
/// but retaining the 15-bit exponent field of the extended format.
pub fn x87_single() -> BinaryFormat {
    BinaryFormat::from_precision_extended(24, 15).expect("x87 single parameters are always valid")
}
