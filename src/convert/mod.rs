/*!
Conversions between a [`crate::value::Binary`] and the external
representations it interoperates with: decimal and hex text, and the
interchange byte encoding.

Each submodule is grounded on the corresponding section of `ieee754.py`
(`from_string`/`to_string`'s decimal and hex paths, `pack`/`unpack`).
*/

pub mod decimal;
pub mod hex;
pub mod pack;
pub mod to_decimal;

pub use decimal::{decimal_to_binary, parse as parse_decimal};
pub use hex::parse as parse_hex;
pub use pack::{pack, unpack, unpack_to_value, unpack_value, Endianness};
pub use to_decimal::to_decimal_parts;
