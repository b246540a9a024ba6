mod capture;
mod core;
mod field;
mod global;
mod parameter;

pub use self::core::Parser;
pub use capture::{cast_from_str, equatable, ArgValue, CastError};
pub(crate) use field::*;
pub use global::*;
pub use parameter::*;
