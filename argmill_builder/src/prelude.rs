//! Traits & helpers which, typically, may be imported without concern: `use argmill::prelude::*`.
//!
//! Needed in order to implement [`ArgValue`] for a custom type.
pub use crate::api::{cast_from_str, equatable, ArgValue, CastError};
