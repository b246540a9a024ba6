//! Builder module for `argmill`.
//! See [documentation root](https://docs.rs/argmill/latest/argmill/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod model;
mod parser;
pub mod prelude;
mod registry;

pub use api::*;
pub use model::*;
pub use parser::ArgError;

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
