mod base;
mod interface;
mod middleware;
mod printer;

pub use base::ArgError;
pub(crate) use base::{Offset, ScanError, Scanner};
pub(crate) use interface::*;
pub(crate) use printer::*;
