use std::str::FromStr;
use thiserror::Error;

/// Behaviour to cast an input `&str` into a typed value, with an optional equality.
///
/// Casting is mandatory: every option type must say how a raw token becomes a value.
/// Equality is a capability the type may opt into via [`ArgValue::equality`].
/// It is only consulted for allow-lists ([`ArgHandle::options`](./struct.ArgHandle.html#method.options)).
/// Types without equality cannot carry an allow-list; attempting so is a configuration error.
///
/// `argmill` provides implementations for `bool`, `char`, `String`, and all the integer & floating point primitives.
///
/// Values must be `Send`, since options registered on the [`GlobalRegistry`](./struct.GlobalRegistry.html) are shared across the process.
///
/// ### Example
/// ```
/// # use argmill_builder as argmill;
/// use argmill::{cast_from_str, equatable, ArgValue, CastError};
/// use std::str::FromStr;
///
/// #[derive(Debug, PartialEq)]
/// struct Port(u16);
///
/// impl FromStr for Port {
///     type Err = std::num::ParseIntError;
///
///     fn from_str(value: &str) -> Result<Self, Self::Err> {
///         Ok(Port(u16::from_str(value)?))
///     }
/// }
///
/// impl ArgValue for Port {
///     fn cast(token: &str) -> Result<Self, CastError> {
///         cast_from_str(token)
///     }
///
///     fn equality() -> Option<fn(&Self, &Self) -> bool> {
///         equatable()
///     }
/// }
///
/// assert_eq!(Port::cast("8080").unwrap(), Port(8080));
/// assert!(Port::cast("80eighty").is_err());
/// ```
pub trait ArgValue: Sized + Send + 'static {
    /// Cast the raw `token` into a value.
    fn cast(token: &str) -> Result<Self, CastError>;

    /// The equality capability of this type, if any.
    fn equality() -> Option<fn(&Self, &Self) -> bool> {
        None
    }
}

/// The error produced when a raw token cannot be cast into a value.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CastError {
    /// The token is not a valid textual representation of the type.
    #[error("cannot convert '{token}' to {type_name}")]
    InvalidConversion {
        /// The offending token.
        token: String,
        /// The target type.
        type_name: &'static str,
    },

    /// A custom caster rejected the token.
    #[error("cannot convert '{token}': {message}")]
    Rejected {
        /// The offending token.
        token: String,
        /// The reason given by the caster.
        message: String,
    },
}

/// Cast a token via [`std::str::FromStr`].
///
/// The whole token must parse; trailing unconsumed characters are a failure.
///
/// ### Example
/// ```
/// # use argmill_builder as argmill;
/// use argmill::cast_from_str;
///
/// assert_eq!(cast_from_str::<u32>("42").unwrap(), 42);
/// assert!(cast_from_str::<u32>("42x").is_err());
/// ```
pub fn cast_from_str<T: FromStr>(token: &str) -> Result<T, CastError> {
    T::from_str(token).map_err(|_| CastError::InvalidConversion {
        token: token.to_string(),
        type_name: std::any::type_name::<T>(),
    })
}

/// The equality capability for any `PartialEq` type.
/// Use in [`ArgValue::equality`] to opt into allow-lists.
pub fn equatable<T: PartialEq>() -> Option<fn(&T, &T) -> bool> {
    let equals: fn(&T, &T) -> bool = |a, b| a == b;
    Some(equals)
}

impl ArgValue for bool {
    fn cast(token: &str) -> Result<Self, CastError> {
        match token {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(CastError::InvalidConversion {
                token: token.to_string(),
                type_name: "bool",
            }),
        }
    }

    fn equality() -> Option<fn(&Self, &Self) -> bool> {
        equatable()
    }
}

impl ArgValue for String {
    fn cast(token: &str) -> Result<Self, CastError> {
        Ok(token.to_string())
    }

    fn equality() -> Option<fn(&Self, &Self) -> bool> {
        equatable()
    }
}

macro_rules! from_str_value {
    ($($t:ty),* $(,)?) => {
        $(
            impl ArgValue for $t {
                fn cast(token: &str) -> Result<Self, CastError> {
                    cast_from_str(token)
                }

                fn equality() -> Option<fn(&Self, &Self) -> bool> {
                    equatable()
                }
            }
        )*
    };
}

from_str_value!(
    char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);
