use std::sync::{Arc, Mutex};

use crate::api::capture::*;
use crate::api::field::*;
use crate::model::lock;
use crate::parser::ArgError;
use crate::registry::Holder;

fn wrap_caster<T, F, E>(caster: F) -> Caster<T>
where
    F: Fn(&str) -> Result<T, E> + Send + 'static,
    E: std::fmt::Display,
{
    Box::new(move |token: &str| {
        caster(token).map_err(|error| CastError::Rejected {
            token: token.to_string(),
            message: error.to_string(),
        })
    })
}

#[derive(Debug, Clone)]
struct Descriptor {
    fullname: String,
    shortname: Option<char>,
    help: String,
}

/// The handle to a flag option (takes no values).
/// Each occurrence on the command line increments its count.
///
/// Created via [`Parser::add_flag`](./struct.Parser.html#method.add_flag).
///
/// ### Example
/// ```
/// # use argmill_builder as argmill;
/// use argmill::Parser;
///
/// let mut parser = Parser::isolated();
/// let verbose = parser.add_flag("verbose", Some('v'), "Increase verbosity.").unwrap();
///
/// parser.parse_args(&["program", "-vvv"], None).unwrap();
///
/// assert!(verbose.is_set());
/// assert_eq!(verbose.count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct FlagHandle {
    field: Arc<Mutex<FlagField>>,
    descriptor: Descriptor,
}

impl FlagHandle {
    pub(crate) fn create(
        fullname: impl Into<String>,
        shortname: Option<char>,
        help: impl Into<String>,
    ) -> (Self, Holder) {
        let field = Arc::new(Mutex::new(FlagField::default()));
        let handle = Self {
            field: field.clone(),
            descriptor: Descriptor {
                fullname: fullname.into(),
                shortname,
                help: help.into(),
            },
        };
        (handle, Holder::Flag(field))
    }

    /// The number of times this flag occurred.
    pub fn count(&self) -> usize {
        lock(&self.field).count()
    }

    /// Whether this flag occurred at all.
    pub fn is_set(&self) -> bool {
        self.count() > 0
    }

    /// The fullname of this flag.
    pub fn fullname(&self) -> &str {
        &self.descriptor.fullname
    }

    /// The shortname of this flag, if any.
    pub fn shortname(&self) -> Option<char> {
        self.descriptor.shortname
    }

    /// The help message of this flag.
    pub fn help(&self) -> &str {
        &self.descriptor.help
    }
}

/// The handle to a single-valued option or positional argument.
///
/// Created via [`Parser::add_arg`](./struct.Parser.html#method.add_arg) or [`Parser::add_positional_arg`](./struct.Parser.html#method.add_positional_arg).
/// The modifiers ([`ArgHandle::required`], [`ArgHandle::default`], [`ArgHandle::options`]) validate the option's configuration as a whole.
/// An incompatible combination is reported identically regardless of the order the modifiers are applied in.
///
/// ### Example
/// ```
/// # use argmill_builder as argmill;
/// use argmill::Parser;
///
/// let mut parser = Parser::isolated();
/// let level = parser
///     .add_arg::<u8>("level", Some('l'), "The compression level.")
///     .unwrap()
///     .default(6)
///     .unwrap()
///     .options(vec![1, 6, 9])
///     .unwrap();
///
/// parser.parse_args(&["program", "-l", "9"], None).unwrap();
///
/// assert_eq!(level.get(), Some(9));
/// ```
pub struct ArgHandle<T> {
    field: Arc<Mutex<ScalarField<T>>>,
    descriptor: Descriptor,
}

impl<T> Clone for ArgHandle<T> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            descriptor: self.descriptor.clone(),
        }
    }
}

impl<T> std::fmt::Debug for ArgHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ArgHandle[{t}, {name}]",
            t = std::any::type_name::<T>(),
            name = self.descriptor.fullname,
        )
    }
}

impl<T: ArgValue> ArgHandle<T> {
    pub(crate) fn create(
        fullname: impl Into<String>,
        shortname: Option<char>,
        help: impl Into<String>,
    ) -> (Self, Holder) {
        let fullname = fullname.into();
        let field = Arc::new(Mutex::new(ScalarField::new(fullname.clone())));
        let handle = Self {
            field: field.clone(),
            descriptor: Descriptor {
                fullname,
                shortname,
                help: help.into(),
            },
        };
        (handle, Holder::Single(field))
    }

    /// Require that this option is given a value.
    /// Checked after all tokens are parsed.
    ///
    /// Incompatible with [`ArgHandle::default`].
    pub fn required(self) -> Result<Self, ArgError> {
        lock(&self.field).set_required()?;
        Ok(self)
    }

    /// Set the value held when the option is not specified.
    /// The first explicit value replaces it.
    ///
    /// Incompatible with [`ArgHandle::required`]; must be among the [`ArgHandle::options`], if set.
    pub fn default(self, value: T) -> Result<Self, ArgError> {
        lock(&self.field).set_default(value)?;
        Ok(self)
    }

    /// Restrict the option to the given (non-empty) allow-list.
    ///
    /// Requires that `T` has the equality capability (see [`ArgValue::equality`]).
    ///
    /// ### Example
    /// ```
    /// # use argmill_builder as argmill;
    /// use argmill::Parser;
    ///
    /// let mut parser = Parser::isolated();
    /// parser
    ///     .add_arg::<u32>("integer", None, "")
    ///     .unwrap()
    ///     .options(vec![1, 2])
    ///     .unwrap();
    ///
    /// assert!(parser.parse_args(&["program", "--integer", "5"], None).is_err());
    /// ```
    pub fn options(self, options: Vec<T>) -> Result<Self, ArgError> {
        lock(&self.field).set_options(options)?;
        Ok(self)
    }

    /// Cast the raw values of this option with `caster`, instead of [`ArgValue::cast`].
    ///
    /// ### Example
    /// ```
    /// # use argmill_builder as argmill;
    /// use argmill::Parser;
    /// use std::str::FromStr;
    ///
    /// let mut parser = Parser::isolated();
    /// let root = parser
    ///     .add_arg::<f64>("number", None, "")
    ///     .unwrap()
    ///     .cast_using(|token| f64::from_str(token).map(f64::sqrt));
    ///
    /// parser.parse_args(&["program", "--number", "64"], None).unwrap();
    ///
    /// assert_eq!(root.get(), Some(8.0));
    /// ```
    pub fn cast_using<F, E>(self, caster: F) -> Self
    where
        F: Fn(&str) -> Result<T, E> + Send + 'static,
        E: std::fmt::Display,
    {
        lock(&self.field).set_caster(wrap_caster(caster));
        self
    }

    /// Whether this option holds a value (explicit or default).
    pub fn has_value(&self) -> bool {
        lock(&self.field).has_value()
    }

    /// Apply `f` to the value of this option, if any.
    ///
    /// ### Example
    /// ```
    /// # use argmill_builder as argmill;
    /// use argmill::Parser;
    ///
    /// let mut parser = Parser::isolated();
    /// let path = parser.add_arg::<String>("path", None, "").unwrap();
    ///
    /// parser.parse_args(&["program", "--path", "a/b/c"], None).unwrap();
    ///
    /// assert_eq!(path.with_value(|path| path.len()), Some(5));
    /// ```
    pub fn with_value<R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        lock(&self.field).value().map(f)
    }

    /// Whether this option must be given a value.
    pub fn is_required(&self) -> bool {
        lock(&self.field).is_required()
    }

    /// The fullname of this option.
    pub fn fullname(&self) -> &str {
        &self.descriptor.fullname
    }

    /// The shortname of this option, if any.
    pub fn shortname(&self) -> Option<char> {
        self.descriptor.shortname
    }

    /// The help message of this option.
    pub fn help(&self) -> &str {
        &self.descriptor.help
    }
}

impl<T: ArgValue + Clone> ArgHandle<T> {
    /// Get a copy of the value of this option, if any.
    pub fn get(&self) -> Option<T> {
        self.with_value(T::clone)
    }
}

/// The handle to a multi-valued option.
/// Each occurrence on the command line appends one value.
///
/// Created via [`Parser::add_multi_arg`](./struct.Parser.html#method.add_multi_arg).
///
/// ### Example
/// ```
/// # use argmill_builder as argmill;
/// use argmill::Parser;
///
/// let mut parser = Parser::isolated();
/// let include = parser.add_multi_arg::<String>("include", Some('I'), "").unwrap();
///
/// parser
///     .parse_args(&["program", "-I", "src", "--include=lib", "-Itests"], None)
///     .unwrap();
///
/// assert_eq!(include.values(), vec!["src", "lib", "tests"]);
/// ```
pub struct MultiArgHandle<T> {
    field: Arc<Mutex<CollectionField<T>>>,
    descriptor: Descriptor,
}

impl<T> Clone for MultiArgHandle<T> {
    fn clone(&self) -> Self {
        Self {
            field: self.field.clone(),
            descriptor: self.descriptor.clone(),
        }
    }
}

impl<T> std::fmt::Debug for MultiArgHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "MultiArgHandle[{t}, {name}]",
            t = std::any::type_name::<T>(),
            name = self.descriptor.fullname,
        )
    }
}

impl<T: ArgValue> MultiArgHandle<T> {
    pub(crate) fn create(
        fullname: impl Into<String>,
        shortname: Option<char>,
        help: impl Into<String>,
    ) -> (Self, Holder) {
        let fullname = fullname.into();
        let field = Arc::new(Mutex::new(CollectionField::new(fullname.clone())));
        let handle = Self {
            field: field.clone(),
            descriptor: Descriptor {
                fullname,
                shortname,
                help: help.into(),
            },
        };
        (handle, Holder::Multi(field))
    }

    /// Require that this option is given at least one value.
    /// Checked after all tokens are parsed.
    ///
    /// Incompatible with [`MultiArgHandle::default`].
    pub fn required(self) -> Result<Self, ArgError> {
        lock(&self.field).set_required()?;
        Ok(self)
    }

    /// Set the values held when the option is not specified.
    /// They are discarded entirely on the first explicit value.
    pub fn default(self, values: Vec<T>) -> Result<Self, ArgError> {
        lock(&self.field).set_defaults(values)?;
        Ok(self)
    }

    /// Restrict every value of the option to the given (non-empty) allow-list.
    ///
    /// Requires that `T` has the equality capability (see [`ArgValue::equality`]).
    pub fn options(self, options: Vec<T>) -> Result<Self, ArgError> {
        lock(&self.field).set_options(options)?;
        Ok(self)
    }

    /// Cast the raw values of this option with `caster`, instead of [`ArgValue::cast`].
    pub fn cast_using<F, E>(self, caster: F) -> Self
    where
        F: Fn(&str) -> Result<T, E> + Send + 'static,
        E: std::fmt::Display,
    {
        lock(&self.field).set_caster(wrap_caster(caster));
        self
    }

    /// Whether this option holds any values (explicit or default).
    pub fn has_value(&self) -> bool {
        lock(&self.field).has_value()
    }

    /// Apply `f` to the values of this option, in the order they were given.
    pub fn with_values<R>(&self, f: impl FnOnce(&[T]) -> R) -> R {
        f(lock(&self.field).values())
    }

    /// The number of values.
    pub fn size(&self) -> usize {
        self.with_values(<[T]>::len)
    }

    /// Whether there are no values.
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Whether this option must be given a value.
    pub fn is_required(&self) -> bool {
        lock(&self.field).is_required()
    }

    /// The fullname of this option.
    pub fn fullname(&self) -> &str {
        &self.descriptor.fullname
    }

    /// The shortname of this option, if any.
    pub fn shortname(&self) -> Option<char> {
        self.descriptor.shortname
    }

    /// The help message of this option.
    pub fn help(&self) -> &str {
        &self.descriptor.help
    }
}

impl<T: ArgValue + Clone> MultiArgHandle<T> {
    /// Get a copy of the values of this option, in the order they were given.
    pub fn values(&self) -> Vec<T> {
        self.with_values(<[T]>::to_vec)
    }

    /// Get a copy of the value at `index`, if any.
    pub fn at(&self, index: usize) -> Option<T> {
        self.with_values(|values| values.get(index).cloned())
    }
}
