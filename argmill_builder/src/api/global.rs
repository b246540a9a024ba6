use std::sync::{Arc, Mutex, MutexGuard, OnceLock};

use crate::api::capture::ArgValue;
use crate::api::parameter::*;
use crate::model::lock;
use crate::parser::ArgError;
use crate::registry::{Entry, Registry};

static GLOBAL: OnceLock<GlobalRegistry> = OnceLock::new();

/// A registry of options shared across parsers.
///
/// Options registered here are recognized by every [`Parser`](./struct.Parser.html) that honours this registry.
/// Each such parser rejects local options whose fullname or shortname collides with a global one.
///
/// There is one lazily created instance for the whole process ([`GlobalRegistry::instance`]), which [`Parser::new`](./struct.Parser.html#method.new) honours.
/// All registration must happen during program setup, before any parsing.
///
/// ### Example
/// ```
/// # use argmill_builder as argmill;
/// use argmill::{GlobalRegistry, Parser};
///
/// let global = GlobalRegistry::new();
/// let debug = global.add_flag("debug", Some('d'), "Print debug output.").unwrap();
///
/// let mut parser = Parser::with_global_registry(global);
/// assert!(parser.add_flag("debug", None, "").is_err());
///
/// parser.parse_args(&["program", "-d"], None).unwrap();
/// assert!(debug.is_set());
/// ```
#[derive(Debug, Clone, Default)]
pub struct GlobalRegistry {
    inner: Arc<Mutex<Registry>>,
}

impl GlobalRegistry {
    /// Create a standalone registry, to hand to parsers explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry shared by the whole process, created on first use.
    pub fn instance() -> Self {
        GLOBAL.get_or_init(GlobalRegistry::new).clone()
    }

    pub(crate) fn registry(&self) -> MutexGuard<'_, Registry> {
        lock(&self.inner)
    }

    /// Register a flag option.
    /// See [`Parser::add_flag`](./struct.Parser.html#method.add_flag).
    pub fn add_flag(
        &self,
        fullname: &str,
        shortname: Option<char>,
        help: impl Into<String>,
    ) -> Result<FlagHandle, ArgError> {
        let help = help.into();
        let (handle, holder) = FlagHandle::create(fullname, shortname, help.clone());
        self.registry()
            .register(Entry::option(fullname, shortname, help, holder))?;
        Ok(handle)
    }

    /// Register a single-valued option.
    /// See [`Parser::add_arg`](./struct.Parser.html#method.add_arg).
    pub fn add_arg<T: ArgValue>(
        &self,
        fullname: &str,
        shortname: Option<char>,
        help: impl Into<String>,
    ) -> Result<ArgHandle<T>, ArgError> {
        let help = help.into();
        let (handle, holder) = ArgHandle::create(fullname, shortname, help.clone());
        self.registry()
            .register(Entry::option(fullname, shortname, help, holder))?;
        Ok(handle)
    }

    /// Register a multi-valued option.
    /// See [`Parser::add_multi_arg`](./struct.Parser.html#method.add_multi_arg).
    pub fn add_multi_arg<T: ArgValue>(
        &self,
        fullname: &str,
        shortname: Option<char>,
        help: impl Into<String>,
    ) -> Result<MultiArgHandle<T>, ArgError> {
        let help = help.into();
        let (handle, holder) = MultiArgHandle::create(fullname, shortname, help.clone());
        self.registry()
            .register(Entry::option(fullname, shortname, help, holder))?;
        Ok(handle)
    }
}

/// Register a flag option on the process-wide [`GlobalRegistry`].
///
/// ### Example
/// ```
/// # use argmill_builder as argmill;
/// use argmill::{add_global_flag, Parser};
///
/// let quiet = add_global_flag("quiet", Some('q'), "Print nothing.").unwrap();
///
/// let mut parser = Parser::new();
/// parser.parse_args(&["program", "--quiet"], None).unwrap();
/// assert!(quiet.is_set());
/// ```
pub fn add_global_flag(
    fullname: &str,
    shortname: Option<char>,
    help: impl Into<String>,
) -> Result<FlagHandle, ArgError> {
    GlobalRegistry::instance().add_flag(fullname, shortname, help)
}

/// Register a single-valued option on the process-wide [`GlobalRegistry`].
pub fn add_global_arg<T: ArgValue>(
    fullname: &str,
    shortname: Option<char>,
    help: impl Into<String>,
) -> Result<ArgHandle<T>, ArgError> {
    GlobalRegistry::instance().add_arg(fullname, shortname, help)
}

/// Register a multi-valued option on the process-wide [`GlobalRegistry`].
pub fn add_global_multi_arg<T: ArgValue>(
    fullname: &str,
    shortname: Option<char>,
    help: impl Into<String>,
) -> Result<MultiArgHandle<T>, ArgError> {
    GlobalRegistry::instance().add_multi_arg(fullname, shortname, help)
}
