use std::sync::MutexGuard;

use crate::api::capture::ArgValue;
use crate::api::global::GlobalRegistry;
use crate::api::parameter::*;
use crate::constant::positional_name;
use crate::parser::{ArgError, Offset, Printer, ScanError, Scanner};
use crate::registry::{Entry, Holder, Registry};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The command line parser.
///
/// Declare the options and positional arguments, then parse the tokens.
/// Values are read back through the handles returned at declaration.
///
/// By default, the parser honours the process-wide [`GlobalRegistry`]: global options are recognized while parsing,
/// and local options may not collide with them.
///
/// ### Example
/// ```
/// # use argmill_builder as argmill;
/// use argmill::Parser;
///
/// let mut parser = Parser::new();
/// let verbose = parser.add_flag("verbose", Some('v'), "Increase verbosity.").unwrap();
/// let jobs = parser
///     .add_arg::<u32>("jobs", Some('j'), "Number of jobs.")
///     .unwrap()
///     .default(1)
///     .unwrap();
/// let target = parser.add_positional_arg::<String>("The target.").unwrap();
///
/// parser
///     .parse_args(&["make", "-v", "-j4", "all"], None)
///     .unwrap();
///
/// assert!(verbose.is_set());
/// assert_eq!(jobs.get(), Some(4));
/// assert_eq!(target.get(), Some("all".to_string()));
/// ```
#[derive(Debug)]
pub struct Parser {
    global: Option<GlobalRegistry>,
    named: Registry,
    positionals: Registry,
    free_args: Option<Vec<String>>,
    tail_args: Vec<String>,
    help_requested: bool,
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser {
    /// Create a parser which honours the process-wide [`GlobalRegistry::instance`].
    pub fn new() -> Self {
        Self::with_global_registry(GlobalRegistry::instance())
    }

    /// Create a parser which honours the given `global` registry.
    pub fn with_global_registry(global: GlobalRegistry) -> Self {
        Self::build(Some(global))
    }

    /// Create a parser which honours no global registry.
    pub fn isolated() -> Self {
        Self::build(None)
    }

    fn build(global: Option<GlobalRegistry>) -> Self {
        Self {
            global,
            named: Registry::default(),
            positionals: Registry::default(),
            free_args: None,
            tail_args: Vec::default(),
            help_requested: false,
        }
    }

    /// Stop honouring the global registry.
    /// Global options are no longer recognized, and local options may reuse their names.
    ///
    /// Call this before declaring local options.
    pub fn ignore_global_registry(&mut self) -> &mut Self {
        self.global = None;
        self
    }

    /// Collect the tokens left over after all positional arguments are filled.
    /// Without this, such tokens are a parse error.
    ///
    /// ### Example
    /// ```
    /// # use argmill_builder as argmill;
    /// use argmill::Parser;
    ///
    /// let mut parser = Parser::isolated();
    /// parser.enable_free_args();
    ///
    /// parser.parse_args(&["program", "a", "b"], None).unwrap();
    /// assert_eq!(parser.free_args(), &["a", "b"]);
    /// ```
    pub fn enable_free_args(&mut self) -> &mut Self {
        self.free_args.get_or_insert_with(Vec::default);
        self
    }

    fn check_global(&self, fullname: &str, shortname: Option<char>) -> Result<(), ArgError> {
        if let Some(global) = &self.global {
            global.registry().check(fullname, shortname)?;
        }

        Ok(())
    }

    fn register_option(
        &mut self,
        fullname: &str,
        shortname: Option<char>,
        help: String,
        holder: Holder,
    ) -> Result<(), ArgError> {
        self.check_global(fullname, shortname)?;
        self.named
            .register(Entry::option(fullname, shortname, help, holder))?;
        Ok(())
    }

    /// Declare a flag option: `--fullname` or `-s`, taking no values.
    ///
    /// Fails if `fullname` is `help`, or if `fullname` or `shortname` are already declared.
    pub fn add_flag(
        &mut self,
        fullname: &str,
        shortname: Option<char>,
        help: impl Into<String>,
    ) -> Result<FlagHandle, ArgError> {
        let help = help.into();
        let (handle, holder) = FlagHandle::create(fullname, shortname, help.clone());
        self.register_option(fullname, shortname, help, holder)?;
        Ok(handle)
    }

    /// Declare a single-valued option: `--fullname VALUE`, `--fullname=VALUE`, `-s VALUE` or `-sVALUE`.
    ///
    /// Fails if `fullname` is `help`, or if `fullname` or `shortname` are already declared.
    pub fn add_arg<T: ArgValue>(
        &mut self,
        fullname: &str,
        shortname: Option<char>,
        help: impl Into<String>,
    ) -> Result<ArgHandle<T>, ArgError> {
        let help = help.into();
        let (handle, holder) = ArgHandle::create(fullname, shortname, help.clone());
        self.register_option(fullname, shortname, help, holder)?;
        Ok(handle)
    }

    /// Declare a multi-valued option; each occurrence contributes one value.
    ///
    /// Fails if `fullname` is `help`, or if `fullname` or `shortname` are already declared.
    pub fn add_multi_arg<T: ArgValue>(
        &mut self,
        fullname: &str,
        shortname: Option<char>,
        help: impl Into<String>,
    ) -> Result<MultiArgHandle<T>, ArgError> {
        let help = help.into();
        let (handle, holder) = MultiArgHandle::create(fullname, shortname, help.clone());
        self.register_option(fullname, shortname, help, holder)?;
        Ok(handle)
    }

    /// Declare the next positional argument.
    /// Positional arguments are filled in the order they are declared, and are named `arg0`, `arg1`, etc.
    pub fn add_positional_arg<T: ArgValue>(
        &mut self,
        help: impl Into<String>,
    ) -> Result<ArgHandle<T>, ArgError> {
        let name = positional_name(self.positionals.len());
        let help = help.into();
        let (handle, holder) = ArgHandle::create(name.clone(), None, help.clone());
        self.positionals
            .register(Entry::argument(name, help, holder))?;
        Ok(handle)
    }

    /// Parse the `tokens` (where `tokens[0]` is the program name) into the declared options.
    ///
    /// When `tail_marker` is given, every token after its first occurrence is collected verbatim into [`Parser::tail_args`].
    /// After all the tokens are consumed, every required option must have a value.
    ///
    /// If a `--help` token is encountered, parsing stops there and [`Parser::help_requested`] is set.
    ///
    /// ### Example
    /// ```
    /// # use argmill_builder as argmill;
    /// use argmill::Parser;
    ///
    /// let mut parser = Parser::isolated();
    /// let name = parser.add_arg::<String>("name", None, "").unwrap().required().unwrap();
    ///
    /// parser
    ///     .parse_args(&["program", "--name", "x", "--", "--name", "y"], Some("--"))
    ///     .unwrap();
    ///
    /// assert_eq!(name.get(), Some("x".to_string()));
    /// assert_eq!(parser.tail_args(), &["--name", "y"]);
    /// ```
    pub fn parse_args<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
        tail_marker: Option<&str>,
    ) -> Result<(), ArgError> {
        self.scan_tokens(tokens, tail_marker)
            .map_err(|(_, error)| error)
    }

    pub(crate) fn scan_tokens<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
        tail_marker: Option<&str>,
    ) -> Result<(), (Option<Offset>, ArgError)> {
        #[cfg(feature = "tracing_debug")]
        {
            debug!(
                "Parsing {n} tokens (tail marker: {tail_marker:?}, global registry: {g}).",
                n = tokens.len(),
                g = self.global.is_some(),
            );
        }

        let global = self.global.as_ref().map(GlobalRegistry::registry);
        let outcome = {
            let scanner = Scanner::new(
                self.namespace(&global),
                &self.positionals,
                self.free_args.is_some(),
                tail_marker,
            );
            scanner
                .scan(tokens)
                .map_err(|(offset, error)| (Some(offset), ArgError::from(error)))?
        };

        if !outcome.help_requested {
            validate_required(&global, &self.named, &self.positionals)
                .map_err(|error| (None, ArgError::from(error)))?;
        }

        if let Some(free_args) = &mut self.free_args {
            free_args.extend(outcome.free_args);
        }

        self.tail_args.extend(outcome.tail_args);
        self.help_requested = outcome.help_requested;
        Ok(())
    }

    // Global lookups come before local ones.
    fn namespace<'a>(&'a self, global: &'a Option<MutexGuard<'_, Registry>>) -> Vec<&'a Registry> {
        let mut named = Vec::default();

        if let Some(global) = global {
            named.push(&**global);
        }

        named.push(&self.named);
        named
    }

    /// Render the help message for `program`, describing every recognized option and positional argument.
    ///
    /// ### Example
    /// ```
    /// # use argmill_builder as argmill;
    /// use argmill::Parser;
    ///
    /// let mut parser = Parser::isolated();
    /// parser.add_flag("verbose", Some('v'), "Increase verbosity.").unwrap();
    ///
    /// let help = parser.help("program");
    /// assert!(help.starts_with("usage: program [--help] [-v]"));
    /// ```
    pub fn help(&self, program: impl Into<String>) -> String {
        self.printer().render(program).join("\n")
    }

    pub(crate) fn printer(&self) -> Printer {
        let global = self.global.as_ref().map(GlobalRegistry::registry);
        let printer = Printer::terminal(&self.namespace(&global), &self.positionals);
        printer
    }

    /// The free arguments collected by parsing (empty unless [`Parser::enable_free_args`]).
    pub fn free_args(&self) -> &[String] {
        self.free_args.as_deref().unwrap_or_default()
    }

    /// The tail arguments collected by parsing.
    pub fn tail_args(&self) -> &[String] {
        &self.tail_args
    }

    /// Whether parsing stopped at a `--help` token.
    pub fn help_requested(&self) -> bool {
        self.help_requested
    }
}

// Global first, then local named, then positional.
fn validate_required(
    global: &Option<MutexGuard<'_, Registry>>,
    named: &Registry,
    positionals: &Registry,
) -> Result<(), ScanError> {
    if let Some(global) = global {
        global.validate_all_required()?;
    }

    named.validate_all_required()?;
    positionals.validate_all_required()
}
