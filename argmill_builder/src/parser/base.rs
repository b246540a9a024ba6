use thiserror::Error;

use crate::api::{ConstraintError, FieldError};
use crate::constant::*;
use crate::registry::{Entry, Registry, RegistryError};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// The error produced by declaring or parsing options.
///
/// Declaration-time misuse (duplicate or reserved names, incompatible modifiers) is a `Config` error.
/// Everything that goes wrong while parsing tokens is a `Parse` error.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgError {
    /// The options were declared incorrectly.
    #[error("Config error: {0}")]
    Config(String),

    /// The tokens do not match the declared options.
    #[error("Parse error: {0}")]
    Parse(String),
}

impl ArgError {
    /// The message of this error, without its category prefix.
    pub fn message(&self) -> &str {
        match self {
            ArgError::Config(message) | ArgError::Parse(message) => message,
        }
    }
}

impl From<RegistryError> for ArgError {
    fn from(error: RegistryError) -> Self {
        ArgError::Config(error.to_string())
    }
}

impl From<ConstraintError> for ArgError {
    fn from(error: ConstraintError) -> Self {
        ArgError::Config(error.to_string())
    }
}

impl From<ScanError> for ArgError {
    fn from(error: ScanError) -> Self {
        ArgError::Parse(error.to_string())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub(crate) enum ScanError {
    #[error("Option '{0}' does not exist.")]
    UnknownOption(String),

    #[error("Short option '{0}' does not exist.")]
    UnknownShortOption(char),

    #[error("No value provided for option '{0}'.")]
    MissingValue(String),

    #[error("Short option '{0}' requires a value and is not allowed in the middle of a short options group.")]
    ShortInMiddle(char),

    #[error("Free arguments are not enabled (found '{0}').")]
    FreeArgsDisabled(String),

    #[error("{label} {source}.")]
    Value { label: String, source: FieldError },

    #[error("{0} is required, but no value was provided.")]
    MissingRequired(String),
}

/// The token index (into the input tokens) that a scan error occurred at.
pub(crate) type Offset = usize;

/// Everything a scan collects besides the values delivered to the holders.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ScanOutcome {
    pub(crate) free_args: Vec<String>,
    pub(crate) tail_args: Vec<String>,
    pub(crate) help_requested: bool,
}

/// The tokenizer/dispatcher.
///
/// Walks the tokens left to right (skipping the program name), classifies each one and delivers it to the matching holder.
/// Named lookups go through `named` in order, so the first registry that knows a name wins.
pub(crate) struct Scanner<'r> {
    named: Vec<&'r Registry>,
    positionals: &'r Registry,
    free_args: bool,
    tail_marker: Option<&'r str>,
}

impl<'r> Scanner<'r> {
    pub(crate) fn new(
        named: Vec<&'r Registry>,
        positionals: &'r Registry,
        free_args: bool,
        tail_marker: Option<&'r str>,
    ) -> Self {
        Self {
            named,
            positionals,
            free_args,
            tail_marker,
        }
    }

    fn lookup_long(&self, fullname: &str) -> Result<&'r Entry, ScanError> {
        self.named
            .iter()
            .find_map(|registry| registry.lookup_by_fullname(fullname))
            .ok_or_else(|| ScanError::UnknownOption(fullname.to_string()))
    }

    fn lookup_short(&self, shortname: char) -> Result<&'r Entry, ScanError> {
        self.named
            .iter()
            .find_map(|registry| registry.lookup_by_shortname(shortname))
            .ok_or(ScanError::UnknownShortOption(shortname))
    }

    pub(crate) fn scan<S: AsRef<str>>(
        &self,
        tokens: &[S],
    ) -> Result<ScanOutcome, (Offset, ScanError)> {
        let mut outcome = ScanOutcome::default();
        let mut filled = 0;
        let mut index = 1;

        while index < tokens.len() {
            let token = tokens[index].as_ref();
            let next = tokens.get(index + 1).map(AsRef::as_ref);

            if self.tail_marker == Some(token) {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Token #{index} is the tail marker '{token}'.");
                }

                outcome.tail_args = tokens[index + 1..]
                    .iter()
                    .map(|tail| tail.as_ref().to_string())
                    .collect();
                break;
            }

            let advance = if is_long_option(token) {
                let (fullname, _) = split_equals_delimiter(&token[2..]);

                if fullname == HELP_NAME {
                    #[cfg(feature = "tracing_debug")]
                    {
                        debug!("Token #{index} requests help.");
                    }

                    outcome.help_requested = true;
                    break;
                }

                self.scan_long(token, next)
            } else if is_short_group(token) {
                self.scan_short_group(token, next)
            } else if filled < self.positionals.len() {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Token #{index} '{token}' is positional #{filled}.");
                }

                let entry = self.positionals.nth(filled);
                filled += 1;
                entry.map_or(Ok(1), |entry| apply_value(entry, token).map(|_| 1))
            } else if self.free_args {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Token #{index} '{token}' is a free argument.");
                }

                outcome.free_args.push(escape(token).to_string());
                Ok(1)
            } else {
                Err(ScanError::FreeArgsDisabled(token.to_string()))
            };

            index += advance.map_err(|error| (index, error))?;
        }

        Ok(outcome)
    }

    fn scan_long(&self, token: &str, next: Option<&str>) -> Result<usize, ScanError> {
        let (fullname, inline) = split_equals_delimiter(&token[2..]);
        let entry = self.lookup_long(fullname)?;

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Token '{token}' is the long option '{fullname}' (inline value: {inline:?}).");
        }

        match inline {
            Some(value) => {
                apply_value(entry, value)?;
                Ok(1)
            }
            None if entry.holder().accepts_value() => {
                let value = next.ok_or_else(|| ScanError::MissingValue(fullname.to_string()))?;
                apply_value(entry, value)?;
                Ok(2)
            }
            None => {
                apply_flag(entry)?;
                Ok(1)
            }
        }
    }

    fn scan_short_group(&self, token: &str, next: Option<&str>) -> Result<usize, ScanError> {
        let group = &token[1..];
        let last = group.chars().count() - 1;

        for (position, (offset, shortname)) in group.char_indices().enumerate() {
            let entry = self.lookup_short(shortname)?;

            #[cfg(feature = "tracing_debug")]
            {
                debug!(
                    "Short option '{shortname}' of group '{token}' is '{fullname}'.",
                    fullname = entry.fullname()
                );
            }

            if !entry.holder().accepts_value() {
                apply_flag(entry)?;
            } else if position == last {
                let value =
                    next.ok_or_else(|| ScanError::MissingValue(entry.fullname().to_string()))?;
                apply_value(entry, value)?;
                return Ok(2);
            } else if position == 0 {
                apply_value(entry, &group[offset + shortname.len_utf8()..])?;
                return Ok(1);
            } else {
                return Err(ScanError::ShortInMiddle(shortname));
            }
        }

        Ok(1)
    }
}

fn is_long_option(token: &str) -> bool {
    token.starts_with("--") && token.len() > 2
}

fn is_short_group(token: &str) -> bool {
    token.starts_with('-') && token.len() > 1
}

fn split_equals_delimiter(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (token, None),
    }
}

/// Strip exactly one leading escape character.
fn escape(value: &str) -> &str {
    value.strip_prefix(ESCAPE).unwrap_or(value)
}

fn apply_flag(entry: &Entry) -> Result<(), ScanError> {
    entry
        .holder()
        .process_flag()
        .map_err(|source| ScanError::Value {
            label: entry.label(),
            source,
        })
}

fn apply_value(entry: &Entry, value: &str) -> Result<(), ScanError> {
    entry
        .holder()
        .process_value(escape(value))
        .map_err(|source| ScanError::Value {
            label: entry.label(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ArgHandle, FlagHandle, MultiArgHandle};
    use crate::constant::positional_name;
    use crate::test::assert_contains;
    use rstest::rstest;

    struct Fixture {
        registry: Registry,
        positionals: Registry,
        verbose: FlagHandle,
        extract: FlagHandle,
        jobs: ArgHandle<u32>,
        file: ArgHandle<String>,
        include: MultiArgHandle<String>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut registry = Registry::default();
            let (verbose, holder) = FlagHandle::create("verbose", Some('v'), "");
            registry
                .register(Entry::option("verbose", Some('v'), "", holder))
                .unwrap();
            let (extract, holder) = FlagHandle::create("extract", Some('x'), "");
            registry
                .register(Entry::option("extract", Some('x'), "", holder))
                .unwrap();
            let (jobs, holder) = ArgHandle::create("jobs", Some('j'), "");
            registry
                .register(Entry::option("jobs", Some('j'), "", holder))
                .unwrap();
            let (file, holder) = ArgHandle::create("file", Some('f'), "");
            registry
                .register(Entry::option("file", Some('f'), "", holder))
                .unwrap();
            let (include, holder) = MultiArgHandle::create("include", Some('I'), "");
            registry
                .register(Entry::option("include", Some('I'), "", holder))
                .unwrap();

            Self {
                registry,
                positionals: Registry::default(),
                verbose,
                extract,
                jobs,
                file,
                include,
            }
        }

        fn positional<T: crate::api::ArgValue>(&mut self) -> ArgHandle<T> {
            let name = positional_name(self.positionals.len());
            let (handle, holder) = ArgHandle::create(name.clone(), None, "");
            self.positionals
                .register(Entry::argument(name, "", holder))
                .unwrap();
            handle
        }

        fn scan(
            &self,
            tokens: &[&str],
            free_args: bool,
            tail_marker: Option<&str>,
        ) -> Result<ScanOutcome, (Offset, ScanError)> {
            Scanner::new(vec![&self.registry], &self.positionals, free_args, tail_marker)
                .scan(tokens)
        }
    }

    #[rstest]
    #[case("flag", ("flag", None))]
    #[case("flag=", ("flag", Some("")))]
    #[case("flag=a", ("flag", Some("a")))]
    #[case("flag=a=b", ("flag", Some("a=b")))]
    #[case("=a", ("", Some("a")))]
    fn split_equals(#[case] token: &str, #[case] expected: (&str, Option<&str>)) {
        assert_eq!(split_equals_delimiter(token), expected);
    }

    #[rstest]
    #[case("--literal", "--literal")]
    #[case("\\--literal", "--literal")]
    #[case("\\\\x", "\\x")]
    #[case("x\\", "x\\")]
    #[case("", "")]
    fn escape_once(#[case] value: &str, #[case] expected: &str) {
        assert_eq!(escape(value), expected);
    }

    #[rstest]
    #[case("--a", true, false)]
    #[case("--", false, true)]
    #[case("-a", false, true)]
    #[case("-abc", false, true)]
    #[case("-", false, false)]
    #[case("", false, false)]
    #[case("a", false, false)]
    #[case("a-", false, false)]
    fn classification(#[case] token: &str, #[case] long: bool, #[case] short: bool) {
        assert_eq!(is_long_option(token), long);
        assert_eq!(is_short_group(token), short);
    }

    #[test]
    fn scan_empty() {
        // Setup
        let fixture = Fixture::new();

        // Execute
        let outcome = fixture.scan(&["program"], false, None).unwrap();

        // Verify
        assert_eq!(outcome, ScanOutcome::default());
        assert_eq!(fixture.verbose.count(), 0);
        assert!(!fixture.jobs.has_value());
        assert!(fixture.include.is_empty());
    }

    #[test]
    fn scan_no_tokens() {
        let fixture = Fixture::new();
        let outcome = fixture.scan(&[], false, None).unwrap();
        assert_eq!(outcome, ScanOutcome::default());
    }

    #[rstest]
    #[case(vec!["program", "--jobs", "5"])]
    #[case(vec!["program", "--jobs=5"])]
    #[case(vec!["program", "-j", "5"])]
    #[case(vec!["program", "-j5"])]
    #[case(vec!["program", "-vj", "5"])]
    fn scan_single_value(#[case] tokens: Vec<&str>) {
        let fixture = Fixture::new();
        fixture.scan(&tokens, false, None).unwrap();
        assert_eq!(fixture.jobs.get(), Some(5));
    }

    #[rstest]
    #[case(vec!["program", "-v"], 1)]
    #[case(vec!["program", "-vvv"], 3)]
    #[case(vec!["program", "--verbose", "-v"], 2)]
    #[case(vec!["program", "-vx", "--verbose"], 2)]
    fn scan_flag_count(#[case] tokens: Vec<&str>, #[case] expected: usize) {
        let fixture = Fixture::new();
        fixture.scan(&tokens, false, None).unwrap();
        assert_eq!(fixture.verbose.count(), expected);
    }

    #[test]
    fn scan_short_group_last_takes_next() {
        let fixture = Fixture::new();
        fixture
            .scan(&["program", "-vxf", "archive.tar"], false, None)
            .unwrap();
        assert!(fixture.verbose.is_set());
        assert!(fixture.extract.is_set());
        assert_eq!(fixture.file.get(), Some("archive.tar".to_string()));
    }

    #[test]
    fn scan_short_group_first_takes_remainder() {
        let fixture = Fixture::new();
        fixture.scan(&["program", "-fvx"], false, None).unwrap();
        assert_eq!(fixture.file.get(), Some("vx".to_string()));
        assert!(!fixture.verbose.is_set());
    }

    #[test]
    fn scan_short_group_middle() {
        let fixture = Fixture::new();
        let (offset, error) = fixture
            .scan(&["program", "-vfx", "archive.tar"], false, None)
            .unwrap_err();
        assert_eq!(offset, 1);
        assert_eq!(error, ScanError::ShortInMiddle('f'));
    }

    #[rstest]
    #[case(vec!["program", "--jobs"], "jobs")]
    #[case(vec!["program", "-j"], "jobs")]
    #[case(vec!["program", "-vf"], "file")]
    fn scan_missing_value(#[case] tokens: Vec<&str>, #[case] fullname: &str) {
        let fixture = Fixture::new();
        assert_eq!(
            fixture.scan(&tokens, false, None).unwrap_err(),
            (1, ScanError::MissingValue(fullname.to_string()))
        );
    }

    #[test]
    fn scan_unknown() {
        let fixture = Fixture::new();
        assert_eq!(
            fixture.scan(&["program", "--jobs", "1", "--nope"], false, None).unwrap_err(),
            (3, ScanError::UnknownOption("nope".to_string()))
        );
        assert_eq!(
            fixture.scan(&["program", "-vq"], false, None).unwrap_err(),
            (1, ScanError::UnknownShortOption('q'))
        );
        assert_eq!(
            fixture.scan(&["program", "--"], false, None).unwrap_err(),
            (1, ScanError::UnknownShortOption('-'))
        );
    }

    #[test]
    fn scan_flag_inline_value() {
        let fixture = Fixture::new();
        let (_, error) = fixture
            .scan(&["program", "--verbose=true"], false, None)
            .unwrap_err();
        assert_matches!(
            error,
            ScanError::Value {
                source: FieldError::RejectsValue,
                ..
            }
        );
        assert_contains!(error.to_string(), "Option 'verbose' doesn't accept values");
    }

    #[test]
    fn scan_single_value_twice() {
        let fixture = Fixture::new();
        let (offset, error) = fixture
            .scan(&["program", "--jobs", "1", "--jobs", "2"], false, None)
            .unwrap_err();
        assert_eq!(offset, 3);
        assert_eq!(error.to_string(), "Option 'jobs' accepts only one value.");
    }

    #[test]
    fn scan_multi_value() {
        let fixture = Fixture::new();
        fixture
            .scan(
                &["program", "-I", "a", "--include", "b", "--include=c", "-Id"],
                false,
                None,
            )
            .unwrap();
        assert_eq!(fixture.include.values(), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn scan_cast_failure() {
        let fixture = Fixture::new();
        let (_, error) = fixture
            .scan(&["program", "-j", "five"], false, None)
            .unwrap_err();
        assert_matches!(
            error,
            ScanError::Value {
                source: FieldError::Cast(_),
                ..
            }
        );
        assert_contains!(error.to_string(), "cannot convert 'five'");
    }

    #[rstest]
    #[case(vec!["program", "--file", "\\--literal"])]
    #[case(vec!["program", "--file=\\--literal"])]
    #[case(vec!["program", "-f", "\\--literal"])]
    #[case(vec!["program", "-f\\--literal"])]
    fn scan_escaped_value(#[case] tokens: Vec<&str>) {
        let fixture = Fixture::new();
        fixture.scan(&tokens, false, None).unwrap();
        assert_eq!(fixture.file.get(), Some("--literal".to_string()));
    }

    #[test]
    fn scan_next_token_verbatim() {
        // The next token is consumed as a value even when it looks like an option.
        let fixture = Fixture::new();
        fixture.scan(&["program", "--file", "-v"], false, None).unwrap();
        assert_eq!(fixture.file.get(), Some("-v".to_string()));
        assert!(!fixture.verbose.is_set());
    }

    #[test]
    fn scan_positionals_and_free_args() {
        // Setup
        let mut fixture = Fixture::new();
        let name = fixture.positional::<String>();
        let number = fixture.positional::<u32>();

        // Execute
        let outcome = fixture
            .scan(&["program", "\\--n", "-v", "64", "free", "-", "\\args"], true, None)
            .unwrap();

        // Verify
        assert_eq!(name.get(), Some("--n".to_string()));
        assert_eq!(number.get(), Some(64));
        assert!(fixture.verbose.is_set());
        assert_eq!(outcome.free_args, vec!["free", "-", "args"]);
    }

    #[test]
    fn scan_free_args_disabled() {
        let mut fixture = Fixture::new();
        let _name = fixture.positional::<String>();

        assert_eq!(
            fixture.scan(&["program", "a", "b"], false, None).unwrap_err(),
            (2, ScanError::FreeArgsDisabled("b".to_string()))
        );
    }

    #[test]
    fn scan_empty_token_positional() {
        let mut fixture = Fixture::new();
        let name = fixture.positional::<String>();

        assert_eq!(
            fixture.scan(&["program", ""], false, None).unwrap(),
            ScanOutcome::default()
        );
        assert_eq!(name.get(), Some("".to_string()));
    }

    #[rstest]
    #[case(vec!["program", "--", "a", "--nope"], vec!["a", "--nope"])]
    #[case(vec!["program", "-v", "--"], vec![])]
    #[case(vec!["program", "--jobs", "1", "--", "--jobs", "2"], vec!["--jobs", "2"])]
    fn scan_tail(#[case] tokens: Vec<&str>, #[case] expected: Vec<&str>) {
        let fixture = Fixture::new();
        let outcome = fixture.scan(&tokens, false, Some("--")).unwrap();
        assert_eq!(outcome.tail_args, expected);
        assert!(outcome.free_args.is_empty());
    }

    #[test]
    fn scan_tail_marker_as_value() {
        // A value in next-token position is consumed verbatim.
        let fixture = Fixture::new();
        let outcome = fixture
            .scan(&["program", "--file", "--"], false, Some("--"))
            .unwrap();
        assert_eq!(fixture.file.get(), Some("--".to_string()));
        assert!(outcome.tail_args.is_empty());
    }

    #[rstest]
    #[case(vec!["program", "--help"])]
    #[case(vec!["program", "--help=me"])]
    #[case(vec!["program", "-v", "--help", "--nope"])]
    fn scan_help(#[case] tokens: Vec<&str>) {
        let fixture = Fixture::new();
        let outcome = fixture.scan(&tokens, false, None).unwrap();
        assert!(outcome.help_requested);
    }

    #[test]
    fn scan_registries_in_order() {
        // Setup
        let fixture = Fixture::new();
        let mut shadow = Registry::default();
        let (jobs, holder) = ArgHandle::<u32>::create("jobs", Some('j'), "");
        shadow
            .register(Entry::option("jobs", Some('j'), "", holder))
            .unwrap();
        let scanner = Scanner::new(
            vec![&shadow, &fixture.registry],
            &fixture.positionals,
            false,
            None,
        );

        // Execute
        scanner
            .scan(&["program", "--jobs", "1", "-v"])
            .unwrap();

        // Verify
        assert_eq!(jobs.get(), Some(1));
        assert!(!fixture.jobs.has_value());
        assert!(fixture.verbose.is_set());
    }

    #[test]
    fn arg_error_message() {
        let error = ArgError::from(ScanError::UnknownOption("x".to_string()));
        assert_eq!(error.to_string(), "Parse error: Option 'x' does not exist.");
        assert_eq!(error.message(), "Option 'x' does not exist.");

        let error = ArgError::from(RegistryError::Reserved("help".to_string()));
        assert_matches!(error, ArgError::Config(_));
        assert_eq!(
            error.message(),
            "Cannot register the option 'help': it is predefined."
        );
    }
}
