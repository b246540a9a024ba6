use std::env;

use crate::api::Parser;
use crate::parser::interface::{ConsoleInterface, UserInterface};
use crate::parser::ErrorContext;

impl Parser {
    /// Run the parser against the input tokens, as a command line program would.
    ///
    /// Behaves like [`Parser::parse_args`], but reports the outcome to the user instead of returning an error.
    /// If parsing fails, the error (and the offending token, when there is one) is printed and this returns `Err(1)`.
    /// If `--help` is encountered, the help message is printed and this returns `Err(0)`.
    ///
    /// ### Example
    /// ```
    /// # use argmill_builder as argmill;
    /// use argmill::Parser;
    ///
    /// let mut parser = Parser::isolated();
    /// let jobs = parser.add_arg::<u32>("jobs", Some('j'), "").unwrap();
    ///
    /// assert_eq!(parser.parse_tokens(&["program", "-j", "2"], None), Ok(()));
    /// assert_eq!(jobs.get(), Some(2));
    /// ```
    pub fn parse_tokens<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
        tail_marker: Option<&str>,
    ) -> Result<(), i32> {
        self.invoke(tokens, tail_marker, &ConsoleInterface::default())
    }

    pub(crate) fn invoke<S: AsRef<str>>(
        &mut self,
        tokens: &[S],
        tail_marker: Option<&str>,
        user_interface: &(impl UserInterface + ?Sized),
    ) -> Result<(), i32> {
        match self.scan_tokens(tokens, tail_marker) {
            Ok(()) if self.help_requested() => {
                let program = tokens.first().map_or("", AsRef::as_ref);
                self.printer().print_help(program, user_interface);
                Err(0)
            }
            Ok(()) => Ok(()),
            Err((offset, error)) => {
                user_interface.print_error(error);

                if let Some(offset) = offset {
                    user_interface.print_error_context(ErrorContext::new(offset, tokens));
                }

                Err(1)
            }
        }
    }

    /// Run the parser against the command line [`env::args`].
    ///
    /// Behaves like [`Parser::parse_tokens`], except that it exits the process (via `std::process::exit`) instead of returning `Err`.
    pub fn parse(&mut self, tail_marker: Option<&str>) {
        let tokens: Vec<String> = env::args().collect();

        if let Err(exit_code) = self.parse_tokens(&tokens, tail_marker) {
            std::process::exit(exit_code);
        }
    }
}
