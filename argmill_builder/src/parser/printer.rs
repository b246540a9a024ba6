use terminal_size::{terminal_size, Width};

use crate::constant::*;
use crate::model::OptionKind;
use crate::parser::interface::{ColumnRenderer, UserInterface};
use crate::registry::{Entry, ParameterClass, Registry};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OptionParameter {
    fullname: String,
    shortname: Option<char>,
    kind: OptionKind,
    help: String,
    required: bool,
}

impl OptionParameter {
    pub(crate) fn new(
        fullname: impl Into<String>,
        shortname: Option<char>,
        kind: OptionKind,
        help: impl Into<String>,
        required: bool,
    ) -> Self {
        Self {
            fullname: fullname.into(),
            shortname,
            kind,
            help: help.into(),
            required,
        }
    }

    fn grammar(&self) -> String {
        if self.kind.accepts_value() {
            format!(" {}", name_example(&self.fullname))
        } else {
            "".to_string()
        }
    }

    fn flags(&self) -> String {
        let grammar = self.grammar();
        match self.shortname {
            Some(s) => format!("-{s}{grammar}, --{name}{grammar}", name = self.fullname),
            None => format!("--{name}{grammar}", name = self.fullname),
        }
    }

    fn summary(&self) -> String {
        let grammar = self.grammar();
        let usage = match self.shortname {
            Some(s) => format!("-{s}{grammar}"),
            None => format!("--{name}{grammar}", name = self.fullname),
        };

        match (self.required, self.kind) {
            (true, OptionKind::Multi) => format!("{usage} [...]"),
            (true, _) => usage,
            (false, OptionKind::Multi) => format!("[{usage} ...]"),
            (false, _) => format!("[{usage}]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ArgumentParameter {
    name: String,
    help: String,
    required: bool,
}

impl ArgumentParameter {
    pub(crate) fn new(name: impl Into<String>, help: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
            required,
        }
    }

    fn grammar(&self) -> String {
        name_example(&self.name)
    }

    fn summary(&self) -> String {
        if self.required {
            self.grammar()
        } else {
            format!("[{}]", self.grammar())
        }
    }
}

fn name_example(name: &str) -> String {
    name.to_ascii_uppercase().replace('-', "_")
}

fn width(text: &str) -> usize {
    text.chars().count()
}

pub(crate) struct Printer {
    options: Vec<OptionParameter>,
    arguments: Vec<ArgumentParameter>,
    terminal_width: Option<usize>,
}

// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
const DEFAULT_MIDDLE_WIDTH: usize = 17;
const PADDING_WIDTH: usize = 3;
const MAIN_INDENT: usize = 1;

impl Printer {
    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self::new(Vec::default(), Vec::default(), None)
    }

    /// Describe the `named` & `positionals` registries, laid out for the current terminal.
    pub(crate) fn terminal(named: &[&Registry], positionals: &Registry) -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        Self::describe(named, positionals, terminal_width)
    }

    pub(crate) fn describe(
        named: &[&Registry],
        positionals: &Registry,
        terminal_width: Option<usize>,
    ) -> Self {
        let options = named
            .iter()
            .flat_map(|registry| registry.entries())
            .filter(|entry| entry.class() == ParameterClass::Opt)
            .map(|entry| {
                OptionParameter::new(
                    entry.fullname(),
                    entry.shortname(),
                    entry.holder().kind(),
                    entry.help(),
                    entry.holder().is_required(),
                )
            })
            .collect();
        let arguments = positionals
            .entries()
            .map(|entry: &Entry| {
                ArgumentParameter::new(entry.fullname(), entry.help(), entry.holder().is_required())
            })
            .collect();

        Self::new(options, arguments, terminal_width)
    }

    pub(crate) fn new(
        mut options: Vec<OptionParameter>,
        arguments: Vec<ArgumentParameter>,
        terminal_width: Option<usize>,
    ) -> Self {
        options.sort_by(|a, b| a.fullname.cmp(&b.fullname));
        Self {
            options,
            arguments,
            terminal_width,
        }
    }

    pub(crate) fn print_help(
        &self,
        program: impl Into<String>,
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        for line in self.render(program) {
            user_interface.print(line);
        }
    }

    pub(crate) fn render(&self, program: impl Into<String>) -> Vec<String> {
        let mut out = Vec::default();
        let help_flags = format!("--{HELP_NAME}");
        let mut summary = vec![format!("[{help_flags}]")];
        let mut left_column_width = width(&help_flags);
        let mut middle_column_width = width(HELP_MESSAGE) + MAIN_INDENT;
        let mut option_rows = vec![(help_flags, HELP_MESSAGE.to_string())];
        let mut argument_rows = Vec::default();

        for option in &self.options {
            let flags = option.flags();
            left_column_width = std::cmp::max(left_column_width, width(&flags));
            middle_column_width = std::cmp::max(middle_column_width, width(&option.help) + MAIN_INDENT);
            summary.push(option.summary());
            option_rows.push((flags, option.help.clone()));
        }

        for argument in &self.arguments {
            let grammar = argument.grammar();
            left_column_width = std::cmp::max(left_column_width, width(&grammar));
            middle_column_width =
                std::cmp::max(middle_column_width, width(&argument.help) + MAIN_INDENT);
            summary.push(argument.summary());
            argument_rows.push((grammar, argument.help.clone()));
        }

        let column_renderer = match self.terminal_width {
            Some(total) => ColumnRenderer::guided(
                PADDING_WIDTH,
                left_column_width,
                middle_column_width,
                total,
            ),
            None => ColumnRenderer::new(
                PADDING_WIDTH,
                left_column_width,
                std::cmp::min(middle_column_width, DEFAULT_MIDDLE_WIDTH),
            ),
        };

        out.push(format!(
            "usage: {p} {s}",
            p = program.into(),
            s = summary.join(" ")
        ));

        if !argument_rows.is_empty() {
            out.push("".to_string());
            out.push("positional arguments:".to_string());

            for (grammar, help) in &argument_rows {
                out.extend(column_renderer.render(MAIN_INDENT, grammar, help));
            }
        }

        out.push("".to_string());
        out.push("options:".to_string());

        for (flags, help) in &option_rows {
            out.extend(column_renderer.render(MAIN_INDENT, flags, help));
        }

        out
    }
}

/// Points at the offending token of a failed parse.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ErrorContext {
    offset: usize,
    tokens: Vec<String>,
}

impl ErrorContext {
    /// The context for the token at `offset`, where `tokens[0]` is the program name.
    pub(crate) fn new<S: AsRef<str>>(offset: usize, tokens: &[S]) -> Self {
        Self {
            offset: offset.saturating_sub(1),
            tokens: tokens
                .iter()
                .skip(1)
                .map(|token| token.as_ref().to_string())
                .collect(),
        }
    }
}

impl std::fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let projection = self.tokens.join(" ");
        let column: usize = self
            .tokens
            .iter()
            .take(self.offset)
            .map(|token| width(token) + 1)
            .sum();

        write!(f, "{projection}\n{:column$}^", "")
    }
}
