pub(crate) const HELP_NAME: &str = "help";
pub(crate) const HELP_MESSAGE: &str = "Show this help message and exit.";
pub(crate) const ESCAPE: char = '\\';

pub(crate) fn positional_name(index: usize) -> String {
    format!("arg{index}")
}
