use crate::parser::{ArgError, ErrorContext};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

/// Renders rows of two columns: a left column (flags/grammar) and a wrapped middle column (help).
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct ColumnRenderer {
    padding: usize,
    left: usize,
    middle: usize,
}

// Target 95% of the total width, so the renderer doesn't literally use the full space.
const TARGET_TOTAL_FACTOR: f64 = 0.95;

// Let's assume the average word length is 5.
// Then 17 is a good minimum, because it allows precisely 3 words with a space between them.
pub(crate) const MINIMUM_MIDDLE_WIDTH: usize = 17;

impl ColumnRenderer {
    /// Produce a renderer that fits the middle column within `total` where possible.
    pub(crate) fn guided(padding: usize, left: usize, middle: usize, total: usize) -> Self {
        let non_middle = left + padding;
        let target = (total as f64 * TARGET_TOTAL_FACTOR) as usize;
        let wanted = std::cmp::max(middle, MINIMUM_MIDDLE_WIDTH);

        let middle = if wanted + non_middle <= target {
            wanted
        } else if non_middle < target {
            std::cmp::max(target - non_middle, MINIMUM_MIDDLE_WIDTH)
        } else {
            MINIMUM_MIDDLE_WIDTH
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Columns {non_middle} with total {total} (target {target}).  Selecting middle: {middle}.");
        }

        Self::new(padding, left, middle)
    }

    pub(crate) fn new(padding: usize, left: usize, middle: usize) -> Self {
        Self {
            padding: std::cmp::max(padding, 1),
            left: std::cmp::max(left, 1),
            middle: std::cmp::max(middle, 2),
        }
    }

    pub(crate) fn render(&self, indent: usize, left: &str, middle: &str) -> Vec<String> {
        let padding = self.padding;
        let left_width = self.left;
        let middle_width = std::cmp::max(self.middle.saturating_sub(indent), 2);
        let mut out = Vec::default();

        for part in chunk(middle, middle_width) {
            if out.is_empty() {
                out.push(format!("{:indent$}{left:left_width$}{:padding$}{part}", "", ""));
            } else {
                out.push(format!("{:indent$}{:left_width$}{:padding$}{part}", "", "", ""));
            }
        }

        if out.is_empty() {
            out.push(format!("{:indent$}{left}", ""));
        }

        out
    }
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ').filter(|word| !word.is_empty()) {
        let length = word.chars().count();

        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.chars().count() + length < width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            hyphenate(width, &mut lines, &mut current, word);
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

fn hyphenate(width: usize, lines: &mut Vec<String>, current: &mut String, word: &str) {
    let increment = width - 1;
    let mut characters: Vec<char> = word.chars().collect();

    while characters.len() > width {
        let rest = characters.split_off(increment);
        lines.push(format!("{}-", characters.iter().collect::<String>()));
        characters = rest;
    }

    current.extend(characters);
}

pub(crate) trait UserInterface {
    fn print(&self, message: String);
    fn print_error(&self, error: ArgError);
    fn print_error_context(&self, error_context: ErrorContext);
}

#[derive(Default)]
pub(crate) struct ConsoleInterface {}

impl UserInterface for ConsoleInterface {
    fn print(&self, message: String) {
        println!("{message}");
    }

    fn print_error(&self, error: ArgError) {
        eprintln!("{error}");
    }

    fn print_error_context(&self, error_context: ErrorContext) {
        eprintln!("{error_context}");
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", 5, vec![])]
    #[case("a b c", 5, vec!["a b c"])]
    #[case("a b c d", 5, vec!["a b c", "d"])]
    #[case("abc de", 5, vec!["abc", "de"])]
    #[case("  spaced   out  ", 10, vec!["spaced out"])]
    #[case("abcdefgh", 5, vec!["abcd-", "efgh"])]
    #[case("abcdefghij", 5, vec!["abcd-", "efgh-", "ij"])]
    #[case("abcde", 5, vec!["abcde"])]
    #[case("a abcdefgh", 5, vec!["a", "abcd-", "efgh"])]
    #[case("ünïcödé", 4, vec!["ünï-", "cödé"])]
    fn chunk_paragraph(#[case] paragraph: &str, #[case] width: usize, #[case] expected: Vec<&str>) {
        assert_eq!(chunk(paragraph, width), expected);
    }

    #[test]
    fn column_renderer_simple() {
        let renderer = ColumnRenderer::new(2, 5, 10);

        assert_eq!(renderer.render(0, "abc", "xyz"), vec!["abc    xyz"]);
        assert_eq!(renderer.render(1, "abc", "xyz"), vec![" abc    xyz"]);
        assert_eq!(renderer.render(0, "abc", ""), vec!["abc"]);
    }

    #[test]
    fn column_renderer_wrapped() {
        let renderer = ColumnRenderer::new(2, 5, 10);

        assert_eq!(
            renderer.render(0, "abc", "the quick brown fox"),
            vec!["abc    the quick", "       brown fox"]
        );
    }

    #[test]
    fn column_renderer_left_overflow() {
        let renderer = ColumnRenderer::new(1, 2, 10);
        assert_eq!(renderer.render(0, "abcd", "xyz"), vec!["abcd xyz"]);
    }

    #[rstest]
    #[case(3, 10, 20, 200, 20)]
    #[case(3, 10, 5, 200, MINIMUM_MIDDLE_WIDTH)]
    #[case(3, 10, 100, 80, 63)]
    #[case(3, 80, 100, 80, MINIMUM_MIDDLE_WIDTH)]
    fn column_renderer_guided(
        #[case] padding: usize,
        #[case] left: usize,
        #[case] middle: usize,
        #[case] total: usize,
        #[case] expected: usize,
    ) {
        assert_eq!(
            ColumnRenderer::guided(padding, left, middle, total),
            ColumnRenderer::new(padding, left, expected)
        );
    }
}
