use terminal_size::{terminal_size, Width};

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::FormItem;
use crate::parser::interface::UserInterface;

pub(crate) struct Printer {
    usage: String,
    about: Option<String>,
    outline: Vec<FormItem>,
    terminal_width: Option<usize>,
}

// Target 95% of the terminal width, so the text never touches the edge.
const TARGET_PERCENT: usize = 95;
// Room for three 5 letter words and the spaces between them.
const MINIMUM_WIDTH: usize = 17;
const DEFAULT_WIDTH: usize = 80;
const MAIN_INDENT: usize = 1;
const CHOICE_INDENT: usize = 2;

impl Printer {
    #[cfg(test)]
    pub(crate) fn empty() -> Self {
        Self::new("", None, Vec::default(), None)
    }

    pub(crate) fn terminal(
        usage: impl Into<String>,
        about: Option<String>,
        outline: Vec<FormItem>,
    ) -> Self {
        let terminal_width = if let Some((Width(terminal_width), _)) = terminal_size() {
            Some(terminal_width as usize)
        } else {
            None
        };

        #[cfg(feature = "tracing_debug")]
        {
            debug!("Detected terminal width: {terminal_width:?}.");
        }

        Self::new(usage, about, outline, terminal_width)
    }

    pub(crate) fn new(
        usage: impl Into<String>,
        about: Option<String>,
        outline: Vec<FormItem>,
        terminal_width: Option<usize>,
    ) -> Self {
        Self {
            usage: usage.into(),
            about,
            outline,
            terminal_width,
        }
    }

    fn width(&self) -> usize {
        match self.terminal_width {
            Some(total) => std::cmp::max(total * TARGET_PERCENT / 100, MINIMUM_WIDTH),
            None => DEFAULT_WIDTH,
        }
    }

    pub(crate) fn print_usage(
        &self,
        program: impl Into<String>,
        user_interface: &(impl UserInterface + ?Sized),
    ) {
        let program = program.into();

        if self.usage.is_empty() {
            user_interface.print(format!("usage: {program}"));
        } else {
            user_interface.print(format!("usage: {program} {u}", u = self.usage));
        }

        let width = self.width();

        if let Some(about) = &self.about {
            user_interface.print("".to_string());

            for line in chunk(about, width) {
                user_interface.print(line);
            }
        }

        if !self.outline.is_empty() {
            user_interface.print("".to_string());
            user_interface.print("arguments:".to_string());
            let mut lines = Vec::default();

            for item in &self.outline {
                outline(item, MAIN_INDENT, width, &mut lines);
            }

            for line in lines {
                user_interface.print(line);
            }
        }
    }
}

fn outline(item: &FormItem, indent: usize, width: usize, lines: &mut Vec<String>) {
    match item {
        FormItem::Group { items } if items.iter().all(|i| i.caption().is_some()) => {
            let text = items
                .iter()
                .filter_map(FormItem::caption)
                .collect::<Vec<_>>()
                .join(" ");
            indented(&text, indent, width, lines);
        }
        FormItem::Group { items } => {
            indented("All of the following:", indent, width, lines);

            for item in items {
                outline(item, indent + CHOICE_INDENT, width, lines);
            }
        }
        FormItem::Choice { prompt, items, .. } => {
            indented(prompt, indent, width, lines);

            for item in items {
                outline(item, indent + CHOICE_INDENT, width, lines);
            }
        }
        field => {
            if let Some(caption) = field.caption() {
                indented(caption, indent, width, lines);
            }
        }
    }
}

fn indented(text: &str, indent: usize, width: usize, lines: &mut Vec<String>) {
    let available = std::cmp::max(width.saturating_sub(indent), MINIMUM_WIDTH);

    for part in chunk(text, available) {
        lines.push(format!("{:indent$}{part}", ""));
    }
}

fn chunk(paragraph: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::default();
    let mut current = String::default();

    for word in paragraph.split(' ').filter(|word| !word.is_empty()) {
        if current.is_empty() {
            hyphenate(width, &mut lines, &mut current, word);
        } else if current.chars().count() + word.chars().count() < width {
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
    // width is at least 2, leaving room for one character and the hyphen.
    let characters: Vec<char> = word.chars().collect();
    let increment = width - 1;
    let mut start = 0;

    while characters.len() - start > width {
        let part: String = characters[start..start + increment].iter().collect();
        lines.push(format!("{part}-"));
        start += increment;
    }

    current.extend(&characters[start..]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::util::InMemoryInterface;
    use rstest::rstest;

    #[test]
    fn print_usage_empty() {
        // Setup
        let printer = Printer::empty();
        let interface = InMemoryInterface::default();

        // Execute
        printer.print_usage("program", &interface);

        // Verify
        let message = interface.consume_message();
        assert_eq!(message, "usage: program");
    }

    #[test]
    fn print_usage_about() {
        // Setup
        let printer = Printer::new(
            "infile [-o outfile]",
            Some("Converts the input file into the output format.".to_string()),
            Vec::default(),
            Some(20),
        );
        let interface = InMemoryInterface::default();

        // Execute
        printer.print_usage("program", &interface);

        // Verify
        let message = interface.consume_message();
        assert_eq!(
            message,
            r#"usage: program infile [-o outfile]

Converts the input
file into the
output format."#
        );
    }

    #[test]
    fn print_usage_outline() {
        // Setup
        let printer = Printer::new(
            "infile [-o outfile] [-v] [-q]",
            None,
            vec![
                FormItem::Label {
                    name: "infile".to_string(),
                },
                FormItem::Choice {
                    prompt: "Optionally select the following item:".to_string(),
                    minimum: 0,
                    maximum: 1,
                    items: vec![FormItem::Group {
                        items: vec![
                            FormItem::Switch {
                                name: "o".to_string(),
                                takes_value: false,
                                display: "-o".to_string(),
                            },
                            FormItem::Label {
                                name: "outfile".to_string(),
                            },
                        ],
                    }],
                },
                FormItem::Choice {
                    prompt: "Select any of the following 2 options:".to_string(),
                    minimum: 0,
                    maximum: 2,
                    items: vec![
                        FormItem::Switch {
                            name: "v".to_string(),
                            takes_value: false,
                            display: "-v".to_string(),
                        },
                        FormItem::Group {
                            items: vec![
                                FormItem::Command {
                                    text: "quiet".to_string(),
                                },
                                FormItem::Choice {
                                    prompt: "Optionally select the following item:"
                                        .to_string(),
                                    minimum: 0,
                                    maximum: 1,
                                    items: vec![FormItem::Label {
                                        name: "level".to_string(),
                                    }],
                                },
                            ],
                        },
                    ],
                },
            ],
            None,
        );
        let interface = InMemoryInterface::default();

        // Execute
        printer.print_usage("program", &interface);

        // Verify
        let message = interface.consume_message();
        assert_eq!(
            message,
            r#"usage: program infile [-o outfile] [-v] [-q]

arguments:
 infile
 Optionally select the following item:
   -o outfile
 Select any of the following 2 options:
   -v
   All of the following:
     quiet
     Optionally select the following item:
       level"#
        );
    }

    #[rstest]
    #[case("", 5, vec![])]
    #[case("abc", 5, vec!["abc"])]
    #[case("a  b", 5, vec!["a b"])]
    #[case("abc def", 7, vec!["abc def"])]
    #[case("abc def", 6, vec!["abc", "def"])]
    #[case("abcdefgh", 5, vec!["abcd-", "efgh"])]
    #[case("abcdefghij", 4, vec!["abc-", "def-", "ghij"])]
    #[case("ab abcdefgh", 5, vec!["ab", "abcd-", "efgh"])]
    #[case("ééé ééé", 3, vec!["ééé", "ééé"])]
    fn chunk_paragraph(#[case] paragraph: &str, #[case] width: usize, #[case] expected: Vec<&str>) {
        assert_eq!(chunk(paragraph, width), expected);
    }

    #[test]
    fn width_bounds() {
        assert_eq!(Printer::new("", None, vec![], None).width(), DEFAULT_WIDTH);
        assert_eq!(Printer::new("", None, vec![], Some(100)).width(), 95);
        assert_eq!(Printer::new("", None, vec![], Some(5)).width(), MINIMUM_WIDTH);
    }
}
