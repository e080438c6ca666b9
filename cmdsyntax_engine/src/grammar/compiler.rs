use thiserror::Error;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::grammar::{GrammarNode, GrammarTree, Selection, SwitchOption};
use crate::style::{Origin, StyleConfig, SwitchError};

/// A syntax definition which cannot be compiled.
///
/// Offsets count characters (not bytes) from the start of the definition.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SyntaxError {
    /// The style contradicts itself; see [`StyleConfig::validate`].
    #[error("The syntax style is inconsistent.")]
    InconsistentStyle,

    /// A closing delimiter which does not close the innermost open block.
    #[error("Unexpected '{found}' found at offset {offset}.")]
    UnexpectedCharacter {
        /// The offending character.
        found: char,
        /// Where it was found.
        offset: usize,
    },

    /// An operator, closing delimiter, or the end of the definition where a label was expected.
    #[error("Expected a label, but found {found} at offset {offset}.")]
    ExpectedLabel {
        /// A description of what was found instead.
        found: String,
        /// Where it was found.
        offset: usize,
    },

    /// Two items without an operator between them.
    #[error("Expected an operator, but found '{found}' at offset {offset}.")]
    ExpectedOperator {
        /// The offending character.
        found: char,
        /// Where it was found.
        offset: usize,
    },

    /// The definition ends inside an open block.
    #[error("Reached the end of the definition while looking for '{expected}' (opened at offset {offset}).")]
    Unterminated {
        /// The missing closing delimiter.
        expected: char,
        /// Where the block was opened.
        offset: usize,
    },

    /// A switch which does not fit the style.
    #[error("Invalid switch at offset {offset}: {source}")]
    InvalidSwitch {
        /// Where the switch starts.
        offset: usize,
        /// Why the switch was rejected.
        #[source]
        source: SwitchError,
    },

    /// A selection block with nothing to choose from, ex: `{}`.
    #[error("Empty selection at offset {offset}.")]
    EmptySelection {
        /// Where the selection was opened.
        offset: usize,
    },

    /// An extended label without text, ex: `<>`.
    #[error("Empty label at offset {offset}.")]
    EmptyLabel {
        /// Where the label was opened.
        offset: usize,
    },

    /// Text left over after the definition was compiled.
    #[error("Unread text at offset {offset}: {remaining}")]
    TrailingInput {
        /// Where the unread text starts.
        offset: usize,
        /// The unread text.
        remaining: String,
    },
}

impl SyntaxError {
    /// The character offset of the error, if it has one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            SyntaxError::InconsistentStyle => None,
            SyntaxError::UnexpectedCharacter { offset, .. }
            | SyntaxError::ExpectedLabel { offset, .. }
            | SyntaxError::ExpectedOperator { offset, .. }
            | SyntaxError::Unterminated { offset, .. }
            | SyntaxError::InvalidSwitch { offset, .. }
            | SyntaxError::EmptySelection { offset }
            | SyntaxError::EmptyLabel { offset }
            | SyntaxError::TrailingInput { offset, .. } => Some(*offset),
        }
    }
}

/// Compile a syntax definition into a [`GrammarTree`].
///
/// ### Example
/// ```
/// # use cmdsyntax_engine as cmdsyntax;
/// use cmdsyntax::{compile, GrammarNode, StyleConfig};
///
/// let tree = compile("infile [-o outfile]", &StyleConfig::default()).unwrap();
/// assert_eq!(tree.root().len(), 2);
/// assert_eq!(tree.root()[0], GrammarNode::Label("infile".to_string()));
/// ```
pub fn compile(definition: &str, style: &StyleConfig) -> Result<GrammarTree, SyntaxError> {
    if !style.validate() {
        return Err(SyntaxError::InconsistentStyle);
    }

    let compiler = Compiler {
        source: definition.chars().collect(),
        style,
    };
    let (root, position) = compiler.parse_level(0, None)?;

    if position < compiler.source.len() {
        return Err(SyntaxError::TrailingInput {
            offset: position,
            remaining: compiler.source[position..].iter().collect(),
        });
    }

    let tree = GrammarTree::new(root);

    #[cfg(feature = "tracing_debug")]
    {
        debug!("Compiled '{definition}' into: {tree:?}");
    }

    Ok(tree)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    Label,
    Operator,
}

#[derive(Debug)]
enum Alternative {
    Node(GrammarNode),
    Empty,
}

/// The items of one bracket level: a sequence whose last element is still collecting alternatives.
#[derive(Debug, Default)]
struct Level {
    nodes: Vec<GrammarNode>,
    alternatives: Vec<Alternative>,
}

impl Level {
    fn close_alternatives(&mut self) {
        let alternatives = std::mem::take(&mut self.alternatives);

        if let Some(node) = optimise(alternatives) {
            self.nodes.push(node);
        }
    }

    fn finish(mut self) -> Vec<GrammarNode> {
        self.close_alternatives();
        group_options(self.nodes)
    }
}

struct Compiler<'s> {
    source: Vec<char>,
    style: &'s StyleConfig,
}

impl<'s> Compiler<'s> {
    /// Parse from `start` until `end` (the closing delimiter, and the offset of its opening) or the end of input.
    fn parse_level(
        &self,
        start: usize,
        end: Option<(char, usize)>,
    ) -> Result<(Vec<GrammarNode>, usize), SyntaxError> {
        let mut position = start;
        let mut expect = Expect::Label;
        let mut level = Level::default();

        while let Some(&c) = self.source.get(position) {
            if self.style.is_closing(c) || c == self.style.extended.1 {
                match end {
                    Some((closing, _)) if closing == c => {}
                    _ => {
                        return Err(SyntaxError::UnexpectedCharacter {
                            found: c,
                            offset: position,
                        });
                    }
                }

                if expect == Expect::Label && !level.alternatives.is_empty() {
                    return Err(SyntaxError::ExpectedLabel {
                        found: describe(Some(c)),
                        offset: position,
                    });
                }

                return Ok((level.finish(), position + 1));
            }

            match expect {
                Expect::Label => {
                    if c.is_whitespace() {
                        position += 1;
                    } else {
                        position = self.parse_item(position, &mut level.alternatives)?;
                        expect = Expect::Operator;
                    }
                }
                Expect::Operator => {
                    (position, expect) = self.parse_operator(position, &mut level)?;
                }
            }
        }

        if let Some((expected, offset)) = end {
            return Err(SyntaxError::Unterminated { expected, offset });
        }

        if expect == Expect::Label && !level.alternatives.is_empty() {
            return Err(SyntaxError::ExpectedLabel {
                found: describe(None),
                offset: position,
            });
        }

        Ok((level.finish(), position))
    }

    fn parse_operator(
        &self,
        position: usize,
        level: &mut Level,
    ) -> Result<(usize, Expect), SyntaxError> {
        let c = self.source[position];
        let and = self.style.and_operator;
        let or = self.style.or_operator;

        if c.is_whitespace() {
            let run = self.source[position..]
                .iter()
                .take_while(|o| o.is_whitespace())
                .count();

            // Trailing whitespace is padding, ex: `a b ` or `[a b ]`.
            match self.source.get(position + run) {
                None => return Ok((position + run, Expect::Operator)),
                Some(&next) if self.style.is_closing(next) || next == self.style.extended.1 => {
                    return Ok((position + run, Expect::Operator));
                }
                _ => {}
            }

            let (implied, explicit) = if and.is_whitespace() {
                (and, or)
            } else if or.is_whitespace() {
                (or, and)
            } else {
                return Ok((position + 1, Expect::Operator));
            };

            // Whitespace is padding when the explicit operator follows it, ex: `a | b`.
            let padding = self.source[position + 1..]
                .iter()
                .take_while(|o| o.is_whitespace() || **o == and || **o == or)
                .position(|o| *o == explicit);

            if let Some(index) = padding {
                return Ok((position + 1 + index, Expect::Operator));
            }

            if implied == and {
                level.close_alternatives();
            }

            Ok((position + 1, Expect::Label))
        } else if c == and {
            level.close_alternatives();
            Ok((position + 1, Expect::Label))
        } else if c == or {
            Ok((position + 1, Expect::Label))
        } else {
            Err(SyntaxError::ExpectedOperator {
                found: c,
                offset: position,
            })
        }
    }

    fn parse_item(
        &self,
        position: usize,
        alternatives: &mut Vec<Alternative>,
    ) -> Result<usize, SyntaxError> {
        let c = self.source[position];
        let style = self.style;

        if c == style.command.0 {
            let (text, next) = self.read_until(position, style.command.1)?;
            alternatives.push(Alternative::Node(GrammarNode::Command(text)));
            Ok(next)
        } else if c == style.extended.0 {
            let (text, next) = self.read_until(position, style.extended.1)?;

            if text.is_empty() {
                return Err(SyntaxError::EmptyLabel { offset: position });
            }

            alternatives.push(Alternative::Node(GrammarNode::Label(text)));
            Ok(next)
        } else if c == style.switch {
            let (node, next) = self.parse_switch(position)?;
            alternatives.push(Alternative::Node(node));
            Ok(next)
        } else if c == style.optional.0 {
            let (lower, next) = self.parse_level(position + 1, Some((style.optional.1, position)))?;

            if !lower.is_empty() {
                alternatives.push(Alternative::Node(sequence_or_single(lower)));
            }

            alternatives.push(Alternative::Empty);
            Ok(next)
        } else if c == style.group.0 {
            let (lower, next) = self.parse_level(position + 1, Some((style.group.1, position)))?;

            if !lower.is_empty() {
                alternatives.push(Alternative::Node(GrammarNode::Sequence(lower)));
            }

            Ok(next)
        } else if c == style.selection.0 {
            let (lower, next) =
                self.parse_level(position + 1, Some((style.selection.1, position)))?;

            if lower.is_empty() {
                return Err(SyntaxError::EmptySelection { offset: position });
            }

            let maximum = lower.len();
            alternatives.push(Alternative::Node(GrammarNode::Selection(Selection::new(
                lower, 1, maximum,
            ))));
            Ok(next)
        } else if !style.is_special(c) {
            let next = self.scan(position, |s| !s.is_whitespace() && !style.is_special(s));
            let text = self.source[position..next].iter().collect();
            alternatives.push(Alternative::Node(GrammarNode::Label(text)));
            Ok(next)
        } else {
            Err(SyntaxError::ExpectedLabel {
                found: describe(Some(c)),
                offset: position,
            })
        }
    }

    fn parse_switch(&self, position: usize) -> Result<(GrammarNode, usize), SyntaxError> {
        let style = self.style;
        let next = self.scan(position, |s| {
            !s.is_whitespace() && (s == style.switch || !style.is_special(s))
        });
        let text: String = self.source[position..next].iter().collect();
        let styled = style
            .unstyle_switch(&text, Origin::Definition)
            .map_err(|source| SyntaxError::InvalidSwitch {
                offset: position,
                source,
            })?;

        let node = if style.expands(&styled) {
            let singles: Vec<GrammarNode> = styled
                .name()
                .chars()
                .map(|n| GrammarNode::Switch(SwitchOption::new(n.to_string(), None)))
                .collect();
            let maximum = singles.len();
            GrammarNode::Selection(Selection::new(singles, 1, maximum))
        } else {
            GrammarNode::Switch(SwitchOption::new(
                styled.name(),
                styled.value().map(String::from),
            ))
        };

        Ok((node, next))
    }

    fn scan(&self, position: usize, accept: impl Fn(char) -> bool) -> usize {
        position
            + self.source[position..]
                .iter()
                .take_while(|c| accept(**c))
                .count()
    }

    /// Read the text between the delimiter at `position` and `closing`.
    fn read_until(&self, position: usize, closing: char) -> Result<(String, usize), SyntaxError> {
        match self.source[position + 1..].iter().position(|c| *c == closing) {
            Some(length) => {
                let text = self.source[position + 1..position + 1 + length]
                    .iter()
                    .collect();
                Ok((text, position + length + 2))
            }
            None => Err(SyntaxError::Unterminated {
                expected: closing,
                offset: position,
            }),
        }
    }
}

fn describe(found: Option<char>) -> String {
    match found {
        Some(c) => format!("'{c}'"),
        None => "the end of the definition".to_string(),
    }
}

fn sequence_or_single(mut nodes: Vec<GrammarNode>) -> GrammarNode {
    if nodes.len() == 1 {
        nodes.remove(0)
    } else {
        GrammarNode::Sequence(nodes)
    }
}

/// Reduce the alternatives of one sequence slot to a single node.
fn optimise(alternatives: Vec<Alternative>) -> Option<GrammarNode> {
    let flatten = alternatives.len() > 1;
    let mut empty = false;
    let mut items = Vec::with_capacity(alternatives.len());

    for alternative in alternatives {
        match alternative {
            Alternative::Empty => empty = true,
            Alternative::Node(node) if flatten => flatten_into(node, &mut items),
            Alternative::Node(node) => items.push(node),
        }
    }

    match (items.len(), empty) {
        (0, _) => None,
        (1, false) => items.pop(),
        (_, false) => Some(GrammarNode::Selection(Selection::new(items, 1, 1))),
        (_, true) => Some(GrammarNode::Selection(Selection::new(items, 0, 1))),
    }
}

/// Exactly-one selections offer their children as plain alternatives, ex: `[a|b]|c` is `[a|b|c]`.
fn flatten_into(node: GrammarNode, items: &mut Vec<GrammarNode>) {
    match node {
        GrammarNode::Selection(selection) if selection.is_exactly_one() => {
            for child in selection.into_children() {
                flatten_into(child, items);
            }
        }
        node => items.push(node),
    }
}

/// Merge each run of adjacent optional siblings into one selection, so they may be given in any order.
fn group_options(nodes: Vec<GrammarNode>) -> Vec<GrammarNode> {
    let mut grouped = Vec::with_capacity(nodes.len());
    let mut run: Vec<Selection> = Vec::default();

    for node in nodes {
        match node {
            GrammarNode::Selection(selection) if selection.is_optional() => run.push(selection),
            node => {
                flush_options(&mut run, &mut grouped);
                grouped.push(node);
            }
        }
    }

    flush_options(&mut run, &mut grouped);
    grouped
}

fn flush_options(run: &mut Vec<Selection>, grouped: &mut Vec<GrammarNode>) {
    match run.len() {
        0 => {}
        1 => grouped.extend(run.drain(..).map(GrammarNode::Selection)),
        count => {
            let members = run
                .drain(..)
                .map(|option| {
                    let maximum = option.maximum();
                    let mut objects = option.into_children();

                    if objects.len() == 1 {
                        objects.remove(0)
                    } else {
                        GrammarNode::Selection(Selection::new(objects, 1, maximum))
                    }
                })
                .collect();
            grouped.push(GrammarNode::Selection(Selection::new(members, 0, count)));
        }
    }
}
