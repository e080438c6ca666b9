use std::fmt;

use crate::grammar::{GrammarNode, GrammarTree, Selection, SwitchOption};
use crate::style::StyleConfig;

impl GrammarTree {
    /// Write this tree back out as a syntax definition in the given style.
    ///
    /// Compiling the rendered text (with the same style) produces an identical tree.
    ///
    /// ### Example
    /// ```
    /// # use cmdsyntax_engine as cmdsyntax;
    /// use cmdsyntax::{compile, StyleConfig};
    ///
    /// let style = StyleConfig::default();
    /// let tree = compile("infile   [-o  outfile]", &style).unwrap();
    /// assert_eq!(tree.render(&style), "infile [-o outfile]");
    /// ```
    pub fn render(&self, style: &StyleConfig) -> String {
        Renderer { style }.items(self.root())
    }
}

impl fmt::Display for GrammarTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(&StyleConfig::default()))
    }
}

impl SwitchOption {
    /// Write this switch as it appears in a definition of the given style (ex: `--out=dir`).
    pub(crate) fn render(&self, style: &StyleConfig) -> String {
        Renderer { style }.switch(self)
    }
}

struct Renderer<'s> {
    style: &'s StyleConfig,
}

/// Each node is written for the position it is read back from:
/// a slot between AND operators, an alternative between OR operators, or a member of a grouped run of optionals.
impl<'s> Renderer<'s> {
    fn items(&self, nodes: &[GrammarNode]) -> String {
        nodes
            .iter()
            .map(|n| self.slot(n))
            .collect::<Vec<_>>()
            .join(&self.style.and_operator.to_string())
    }

    fn or_separator(&self) -> String {
        let or = self.style.or_operator;

        // Padding is only read as padding when the AND operator is whitespace.
        if self.style.and_operator.is_whitespace() && !or.is_whitespace() {
            format!(" {or} ")
        } else {
            or.to_string()
        }
    }

    fn slot(&self, node: &GrammarNode) -> String {
        match node {
            GrammarNode::Selection(selection) => match (selection.minimum(), selection.maximum()) {
                (0, 1) => self.optional(selection.children()),
                (0, _) => selection
                    .children()
                    .iter()
                    .map(|member| self.member(member))
                    .collect::<Vec<_>>()
                    .join(&self.style.and_operator.to_string()),
                (1, 1) if selection.children().len() > 1 => selection
                    .children()
                    .iter()
                    .map(|child| self.alternative(child))
                    .collect::<Vec<_>>()
                    .join(&self.or_separator()),
                _ => self.atom(node),
            },
            _ => self.atom(node),
        }
    }

    /// A node between OR operators.
    /// An exactly-one block is dissolved into the surrounding alternatives, so `{[a] [b]} | c` keeps the run intact.
    fn alternative(&self, node: &GrammarNode) -> String {
        if is_optional(node) {
            self.wrap(self.style.selection, &self.slot(node))
        } else {
            self.atom(node)
        }
    }

    /// The alternatives of an optional slot.
    fn optional(&self, children: &[GrammarNode]) -> String {
        match children {
            [child] => self.bracket(child),
            _ if children.iter().any(is_optional) => children
                .iter()
                .map(|child| {
                    if is_optional(child) {
                        self.bracket(child)
                    } else {
                        self.alternative(child)
                    }
                })
                .collect::<Vec<_>>()
                .join(&self.or_separator()),
            _ => self.wrap(
                self.style.optional,
                &children
                    .iter()
                    .map(|child| self.alternative(child))
                    .collect::<Vec<_>>()
                    .join(&self.or_separator()),
            ),
        }
    }

    /// One member of a grouped run of optionals, written as its own optional slot.
    fn member(&self, member: &GrammarNode) -> String {
        match member {
            GrammarNode::Selection(selection)
                if selection.is_exactly_one() && selection.children().len() > 1 =>
            {
                self.optional(selection.children())
            }
            _ => self.bracket(member),
        }
    }

    /// `[...]` around a node; a lone sequence needs no group of its own there.
    fn bracket(&self, node: &GrammarNode) -> String {
        let body = match node {
            GrammarNode::Sequence(items) if items.len() > 1 => self.items(items),
            _ => self.slot(node),
        };
        self.wrap(self.style.optional, &body)
    }

    fn atom(&self, node: &GrammarNode) -> String {
        match node {
            GrammarNode::Label(name) => self.label(name),
            GrammarNode::Command(text) => {
                format!("{}{text}{}", self.style.command.0, self.style.command.1)
            }
            GrammarNode::Switch(switch) => self.switch(switch),
            GrammarNode::Sequence(children) => self.wrap(self.style.group, &self.items(children)),
            GrammarNode::Selection(selection) => {
                self.wrap(self.style.selection, &self.items(selection.children()))
            }
        }
    }

    fn label(&self, name: &str) -> String {
        let plain = !name.is_empty()
            && name
                .chars()
                .all(|c| !c.is_whitespace() && !self.style.is_special(c));

        if plain {
            name.to_string()
        } else {
            self.wrap(self.style.extended, name)
        }
    }

    fn switch(&self, switch: &SwitchOption) -> String {
        let style = self.style;
        let single_letter = switch.name().chars().count() == 1;
        let prefix_length = match switch.value() {
            None if single_letter => 1,
            Some(_) if single_letter && style.allow_single_value => 1,
            _ if style.allow_double => 2,
            _ => 1,
        };
        let prefix: String = std::iter::repeat(style.switch).take(prefix_length).collect();

        match switch.value() {
            Some(value) => format!("{prefix}{}={value}", switch.name()),
            None => format!("{prefix}{}", switch.name()),
        }
    }

    fn wrap(&self, (start, end): (char, char), body: &str) -> String {
        format!("{start}{body}{end}")
    }
}

fn is_optional(node: &GrammarNode) -> bool {
    matches!(node, GrammarNode::Selection(selection) if selection.is_optional())
}
