use std::collections::BTreeSet;

mod compiler;
mod render;

pub use compiler::{compile, SyntaxError};

/// A node of a compiled syntax definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GrammarNode {
    /// Consumes any one token, binding it to the label name.
    Label(String),
    /// Consumes exactly the given token, binding it as present.
    Command(String),
    /// Consumes a switch (and its value, when it takes one).
    Switch(SwitchOption),
    /// Matches every child in order.
    Sequence(Vec<GrammarNode>),
    /// Matches a number of distinct children in some order.
    Selection(Selection),
}

impl GrammarNode {
    fn collect_names(&self, names: &mut BTreeSet<String>) {
        match self {
            GrammarNode::Label(name) | GrammarNode::Command(name) => {
                names.insert(name.clone());
            }
            GrammarNode::Switch(switch) => {
                names.insert(switch.name.clone());
            }
            GrammarNode::Sequence(children) => {
                children.iter().for_each(|c| c.collect_names(names));
            }
            GrammarNode::Selection(selection) => {
                selection
                    .children
                    .iter()
                    .for_each(|c| c.collect_names(names));
            }
        }
    }
}

/// A switch as written in a syntax definition, with its style removed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SwitchOption {
    name: String,
    value: Option<String>,
}

impl SwitchOption {
    /// Create a switch named `name`; `value` is the placeholder after the `=`, if the switch takes a value.
    pub fn new(name: impl Into<String>, value: Option<String>) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }

    /// The canonical switch name (ex: `output` for `--output=dir`).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The value placeholder from the definition (ex: `dir` for `--output=dir`).
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// Whether this switch must be given a value.
    pub fn takes_value(&self) -> bool {
        self.value.is_some()
    }
}

/// Choose between `minimum` and `maximum` distinct children.
///
/// A selection with `minimum == 0` is optional.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Selection {
    children: Vec<GrammarNode>,
    minimum: usize,
    maximum: usize,
}

impl Selection {
    pub(crate) fn new(children: Vec<GrammarNode>, minimum: usize, maximum: usize) -> Self {
        debug_assert!(!children.is_empty());
        debug_assert!(minimum <= maximum);
        debug_assert!(maximum <= children.len());
        Self {
            children,
            minimum,
            maximum,
        }
    }

    /// The nodes to choose from.
    pub fn children(&self) -> &[GrammarNode] {
        &self.children
    }

    /// The fewest children which must be chosen.
    pub fn minimum(&self) -> usize {
        self.minimum
    }

    /// The most children which may be chosen.
    pub fn maximum(&self) -> usize {
        self.maximum
    }

    /// Whether choosing nothing is acceptable.
    pub fn is_optional(&self) -> bool {
        self.minimum == 0
    }

    pub(crate) fn is_exactly_one(&self) -> bool {
        self.minimum == 1 && self.maximum == 1
    }

    pub(crate) fn into_children(self) -> Vec<GrammarNode> {
        self.children
    }
}

/// A compiled syntax definition.
///
/// The tree is immutable, and may be matched against any number of command lines.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct GrammarTree {
    root: Vec<GrammarNode>,
}

impl GrammarTree {
    pub(crate) fn new(root: Vec<GrammarNode>) -> Self {
        Self { root }
    }

    /// The top level nodes, matched in sequence.
    pub fn root(&self) -> &[GrammarNode] {
        &self.root
    }

    /// Whether this tree only matches an empty command line.
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Every name which a match of this tree may bind.
    pub fn names(&self) -> BTreeSet<String> {
        let mut names = BTreeSet::default();
        self.root.iter().for_each(|n| n.collect_names(&mut names));
        names
    }
}
