use std::collections::BTreeMap;

/// The value bound to a name by a successful match.
///
/// Switches without a value and literal commands bind [`Value::Present`].
/// Labels and value-taking switches bind the captured text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Value {
    /// The switch or command appeared on the command line.
    Present,
    /// The text captured for a label or a `--name=value` switch.
    Text(String),
}

impl Value {
    /// The captured text, if this value carries any.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Present => None,
            Value::Text(text) => Some(text.as_str()),
        }
    }

    /// Whether this is the [`Value::Present`] marker.
    pub fn is_present(&self) -> bool {
        matches!(self, Value::Present)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Present => write!(f, "<present>"),
            Value::Text(text) => write!(f, "{text}"),
        }
    }
}

/// The name to value mapping produced by one successful match.
pub type Bindings = BTreeMap<String, Value>;

/// How the members of a selection may be ordered on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Order {
    /// Chosen members may appear in any relative order.
    #[default]
    Any,
    /// Chosen members must appear in the order of the syntax definition.
    Definition,
}

/// How many bindings a match call reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MatchMode {
    /// Only the first complete binding.
    #[default]
    FirstOnly,
    /// Every distinct complete binding.
    AllMatches,
}

/// The order in which a [`SelectionEnumerator`](crate::SelectionEnumerator) walks arrangements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Traversal {
    /// Every arrangement of one size before any arrangement of the next size.
    ///
    /// e.g. with indices `[0] -> [1] -> [0, 0] -> [1, 0]`
    #[default]
    WidthFirst,
    /// Extend the current arrangement before trying its siblings.
    ///
    /// e.g. with indices `[0] -> [0, 0] -> [1] -> [1, 0]`
    DepthFirst,
}
