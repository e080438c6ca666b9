use std::collections::{BTreeMap, BTreeSet};

use thiserror::Error;

use crate::api::Syntax;
use crate::grammar::{GrammarNode, GrammarTree};
use crate::model::{Bindings, Value};
use crate::style::StyleConfig;

/// A submission which does not fit its form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The name is not bound anywhere in the syntax.
    #[error("'{0}' is not a field of this form.")]
    UnknownField(String),
    /// The field only accepts text, but was marked as present.
    #[error("Field '{0}' requires a value.")]
    ExpectedText(String),
    /// The field only accepts presence, but was given text.
    #[error("Field '{name}' does not take a value (given '{value}').")]
    UnexpectedText {
        /// The field name.
        name: String,
        /// The rejected text.
        value: String,
    },
    /// No match of the syntax binds exactly these fields (ex: a required field is missing).
    #[error("No command line binds exactly the fields {0:?}.")]
    Unmatched(Vec<String>),
}

/// One element of a form outline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormItem {
    /// A text field.
    Label {
        /// The name the text is bound to.
        name: String,
    },
    /// A literal word.
    Command {
        /// The word, which is also the name it is bound to.
        text: String,
    },
    /// A switch, with a text field when it takes a value.
    Switch {
        /// The canonical switch name.
        name: String,
        /// Whether the switch carries a value.
        takes_value: bool,
        /// The switch as written in the definition (ex: `--out=dir`).
        display: String,
    },
    /// Every item, in order.
    Group {
        /// The grouped items.
        items: Vec<FormItem>,
    },
    /// Between `minimum` and `maximum` of the items.
    Choice {
        /// Instructions for the choice (ex: "Select any of the following 3 options:").
        prompt: String,
        /// The fewest items to choose.
        minimum: usize,
        /// The most items to choose.
        maximum: usize,
        /// The items to choose from.
        items: Vec<FormItem>,
    },
}

impl FormItem {
    /// The one line text of a field; `None` for groups and choices.
    pub(crate) fn caption(&self) -> Option<&str> {
        match self {
            FormItem::Label { name } => Some(name),
            FormItem::Command { text } => Some(text),
            FormItem::Switch { display, .. } => Some(display),
            FormItem::Group { .. } | FormItem::Choice { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct FieldKind {
    present: bool,
    text: bool,
}

/// The description of a form for filling in a command line.
///
/// This is the boundary for front ends (ex: a GUI) which present a syntax as a set of fields,
/// rather than asking for a command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormDescription {
    items: Vec<FormItem>,
    fields: BTreeMap<String, FieldKind>,
    tree: GrammarTree,
}

impl FormDescription {
    /// The outline of the form; the top level items are all required.
    pub fn items(&self) -> &[FormItem] {
        &self.items
    }

    /// The names which a submission may bind, in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub(crate) fn into_items(self) -> Vec<FormItem> {
        self.items
    }

    /// Check the filled in bindings against the form.
    ///
    /// Every entry must name a field, with [`Value::Text`] for labels and value-taking switches,
    /// and [`Value::Present`] for commands and plain switches.
    /// Together the entries must be a set of fields which one match of the syntax binds:
    /// required fields filled in, and no two exclusive choices taken.
    /// The bindings are handed back unchanged, in the same shape as a successful match.
    ///
    /// ### Example
    /// ```
    /// # use cmdsyntax_engine as cmdsyntax;
    /// use cmdsyntax::{Bindings, Form, SubmitError, Syntax, Value};
    ///
    /// let syntax = Syntax::new("infile [-o outfile]").unwrap();
    /// let form = Form::render(&syntax);
    /// let bindings = Bindings::from([
    ///     ("infile".to_string(), Value::Text("a.txt".to_string())),
    ///     ("o".to_string(), Value::Present),
    ///     ("outfile".to_string(), Value::Text("b.txt".to_string())),
    /// ]);
    ///
    /// assert_eq!(form.submit(bindings.clone()), Ok(bindings));
    /// assert_eq!(
    ///     form.submit(Bindings::from([("x".to_string(), Value::Present)])),
    ///     Err(SubmitError::UnknownField("x".to_string()))
    /// );
    /// assert_eq!(
    ///     form.submit(Bindings::from([("o".to_string(), Value::Present)])),
    ///     Err(SubmitError::Unmatched(vec!["o".to_string()]))
    /// );
    /// ```
    pub fn submit(&self, bindings: Bindings) -> Result<Bindings, SubmitError> {
        for (name, value) in &bindings {
            let kind = self
                .fields
                .get(name)
                .ok_or_else(|| SubmitError::UnknownField(name.clone()))?;

            match value {
                Value::Present if !kind.present => {
                    return Err(SubmitError::ExpectedText(name.clone()));
                }
                Value::Text(text) if !kind.text => {
                    return Err(SubmitError::UnexpectedText {
                        name: name.clone(),
                        value: text.clone(),
                    });
                }
                _ => {}
            }
        }

        let fits = {
            let wanted: BTreeSet<&str> = bindings.keys().map(String::as_str).collect();
            sequence_sets(self.tree.root(), &wanted).contains(&wanted)
        };

        if fits {
            Ok(bindings)
        } else {
            Err(SubmitError::Unmatched(bindings.into_keys().collect()))
        }
    }
}

/// Builds form descriptions from syntaxes.
pub struct Form;

impl Form {
    /// Describe `syntax` as a form.
    ///
    /// ### Example
    /// ```
    /// # use cmdsyntax_engine as cmdsyntax;
    /// use cmdsyntax::{Form, FormItem, Syntax};
    ///
    /// let syntax = Syntax::new("[-a] [-b] [-c]").unwrap();
    /// let form = Form::render(&syntax);
    ///
    /// match &form.items()[0] {
    ///     FormItem::Choice { prompt, .. } => assert_eq!(prompt, "Select any of the following 3 options:"),
    ///     _ => unreachable!(),
    /// }
    /// ```
    pub fn render(syntax: &Syntax) -> FormDescription {
        let mut fields = BTreeMap::default();
        let items = syntax
            .tree()
            .root()
            .iter()
            .map(|node| describe(node, syntax.style(), &mut fields))
            .collect();

        FormDescription {
            items,
            fields,
            tree: syntax.tree().clone(),
        }
    }
}

type NameSet<'t> = BTreeSet<&'t str>;

/// Every set of names which a match of `nodes` can bind, keeping only sets drawn from `wanted`.
fn sequence_sets<'t>(
    nodes: &'t [GrammarNode],
    wanted: &BTreeSet<&str>,
) -> BTreeSet<NameSet<'t>> {
    nodes
        .iter()
        .fold(BTreeSet::from([NameSet::default()]), |sets, node| {
            join(&sets, &name_sets(node, wanted))
        })
}

fn name_sets<'t>(node: &'t GrammarNode, wanted: &BTreeSet<&str>) -> BTreeSet<NameSet<'t>> {
    let single = |name: &'t str| {
        if wanted.contains(name) {
            BTreeSet::from([NameSet::from([name])])
        } else {
            BTreeSet::default()
        }
    };

    match node {
        GrammarNode::Label(name) | GrammarNode::Command(name) => single(name.as_str()),
        GrammarNode::Switch(switch) => single(switch.name()),
        GrammarNode::Sequence(children) => sequence_sets(children, wanted),
        GrammarNode::Selection(selection) => {
            // `chosen[k]` holds the sets reachable by choosing `k` of the children seen so far.
            let mut chosen = vec![BTreeSet::from([NameSet::default()])];

            for child in selection.children() {
                let options = name_sets(child, wanted);
                let top = chosen.len().min(selection.maximum());

                for k in (0..top).rev() {
                    let extended = join(&chosen[k], &options);

                    match chosen.get_mut(k + 1) {
                        Some(sets) => sets.extend(extended),
                        None => chosen.push(extended),
                    }
                }
            }

            chosen
                .into_iter()
                .skip(selection.minimum())
                .flatten()
                .collect()
        }
    }
}

fn join<'t>(
    left: &BTreeSet<NameSet<'t>>,
    right: &BTreeSet<NameSet<'t>>,
) -> BTreeSet<NameSet<'t>> {
    left.iter()
        .flat_map(|l| {
            right
                .iter()
                .map(move |r| l.union(r).copied().collect::<NameSet<'t>>())
        })
        .collect()
}

fn describe(
    node: &GrammarNode,
    style: &StyleConfig,
    fields: &mut BTreeMap<String, FieldKind>,
) -> FormItem {
    match node {
        GrammarNode::Label(name) => {
            fields.entry(name.clone()).or_default().text = true;
            FormItem::Label { name: name.clone() }
        }
        GrammarNode::Command(text) => {
            fields.entry(text.clone()).or_default().present = true;
            FormItem::Command { text: text.clone() }
        }
        GrammarNode::Switch(switch) => {
            let kind = fields.entry(switch.name().to_string()).or_default();

            if switch.takes_value() {
                kind.text = true;
            } else {
                kind.present = true;
            }

            FormItem::Switch {
                name: switch.name().to_string(),
                takes_value: switch.takes_value(),
                display: switch.render(style),
            }
        }
        GrammarNode::Sequence(children) => FormItem::Group {
            items: children
                .iter()
                .map(|child| describe(child, style, fields))
                .collect(),
        },
        GrammarNode::Selection(selection) => FormItem::Choice {
            prompt: prompt(
                selection.minimum(),
                selection.maximum(),
                selection.children().len(),
            ),
            minimum: selection.minimum(),
            maximum: selection.maximum(),
            items: selection
                .children()
                .iter()
                .map(|child| describe(child, style, fields))
                .collect(),
        },
    }
}

fn prompt(minimum: usize, maximum: usize, total: usize) -> String {
    if total == 1 {
        return if minimum == 0 {
            "Optionally select the following item:".to_string()
        } else {
            "You must select this option:".to_string()
        };
    }

    let amount = match (minimum, maximum) {
        (0, m) if m == total => "any of".to_string(),
        (0, 1) => "at most 1 of".to_string(),
        (0, m) => format!("up to {m} of"),
        (n, m) if n == m => format!("exactly {n} of"),
        (n, m) if m == total => format!("at least {n} of"),
        (n, m) => format!("from {n} to {m} of"),
    };

    format!("Select {amount} the following {total} options:")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn label(name: &str) -> FormItem {
        FormItem::Label {
            name: name.to_string(),
        }
    }

    fn switch(name: &str, display: &str) -> FormItem {
        FormItem::Switch {
            name: name.to_string(),
            takes_value: display.contains('='),
            display: display.to_string(),
        }
    }

    fn choice(prompt: &str, minimum: usize, maximum: usize, items: Vec<FormItem>) -> FormItem {
        FormItem::Choice {
            prompt: prompt.to_string(),
            minimum,
            maximum,
            items,
        }
    }

    #[test]
    fn render_optional_group() {
        // Setup
        let syntax = Syntax::new("infile [-o outfile]").unwrap();

        // Execute
        let form = Form::render(&syntax);

        // Verify
        assert_eq!(
            form.items(),
            &[
                label("infile"),
                choice(
                    "Optionally select the following item:",
                    0,
                    1,
                    vec![FormItem::Group {
                        items: vec![switch("o", "-o"), label("outfile")],
                    }],
                ),
            ]
        );
        assert_eq!(
            form.fields().collect::<Vec<_>>(),
            vec!["infile", "o", "outfile"]
        );
    }

    #[test]
    fn render_commands_and_values() {
        // Setup
        let syntax = Syntax::new(r#""add" --to=dir (-i infile)|(-o outfile)"#).unwrap();

        // Execute
        let form = Form::render(&syntax);

        // Verify
        assert_eq!(
            form.items(),
            &[
                FormItem::Command {
                    text: "add".to_string(),
                },
                switch("to", "--to=dir"),
                choice(
                    "Select exactly 1 of the following 2 options:",
                    1,
                    1,
                    vec![
                        FormItem::Group {
                            items: vec![switch("i", "-i"), label("infile")],
                        },
                        FormItem::Group {
                            items: vec![switch("o", "-o"), label("outfile")],
                        },
                    ],
                ),
            ]
        );
    }

    #[rstest]
    #[case("[-a]", "Optionally select the following item:")]
    #[case("{-a}", "You must select this option:")]
    #[case("[-a] [-b] [-c]", "Select any of the following 3 options:")]
    #[case("[-a | -b | -c]", "Select at most 1 of the following 3 options:")]
    #[case("-a | -b", "Select exactly 1 of the following 2 options:")]
    #[case("{-x -y -z}", "Select at least 1 of the following 3 options:")]
    #[case("-xyz", "Select at least 1 of the following 3 options:")]
    fn render_prompt(#[case] definition: &str, #[case] expected: &str) {
        // Setup
        let syntax = Syntax::new(definition).unwrap();

        // Execute
        let form = Form::render(&syntax);

        // Verify
        assert_matches!(&form.items()[0], FormItem::Choice { prompt, .. } if prompt == expected);
    }

    #[rstest]
    #[case(0, 2, 4, "Select up to 2 of the following 4 options:")]
    #[case(2, 2, 4, "Select exactly 2 of the following 4 options:")]
    #[case(2, 4, 4, "Select at least 2 of the following 4 options:")]
    #[case(1, 3, 4, "Select from 1 to 3 of the following 4 options:")]
    fn prompt_bounds(
        #[case] minimum: usize,
        #[case] maximum: usize,
        #[case] total: usize,
        #[case] expected: &str,
    ) {
        assert_eq!(prompt(minimum, maximum, total), expected);
    }

    #[test]
    fn submit_match() {
        // Setup
        let syntax = Syntax::new("infile [-o outfile] [--level=n]").unwrap();
        let form = Form::render(&syntax);
        let bindings = syntax
            .first_match(&["in.txt", "--level=3", "-o", "out.txt"])
            .unwrap();

        // Execute
        let submitted = form.submit(bindings.clone());

        // Verify
        assert_eq!(submitted, Ok(bindings));
    }

    #[rstest]
    #[case("missing", Value::Present, SubmitError::UnknownField("missing".to_string()))]
    #[case("infile", Value::Present, SubmitError::ExpectedText("infile".to_string()))]
    #[case("level", Value::Present, SubmitError::ExpectedText("level".to_string()))]
    #[case(
        "o",
        Value::Text("x".to_string()),
        SubmitError::UnexpectedText { name: "o".to_string(), value: "x".to_string() }
    )]
    fn submit_rejected(#[case] name: &str, #[case] value: Value, #[case] expected: SubmitError) {
        // Setup
        let syntax = Syntax::new("infile [-o outfile] [--level=n]").unwrap();
        let form = Form::render(&syntax);

        // Execute
        let error = form
            .submit(Bindings::from([(name.to_string(), value)]))
            .unwrap_err();

        // Verify
        assert_eq!(error, expected);
    }

    fn entries(entries: Vec<(&str, Option<&str>)>) -> Bindings {
        entries
            .into_iter()
            .map(|(name, text)| {
                let value = match text {
                    Some(text) => Value::Text(text.to_string()),
                    None => Value::Present,
                };
                (name.to_string(), value)
            })
            .collect()
    }

    #[rstest]
    #[case("(-i infile)|(-o outfile)", vec![("o", None), ("outfile", Some("b"))], true)]
    #[case(
        "(-i infile)|(-o outfile)",
        vec![("i", None), ("infile", Some("a")), ("o", None), ("outfile", Some("b"))],
        false
    )]
    #[case("(-i infile)|(-o outfile)", vec![], false)]
    #[case("infile [-o outfile]", vec![("infile", Some("a"))], true)]
    #[case("infile [-o outfile]", vec![("o", None), ("outfile", Some("b"))], false)]
    #[case("infile [-o outfile]", vec![("infile", Some("a")), ("o", None)], false)]
    #[case("{-x -y -z}", vec![("z", None), ("x", None)], true)]
    #[case("{-x -y -z}", vec![], false)]
    #[case("[-a | -b]", vec![("a", None), ("b", None)], false)]
    #[case("name name", vec![("name", Some("x"))], true)]
    #[case("", vec![], true)]
    fn submit_structure(
        #[case] definition: &str,
        #[case] submitted: Vec<(&str, Option<&str>)>,
        #[case] accepted: bool,
    ) {
        // Setup
        let syntax = Syntax::new(definition).unwrap();
        let form = Form::render(&syntax);
        let bindings = entries(submitted);

        // Execute
        let result = form.submit(bindings.clone());

        // Verify
        if accepted {
            assert_eq!(result, Ok(bindings));
        } else {
            assert_eq!(
                result,
                Err(SubmitError::Unmatched(bindings.into_keys().collect()))
            );
        }
    }

    #[test]
    fn submit_name_of_both_kinds() {
        // Setup
        let syntax = Syntax::new("-v | v").unwrap();
        let form = Form::render(&syntax);

        // Execute & Verify
        assert!(form
            .submit(Bindings::from([("v".to_string(), Value::Present)]))
            .is_ok());
        assert!(form
            .submit(Bindings::from([("v".to_string(), Value::Text("x".to_string()))]))
            .is_ok());
    }
}
