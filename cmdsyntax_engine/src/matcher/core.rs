#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::grammar::{GrammarNode, GrammarTree, Selection, SwitchOption};
use crate::matcher::enumerator::SelectionEnumerator;
use crate::matcher::model::{deduplicate, Candidate};
use crate::model::{Bindings, MatchMode, Order, Traversal, Value};
use crate::style::{Origin, StyleConfig};

/// Match `tokens` against a compiled tree.
///
/// Only interpretations which consume every token are reported.
/// An empty result means the tokens do not match the tree.
/// [`MatchMode::FirstOnly`] stops at the first interpretation found depth first; it is always one of the [`MatchMode::AllMatches`] results.
/// Tokens are matched as given; see [`Tokenizer::prepare`](crate::Tokenizer::prepare) to apply switch expansion.
///
/// ### Example
/// ```
/// # use cmdsyntax_engine as cmdsyntax;
/// use cmdsyntax::{compile, match_tokens, MatchMode, Order, StyleConfig, Value};
///
/// let style = StyleConfig::default();
/// let tree = compile("infile [-o outfile]", &style).unwrap();
/// let matches = match_tokens(&tree, &["in.txt", "-o", "out.txt"], &style, Order::Any, MatchMode::FirstOnly);
///
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0]["infile"], Value::Text("in.txt".to_string()));
/// assert_eq!(matches[0]["o"], Value::Present);
/// assert_eq!(matches[0]["outfile"], Value::Text("out.txt".to_string()));
/// ```
pub fn match_tokens<S: AsRef<str>>(
    tree: &GrammarTree,
    tokens: &[S],
    style: &StyleConfig,
    order: Order,
    mode: MatchMode,
) -> Vec<Bindings> {
    let tokens: Vec<&str> = tokens.iter().map(AsRef::as_ref).collect();
    let engine = MatchingEngine {
        tokens: &tokens,
        style,
        order,
    };

    match mode {
        MatchMode::FirstOnly => {
            let found = engine.first(tree.root(), None, Candidate::default());

            #[cfg(feature = "tracing_debug")]
            {
                debug!(
                    "First match against {t} token(s): {found:?}.",
                    t = tokens.len()
                );
            }

            found.map(Candidate::into_bindings).into_iter().collect()
        }
        MatchMode::AllMatches => {
            let candidates = engine.match_sequence(tree.root(), vec![Candidate::default()]);

            #[cfg(feature = "tracing_debug")]
            {
                debug!(
                    "Matched {n} candidate(s) against {t} token(s).",
                    n = candidates.len(),
                    t = tokens.len()
                );
            }

            candidates
                .into_iter()
                .filter(|candidate| candidate.cursor() == tokens.len())
                .map(Candidate::into_bindings)
                .collect()
        }
    }
}

/// The work left once the current node is matched, innermost first.
enum Continuation<'c> {
    /// Match these nodes in sequence.
    Nodes {
        nodes: &'c [GrammarNode],
        then: Option<&'c Continuation<'c>>,
    },
    /// Carry on choosing objects of a selection; `parent` is the candidate before the latest choice.
    Selection {
        selection: &'c Selection,
        chosen: &'c [usize],
        parent: &'c Candidate,
        then: Option<&'c Continuation<'c>>,
    },
}

struct MatchingEngine<'a> {
    tokens: &'a [&'a str],
    style: &'a StyleConfig,
    order: Order,
}

impl<'a> MatchingEngine<'a> {
    fn token(&self, cursor: usize) -> Option<&'a str> {
        self.tokens.get(cursor).copied()
    }

    fn match_sequence(
        &self,
        nodes: &[GrammarNode],
        mut candidates: Vec<Candidate>,
    ) -> Vec<Candidate> {
        for node in nodes {
            candidates = self.match_node(node, candidates);

            if candidates.is_empty() {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("No candidates survive {node:?}.");
                }

                break;
            }
        }

        candidates
    }

    fn match_node(&self, node: &GrammarNode, candidates: Vec<Candidate>) -> Vec<Candidate> {
        let matched = match node {
            GrammarNode::Sequence(children) => self.match_sequence(children, candidates),
            GrammarNode::Selection(selection) => candidates
                .iter()
                .flat_map(|candidate| self.match_selection(selection, candidate))
                .collect(),
            leaf => candidates
                .iter()
                .filter_map(|candidate| self.match_leaf(leaf, candidate))
                .collect(),
        };

        deduplicate(matched)
    }

    fn match_leaf(&self, node: &GrammarNode, candidate: &Candidate) -> Option<Candidate> {
        let token = self.token(candidate.cursor());

        match node {
            GrammarNode::Label(name) => {
                token.map(|token| candidate.bind(name, Value::Text(token.to_string()), 1))
            }
            GrammarNode::Command(text) => {
                (token == Some(text.as_str())).then(|| candidate.bind(text, Value::Present, 1))
            }
            GrammarNode::Switch(switch) => self.match_switch(switch, candidate),
            GrammarNode::Sequence(_) | GrammarNode::Selection(_) => None,
        }
    }

    fn match_switch(&self, switch: &SwitchOption, candidate: &Candidate) -> Option<Candidate> {
        let cursor = candidate.cursor();
        let token = self.token(cursor)?;

        if !self.style.is_switch(token) {
            return None;
        }

        let styled = self.style.unstyle_switch(token, Origin::CommandLine).ok()?;

        if styled.name() != switch.name() {
            return None;
        }

        match (switch.takes_value(), styled.value()) {
            (false, None) => Some(candidate.bind(switch.name(), Value::Present, 1)),
            (true, Some(value)) => {
                Some(candidate.bind(switch.name(), Value::Text(value.to_string()), 1))
            }
            (true, None) if self.style.allow_separate_value => {
                let value = self.token(cursor + 1)?;

                if self.style.is_switch(value) {
                    None
                } else {
                    Some(candidate.bind(switch.name(), Value::Text(value.to_string()), 2))
                }
            }
            _ => None,
        }
    }

    /// Extend `candidate` by choosing selection objects one at a time.
    ///
    /// Every extension with at least `minimum` objects chosen is a result.
    fn match_selection(&self, selection: &Selection, candidate: &Candidate) -> Vec<Candidate> {
        let objects = selection.children();
        let minimum = selection.minimum();
        let mut results = Vec::default();

        if minimum == 0 {
            results.push(candidate.clone());
        }

        // The enumerator reports every prefix, so the minimum is applied here instead.
        let mut enumerator =
            SelectionEnumerator::new(objects.len(), 1, selection.maximum(), self.order);
        // `prefixes[d]` holds the candidates after `d` objects have been chosen.
        let mut prefixes: Vec<Vec<Candidate>> = vec![vec![candidate.clone()]];
        let mut arrangement = enumerator.begin();

        while let Some(chosen) = arrangement {
            let depth = chosen.len();
            prefixes.truncate(depth);
            let object = &objects[chosen[depth - 1]];
            let mut extended = Vec::default();

            for parent in &prefixes[depth - 1] {
                for child in self.match_node(object, vec![parent.clone()]) {
                    // Once the minimum is met, a choice which consumes nothing adds nothing.
                    if depth > minimum && &child == parent {
                        continue;
                    }

                    extended.push(child);
                }
            }

            let extended = deduplicate(extended);

            if extended.is_empty() {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Pruning selection arrangement {chosen:?}.");
                }

                arrangement = enumerator.prune();
            } else {
                if depth >= minimum {
                    results.extend(extended.iter().cloned());
                }

                prefixes.push(extended);
                arrangement = enumerator.advance(Traversal::DepthFirst);
            }
        }

        results
    }

    /// Depth first search for one complete match.
    /// Each choice is followed through the rest of the tree before the next is tried,
    /// so nothing past the first complete candidate is visited.
    fn first<'c>(
        &self,
        nodes: &'c [GrammarNode],
        then: Option<&'c Continuation<'c>>,
        candidate: Candidate,
    ) -> Option<Candidate> {
        let Some((node, rest)) = nodes.split_first() else {
            return self.resume(then, candidate);
        };
        let continuation = Continuation::Nodes { nodes: rest, then };

        match node {
            GrammarNode::Sequence(children) => self.first(children, Some(&continuation), candidate),
            GrammarNode::Selection(selection) => {
                self.first_choice(selection, &[], &candidate, Some(&continuation))
            }
            leaf => self
                .match_leaf(leaf, &candidate)
                .and_then(|child| self.first(rest, then, child)),
        }
    }

    fn resume<'c>(
        &self,
        then: Option<&'c Continuation<'c>>,
        candidate: Candidate,
    ) -> Option<Candidate> {
        match then {
            None => (candidate.cursor() == self.tokens.len()).then_some(candidate),
            Some(Continuation::Nodes { nodes, then }) => self.first(nodes, *then, candidate),
            Some(Continuation::Selection {
                selection,
                chosen,
                parent,
                then,
            }) => {
                // Once the minimum is met, a choice which consumes nothing adds nothing.
                if chosen.len() > selection.minimum() && &candidate == *parent {
                    return None;
                }

                self.first_choice(selection, chosen, &candidate, *then)
            }
        }
    }

    /// Carry on with `candidate` if enough objects are chosen, otherwise (or failing that) choose one more.
    fn first_choice<'c>(
        &self,
        selection: &'c Selection,
        chosen: &[usize],
        candidate: &Candidate,
        then: Option<&'c Continuation<'c>>,
    ) -> Option<Candidate> {
        if chosen.len() >= selection.minimum() {
            if let Some(found) = self.resume(then, candidate.clone()) {
                return Some(found);
            }
        }

        if chosen.len() >= selection.maximum() {
            return None;
        }

        let start = match self.order {
            Order::Any => 0,
            Order::Definition => chosen.last().map_or(0, |last| last + 1),
        };

        (start..selection.children().len())
            .filter(|index| !chosen.contains(index))
            .find_map(|index| {
                let mut extended = chosen.to_vec();
                extended.push(index);
                let continuation = Continuation::Selection {
                    selection,
                    chosen: &extended,
                    parent: candidate,
                    then,
                };

                self.first(
                    std::slice::from_ref(&selection.children()[index]),
                    Some(&continuation),
                    candidate.clone(),
                )
            })
    }
}
