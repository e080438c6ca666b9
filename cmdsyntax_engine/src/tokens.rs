use thiserror::Error;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::constant::QUOTE;
use crate::style::StyleConfig;

/// A raw command line which cannot be split into tokens.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenizeError {
    /// A quote was opened but never closed.
    #[error("Unterminated quote starting at offset {offset}.")]
    UnterminatedQuote {
        /// Byte offset of the opening quote.
        offset: usize,
    },
}

/// Turns raw command line text into the tokens seen by the matcher.
///
/// ### Example
/// ```
/// # use cmdsyntax_engine as cmdsyntax;
/// use cmdsyntax::{StyleConfig, Tokenizer};
///
/// let style = StyleConfig::default();
/// let tokens = Tokenizer::new(&style).tokenize(r#"-vf "my file" out"#).unwrap();
/// assert_eq!(tokens, vec!["-v", "-f", "my file", "out"]);
/// ```
#[derive(Debug)]
pub struct Tokenizer<'s> {
    style: &'s StyleConfig,
}

impl<'s> Tokenizer<'s> {
    /// Create a tokenizer for the given style.
    pub fn new(style: &'s StyleConfig) -> Self {
        Self { style }
    }

    /// Split `raw` on whitespace (respecting double quotes), then [`Tokenizer::prepare`] the result.
    ///
    /// Quotes are removed and empty tokens are dropped.
    pub fn tokenize(&self, raw: &str) -> Result<Vec<String>, TokenizeError> {
        let tokens = split(raw)?;
        Ok(self.prepare(&tokens))
    }

    /// Apply the style to already split arguments.
    ///
    /// With `expand_single`, an argument such as `-abc` becomes `-a -b -c`.
    /// Arguments carrying a `=` are never expanded.
    pub fn prepare<S: AsRef<str>>(&self, argv: &[S]) -> Vec<String> {
        let switch = self.style.switch;
        let mut tokens = Vec::with_capacity(argv.len());

        for argument in argv.iter().map(AsRef::as_ref) {
            let mut characters = argument.chars();

            let expandable = self.style.expand_single
                && characters.next() == Some(switch)
                && argument.chars().count() > 2
                && argument.chars().nth(1) != Some(switch)
                && !argument.contains(crate::constant::VALUE_SEPARATOR);

            if expandable {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("Expanding '{argument}'.");
                }

                tokens.extend(characters.map(|c| format!("{switch}{c}")));
            } else {
                tokens.push(argument.to_string());
            }
        }

        tokens
    }
}

fn split(raw: &str) -> Result<Vec<String>, TokenizeError> {
    let mut tokens = Vec::default();
    let mut current = String::default();
    let mut quoted_from: Option<usize> = None;

    for (offset, c) in raw.char_indices() {
        if c == QUOTE {
            quoted_from = match quoted_from {
                Some(_) => None,
                None => Some(offset),
            };
        } else if c.is_whitespace() && quoted_from.is_none() {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }

    if let Some(offset) = quoted_from {
        return Err(TokenizeError::UnterminatedQuote { offset });
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", vec![])]
    #[case("   ", vec![])]
    #[case("a", vec!["a"])]
    #[case("  a   b\tc ", vec!["a", "b", "c"])]
    #[case(r#""a b" c"#, vec!["a b", "c"])]
    #[case(r#"pre"fix suffix"post"#, vec!["prefix suffixpost"])]
    #[case(r#"a "" b"#, vec!["a", "b"])]
    fn split_whitespace(#[case] raw: &str, #[case] expected: Vec<&str>) {
        assert_eq!(split(raw).unwrap(), expected);
    }

    #[test]
    fn split_unterminated() {
        assert_eq!(
            split(r#"a "b c"#).unwrap_err(),
            TokenizeError::UnterminatedQuote { offset: 2 }
        );
    }

    #[rstest]
    #[case(vec!["-abc"], vec!["-a", "-b", "-c"])]
    #[case(vec!["-a"], vec!["-a"])]
    #[case(vec!["--abc"], vec!["--abc"])]
    #[case(vec!["-ab=c"], vec!["-ab=c"])]
    #[case(vec!["abc", "-xy"], vec!["abc", "-x", "-y"])]
    #[case(vec!["-"], vec!["-"])]
    fn prepare_expand(#[case] argv: Vec<&str>, #[case] expected: Vec<&str>) {
        // Setup
        let style = StyleConfig::default();

        // Execute
        let tokens = Tokenizer::new(&style).prepare(&argv);

        // Verify
        assert_eq!(tokens, expected);
    }

    #[test]
    fn prepare_no_expand() {
        // Setup
        let style = StyleConfig::default()
            .expand_single(false)
            .allow_single_long(true);

        // Execute
        let tokens = Tokenizer::new(&style).prepare(&["-abc", "-d"]);

        // Verify
        assert_eq!(tokens, vec!["-abc", "-d"]);
    }

    #[test]
    fn tokenize_custom_switch() {
        // Setup
        let style = StyleConfig::default().with_switch('/');

        // Execute
        let tokens = Tokenizer::new(&style).tokenize("/ab -cd").unwrap();

        // Verify
        assert_eq!(tokens, vec!["/a", "/b", "-cd"]);
    }
}
