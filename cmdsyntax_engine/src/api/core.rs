use crate::api::{Form, FormDescription};
use crate::grammar::{compile, GrammarTree, SyntaxError};
use crate::matcher;
use crate::model::{Bindings, MatchMode, Order};
use crate::parser::{ConfigError, ConsoleInterface, GeneralParser, Printer, UserInterface};
use crate::style::StyleConfig;
use crate::tokens::{TokenizeError, Tokenizer};

/// A compiled syntax definition, ready to match any number of command lines.
///
/// ### Example
/// ```
/// # use cmdsyntax_engine as cmdsyntax;
/// use cmdsyntax::{MatchMode, Order, Syntax, Value};
///
/// let syntax = Syntax::new("infile [-o outfile]").unwrap();
/// let matches = syntax.match_tokens(&["in.txt", "-o", "out.txt"], Order::Any, MatchMode::AllMatches);
///
/// assert_eq!(matches.len(), 1);
/// assert_eq!(matches[0]["outfile"], Value::Text("out.txt".to_string()));
/// assert!(syntax.first_match(&["in.txt", "-o"]).is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Syntax {
    definition: String,
    style: StyleConfig,
    tree: GrammarTree,
}

impl Syntax {
    /// Compile `definition` in the default style.
    pub fn new(definition: impl Into<String>) -> Result<Self, SyntaxError> {
        Self::with_style(definition, StyleConfig::default())
    }

    /// Compile `definition` in the given style.
    pub fn with_style(
        definition: impl Into<String>,
        style: StyleConfig,
    ) -> Result<Self, SyntaxError> {
        let definition = definition.into();
        let tree = compile(&definition, &style)?;

        Ok(Self {
            definition,
            style,
            tree,
        })
    }

    /// The definition, as written.
    pub fn definition(&self) -> &str {
        &self.definition
    }

    /// The style the definition is written in.
    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    /// The compiled tree.
    pub fn tree(&self) -> &GrammarTree {
        &self.tree
    }

    /// Match already split arguments (ex: from [`std::env::args`]).
    ///
    /// The arguments are first [prepared](Tokenizer::prepare) in this syntax's style.
    pub fn match_tokens<S: AsRef<str>>(
        &self,
        tokens: &[S],
        order: Order,
        mode: MatchMode,
    ) -> Vec<Bindings> {
        let tokens = Tokenizer::new(&self.style).prepare(tokens);
        matcher::match_tokens(&self.tree, &tokens, &self.style, order, mode)
    }

    /// Split a raw command line (see [`Tokenizer::tokenize`]) and match it.
    pub fn match_str(
        &self,
        raw: &str,
        order: Order,
        mode: MatchMode,
    ) -> Result<Vec<Bindings>, TokenizeError> {
        let tokens = Tokenizer::new(&self.style).tokenize(raw)?;
        Ok(matcher::match_tokens(
            &self.tree,
            &tokens,
            &self.style,
            order,
            mode,
        ))
    }

    /// The first match in any order, if there is one.
    pub fn first_match<S: AsRef<str>>(&self, tokens: &[S]) -> Option<Bindings> {
        self.match_tokens(tokens, Order::Any, MatchMode::FirstOnly)
            .into_iter()
            .next()
    }

    /// The definition in its canonical form.
    pub fn usage(&self) -> String {
        self.tree.render(&self.style)
    }

    /// Describe this syntax as a form; see [`Form::render`].
    pub fn form(&self) -> FormDescription {
        Form::render(self)
    }
}

/// The command line parser for a program.
///
/// ### Example
/// ```
/// # use cmdsyntax_engine as cmdsyntax;
/// use cmdsyntax::{CommandLineParser, Value};
///
/// let parser = CommandLineParser::new("program")
///     .syntax("infile [-o outfile]")
///     .build();
///
/// let bindings = parser.parse_tokens(&["a.txt", "-o", "b.txt"]).unwrap();
/// assert_eq!(bindings["outfile"], Value::Text("b.txt".to_string()));
/// ```
pub struct CommandLineParser {
    program: String,
    definition: String,
    style: StyleConfig,
    order: Order,
    about: Option<String>,
}

impl CommandLineParser {
    /// Create a command line parser.
    /// Until a syntax is given, the parser only accepts an empty command line.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            definition: String::default(),
            style: StyleConfig::default(),
            order: Order::Any,
            about: None,
        }
    }

    /// Set the syntax definition.
    /// If repeated, only the final definition will apply.
    pub fn syntax(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    /// Set the style of the syntax definition and the command line.
    pub fn style(mut self, style: StyleConfig) -> Self {
        self.style = style;
        self
    }

    /// Require the members of each selection to appear in definition order.
    pub fn in_order(mut self) -> Self {
        self.order = Order::Definition;
        self
    }

    /// Document the about message for this command line parser.
    /// If repeated, only the final message will apply.
    ///
    /// The message is shown under the usage line whenever the command line does not match.
    /// It is wrapped to the terminal width, so line breaks are not recommended.
    pub fn about(mut self, description: impl Into<String>) -> Self {
        self.about.replace(description.into());
        self
    }

    pub(crate) fn build_with_interface(
        self,
        user_interface: Box<dyn UserInterface>,
    ) -> Result<GeneralParser, ConfigError> {
        let syntax = Syntax::with_style(self.definition, self.style)?;
        let printer = Printer::terminal(syntax.usage(), self.about, syntax.form().into_items());
        Ok(GeneralParser::new(
            self.program,
            syntax,
            self.order,
            printer,
            user_interface,
        ))
    }

    /// Build the command line parser as a Result.
    /// This finalizes the configuration and checks for errors (ex: an unterminated `[` in the syntax).
    pub fn build_parser(self) -> Result<GeneralParser, ConfigError> {
        self.build_with_interface(Box::new(ConsoleInterface::default()))
    }

    /// Build the command line parser.
    /// This finalizes the configuration and checks for errors (ex: an unterminated `[` in the syntax).
    /// If an error is encountered, exits with error code `1` (via [`std::process::exit`]).
    pub fn build(self) -> GeneralParser {
        match self.build_parser() {
            Ok(gp) => gp,
            Err(e) => {
                eprintln!("{e}");
                std::process::exit(1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Value;
    use crate::parser::util::channel_interface;
    use crate::test::assert_contains;
    use rstest::rstest;

    fn text(value: &str) -> Value {
        Value::Text(value.to_string())
    }

    #[test]
    fn syntax_accessors() {
        // Setup
        let style = StyleConfig::default().allow_single_value(true);

        // Execute
        let syntax = Syntax::with_style("infile   [-n=count]", style.clone()).unwrap();

        // Verify
        assert_eq!(syntax.definition(), "infile   [-n=count]");
        assert_eq!(syntax.style(), &style);
        assert_eq!(syntax.tree(), &compile("infile [-n=count]", &style).unwrap());
        assert_eq!(syntax.usage(), "infile [-n=count]");
    }

    #[test]
    fn syntax_invalid() {
        assert_matches!(
            Syntax::new("a [b"),
            Err(SyntaxError::Unterminated { expected: ']', .. })
        );
    }

    #[rstest]
    #[case(vec!["-vq", "file"])]
    #[case(vec!["-q", "-v", "file"])]
    #[case(vec!["-v", "-q", "file"])]
    fn syntax_match_tokens_prepares(#[case] tokens: Vec<&str>) {
        // Setup
        let syntax = Syntax::new("[-v] [-q] file").unwrap();

        // Execute
        let matches = syntax.match_tokens(&tokens, Order::Any, MatchMode::AllMatches);

        // Verify
        assert_eq!(
            matches,
            vec![Bindings::from([
                ("v".to_string(), Value::Present),
                ("q".to_string(), Value::Present),
                ("file".to_string(), text("file")),
            ])]
        );
    }

    #[test]
    fn syntax_match_order() {
        // Setup
        let syntax = Syntax::new("[-v] [-q] file").unwrap();

        // Execute & Verify
        assert_eq!(
            syntax
                .match_tokens(&["-q", "-v", "file"], Order::Definition, MatchMode::AllMatches)
                .len(),
            0
        );
        assert_eq!(
            syntax
                .match_tokens(&["-v", "-q", "file"], Order::Definition, MatchMode::AllMatches)
                .len(),
            1
        );
    }

    #[test]
    fn syntax_match_str() {
        // Setup
        let syntax = Syntax::new(r#""copy" source destination"#).unwrap();

        // Execute
        let matches = syntax
            .match_str(r#"copy "my file.txt" out"#, Order::Any, MatchMode::FirstOnly)
            .unwrap();

        // Verify
        assert_eq!(
            matches,
            vec![Bindings::from([
                ("copy".to_string(), Value::Present),
                ("source".to_string(), text("my file.txt")),
                ("destination".to_string(), text("out")),
            ])]
        );
        assert_eq!(
            syntax.match_str(r#"copy "my file.txt out"#, Order::Any, MatchMode::FirstOnly),
            Err(TokenizeError::UnterminatedQuote { offset: 5 })
        );
    }

    #[test]
    fn syntax_shared_across_threads() {
        // Setup
        let syntax = std::sync::Arc::new(Syntax::new("infile [-o outfile]").unwrap());

        // Execute
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let syntax = syntax.clone();
                std::thread::spawn(move || syntax.first_match(&[format!("in{i}.txt")]))
            })
            .collect();

        // Verify
        for (i, handle) in handles.into_iter().enumerate() {
            let bindings = handle.join().unwrap().unwrap();
            assert_eq!(bindings["infile"], text(&format!("in{i}.txt")));
        }
    }

    #[test]
    fn build_empty() {
        // Setup
        let (sender, receiver) = channel_interface();
        let parser = CommandLineParser::new("program")
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let bindings = parser.parse_tokens(&[]).unwrap();

        // Verify
        assert!(bindings.is_empty());
        assert_eq!(receiver.consume(), (None, None));
    }

    #[test]
    fn build_repeated() {
        // Setup
        let (sender, receiver) = channel_interface();
        let parser = CommandLineParser::new("program")
            .syntax("--discarded")
            .syntax("infile")
            .about("--this will get discarded--")
            .about("Reads a file.")
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let error_code = parser.parse_tokens(&[]).unwrap_err();

        // Verify
        assert_eq!(error_code, 1);
        let (message, error) = receiver.consume();
        let message = message.unwrap();
        assert_contains!(message, "usage: program infile");
        assert_contains!(message, "Reads a file.");
        assert!(!message.contains("discarded"));
        let error = error.unwrap();
        assert_contains!(error, "Parse error");
    }

    #[test]
    fn build_in_order() {
        // Setup
        let (sender, _receiver) = channel_interface();
        let parser = CommandLineParser::new("program")
            .syntax("[-a] [-b]")
            .in_order()
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let error_code = parser.parse_tokens(&["-b", "-a"]).unwrap_err();

        // Verify
        assert_eq!(error_code, 1);
    }

    #[test]
    fn build_styled() {
        // Setup
        let (sender, receiver) = channel_interface();
        let parser = CommandLineParser::new("program")
            .syntax("/name <stem>")
            .style(
                StyleConfig::default()
                    .with_switch('/')
                    .allow_single_long(true)
                    .expand_single(false),
            )
            .build_with_interface(Box::new(sender))
            .unwrap();

        // Execute
        let bindings = parser.parse_tokens(&["/name", "base"]).unwrap();

        // Verify
        assert_eq!(
            bindings,
            Bindings::from([
                ("name".to_string(), Value::Present),
                ("stem".to_string(), text("base")),
            ])
        );
        assert_eq!(receiver.consume(), (None, None));
    }

    #[rstest]
    #[case("a [b")]
    #[case("a |")]
    #[case("{}")]
    fn build_invalid_syntax(#[case] definition: &str) {
        // Setup
        let (sender, _receiver) = channel_interface();

        // Execute
        let result = CommandLineParser::new("program")
            .syntax(definition)
            .build_with_interface(Box::new(sender));

        // Verify
        let error = result.err().unwrap();
        assert_contains!(error.to_string(), "Config error: ");
    }

    #[test]
    fn build_inconsistent_style() {
        // Setup
        let (sender, _receiver) = channel_interface();

        // Execute
        let result = CommandLineParser::new("program")
            .syntax("infile")
            .style(StyleConfig::default().with_operators('|', '|'))
            .build_with_interface(Box::new(sender));

        // Verify
        let error = result.err().unwrap();
        assert_eq!(
            error.to_string(),
            format!("Config error: {}", SyntaxError::InconsistentStyle)
        );
    }
}
