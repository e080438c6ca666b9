use std::env;

#[cfg(feature = "tracing_debug")]
use tracing::debug;

use crate::api::Syntax;
use crate::model::{Bindings, MatchMode, Order};
use crate::parser::interface::UserInterface;
use crate::parser::printer::Printer;
use crate::parser::ParseError;

/// The configured command line parser.
/// Built via `CommandLineParser::build`.
pub struct GeneralParser {
    program: String,
    syntax: Syntax,
    order: Order,
    printer: Printer,
    user_interface: Box<dyn UserInterface>,
}

impl GeneralParser {
    pub(crate) fn new(
        program: impl Into<String>,
        syntax: Syntax,
        order: Order,
        printer: Printer,
        user_interface: Box<dyn UserInterface>,
    ) -> Self {
        Self {
            program: program.into(),
            syntax,
            order,
            printer,
            user_interface,
        }
    }

    /// *Available using 'unit_test' crate feature only.*</br></br>
    /// The program name and the syntax this parser matches against.
    #[cfg(feature = "unit_test")]
    pub fn details(&self) -> (&str, &Syntax) {
        (&self.program, &self.syntax)
    }

    /// Run the command line parser against the input tokens.
    ///
    /// The tokens are matched against the syntax, and the bindings of the first match are returned.
    ///
    /// If the tokens do not match, the usage message is displayed and the parser returns with `Err(1)`.
    pub fn parse_tokens(self, tokens: &[&str]) -> Result<Bindings, i32> {
        let GeneralParser {
            program,
            syntax,
            order,
            printer,
            user_interface,
        } = self;

        match syntax
            .match_tokens(tokens, order, MatchMode::FirstOnly)
            .into_iter()
            .next()
        {
            Some(bindings) => Ok(bindings),
            None => {
                #[cfg(feature = "tracing_debug")]
                {
                    debug!("No match for {tokens:?} against '{}'.", syntax.definition());
                }

                printer.print_usage(program, &*user_interface);
                let message = if tokens.is_empty() {
                    "an empty command line does not match the syntax.".to_string()
                } else {
                    format!("'{}' does not match the syntax.", tokens.join(" "))
                };
                user_interface.print_error(ParseError(message));
                Err(1)
            }
        }
    }

    /// Run the command line parser against the Cli [`env::args`].
    ///
    /// The tokens are matched against the syntax, and the bindings of the first match are returned.
    ///
    /// If the tokens do not match, the usage message is displayed and the process exits with error code `1` (via `std::process::exit`).
    pub fn parse(self) -> Bindings {
        let command_input: Vec<String> = env::args().skip(1).collect();
        match self.parse_tokens(
            command_input
                .iter()
                .map(AsRef::as_ref)
                .collect::<Vec<&str>>()
                .as_slice(),
        ) {
            Ok(bindings) => bindings,
            Err(exit_code) => {
                std::process::exit(exit_code);
            }
        }
    }
}
