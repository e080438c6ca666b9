use thiserror::Error;

use crate::grammar::SyntaxError;

mod interface;
mod middleware;
mod printer;

pub(crate) use interface::{ConsoleInterface, UserInterface};
pub use middleware::GeneralParser;
pub(crate) use printer::Printer;

#[cfg(test)]
pub(crate) use interface::util;

/// A command line parser which cannot be built.
#[derive(Debug, Error)]
#[error("Config error: {0}")]
pub struct ConfigError(pub(crate) String);

impl From<SyntaxError> for ConfigError {
    fn from(error: SyntaxError) -> Self {
        ConfigError(error.to_string())
    }
}

#[derive(Debug, Error)]
#[error("Parse error: {0}")]
pub(crate) struct ParseError(pub(crate) String);
