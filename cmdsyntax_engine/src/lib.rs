//! Engine module for `cmdsyntax`.
//! See [documentation root](https://docs.rs/cmdsyntax/latest/cmdsyntax/index.html) for full details.
#![deny(missing_docs)]
mod api;
mod constant;
mod grammar;
mod matcher;
mod model;
mod parser;
mod style;
mod tokens;

pub use api::*;
pub use grammar::{compile, GrammarNode, GrammarTree, Selection, SwitchOption, SyntaxError};
pub use matcher::{match_tokens, SelectionEnumerator};
pub use model::*;
pub use parser::{ConfigError, GeneralParser};
pub use style::{Origin, StyleConfig, StyledSwitch, SwitchError};
pub use tokens::{TokenizeError, Tokenizer};

#[cfg(test)]
#[macro_use]
extern crate assert_matches;
