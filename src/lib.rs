//! `cmdsyntax` matches command lines against a syntax definition, such as `infile [-o outfile]`.
//!
//! Most command line parsers are configured parameter by parameter.
//! `cmdsyntax` is configured the other way around: you write the syntax line you would print in a usage message,
//! and the parser works out which command lines fit it.
//! Specifically, `cmdsyntax` prioritizes the following design concerns:
//! * *The usage line is the configuration*:
//! The definition is compiled once into a tree, and the same tree drives matching, the usage message and form descriptions.
//! * *Permutation aware matching*:
//! Optional items may be given in any order (unless asked otherwise), and every interpretation of an ambiguous command line can be reported.
//! * *Configurable conventions*:
//! Bracket characters, operators and switch forms (`-x`, `--name`, `-name`, `--name=value`, ...) are set through a [`StyleConfig`].
//!
//! # Usage
//! ```no_run
#![doc = include_str!("../demos/uef2inf.rs")]
//! ```
//!
//! ```console
//! $ uef2inf -l game.uef
//! Listing the contents of 'game.uef' (verbose: false).
//!
//! $ uef2inf -v -name file game.uef out
//! Extracting 'game.uef' into 'out' as file1, file2, ... (verbose: true).
//!
//! $ uef2inf -v
//! usage: uef2inf (-l [-v] <UEF file>) | ([-name stem] [-v] <UEF file> <destination path>)
//!
//! Lists or extracts the files in a UEF archive.
//!
//! arguments:
//!  Select exactly 1 of the following 2 options:
//!    All of the following:
//!      -l
//!      Optionally select the following item:
//!        -v
//!      UEF file
//!    All of the following:
//!      Select any of the following 2 options:
//!        -name stem
//!        -v
//!      UEF file
//!      destination path
//! Parse error: '-v' does not match the syntax.
//! ```
//!
//! # Syntax definitions
//! In the default style:
//! ```console
//! Syntax            | Node                        | Matches
//! -------------------------------------------------------------------------------------------
//! name              | Label                       | any one token, bound to `name`
//! <long name>       | Label                       | as above, for names with spaces or special characters
//! "word"            | Command                     | exactly `word`
//! -x  --name        | Switch                      | the switch, bound as present
//! --name=value      | Switch (with value)         | `--name=text`, binding `name` to `text`
//! a b               | Sequence                    | `a` then `b`
//! a | b             | Selection (exactly 1)       | either `a` or `b`
//! [a]               | Selection (at most 1)       | `a`, or nothing
//! [a] [b]           | Selection (any of 2)        | any of `a` and `b`, in any order
//! (a b)             | Sequence                    | groups `a b` as one alternative
//! {a b c}           | Selection (at least 1)      | one or more of `a`, `b`, `c`, in any order
//! -abc              | Selection (at least 1)      | `{-a -b -c}` (when `expand_single` is on)
//! ```
//!
//! A successful match produces [`Bindings`]: switches and commands bind [`Value::Present`],
//! labels and value-taking switches bind [`Value::Text`].
//! When a name is bound more than once, the last binding wins.
//!
//! # Apis
//! * [`Syntax`]: compile once, then match token lists ([`Syntax::match_tokens`]) or raw strings ([`Syntax::match_str`]).
//! * [`CommandLineParser`]: the program front end; prints the usage message and exits when `env::args` do not match.
//! * [`Form`]: describes a syntax as a form (text fields, switches, choices) for front ends that fill in fields rather than type command lines.
//! * [`compile`], [`match_tokens`] and [`SelectionEnumerator`]: the engine underneath.
//!
//! # Features
//! * `unit_test`: For features that help with unit testing.
//! * `tracing_debug`: Emit `tracing` debug events while compiling and matching.
pub use cmdsyntax_engine::*;
