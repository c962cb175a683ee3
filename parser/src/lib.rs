//! Configurable grammar and tokenizer for infix expressions.
//!
//! This crate defines *what* an expression language accepts; evaluating expressions is
//! handled by the companion `shunt-eval` crate. Nothing about the grammar is hard-coded:
//!
//! - **Operators.** Unary (prefix) and binary operators with arbitrary symbols, precedence
//!   and associativity. A symbol may be shared by a unary and a binary operator (e.g., `-`);
//!   which one is meant is decided by the position of the symbol in the expression.
//! - **Functions.** Named functions with a fixed, bounded or unbounded number of args,
//!   e.g., `max(1, 5, 3)`.
//! - **Constants.** Named constants such as `pi`; constant values are supplied by the host.
//! - **Brackets.** Any number of bracket pairs for grouping subexpressions and / or
//!   delimiting function args, plus a configurable argument separator (`,` by default).
//! - **Translations.** Functions and constants may be exposed under localized names.
//!
//! All of this is registered in [`Parameters`]. The [`Tokenizer`] splits an expression
//! into [`Token`]s according to these parameters; besides registered symbols, it recognizes
//! numeric literals (`42`, `.5`, `1.5e-3`), quoted text literals (`"text"`, `'text'`)
//! and identifiers.
//!
//! Elements are tagged with host-defined types specified via a [`Grammar`], so that
//! the host can dispatch on them with an exhaustive `match`.
//!
//! # Crate features
//!
//! - `std`. Enables support of types from `std`, such as the `Error` trait, and propagates
//!   to dependencies. Without this feature, the crate is `no_std`-compatible
//!   (it still requires `alloc`).
//!
//! # Examples
//!
//! ```
//! use shunt_parser::{
//!     tokenize, Associativity, BracketPair, Constant, FnArity, Function, Operator,
//!     Parameters, Symbolic, TokenKind,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut params = Parameters::<Symbolic>::new();
//! params
//!     .add_operators([
//!         Operator::unary("-", 7, ()),
//!         Operator::binary("-", Associativity::Left, 5, ()),
//!         Operator::binary("^", Associativity::Right, 8, ()),
//!     ])?
//!     .add_function(Function::new("max", FnArity::at_least(1), ()))?
//!     .add_constant(Constant::new("pi", ()))?
//!     .add_expression_bracket(BracketPair::PARENTHESES)?
//!     .add_function_bracket(BracketPair::PARENTHESES)?;
//!
//! let tokens: Vec<_> = tokenize("-max(pi, 2^x)", &params).collect::<Result<_, _>>()?;
//! assert_eq!(tokens.len(), 9);
//! assert_eq!(tokens[1].extra, TokenKind::Function);
//! assert_eq!(*tokens[1].fragment(), "max");
//! assert_eq!(tokens[3].extra, TokenKind::Identifier);
//! # Ok(())
//! # }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![doc(html_root_url = "https://docs.rs/shunt-parser/0.1.0")]
#![warn(missing_docs, missing_debug_implementations)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

// Polyfill for `alloc` types.
mod alloc {
    #[cfg(not(feature = "std"))]
    extern crate alloc;

    #[cfg(not(feature = "std"))]
    pub use alloc::{
        borrow::{Cow, ToOwned},
        string::String,
        vec::Vec,
    };
    #[cfg(feature = "std")]
    pub use std::{
        borrow::{Cow, ToOwned},
        string::String,
        vec::Vec,
    };
}

pub use crate::{
    error::{DefinitionError, LexError, LexErrorKind},
    grammar::{
        Associativity, Constant, FnArity, Function, Grammar, OpArity, Operator, Symbolic,
    },
    params::{BracketPair, Parameters, SymbolClass},
    spans::{InputSpan, LocatedSpan, NomResult, OwnedSpan, Spanned},
    token::{Literal, Token, TokenKind},
    tokenizer::{is_number_literal, is_valid_name, tokenize, Tokenizer},
};

mod error;
mod grammar;
mod params;
mod spans;
mod token;
mod tokenizer;
