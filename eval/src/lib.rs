//! Single-pass evaluator of infix expressions tokenized by [`shunt-parser`].
//!
//! # How it works
//!
//! Expressions are evaluated with a variation of the shunting-yard algorithm: tokens
//! are consumed left to right, values are pushed to a value stack, and operators and brackets
//! are pushed to an operator stack. An operator is applied as soon as the operators following it
//! cannot bind tighter, and a function is called once its closing bracket is reached. No AST
//! is built; the result is produced after a single pass over the expression.
//!
//! The grammar (operators, functions, constants, brackets, the argument separator
//! and localized names) is defined by a [`Parameters`] registry. The semantics of values is
//! defined by a host implementing the [`Evaluator`] trait. The crate provides two hosts:
//!
//! - [`NumEvaluator`] over floating-point numbers
//! - [`ObjectEvaluator`] over dynamically typed [`Value`]s (numbers, booleans, text and null)
//!
//! # Semantics
//!
//! - An operator symbol is unary when it starts an expression or follows another operator,
//!   an open bracket or a separator. Otherwise, it is binary.
//! - Operators with higher precedence bind tighter. Binary operators with equal precedence
//!   are grouped according to their associativity; prefix operators apply to the following
//!   operand including any tighter-binding binary operators (`-2^2 == -(2^2)` if `^` binds
//!   tighter than negation).
//! - Function arity is checked before the host is called. Zero-argument calls are written
//!   as `f()`.
//! - Both operands of every binary operator are evaluated, including logical operators.
//! - Identifiers are resolved as constants, then as [`Variables`], then via the
//!   [`Evaluator::unresolved_identifier()`] fallback.
//!
//! # Crate features
//!
//! - `std` (on by default). Enables support of types from `std`, such as the `Error` trait,
//!   and the bundled evaluators (floating-point math requires `std`).
//! - `random` (on by default). Enables the `random()` function in the bundled evaluators.
//!
//! # Examples
//!
//! ```
//! use shunt_eval::{ErrorKind, Evaluator, F64Evaluator, VariableMap};
//!
//! # fn main() -> anyhow::Result<()> {
//! let evaluator = F64Evaluator::new();
//! assert_eq!(evaluator.evaluate("(2 ^ 3 - 1) * 2")?, 14.0);
//!
//! let vars: VariableMap<f64> = [("a", 10.0), ("b", 15.0)].into_iter().collect();
//! assert_eq!(evaluator.evaluate_with("max(a, b, 3) - a % 4", &vars)?, 13.0);
//!
//! let err = evaluator.evaluate("sin(1) + (2").unwrap_err();
//! assert!(matches!(err.kind(), ErrorKind::UnmatchedBracket { .. }));
//! assert_eq!(err.to_string(), "1:10: Unmatched bracket `(`");
//! # Ok(())
//! # }
//! ```
//!
//! [`shunt-parser`]: https://docs.rs/shunt-parser/
//! [`Parameters`]: shunt_parser::Parameters

#![cfg_attr(not(feature = "std"), no_std)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc(html_root_url = "https://docs.rs/shunt-eval/0.1.0")]
#![warn(missing_docs, missing_debug_implementations)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions,
    clippy::missing_panics_doc
)]

// Polyfill for `alloc` types.
mod alloc {
    #[cfg(not(feature = "std"))]
    extern crate alloc;

    #[cfg(not(feature = "std"))]
    pub use alloc::{
        borrow::ToOwned, boxed::Box, collections::BTreeMap, string::String, vec::Vec,
    };
    // `Cow` and `format` are only needed by the `std`-gated hosts.
    #[cfg(feature = "std")]
    pub use std::{
        borrow::{Cow, ToOwned},
        boxed::Box,
        collections::BTreeMap,
        format,
        string::String,
        vec::Vec,
    };
}

pub use crate::{
    error::{Error, ErrorKind, EvalResult, Malformed, OwnedError},
    evaluator::{Evaluator, Operands},
    variables::{NoVariables, VariableMap, Variables},
};
#[cfg(feature = "std")]
pub use crate::{
    fns::MathFn,
    numeric::{
        default_parameters, ArithOp, F32Evaluator, F64Evaluator, MathConst, NumEvaluator,
        NumGrammar, Style,
    },
    object::{
        object_parameters, Comparison, ObjectConst, ObjectEvaluator, ObjectFn, ObjectGrammar,
        ObjectOp, Value, ValueType,
    },
};

mod engine;
mod error;
mod evaluator;
#[cfg(feature = "std")]
mod fns;
#[cfg(feature = "std")]
mod numeric;
#[cfg(feature = "std")]
mod object;
mod variables;
