//! Evaluation errors.

use core::fmt;

use crate::alloc::{String, ToOwned};
use shunt_parser::{FnArity, LexError, LexErrorKind, OpArity, OwnedSpan, Spanned};

/// Exact shape of a [malformed expression](ErrorKind::MalformedExpression).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Malformed {
    /// Expression contains no tokens.
    Empty,
    /// Operator lacks an operand, e.g., `1 +` or `(2 *)`.
    MissingOperand,
    /// Function arg is empty, e.g., `f(1,,2)` or `f(1,)`.
    MissingArgument,
    /// Grouping brackets contain nothing, e.g., `()`.
    EmptyGroup,
    /// Value immediately follows another value, e.g., `1 2` or `x (y)`.
    ValueAfterValue,
    /// More than one value remains after evaluation.
    LeftoverValues,
}

impl fmt::Display for Malformed {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Empty => "expression is empty",
            Self::MissingOperand => "operand expected",
            Self::MissingArgument => "function argument expected",
            Self::EmptyGroup => "brackets contain no expression",
            Self::ValueAfterValue => "value cannot follow another value",
            Self::LeftoverValues => "leftover values after evaluation",
        })
    }
}

/// Kinds of errors that can occur when evaluating an expression.
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Expression cannot be tokenized.
    Lexical(LexErrorKind),
    /// Operator with the symbol and arity is not registered, or the host cannot evaluate it.
    UnknownOperator {
        /// Operator symbol.
        symbol: String,
        /// Operator arity deduced from the operator position.
        arity: OpArity,
    },
    /// Function is not registered, or the host cannot evaluate it.
    UnknownFunction {
        /// Function name as it occurs in the expression.
        name: String,
    },
    /// Constant is not handled by the host.
    UnknownConstant {
        /// Constant name.
        name: String,
    },
    /// Function call has an unsupported number of args.
    ArityMismatch {
        /// Canonical function name.
        name: String,
        /// Accepted number of args.
        expected: FnArity,
        /// Actual number of args.
        actual: usize,
    },
    /// Bracket has no matching counterpart, is closed by a wrong symbol, or is not registered
    /// for its role (e.g., a function bracket used for grouping).
    UnmatchedBracket {
        /// Bracket symbol.
        symbol: String,
    },
    /// Function argument separator occurs outside of function args.
    UnexpectedSeparator,
    /// Identifier is neither a constant nor a resolvable variable.
    UnknownVariable {
        /// Identifier.
        name: String,
    },
    /// Expression is structurally malformed.
    MalformedExpression(Malformed),
    /// Error raised by the host when evaluating a literal, constant, operator or function.
    Host(anyhow::Error),
}

impl ErrorKind {
    /// Wraps a host error.
    pub fn host(error: impl Into<anyhow::Error>) -> Self {
        Self::Host(error.into())
    }

    /// Creates a host error with the specified message.
    pub fn host_message<M>(message: M) -> Self
    where
        M: fmt::Display + fmt::Debug + Send + Sync + 'static,
    {
        Self::Host(anyhow::Error::msg(message))
    }

    pub(crate) fn unknown_variable(name: &str) -> Self {
        Self::UnknownVariable {
            name: name.to_owned(),
        }
    }

    /// Returns information helping fix the error.
    pub fn help(&self) -> Option<&'static str> {
        Some(match self {
            Self::UnknownOperator {
                arity: OpArity::Unary,
                ..
            } => "Operator at the start of an expression or after another operator, an open bracket \
                  or a separator is treated as unary",
            Self::UnknownOperator {
                arity: OpArity::Binary,
                ..
            } => "Operator following a value is treated as binary",
            Self::UnexpectedSeparator => {
                "Separators are only allowed in args of function calls, such as `max(1, 2)`"
            }
            Self::MalformedExpression(Malformed::ValueAfterValue) => {
                "Values must be joined by binary operators; function names must be immediately \
                 followed by a function bracket"
            }
            _ => return None,
        })
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lexical(kind) => fmt::Display::fmt(kind, formatter),
            Self::UnknownOperator { symbol, arity } => {
                write!(formatter, "Unknown {} operator `{}`", arity, symbol)
            }
            Self::UnknownFunction { name } => write!(formatter, "Unknown function `{}`", name),
            Self::UnknownConstant { name } => write!(formatter, "Unknown constant `{}`", name),
            Self::ArityMismatch {
                name,
                expected,
                actual,
            } => write!(
                formatter,
                "Function `{}` expects {} arg(s), but was called with {}",
                name, expected, actual
            ),
            Self::UnmatchedBracket { symbol } => {
                write!(formatter, "Unmatched bracket `{}`", symbol)
            }
            Self::UnexpectedSeparator => {
                formatter.write_str("Argument separator outside of function args")
            }
            Self::UnknownVariable { name } => {
                write!(formatter, "Variable `{}` is not defined", name)
            }
            Self::MalformedExpression(malformed) => {
                write!(formatter, "Malformed expression: {}", malformed)
            }
            Self::Host(err) => write!(formatter, "Evaluation failed: {}", err),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ErrorKind {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Host(err) => Some(&**err),
            _ => None,
        }
    }
}

/// Evaluation error together with the span of the offending token.
///
/// Errors detected at the end of the expression (e.g., a dangling operator) have an empty span
/// pointing just past the expression.
#[derive(Debug)]
pub struct Error<'a> {
    kind: ErrorKind,
    span: Spanned<'a>,
}

impl<'a> Error<'a> {
    pub(crate) fn new<T>(kind: ErrorKind, span: &Spanned<'a, T>) -> Self {
        Self {
            kind,
            span: span.with_no_extra(),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Converts this error into its kind.
    pub fn into_kind(self) -> ErrorKind {
        self.kind
    }

    /// Returns the span of the expression this error relates to.
    pub fn span(&self) -> Spanned<'a> {
        self.span
    }

    /// Detaches this error from the evaluated expression.
    pub fn strip(self) -> OwnedError {
        OwnedError {
            kind: self.kind,
            span: self.span.to_owned_span(),
        }
    }
}

impl<'a> From<LexError<'a>> for Error<'a> {
    fn from(err: LexError<'a>) -> Self {
        Self {
            kind: ErrorKind::Lexical(err.kind()),
            span: err.span(),
        }
    }
}

impl fmt::Display for Error<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}:{}: {}",
            self.span.location_line(),
            self.span.get_column(),
            self.kind
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// [`Error`] with an owned code fragment, obtained via [`Error::strip()`].
#[derive(Debug)]
pub struct OwnedError {
    kind: ErrorKind,
    span: OwnedSpan,
}

impl OwnedError {
    /// Returns the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the span of the expression this error relates to.
    pub fn span(&self) -> &OwnedSpan {
        &self.span
    }
}

impl fmt::Display for OwnedError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}:{}: {}",
            self.span.location_line(),
            self.span.get_column(),
            self.kind
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for OwnedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.kind)
    }
}

/// Result of evaluating an expression.
pub type EvalResult<'a, T> = Result<T, Error<'a>>;
