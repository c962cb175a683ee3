//! Error handling.

use nom::{
    error::{ErrorKind as NomErrorKind, ParseError},
    Slice,
};

use core::fmt;

use crate::{alloc::String, InputSpan, OpArity, Spanned};

/// Kind of a lexical error, i.e., a char sequence not matching any token class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum LexErrorKind {
    /// No token class accepts this character.
    UnexpectedChar,
    /// Text literal is not closed before the end of line or input.
    UnterminatedString,
    /// Numeric literal is immediately followed by an identifier character, e.g., `2x`.
    InvalidNumber,
    /// Unknown escape sequence in a text literal, e.g., `\\x`.
    InvalidEscape,
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::UnexpectedChar => "Unexpected character",
            Self::UnterminatedString => "Unterminated text literal",
            Self::InvalidNumber => "Invalid numeric literal",
            Self::InvalidEscape => "Unknown escape sequence",
        })
    }
}

/// Lexical error with the associated code span.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError<'a> {
    inner: Spanned<'a, LexErrorKind>,
}

impl<'a> LexError<'a> {
    pub(crate) fn new(span: InputSpan<'a>, kind: LexErrorKind) -> Self {
        Self {
            inner: Spanned::new(span, kind),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> LexErrorKind {
        self.inner.extra
    }

    /// Returns the span of this error.
    pub fn span(&self) -> Spanned<'a> {
        self.inner.with_no_extra()
    }
}

impl fmt::Display for LexError<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}:{}: {}",
            self.inner.location_line(),
            self.inner.get_column(),
            self.inner.extra
        )
    }
}

#[cfg(feature = "std")]
impl std::error::Error for LexError<'_> {}

impl<'a> ParseError<InputSpan<'a>> for LexError<'a> {
    fn from_error_kind(mut input: InputSpan<'a>, kind: NomErrorKind) -> Self {
        if let Some(first_char) = input.fragment().chars().next() {
            // Truncate the error span to the first ineligible char.
            input = input.slice(..first_char.len_utf8());
        }

        let error_kind = if kind == NomErrorKind::Char && input.fragment().is_empty() {
            LexErrorKind::UnterminatedString
        } else {
            LexErrorKind::UnexpectedChar
        };
        LexError::new(input, error_kind)
    }

    fn append(_: InputSpan<'a>, _: NomErrorKind, other: Self) -> Self {
        other
    }
}

/// Error registering an element in [`Parameters`](crate::Parameters).
///
/// Most variants signal a definition that would make the grammar ambiguous;
/// [`EmptySymbol`](Self::EmptySymbol), [`InvalidName`](Self::InvalidName) and
/// [`UnknownName`](Self::UnknownName) signal a malformed definition.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DefinitionError {
    /// Operator with the same symbol and arity is already registered.
    DuplicateOperator {
        /// Operator symbol.
        symbol: String,
        /// Operator arity.
        arity: OpArity,
    },
    /// Function or constant with the same name is already registered.
    DuplicateFunction {
        /// Function name.
        name: String,
    },
    /// Constant or function with the same name is already registered.
    DuplicateConstant {
        /// Constant name.
        name: String,
    },
    /// Bracket with the same open symbol is already registered for the same role
    /// (or with a different close symbol for another role).
    DuplicateBracket {
        /// Open bracket symbol.
        symbol: String,
    },
    /// Symbol is already used by an element of another class, e.g., an operator symbol
    /// reused as a bracket.
    SymbolConflict {
        /// Conflicting symbol.
        symbol: String,
    },
    /// Empty operator, bracket or separator symbol.
    EmptySymbol,
    /// Function or constant name (or its translation) is not a valid identifier.
    InvalidName {
        /// Offending name.
        name: String,
    },
    /// Translation refers to a function or constant that is not registered.
    UnknownName {
        /// Name of the missing element.
        name: String,
    },
}

impl fmt::Display for DefinitionError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateOperator { symbol, arity } => {
                write!(formatter, "Operator `{}` ({}) is already defined", symbol, arity)
            }
            Self::DuplicateFunction { name } => {
                write!(formatter, "Name `{}` is already used by a function or constant", name)
            }
            Self::DuplicateConstant { name } => {
                write!(formatter, "Name `{}` is already used by a constant or function", name)
            }
            Self::DuplicateBracket { symbol } => {
                write!(formatter, "Bracket `{}` is already defined", symbol)
            }
            Self::SymbolConflict { symbol } => write!(
                formatter,
                "Symbol `{}` is already used by an element of another kind",
                symbol
            ),
            Self::EmptySymbol => formatter.write_str("Symbols cannot be empty"),
            Self::InvalidName { name } => write!(formatter, "`{}` is not a valid name", name),
            Self::UnknownName { name } => {
                write!(formatter, "No function or constant is named `{}`", name)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DefinitionError {}
