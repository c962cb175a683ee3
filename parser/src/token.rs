//! Tokens produced by the [`Tokenizer`](crate::Tokenizer).

use core::fmt;

use crate::{alloc::Cow, Spanned};

/// Literal value as it occurs in the expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Literal<'a> {
    /// Numeric literal such as `42`, `.5` or `1.5e-3`. The literal is not converted
    /// to a number; this is up to the host.
    Number(&'a str),
    /// Quoted text literal with escapes resolved. The text is borrowed from the expression
    /// if it contains no escapes.
    Text(Cow<'a, str>),
}

impl Literal<'_> {
    /// Returns the literal text: the numeric literal itself, or the unquoted text.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Number(number) => number,
            Self::Text(text) => text,
        }
    }

    /// Checks whether this literal is numeric.
    pub fn is_number(&self) -> bool {
        matches!(self, Self::Number(_))
    }
}

impl fmt::Display for Literal<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(number) => formatter.write_str(number),
            Self::Text(text) => write!(formatter, "{:?}", text),
        }
    }
}

/// Kind of a [`Token`]. Symbols and names are not stored separately; they are available
/// as the token fragment.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum TokenKind<'a> {
    /// Numeric or text literal.
    Literal(Literal<'a>),
    /// Bare identifier: either a constant or a variable.
    Identifier,
    /// Function name immediately followed by a function bracket.
    Function,
    /// Operator symbol. Whether the operator is unary or binary depends on its position
    /// in the expression, so this is decided when the expression is evaluated.
    Operator,
    /// Open bracket symbol.
    OpenBracket,
    /// Close bracket symbol.
    CloseBracket,
    /// Function argument separator.
    Separator,
}

impl TokenKind<'_> {
    /// Checks whether the token starts an operand, i.e., whether it is a literal,
    /// an identifier, a function name or an open bracket.
    pub fn starts_operand(&self) -> bool {
        matches!(
            self,
            Self::Literal(_) | Self::Identifier | Self::Function | Self::OpenBracket
        )
    }
}

/// Token together with its location in the expression.
pub type Token<'a> = Spanned<'a, TokenKind<'a>>;
