//! Lazy tokenizer driven by [`Parameters`].

use nom::{
    branch::alt,
    bytes::complete::{escaped_transform, is_not, take_while},
    character::complete::{char as tag_char, digit0, digit1, one_of, satisfy},
    combinator::{cut, map, opt, recognize, value},
    sequence::{preceded, terminated, tuple},
    InputTake, Slice,
};

use core::{fmt, iter::FusedIterator};

use crate::{
    alloc::{Cow, String},
    params::is_ident_char,
    spans::with_span,
    Grammar, InputSpan, LexError, LexErrorKind, Literal, NomResult, Parameters, Spanned,
    SymbolClass, Token, TokenKind,
};

fn is_ident_start(ch: char) -> bool {
    ch == '_' || ch.is_alphabetic()
}

/// Identifier such as `x`, `_tmp` or `sin2`.
fn identifier(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    recognize(tuple((satisfy(is_ident_start), take_while(is_ident_char))))(input)
}

/// Checks if the provided string is a valid function, constant or variable name.
///
/// # Examples
///
/// ```
/// # use shunt_parser::is_valid_name;
/// assert!(is_valid_name("max"));
/// assert!(is_valid_name("_x2"));
/// assert!(is_valid_name("größe"));
/// assert!(!is_valid_name("2x"));
/// assert!(!is_valid_name("max value"));
/// ```
pub fn is_valid_name(name: &str) -> bool {
    match identifier(InputSpan::new(name)) {
        Ok((rest, _)) => rest.fragment().is_empty(),
        Err(_) => false,
    }
}

/// Checks if the provided string is a complete numeric literal as recognized by the tokenizer.
/// Literals are unsigned; a leading `-` is tokenized as an operator.
///
/// # Examples
///
/// ```
/// # use shunt_parser::is_number_literal;
/// assert!(is_number_literal("42"));
/// assert!(is_number_literal(".5"));
/// assert!(is_number_literal("1.5e-3"));
/// assert!(!is_number_literal("-1"));
/// assert!(!is_number_literal("1.2.3"));
/// assert!(!is_number_literal("2x"));
/// ```
pub fn is_number_literal(text: &str) -> bool {
    match number_literal(InputSpan::new(text)) {
        Ok((rest, _)) => rest.fragment().is_empty(),
        Err(_) => false,
    }
}

/// Numeric literal: `digits [. digits?] | . digits`, with an optional exponent.
fn number_literal(input: InputSpan<'_>) -> NomResult<'_, Literal<'_>> {
    let mantissa = alt((
        recognize(tuple((digit1, opt(tuple((tag_char('.'), digit0)))))),
        recognize(tuple((tag_char('.'), digit1))),
    ));
    let exponent = tuple((one_of("eE"), opt(one_of("+-")), digit1));
    let (rest, number) = recognize(tuple((mantissa, opt(exponent))))(input)?;

    if let Some(next_char) = rest.fragment().chars().next() {
        if is_ident_char(next_char) {
            let len = number.fragment().len() + next_char.len_utf8();
            let err = LexError::new(input.slice(..len), LexErrorKind::InvalidNumber);
            return Err(nom::Err::Failure(err));
        }
    }
    Ok((rest, Literal::Number(*number.fragment())))
}

/// Quoted text, such as `"Hello, world!"` or `'it\'s'`.
fn text_literal<'a>(quote: char) -> impl FnMut(InputSpan<'a>) -> NomResult<'a, String> {
    let forbidden = if quote == '"' { "\\\"\n" } else { "\\'\n" };

    move |input: InputSpan<'a>| {
        let invalid_escape = |input: InputSpan<'a>| -> NomResult<'a, &'static str> {
            let (len, kind) = match input.fragment().chars().next() {
                None | Some('\n') => (0, LexErrorKind::UnterminatedString),
                Some(ch) => (ch.len_utf8(), LexErrorKind::InvalidEscape),
            };
            Err(nom::Err::Failure(LexError::new(input.slice(..len), kind)))
        };
        let body = escaped_transform(
            is_not(forbidden),
            '\\',
            alt((
                value("\\", tag_char('\\')),
                value("\"", tag_char('"')),
                value("'", tag_char('\'')),
                value("\n", tag_char('n')),
                value("\t", tag_char('t')),
                invalid_escape,
            )),
        );
        // Fails only if the body stops at a line end, the input end or a trailing `\`.
        let closing_quote = |input: InputSpan<'a>| -> NomResult<'a, char> {
            tag_char::<_, LexError<'a>>(quote)(input).map_err(|_| {
                let fragment = input.fragment();
                let line_end = fragment.find('\n').unwrap_or(fragment.len());
                let span = input.slice(line_end..line_end);
                nom::Err::Failure(LexError::new(span, LexErrorKind::UnterminatedString))
            })
        };

        map(
            preceded(tag_char(quote), cut(terminated(opt(body), closing_quote))),
            Option::unwrap_or_default,
        )(input)
        .map_err(|err| err.map(|err| include_escape_char(err, input)))
    }
}

/// Extends the span of an escape error to cover the preceding `\`.
fn include_escape_char<'a>(err: LexError<'a>, input: InputSpan<'a>) -> LexError<'a> {
    if err.kind() != LexErrorKind::InvalidEscape {
        return err;
    }
    let span = err.span();
    let start = span.location_offset() - input.location_offset() - 1;
    let end = start + 1 + span.fragment().len();
    LexError::new(input.slice(start..end), LexErrorKind::InvalidEscape)
}

/// Text literal value, borrowed from the code if possible.
fn text_value<'a>(quoted: &'a str, unescaped: String) -> Cow<'a, str> {
    let inner = &quoted[1..quoted.len() - 1];
    if inner.contains('\\') {
        Cow::Owned(unescaped)
    } else {
        Cow::Borrowed(inner)
    }
}

fn leading_whitespace(input: InputSpan<'_>) -> InputSpan<'_> {
    let ws_len = input
        .fragment()
        .find(|ch: char| !ch.is_whitespace())
        .unwrap_or(input.fragment().len());
    input.slice(ws_len..)
}

/// Lazy tokenizer over an expression. Iterating produces [`Token`]s or a single [`LexError`],
/// after which the iterator is exhausted.
///
/// At each position (after skipping whitespace), the tokenizer tries:
///
/// 1. The longest symbol registered in [`Parameters`] (an operator, a bracket or the argument
///    separator). Symbols ending with an identifier char must end on a word boundary.
/// 2. A numeric literal or a text literal in single or double quotes.
/// 3. An identifier. If an identifier is immediately followed by the open symbol
///    of a function bracket, it is a [`Function`](TokenKind::Function) name.
///
/// Operators are emitted without resolving their arity; this depends on the position
/// in the expression and is decided during evaluation.
///
/// # Examples
///
/// ```
/// # use assert_matches::assert_matches;
/// use shunt_parser::{
///     tokenize, Associativity, BracketPair, Literal, Operator, Parameters, Symbolic, TokenKind,
/// };
///
/// # fn main() -> anyhow::Result<()> {
/// let mut params = Parameters::<Symbolic>::new();
/// params
///     .add_operators([
///         Operator::binary(">", Associativity::Left, 1, ()),
///         Operator::binary(">=", Associativity::Left, 1, ()),
///     ])?
///     .add_function_bracket(BracketPair::PARENTHESES)?;
///
/// let tokens = tokenize("max(x, 3) >= 'ok'", &params).collect::<Result<Vec<_>, _>>()?;
/// let fragments: Vec<_> = tokens.iter().map(|token| *token.fragment()).collect();
/// assert_eq!(fragments, ["max", "(", "x", ",", "3", ")", ">=", "'ok'"]);
/// assert_eq!(tokens[0].extra, TokenKind::Function);
/// assert_matches!(
///     &tokens[7].extra,
///     TokenKind::Literal(Literal::Text(text)) if text == "ok"
/// );
/// # Ok(())
/// # }
/// ```
pub struct Tokenizer<'a, 'p, G: Grammar> {
    params: &'p Parameters<G>,
    input: InputSpan<'a>,
    is_done: bool,
}

impl<G: Grammar> fmt::Debug for Tokenizer<'_, '_, G> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Tokenizer")
            .field("input", &self.input)
            .field("is_done", &self.is_done)
            .finish()
    }
}

impl<G: Grammar> Clone for Tokenizer<'_, '_, G> {
    fn clone(&self) -> Self {
        Self {
            params: self.params,
            input: self.input,
            is_done: self.is_done,
        }
    }
}

impl<'a, 'p, G: Grammar> Tokenizer<'a, 'p, G> {
    /// Creates a tokenizer over `expr`.
    pub fn new(expr: &'a str, params: &'p Parameters<G>) -> Self {
        Self {
            params,
            input: InputSpan::new(expr),
            is_done: false,
        }
    }

    /// Returns the span of the remaining input, with leading whitespace skipped.
    /// Once all tokens are consumed, this is an empty span at the end of the expression.
    pub fn remaining(&self) -> Spanned<'a> {
        Spanned::new(leading_whitespace(self.input), ())
    }

    fn next_token(&self, input: InputSpan<'a>) -> Result<(InputSpan<'a>, Token<'a>), LexError<'a>> {
        if let Some((symbol, class)) = self.params.symbol_at(input.fragment()) {
            let (rest, symbol_span) = input.take_split(symbol.len());
            let kind = match class {
                SymbolClass::Operator => TokenKind::Operator,
                SymbolClass::OpenBracket => TokenKind::OpenBracket,
                SymbolClass::CloseBracket => TokenKind::CloseBracket,
                SymbolClass::Separator => TokenKind::Separator,
            };
            return Ok((rest, Spanned::new(symbol_span, kind)));
        }

        let mut chars = input.fragment().chars();
        let first_char = chars.next().unwrap_or('\0');
        let second_char = chars.next();
        let is_number_start = first_char.is_ascii_digit()
            || (first_char == '.' && second_char.map_or(false, |ch| ch.is_ascii_digit()));

        let parsed = if is_number_start {
            with_span(number_literal)(input).map(|(rest, literal)| {
                (rest, literal.map_extra(TokenKind::Literal))
            })
        } else if first_char == '"' || first_char == '\'' {
            with_span(text_literal(first_char))(input).map(|(rest, text)| {
                let quoted = *text.fragment();
                let token = text.map_extra(|unescaped| {
                    TokenKind::Literal(Literal::Text(text_value(quoted, unescaped)))
                });
                (rest, token)
            })
        } else if is_ident_start(first_char) {
            identifier(input).map(|(rest, name)| {
                let is_call = self
                    .params
                    .function_brackets()
                    .any(|pair| rest.fragment().starts_with(pair.open()));
                let kind = if is_call {
                    TokenKind::Function
                } else {
                    TokenKind::Identifier
                };
                (rest, Spanned::new(name, kind))
            })
        } else {
            let span = input.slice(..first_char.len_utf8());
            return Err(LexError::new(span, LexErrorKind::UnexpectedChar));
        };

        parsed.map_err(|err| match err {
            nom::Err::Error(err) | nom::Err::Failure(err) => err,
            nom::Err::Incomplete(_) => LexError::new(input, LexErrorKind::UnexpectedChar),
        })
    }
}

impl<'a, G: Grammar> Iterator for Tokenizer<'a, '_, G> {
    type Item = Result<Token<'a>, LexError<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_done {
            return None;
        }

        let input = leading_whitespace(self.input);
        self.input = input;
        if input.fragment().is_empty() {
            self.is_done = true;
            return None;
        }

        match self.next_token(input) {
            Ok((rest, token)) => {
                self.input = rest;
                Some(Ok(token))
            }
            Err(err) => {
                self.is_done = true;
                Some(Err(err))
            }
        }
    }
}

impl<G: Grammar> FusedIterator for Tokenizer<'_, '_, G> {}

/// Creates a [`Tokenizer`] over `expr`.
pub fn tokenize<'a, 'p, G: Grammar>(
    expr: &'a str,
    params: &'p Parameters<G>,
) -> Tokenizer<'a, 'p, G> {
    Tokenizer::new(expr, params)
}
