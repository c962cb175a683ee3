//! Grammar elements: operators, functions and constants.
//!
//! Elements are plain descriptors. They carry no behavior; instead, each element is tagged
//! with a host-defined *kind* (see [`Grammar`]) which the host matches on when the element
//! is evaluated.

use core::{fmt, hash};

use crate::alloc::String;

/// Host-defined tags attached to grammar elements.
///
/// A host normally defines a fieldless enum for each tag type, so that dispatching
/// on an [`Operator`], [`Function`] or [`Constant`] is an exhaustive `match`
/// rather than a comparison of symbols.
///
/// # Examples
///
/// ```
/// use shunt_parser::{Associativity, Grammar, Operator, Parameters};
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// enum Op {
///     Add,
///     Neg,
/// }
///
/// #[derive(Debug)]
/// struct Tiny;
///
/// impl Grammar for Tiny {
///     type Op = Op;
///     type Func = ();
///     type Const = ();
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// let mut params = Parameters::<Tiny>::new();
/// params.add_operators([
///     Operator::binary("+", Associativity::Left, 1, Op::Add),
///     Operator::unary("-", 2, Op::Neg),
/// ])?;
/// assert_eq!(params.operators().count(), 2);
/// # Ok(())
/// # }
/// ```
pub trait Grammar: 'static {
    /// Tag for operators.
    type Op: Copy + PartialEq + fmt::Debug + 'static;
    /// Tag for functions.
    type Func: Copy + PartialEq + fmt::Debug + 'static;
    /// Tag for constants.
    type Const: Copy + PartialEq + fmt::Debug + 'static;
}

/// Grammar with unit tags, for hosts that dispatch on symbols and names.
#[derive(Debug, Clone, Copy, Default)]
pub struct Symbolic;

impl Grammar for Symbolic {
    type Op = ();
    type Func = ();
    type Const = ();
}

/// Number of operands taken by an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OpArity {
    /// Prefix operator with a single operand, such as negation.
    Unary,
    /// Infix operator with two operands.
    Binary,
}

impl OpArity {
    /// Returns the number of operands.
    pub const fn operand_count(self) -> usize {
        match self {
            Self::Unary => 1,
            Self::Binary => 2,
        }
    }
}

impl fmt::Display for OpArity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Unary => "unary",
            Self::Binary => "binary",
        })
    }
}

/// Grouping of operators with the same precedence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Associativity {
    /// `a op b op c` groups as `(a op b) op c`.
    Left,
    /// `a op b op c` groups as `a op (b op c)`.
    Right,
}

/// Unary or binary operator.
///
/// Operators are identified by their symbol *and* arity: unary `-` and binary `-` are
/// different operators and may have different precedence.
#[derive(Debug, Clone)]
pub struct Operator<K = ()> {
    symbol: String,
    arity: OpArity,
    associativity: Associativity,
    precedence: u32,
    kind: K,
}

impl<K> Operator<K> {
    /// Creates an operator. A higher `precedence` binds tighter.
    pub fn new(
        symbol: impl Into<String>,
        arity: OpArity,
        associativity: Associativity,
        precedence: u32,
        kind: K,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            arity,
            associativity,
            precedence,
            kind,
        }
    }

    /// Creates a prefix unary operator. Unary operators are right-associative, so that
    /// `--x` is `-(-x)`.
    pub fn unary(symbol: impl Into<String>, precedence: u32, kind: K) -> Self {
        Self::new(symbol, OpArity::Unary, Associativity::Right, precedence, kind)
    }

    /// Creates a binary operator.
    pub fn binary(
        symbol: impl Into<String>,
        associativity: Associativity,
        precedence: u32,
        kind: K,
    ) -> Self {
        Self::new(symbol, OpArity::Binary, associativity, precedence, kind)
    }

    /// Returns the operator symbol.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Returns the operator arity.
    pub fn arity(&self) -> OpArity {
        self.arity
    }

    /// Returns the operator associativity.
    pub fn associativity(&self) -> Associativity {
        self.associativity
    }

    /// Returns the operator precedence.
    pub fn precedence(&self) -> u32 {
        self.precedence
    }

    /// Checks whether an operator with this definition on the stack should be applied
    /// before pushing the `incoming` operator.
    pub fn binds_before<L>(&self, incoming: &Operator<L>) -> bool {
        match incoming.associativity {
            Associativity::Left => self.precedence >= incoming.precedence,
            Associativity::Right => self.precedence > incoming.precedence,
        }
    }
}

impl<K: Copy> Operator<K> {
    /// Returns the host-defined tag of this operator.
    pub fn kind(&self) -> K {
        self.kind
    }
}

impl<K> PartialEq for Operator<K> {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol && self.arity == other.arity
    }
}

impl<K> Eq for Operator<K> {}

impl<K> hash::Hash for Operator<K> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
        self.arity.hash(state);
    }
}

impl<K> fmt::Display for Operator<K> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{} `{}`", self.arity, self.symbol)
    }
}

/// Range of argument counts accepted by a [`Function`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FnArity {
    min: usize,
    max: Option<usize>,
}

impl FnArity {
    /// Function with exactly `count` args.
    pub const fn exact(count: usize) -> Self {
        Self {
            min: count,
            max: Some(count),
        }
    }

    /// Function with `min..=max` args.
    ///
    /// # Panics
    ///
    /// Panics if `min > max`.
    pub const fn range(min: usize, max: usize) -> Self {
        assert!(min <= max, "Minimum arg count exceeds maximum");
        Self {
            min,
            max: Some(max),
        }
    }

    /// Variadic function with `min` or more args.
    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    /// Returns the minimum number of args.
    pub fn min(self) -> usize {
        self.min
    }

    /// Returns the maximum number of args, or `None` if the function is variadic.
    pub fn max(self) -> Option<usize> {
        self.max
    }

    /// Checks whether a call with `count` args is valid.
    pub fn accepts(self, count: usize) -> bool {
        count >= self.min && self.max.map_or(true, |max| count <= max)
    }
}

impl fmt::Display for FnArity {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(formatter, "{}", max),
            Some(max) => write!(formatter, "{}..={}", self.min, max),
            None => write!(formatter, "at least {}", self.min),
        }
    }
}

/// Function callable as `name(arg, ...)`.
#[derive(Debug, Clone)]
pub struct Function<K = ()> {
    name: String,
    arity: FnArity,
    kind: K,
}

impl<K> Function<K> {
    /// Creates a function. Names are case-sensitive.
    pub fn new(name: impl Into<String>, arity: FnArity, kind: K) -> Self {
        Self {
            name: name.into(),
            arity,
            kind,
        }
    }

    /// Returns the canonical function name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the range of accepted arg counts.
    pub fn arity(&self) -> FnArity {
        self.arity
    }
}

impl<K: Copy> Function<K> {
    /// Returns the host-defined tag of this function.
    pub fn kind(&self) -> K {
        self.kind
    }
}

impl<K> PartialEq for Function<K> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

/// Named constant. The value is provided by the host at evaluation time.
#[derive(Debug, Clone)]
pub struct Constant<K = ()> {
    name: String,
    kind: K,
}

impl<K> Constant<K> {
    /// Creates a constant.
    pub fn new(name: impl Into<String>, kind: K) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Returns the canonical constant name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<K: Copy> Constant<K> {
    /// Returns the host-defined tag of this constant.
    pub fn kind(&self) -> K {
        self.kind
    }
}

impl<K> PartialEq for Constant<K> {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operator_identity_includes_arity() {
        let neg = Operator::unary("-", 7, ());
        let sub = Operator::binary("-", Associativity::Left, 5, ());
        assert_ne!(neg, sub);
        assert_eq!(sub, Operator::binary("-", Associativity::Right, 1, ()));
        assert_eq!(neg.associativity(), Associativity::Right);
        assert_eq!(neg.to_string(), "unary `-`");
    }

    #[test]
    fn binding_order() {
        let pow = Operator::binary("^", Associativity::Right, 8, ());
        let mul = Operator::binary("*", Associativity::Left, 6, ());
        let div = Operator::binary("/", Associativity::Left, 6, ());

        assert!(pow.binds_before(&mul));
        assert!(!mul.binds_before(&pow));
        assert!(mul.binds_before(&div));
        assert!(!pow.binds_before(&pow));
    }

    #[test]
    fn fn_arity_bounds() {
        let arity = FnArity::range(1, 3);
        assert!(!arity.accepts(0));
        assert!(arity.accepts(1) && arity.accepts(3));
        assert!(!arity.accepts(4));
        assert_eq!(arity.to_string(), "1..=3");

        let variadic = FnArity::at_least(1);
        assert!(variadic.accepts(100));
        assert!(!variadic.accepts(0));
        assert_eq!(variadic.to_string(), "at least 1");

        assert_eq!(FnArity::exact(2).to_string(), "2");
        assert!(!FnArity::exact(2).accepts(1));
        assert!(!FnArity::exact(2).accepts(3));
    }

    #[test]
    #[should_panic(expected = "Minimum arg count exceeds maximum")]
    fn invalid_fn_arity() {
        let _ = FnArity::range(3, 1);
    }
}
