//! Host [`Evaluator`] trait.

use shunt_parser::{Constant, Function, Grammar, Literal, OpArity, Operator, Parameters};

use crate::{alloc::Vec, engine::Engine, EvalResult, ErrorKind, NoVariables, Variables};

/// Operands of an operator in evaluation order (the left operand first).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operands<V> {
    /// Operand of a unary operator.
    Unary(V),
    /// Left and right operands of a binary operator.
    Binary(V, V),
}

impl<V> Operands<V> {
    /// Returns the arity corresponding to these operands.
    pub fn arity(&self) -> OpArity {
        match self {
            Self::Unary(_) => OpArity::Unary,
            Self::Binary(..) => OpArity::Binary,
        }
    }

    /// Maps each operand with the provided fallible function, preserving the evaluation order.
    pub fn try_map<U, E>(self, mut map_fn: impl FnMut(V) -> Result<U, E>) -> Result<Operands<U>, E> {
        Ok(match self {
            Self::Unary(value) => Operands::Unary(map_fn(value)?),
            Self::Binary(lhs, rhs) => {
                let lhs = map_fn(lhs)?;
                Operands::Binary(lhs, map_fn(rhs)?)
            }
        })
    }
}

/// Host-specific part of expression evaluation: the grammar accepted by the host
/// and the semantics of literals, constants, operators and functions.
///
/// The engine evaluates expressions in a single pass, without building an AST. It orders
/// reductions according to the operator precedence and associativity, checks function arity
/// and bracket balance, and calls back into the host for everything else.
///
/// Logical operators are not special-cased: both operands of a binary operator are always
/// evaluated before the operator callback is called.
///
/// # Examples
///
/// A minimal host over integers.
///
/// ```
/// use shunt_eval::{ErrorKind, Evaluator, Operands, Variables};
/// use shunt_parser::{
///     Associativity, BracketPair, Constant, Function, Literal, Operator, Parameters, Symbolic,
/// };
///
/// struct IntHost(Parameters<Symbolic>);
///
/// impl Evaluator for IntHost {
///     type Grammar = Symbolic;
///     type Value = i64;
///
///     fn parameters(&self) -> &Parameters<Symbolic> {
///         &self.0
///     }
///
///     fn literal_to_value(
///         &self,
///         literal: &Literal<'_>,
///         _: &dyn Variables<i64>,
///     ) -> Result<i64, ErrorKind> {
///         literal.as_str().parse().map_err(ErrorKind::host)
///     }
///
///     fn evaluate_constant(
///         &self,
///         constant: &Constant,
///         _: &dyn Variables<i64>,
///     ) -> Result<i64, ErrorKind> {
///         Err(ErrorKind::UnknownConstant { name: constant.name().to_owned() })
///     }
///
///     fn evaluate_operator(
///         &self,
///         operator: &Operator,
///         operands: Operands<i64>,
///         _: &dyn Variables<i64>,
///     ) -> Result<i64, ErrorKind> {
///         Ok(match (operator.symbol(), operands) {
///             ("-", Operands::Unary(x)) => -x,
///             ("-", Operands::Binary(x, y)) => x - y,
///             ("*", Operands::Binary(x, y)) => x * y,
///             _ => return Err(ErrorKind::host_message("unsupported operator")),
///         })
///     }
///
///     fn evaluate_function(
///         &self,
///         function: &Function,
///         _: Vec<i64>,
///         _: &dyn Variables<i64>,
///     ) -> Result<i64, ErrorKind> {
///         Err(ErrorKind::UnknownFunction { name: function.name().to_owned() })
///     }
/// }
///
/// # fn main() -> anyhow::Result<()> {
/// let mut params = Parameters::new();
/// params
///     .add_operators([
///         Operator::unary("-", 7, ()),
///         Operator::binary("-", Associativity::Left, 5, ()),
///         Operator::binary("*", Associativity::Left, 6, ()),
///     ])?
///     .add_expression_bracket(BracketPair::PARENTHESES)?;
/// let host = IntHost(params);
///
/// assert_eq!(host.evaluate("2 - 3 * 4")?, -10);
/// assert_eq!(host.evaluate("(2 - 3) * --4")?, -4);
/// let vars = [("x".to_owned(), 5_i64)].into_iter().collect::<std::collections::HashMap<_, _>>();
/// assert_eq!(host.evaluate_with("x * -x", &vars)?, -25);
/// # Ok(())
/// # }
/// ```
pub trait Evaluator {
    /// Tags of grammar elements.
    type Grammar: Grammar;
    /// Type of values produced by evaluation.
    type Value;

    /// Returns the grammar accepted by this evaluator.
    fn parameters(&self) -> &Parameters<Self::Grammar>;

    /// Converts a literal to a value.
    fn literal_to_value(
        &self,
        literal: &Literal<'_>,
        vars: &dyn Variables<Self::Value>,
    ) -> Result<Self::Value, ErrorKind>;

    /// Evaluates a registered constant.
    fn evaluate_constant(
        &self,
        constant: &Constant<<Self::Grammar as Grammar>::Const>,
        vars: &dyn Variables<Self::Value>,
    ) -> Result<Self::Value, ErrorKind>;

    /// Applies a registered operator.
    fn evaluate_operator(
        &self,
        operator: &Operator<<Self::Grammar as Grammar>::Op>,
        operands: Operands<Self::Value>,
        vars: &dyn Variables<Self::Value>,
    ) -> Result<Self::Value, ErrorKind>;

    /// Calls a registered function. The number of `args` is guaranteed to be accepted
    /// by the function arity.
    fn evaluate_function(
        &self,
        function: &Function<<Self::Grammar as Grammar>::Func>,
        args: Vec<Self::Value>,
        vars: &dyn Variables<Self::Value>,
    ) -> Result<Self::Value, ErrorKind>;

    /// Resolves an identifier that is not a registered constant. By default, defers
    /// to `vars`.
    fn resolve_variable(
        &self,
        name: &str,
        vars: &dyn Variables<Self::Value>,
    ) -> Option<Self::Value> {
        vars.resolve(name)
    }

    /// Provides a fallback value for an identifier that is neither a constant nor a variable.
    /// If this returns `None` (the default), evaluation fails with
    /// [`UnknownVariable`](ErrorKind::UnknownVariable).
    fn unresolved_identifier(
        &self,
        _name: &str,
        _vars: &dyn Variables<Self::Value>,
    ) -> Option<Self::Value> {
        None
    }

    /// Evaluates an expression without variables.
    fn evaluate<'a>(&self, expr: &'a str) -> EvalResult<'a, Self::Value> {
        self.evaluate_with(expr, &NoVariables)
    }

    /// Evaluates an expression with the provided variables.
    fn evaluate_with<'a>(
        &self,
        expr: &'a str,
        vars: &dyn Variables<Self::Value>,
    ) -> EvalResult<'a, Self::Value> {
        Engine::new(self, vars).evaluate(expr)
    }
}
