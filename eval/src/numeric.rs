//! Numeric evaluator over floating-point numbers.

use num_traits::{Float, FloatConst};
use once_cell::sync::Lazy;

use core::{fmt, marker::PhantomData, str::FromStr};

use crate::{
    alloc::{Cow, ToOwned, Vec},
    fns::MathFn,
    ErrorKind, Evaluator, Operands, Variables,
};
use shunt_parser::{
    Associativity, BracketPair, Constant, DefinitionError, Function, Grammar, Literal, Operator,
    Parameters,
};

/// Style of the default operator set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    /// Negation binds looser than exponentiation: `-2^2 == -4`.
    #[default]
    Standard,
    /// Negation binds tighter than exponentiation, as in spreadsheets: `-2^2 == 4`.
    Excel,
}

impl Style {
    pub(crate) fn negation_precedence(self) -> u32 {
        match self {
            Self::Standard => 7,
            Self::Excel => 9,
        }
    }
}

/// Arithmetic operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ArithOp {
    /// Unary negation.
    Neg,
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Division.
    Div,
    /// Remainder of division, with the sign of the dividend.
    Rem,
    /// Exponentiation.
    Pow,
}

impl ArithOp {
    pub(crate) fn operators(style: Style) -> [Operator<Self>; 7] {
        [
            Operator::unary("-", style.negation_precedence(), Self::Neg),
            Operator::binary("^", Associativity::Right, 8, Self::Pow),
            Operator::binary("*", Associativity::Left, 6, Self::Mul),
            Operator::binary("/", Associativity::Left, 6, Self::Div),
            Operator::binary("%", Associativity::Left, 6, Self::Rem),
            Operator::binary("+", Associativity::Left, 5, Self::Add),
            Operator::binary("-", Associativity::Left, 5, Self::Sub),
        ]
    }

    /// Applies this operation. Returns `None` if the number of operands does not match
    /// the operation.
    pub fn apply<T: Float>(self, operands: Operands<T>) -> Option<T> {
        Some(match (self, operands) {
            (Self::Neg, Operands::Unary(x)) => -x,
            (Self::Add, Operands::Binary(x, y)) => x + y,
            (Self::Sub, Operands::Binary(x, y)) => x - y,
            (Self::Mul, Operands::Binary(x, y)) => x * y,
            (Self::Div, Operands::Binary(x, y)) => x / y,
            (Self::Rem, Operands::Binary(x, y)) => x % y,
            (Self::Pow, Operands::Binary(x, y)) => x.powf(y),
            _ => return None,
        })
    }
}

/// Mathematical constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MathConst {
    /// Archimedes' constant.
    Pi,
    /// Euler's number.
    E,
}

impl MathConst {
    pub(crate) fn constants() -> [Constant<Self>; 2] {
        [Constant::new("pi", Self::Pi), Constant::new("e", Self::E)]
    }

    /// Returns the value of this constant.
    pub fn value<T: FloatConst>(self) -> T {
        match self {
            Self::Pi => T::PI(),
            Self::E => T::E(),
        }
    }
}

/// Grammar of [`NumEvaluator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct NumGrammar;

impl Grammar for NumGrammar {
    type Op = ArithOp;
    type Func = MathFn;
    type Const = MathConst;
}

/// Creates a fresh registry with the default numeric grammar in the specified `style`:
///
/// - unary `-`, binary `+ - * / %` and right-associative `^`
/// - [all math functions](MathFn) and constants `pi`, `e`
/// - parentheses for grouping and function calls, `,` as the arg separator
///
/// The registry can be extended or translated before passing it to
/// [`NumEvaluator::with_parameters()`].
pub fn default_parameters(style: Style) -> Parameters<NumGrammar> {
    let mut params = Parameters::new();
    build_parameters(&mut params, style)
        .expect("default numeric grammar contains conflicting definitions");
    log::debug!("Built default numeric parameters in {:?} style", style);
    params
}

fn build_parameters(
    params: &mut Parameters<NumGrammar>,
    style: Style,
) -> Result<(), DefinitionError> {
    params
        .add_operators(ArithOp::operators(style))?
        .add_functions(MathFn::ALL.iter().map(|&function| function.definition(function)))?
        .add_constants(MathConst::constants())?
        .add_expression_bracket(BracketPair::PARENTHESES)?
        .add_function_bracket(BracketPair::PARENTHESES)?;
    Ok(())
}

static STANDARD_PARAMS: Lazy<Parameters<NumGrammar>> =
    Lazy::new(|| default_parameters(Style::Standard));

/// Evaluator of arithmetic expressions over floating-point numbers.
///
/// Number literals are parsed with [`FromStr`]; text literals are not supported.
/// Math functions returning `NaN` (e.g., `ln(-1)`) fail with a host error.
///
/// # Examples
///
/// ```
/// use shunt_eval::{Evaluator, F64Evaluator, Style, VariableMap};
///
/// # fn main() -> anyhow::Result<()> {
/// let evaluator = F64Evaluator::new();
/// assert_eq!(evaluator.evaluate("2 ^ 3 - 1")?, 7.0);
/// assert_eq!(evaluator.evaluate("-2 ^ 2")?, -4.0);
/// assert_eq!(evaluator.evaluate("max(1, 5, 3) + round(-2.5)")?, 3.0);
///
/// let vars: VariableMap<f64> = [("r", 2.0)].into_iter().collect();
/// let area = evaluator.evaluate_with("pi * r ^ 2", &vars)?;
/// assert!((area - 4.0 * std::f64::consts::PI).abs() < 1e-12);
///
/// let excel = F64Evaluator::with_style(Style::Excel);
/// assert_eq!(excel.evaluate("-2 ^ 2")?, 4.0);
/// # Ok(())
/// # }
/// ```
pub struct NumEvaluator<T> {
    params: Cow<'static, Parameters<NumGrammar>>,
    _values: PhantomData<fn() -> T>,
}

/// Evaluator over `f32` values.
pub type F32Evaluator = NumEvaluator<f32>;
/// Evaluator over `f64` values.
pub type F64Evaluator = NumEvaluator<f64>;

impl<T> fmt::Debug for NumEvaluator<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NumEvaluator")
            .field("params", &self.params)
            .finish()
    }
}

impl<T> Clone for NumEvaluator<T> {
    fn clone(&self) -> Self {
        Self {
            params: self.params.clone(),
            _values: PhantomData,
        }
    }
}

impl<T> Default for NumEvaluator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> NumEvaluator<T> {
    /// Creates an evaluator with the standard grammar. The grammar is built once
    /// and shared among all evaluators created with this method.
    pub fn new() -> Self {
        Self {
            params: Cow::Borrowed(&*STANDARD_PARAMS),
            _values: PhantomData,
        }
    }

    /// Creates an evaluator with the default grammar in the specified style.
    pub fn with_style(style: Style) -> Self {
        match style {
            Style::Standard => Self::new(),
            Style::Excel => Self::with_parameters(default_parameters(style)),
        }
    }

    /// Creates an evaluator with custom parameters, e.g., a [default](default_parameters())
    /// registry with some elements translated or added.
    pub fn with_parameters(params: Parameters<NumGrammar>) -> Self {
        Self {
            params: Cow::Owned(params),
            _values: PhantomData,
        }
    }
}

impl<T> Evaluator for NumEvaluator<T>
where
    T: Float + FloatConst + FromStr,
{
    type Grammar = NumGrammar;
    type Value = T;

    fn parameters(&self) -> &Parameters<NumGrammar> {
        &self.params
    }

    fn literal_to_value(&self, literal: &Literal<'_>, _: &dyn Variables<T>) -> Result<T, ErrorKind> {
        match literal {
            Literal::Number(number) => number.parse().map_err(|_| {
                ErrorKind::host_message(format!("Cannot parse `{}` as a number", number))
            }),
            Literal::Text(_) => Err(ErrorKind::host_message(
                "Text literals are not supported by numeric evaluators",
            )),
        }
    }

    fn evaluate_constant(
        &self,
        constant: &Constant<MathConst>,
        _: &dyn Variables<T>,
    ) -> Result<T, ErrorKind> {
        Ok(constant.kind().value())
    }

    fn evaluate_operator(
        &self,
        operator: &Operator<ArithOp>,
        operands: Operands<T>,
        _: &dyn Variables<T>,
    ) -> Result<T, ErrorKind> {
        let arity = operands.arity();
        operator
            .kind()
            .apply(operands)
            .ok_or_else(|| ErrorKind::UnknownOperator {
                symbol: operator.symbol().to_owned(),
                arity,
            })
    }

    fn evaluate_function(
        &self,
        function: &Function<MathFn>,
        args: Vec<T>,
        _: &dyn Variables<T>,
    ) -> Result<T, ErrorKind> {
        function.kind().apply(&args)
    }
}
