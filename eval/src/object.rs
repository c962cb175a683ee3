//! Evaluator over dynamically typed values, suited for business rules such as
//! `status == 'Open' && (amount > 1000 || isempty(owner))`.

use once_cell::sync::Lazy;

use core::fmt;

use crate::{
    alloc::{format, Cow, ToOwned, Vec},
    fns::MathFn,
    numeric::{ArithOp, MathConst, Style},
    ErrorKind, Evaluator, Operands, Variables,
};
use shunt_parser::{
    Associativity, BracketPair, Constant, DefinitionError, FnArity, Function, Grammar, Literal,
    Operator, Parameters,
};

mod value;

pub use self::value::{Value, ValueType};

/// Numeric comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// `<`
    Less,
    /// `<=`
    LessOrEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterOrEqual,
}

impl Comparison {
    fn compare(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Less => lhs < rhs,
            Self::LessOrEqual => lhs <= rhs,
            Self::Greater => lhs > rhs,
            Self::GreaterOrEqual => lhs >= rhs,
        }
    }
}

/// Operation performed by an [`ObjectEvaluator`] operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ObjectOp {
    /// Arithmetic on numbers (or text coercible to numbers).
    Arith(ArithOp),
    /// Comparison of numbers (or text coercible to numbers).
    Compare(Comparison),
    /// Structural equality.
    Equals,
    /// Structural inequality.
    NotEquals,
    /// Logical conjunction of booleans.
    And,
    /// Logical disjunction of booleans.
    Or,
}

/// Function supported by an [`ObjectEvaluator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ObjectFn {
    /// Math function applied to numeric args.
    Math(MathFn),
    /// `if(condition, then, else)`. All args are evaluated before the call.
    If,
    /// `isempty(value)`: checks whether the value is null or empty text.
    IsEmpty,
}

/// Constant supported by an [`ObjectEvaluator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ObjectConst {
    /// Math constant.
    Math(MathConst),
    /// `true`
    True,
    /// `false`
    False,
    /// `null`
    Null,
}

/// Grammar of [`ObjectEvaluator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectGrammar;

impl Grammar for ObjectGrammar {
    type Op = ObjectOp;
    type Func = ObjectFn;
    type Const = ObjectConst;
}

fn object_operators(style: Style) -> impl Iterator<Item = Operator<ObjectOp>> {
    let arith = ArithOp::operators(style).into_iter().map(|op| {
        let kind = ObjectOp::Arith(op.kind());
        Operator::new(
            op.symbol(),
            op.arity(),
            op.associativity(),
            op.precedence(),
            kind,
        )
    });

    let logic = [
        ("<", 4, ObjectOp::Compare(Comparison::Less)),
        ("<=", 4, ObjectOp::Compare(Comparison::LessOrEqual)),
        (">", 4, ObjectOp::Compare(Comparison::Greater)),
        (">=", 4, ObjectOp::Compare(Comparison::GreaterOrEqual)),
        ("==", 3, ObjectOp::Equals),
        ("!=", 3, ObjectOp::NotEquals),
        ("&&", 2, ObjectOp::And),
        ("||", 2, ObjectOp::Or),
    ];
    let logic = logic
        .into_iter()
        .map(|(symbol, precedence, kind)| {
            Operator::binary(symbol, Associativity::Left, precedence, kind)
        });
    arith.chain(logic)
}

/// Creates a fresh registry with the default grammar of [`ObjectEvaluator`] in the specified
/// `style`. Besides the numeric grammar (see [`default_parameters()`](crate::default_parameters)),
/// it contains:
///
/// - comparisons `< <= > >=` (precedence 4), equality `== !=` (3), `&&` and `||` (2)
/// - functions `if` and `isempty`
/// - constants `true`, `false` and `null`
pub fn object_parameters(style: Style) -> Parameters<ObjectGrammar> {
    let mut params = Parameters::new();
    build_parameters(&mut params, style)
        .expect("default object grammar contains conflicting definitions");
    log::debug!("Built default object parameters in {:?} style", style);
    params
}

fn build_parameters(
    params: &mut Parameters<ObjectGrammar>,
    style: Style,
) -> Result<(), DefinitionError> {
    let math_fns = MathFn::ALL
        .iter()
        .map(|&function| function.definition(ObjectFn::Math(function)));
    let constants = MathConst::constants()
        .into_iter()
        .map(|constant| Constant::new(constant.name(), ObjectConst::Math(constant.kind())));

    params
        .add_operators(object_operators(style))?
        .add_functions(math_fns)?
        .add_functions([
            Function::new("if", FnArity::exact(3), ObjectFn::If),
            Function::new("isempty", FnArity::exact(1), ObjectFn::IsEmpty),
        ])?
        .add_constants(constants)?
        .add_constants([
            Constant::new("true", ObjectConst::True),
            Constant::new("false", ObjectConst::False),
            Constant::new("null", ObjectConst::Null),
        ])?
        .add_expression_bracket(BracketPair::PARENTHESES)?
        .add_function_bracket(BracketPair::PARENTHESES)?;
    Ok(())
}

static STANDARD_PARAMS: Lazy<Parameters<ObjectGrammar>> =
    Lazy::new(|| object_parameters(Style::Standard));

fn type_error(context: impl fmt::Display, expected: ValueType, actual: &Value) -> ErrorKind {
    ErrorKind::host_message(format!(
        "{} expects a {}, got {} `{}`",
        context,
        expected,
        actual.value_type(),
        actual
    ))
}

/// Evaluator over dynamically typed [`Value`]s.
///
/// # Semantics
///
/// - Arithmetic, comparisons and math functions accept numbers and text that is
///   a complete number literal (see [`Value::as_number()`]).
/// - `==` and `!=` compare values structurally; values of different types are never equal.
/// - `&&` and `||` accept booleans only. Both operands are always evaluated.
/// - An identifier that is neither a constant nor a defined variable evaluates to text
///   with the identifier name (a *bare word*), so that enumerations like `color == RED`
///   can be written without quotes. This can be switched off with [`Self::strict()`].
///
/// # Examples
///
/// ```
/// use shunt_eval::{Evaluator, ObjectEvaluator, Value, VariableMap};
///
/// # fn main() -> anyhow::Result<()> {
/// let evaluator = ObjectEvaluator::new();
/// let mut vars = VariableMap::new();
/// vars.insert("code", Value::from("E001"))
///     .insert("temperature", Value::from(10))
///     .insert("color", Value::from("RED"));
///
/// let expr = "code == 'E001' && temperature < 20 && color == RED";
/// assert_eq!(evaluator.evaluate_with(expr, &vars)?, Value::Bool(true));
/// let expr = "if(isempty(owner), 'unassigned', owner)";
/// assert_eq!(evaluator.evaluate_with(expr, &vars)?, Value::from("owner"));
///
/// let strict = ObjectEvaluator::new().strict();
/// assert!(strict.evaluate_with("color == RED", &vars).is_err());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ObjectEvaluator {
    params: Cow<'static, Parameters<ObjectGrammar>>,
    bare_words: bool,
}

impl Default for ObjectEvaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl ObjectEvaluator {
    /// Creates an evaluator with the standard grammar shared among all evaluators
    /// created with this method.
    pub fn new() -> Self {
        Self {
            params: Cow::Borrowed(&*STANDARD_PARAMS),
            bare_words: true,
        }
    }

    /// Creates an evaluator with the default grammar in the specified style.
    pub fn with_style(style: Style) -> Self {
        match style {
            Style::Standard => Self::new(),
            Style::Excel => Self::with_parameters(object_parameters(style)),
        }
    }

    /// Creates an evaluator with custom parameters.
    pub fn with_parameters(params: Parameters<ObjectGrammar>) -> Self {
        Self {
            params: Cow::Owned(params),
            bare_words: true,
        }
    }

    /// Makes unknown identifiers fail evaluation instead of being treated as text.
    #[must_use]
    pub fn strict(mut self) -> Self {
        self.bare_words = false;
        self
    }

    fn number_operand(operator: &Operator<ObjectOp>, value: &Value) -> Result<f64, ErrorKind> {
        value.as_number().ok_or_else(|| {
            let context = format!("Operator `{}`", operator.symbol());
            type_error(context, ValueType::Number, value)
        })
    }

    fn bool_operand(operator: &Operator<ObjectOp>, value: &Value) -> Result<bool, ErrorKind> {
        value.as_bool().ok_or_else(|| {
            let context = format!("Operator `{}`", operator.symbol());
            type_error(context, ValueType::Bool, value)
        })
    }

    fn binary_operands(
        operator: &Operator<ObjectOp>,
        operands: Operands<Value>,
    ) -> Result<(Value, Value), ErrorKind> {
        match operands {
            Operands::Binary(lhs, rhs) => Ok((lhs, rhs)),
            Operands::Unary(_) => Err(ErrorKind::UnknownOperator {
                symbol: operator.symbol().to_owned(),
                arity: operands.arity(),
            }),
        }
    }
}

impl Evaluator for ObjectEvaluator {
    type Grammar = ObjectGrammar;
    type Value = Value;

    fn parameters(&self) -> &Parameters<ObjectGrammar> {
        &self.params
    }

    fn literal_to_value(
        &self,
        literal: &Literal<'_>,
        _: &dyn Variables<Value>,
    ) -> Result<Value, ErrorKind> {
        match literal {
            Literal::Number(number) => number.parse().map(Value::Number).map_err(ErrorKind::host),
            Literal::Text(text) => Ok(Value::Text(text.clone().into_owned())),
        }
    }

    fn evaluate_constant(
        &self,
        constant: &Constant<ObjectConst>,
        _: &dyn Variables<Value>,
    ) -> Result<Value, ErrorKind> {
        Ok(match constant.kind() {
            ObjectConst::Math(constant) => Value::Number(constant.value()),
            ObjectConst::True => Value::Bool(true),
            ObjectConst::False => Value::Bool(false),
            ObjectConst::Null => Value::Null,
        })
    }

    fn evaluate_operator(
        &self,
        operator: &Operator<ObjectOp>,
        operands: Operands<Value>,
        _: &dyn Variables<Value>,
    ) -> Result<Value, ErrorKind> {
        let arity = operands.arity();
        match operator.kind() {
            ObjectOp::Arith(op) => {
                let operands = operands.try_map(|value| Self::number_operand(operator, &value))?;
                op.apply(operands)
                    .map(Value::Number)
                    .ok_or_else(|| ErrorKind::UnknownOperator {
                        symbol: operator.symbol().to_owned(),
                        arity,
                    })
            }
            ObjectOp::Compare(comparison) => {
                let (lhs, rhs) = Self::binary_operands(operator, operands)?;
                let lhs = Self::number_operand(operator, &lhs)?;
                let rhs = Self::number_operand(operator, &rhs)?;
                Ok(Value::Bool(comparison.compare(lhs, rhs)))
            }
            ObjectOp::Equals => {
                let (lhs, rhs) = Self::binary_operands(operator, operands)?;
                Ok(Value::Bool(lhs == rhs))
            }
            ObjectOp::NotEquals => {
                let (lhs, rhs) = Self::binary_operands(operator, operands)?;
                Ok(Value::Bool(lhs != rhs))
            }
            ObjectOp::And | ObjectOp::Or => {
                let (lhs, rhs) = Self::binary_operands(operator, operands)?;
                let lhs = Self::bool_operand(operator, &lhs)?;
                let rhs = Self::bool_operand(operator, &rhs)?;
                let is_and = operator.kind() == ObjectOp::And;
                Ok(Value::Bool(if is_and { lhs && rhs } else { lhs || rhs }))
            }
        }
    }

    fn evaluate_function(
        &self,
        function: &Function<ObjectFn>,
        args: Vec<Value>,
        _: &dyn Variables<Value>,
    ) -> Result<Value, ErrorKind> {
        match function.kind() {
            ObjectFn::Math(math_fn) => {
                let args = args
                    .iter()
                    .map(|arg| {
                        arg.as_number().ok_or_else(|| {
                            let context = format!("Function `{}`", function.name());
                            type_error(context, ValueType::Number, arg)
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                math_fn.apply(&args).map(Value::Number)
            }

            ObjectFn::If => {
                let arg_count = args.len();
                let mut args = args.into_iter();
                match (args.next(), args.next(), args.next()) {
                    (Some(Value::Bool(condition)), Some(then), Some(otherwise)) => {
                        Ok(if condition { then } else { otherwise })
                    }
                    (Some(condition), Some(_), Some(_)) => {
                        Err(type_error("Condition of `if`", ValueType::Bool, &condition))
                    }
                    _ => Err(ErrorKind::ArityMismatch {
                        name: function.name().to_owned(),
                        expected: function.arity(),
                        actual: arg_count,
                    }),
                }
            }

            ObjectFn::IsEmpty => {
                let is_empty = match args.first() {
                    Some(Value::Null) => true,
                    Some(Value::Text(text)) => text.is_empty(),
                    _ => false,
                };
                Ok(Value::Bool(is_empty))
            }
        }
    }

    fn unresolved_identifier(&self, name: &str, _: &dyn Variables<Value>) -> Option<Value> {
        if self.bare_words {
            log::trace!("Treating unresolved identifier `{}` as text", name);
            Some(Value::Text(name.to_owned()))
        } else {
            None
        }
    }
}
