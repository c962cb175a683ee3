//! Integration tests for the evaluation engine.

use assert_matches::assert_matches;

use std::cell::RefCell;

use shunt_eval::{ErrorKind, EvalResult, Evaluator, Operands, VariableMap, Variables};
use shunt_parser::{
    Associativity, BracketPair, Constant, FnArity, Function, Literal, Operator, Parameters,
    Symbolic,
};

mod errors;
mod numeric;
mod objects;
mod params;

/// Host rendering every evaluation step as a fully parenthesized string
/// and recording the steps in the order of evaluation.
#[derive(Debug)]
struct Recorder {
    params: Parameters<Symbolic>,
    steps: RefCell<Vec<String>>,
}

fn recorder_params() -> Parameters<Symbolic> {
    let mut params = Parameters::new();
    params
        .add_operators([
            Operator::unary("-", 7, ()),
            Operator::unary("!", 7, ()),
            Operator::binary("^", Associativity::Right, 8, ()),
            Operator::binary("*", Associativity::Left, 6, ()),
            Operator::binary("/", Associativity::Left, 6, ()),
            Operator::binary("+", Associativity::Left, 5, ()),
            Operator::binary("-", Associativity::Left, 5, ()),
            Operator::binary("<", Associativity::Left, 4, ()),
            Operator::binary("==", Associativity::Left, 3, ()),
            Operator::binary("&&", Associativity::Left, 2, ()),
            Operator::binary("||", Associativity::Left, 1, ()),
        ])
        .unwrap()
        .add_functions([
            Function::new("f", FnArity::range(1, 3), ()),
            Function::new("max", FnArity::at_least(1), ()),
            Function::new("rnd", FnArity::exact(0), ()),
        ])
        .unwrap()
        .add_constant(Constant::new("pi", ()))
        .unwrap()
        .add_expression_brackets([BracketPair::PARENTHESES, BracketPair::SQUARE_BRACKETS])
        .unwrap()
        .add_function_bracket(BracketPair::PARENTHESES)
        .unwrap();
    params
}

impl Recorder {
    fn new() -> Self {
        Self::with_params(recorder_params())
    }

    fn with_params(params: Parameters<Symbolic>) -> Self {
        Self {
            params,
            steps: RefCell::default(),
        }
    }

    fn record(&self, step: String) -> Result<String, ErrorKind> {
        self.steps.borrow_mut().push(step.clone());
        Ok(step)
    }

    fn take_steps(&self) -> Vec<String> {
        self.steps.take()
    }
}

impl Evaluator for Recorder {
    type Grammar = Symbolic;
    type Value = String;

    fn parameters(&self) -> &Parameters<Symbolic> {
        &self.params
    }

    fn literal_to_value(
        &self,
        literal: &Literal<'_>,
        _: &dyn Variables<String>,
    ) -> Result<String, ErrorKind> {
        Ok(match literal {
            Literal::Number(number) => (*number).to_owned(),
            Literal::Text(text) => format!("'{}'", text),
        })
    }

    fn evaluate_constant(
        &self,
        constant: &Constant,
        _: &dyn Variables<String>,
    ) -> Result<String, ErrorKind> {
        Ok(constant.name().to_uppercase())
    }

    fn evaluate_operator(
        &self,
        operator: &Operator,
        operands: Operands<String>,
        _: &dyn Variables<String>,
    ) -> Result<String, ErrorKind> {
        let step = match operands {
            Operands::Unary(x) => format!("({}{})", operator.symbol(), x),
            Operands::Binary(x, y) => {
                if operator.symbol() == "/" && y == "0" {
                    return Err(ErrorKind::host_message("division by zero"));
                }
                format!("({} {} {})", x, operator.symbol(), y)
            }
        };
        self.record(step)
    }

    fn evaluate_function(
        &self,
        function: &Function,
        args: Vec<String>,
        _: &dyn Variables<String>,
    ) -> Result<String, ErrorKind> {
        self.record(format!("{}({})", function.name(), args.join(", ")))
    }
}

fn record(expr: &str) -> String {
    Recorder::new().evaluate(expr).unwrap()
}

fn try_record(expr: &str) -> EvalResult<'_, String> {
    Recorder::new().evaluate(expr)
}

#[test]
fn binary_operator_precedence() {
    assert_eq!(record("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(record("1 * 2 + 3"), "((1 * 2) + 3)");
    assert_eq!(record("1 + 2 * 3 ^ 4"), "(1 + (2 * (3 ^ 4)))");
    assert_eq!(
        record("1 < 2 == 2 < 3 && 4 || 5"),
        "((((1 < 2) == (2 < 3)) && 4) || 5)"
    );
    assert_eq!(record("1 || 2 && 3"), "(1 || (2 && 3))");
}

#[test]
fn associativity() {
    assert_eq!(record("1 - 2 - 3"), "((1 - 2) - 3)");
    assert_eq!(record("1 / 2 * 3"), "((1 / 2) * 3)");
    assert_eq!(record("2 ^ 3 ^ 2"), "(2 ^ (3 ^ 2))");
    assert_eq!(record("2 ^ 3 ^ 2 * 4"), "((2 ^ (3 ^ 2)) * 4)");
}

#[test]
fn unary_operators() {
    assert_eq!(record("-1"), "(-1)");
    assert_eq!(record("--1"), "(-(-1))");
    assert_eq!(record("!-1"), "(!(-1))");
    assert_eq!(record("-1 + 2"), "((-1) + 2)");
    assert_eq!(record("1 - -2"), "(1 - (-2))");
    assert_eq!(record("2 * -3"), "(2 * (-3))");
    assert_eq!(record("2 ^ -1"), "(2 ^ (-1))");
    // `^` binds tighter than negation.
    assert_eq!(record("-2 ^ 2"), "(-(2 ^ 2))");
    assert_eq!(record("-(1 + 2)"), "(-(1 + 2))");
}

#[test]
fn grouping_brackets() {
    assert_eq!(record("(1 + 2) * 3"), "((1 + 2) * 3)");
    assert_eq!(record("[1 + 2] * (3 - [4])"), "((1 + 2) * (3 - 4))");
    assert_eq!(record("((((1))))"), "1");
    assert_eq!(record("2 ^ (3 ^ 2)"), "(2 ^ (3 ^ 2))");
    assert_eq!(record("(2 ^ 3) ^ 2"), "((2 ^ 3) ^ 2)");
}

#[test]
fn function_calls() {
    assert_eq!(record("f(1)"), "f(1)");
    assert_eq!(record("max(1, 2 + 3, f(4))"), "max(1, (2 + 3), f(4))");
    assert_eq!(record("f(max(1), (2), [3])"), "f(max(1), 2, 3)");
    assert_eq!(record("rnd() * 2"), "(rnd() * 2)");
    assert_eq!(record("-f(1) ^ 2"), "(-(f(1) ^ 2))");
    assert_eq!(record("f(rnd(), -1)"), "f(rnd(), (-1))");
    assert_eq!(record("max(1,2,3,4,5,6,7)"), "max(1, 2, 3, 4, 5, 6, 7)");
}

#[test]
fn evaluation_order() {
    let recorder = Recorder::new();
    recorder.evaluate("1 * 2 + 3 * 4").unwrap();
    assert_eq!(
        recorder.take_steps(),
        ["(1 * 2)", "(3 * 4)", "((1 * 2) + (3 * 4))"]
    );

    recorder.evaluate("f(1 + 2, max(3)) - 4").unwrap();
    assert_eq!(
        recorder.take_steps(),
        ["(1 + 2)", "max(3)", "f((1 + 2), max(3))", "(f((1 + 2), max(3)) - 4)"]
    );

    // Both operands of logical operators are evaluated.
    recorder.evaluate("(1 < 2) || (3 < 4)").unwrap();
    assert_eq!(
        recorder.take_steps(),
        ["(1 < 2)", "(3 < 4)", "((1 < 2) || (3 < 4))"]
    );
}

#[test]
fn literals_constants_and_variables() {
    let mut vars = VariableMap::new();
    vars.insert("x", "X".to_owned()).insert("größe", "G".to_owned());
    let recorder = Recorder::new();

    let value = recorder.evaluate_with("x * -x + größe", &vars).unwrap();
    assert_eq!(value, "((X * (-X)) + G)");
    let value = recorder.evaluate_with("'a b' == \"c\\\"\"", &vars).unwrap();
    assert_eq!(value, "('a b' == 'c\"')");
    let value = recorder.evaluate_with("2 * pi + 1.5e3", &vars).unwrap();
    assert_eq!(value, "((2 * PI) + 1.5e3)");

    let err = recorder.evaluate_with("x + y", &vars).unwrap_err();
    assert_matches!(err.kind(), ErrorKind::UnknownVariable { name } if name == "y");
    assert_eq!(err.span().location_offset(), 4);
}

#[test]
fn whitespace_is_insignificant() {
    assert_eq!(record("1+2*3"), record("  1 +\n\t2 *   3 "));
    assert_eq!(record("max(1,2)"), "max(1, 2)");
}

#[test]
fn arity_is_checked_before_calling_host() {
    let recorder = Recorder::new();
    let err = recorder.evaluate("1 + f(1, 2, 3, 4)").unwrap_err();
    assert_matches!(
        err.kind(),
        ErrorKind::ArityMismatch { name, expected, actual: 4 }
            if name == "f" && *expected == FnArity::range(1, 3)
    );
    assert_eq!(*err.span().fragment(), "f");
    assert_eq!(err.span().location_offset(), 4);
    assert!(recorder.take_steps().is_empty());

    let err = try_record("rnd(1)").unwrap_err();
    assert_matches!(err.kind(), ErrorKind::ArityMismatch { actual: 1, .. });
    let err = try_record("f()").unwrap_err();
    assert_matches!(err.kind(), ErrorKind::ArityMismatch { actual: 0, .. });
}
