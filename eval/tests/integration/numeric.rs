//! Tests for the floating-point evaluator.

use assert_matches::assert_matches;

use shunt_eval::{
    default_parameters, ErrorKind, Evaluator, F32Evaluator, F64Evaluator, NumEvaluator, Style,
    VariableMap,
};

fn eval(expr: &str) -> f64 {
    F64Evaluator::new().evaluate(expr).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "actual = {}, expected = {}",
        actual,
        expected
    );
}

#[test]
fn basic_expressions() {
    assert_eq!(eval("2^3-1"), 7.0);
    assert_eq!(eval("(2^3-1)*2"), 14.0);
    assert_eq!(eval("max(1,5,3)"), 5.0);
    assert_eq!(eval("1 + 2 * 3 - 4 / 2"), 5.0);
    assert_eq!(eval("2 ^ 3 ^ 2"), 512.0);
    assert_eq!(eval("-(-2) ^ 2"), -4.0);
    assert_eq!(eval("17 % 5 % 3"), 2.0);
    assert_eq!(eval(".5 + 1e1 + 2.5E-1"), 10.75);
}

#[test]
fn math_functions() {
    assert_close(eval("sin(pi / 2) + cos(0)"), 2.0);
    assert_close(eval("tan(atan(0.5))"), 0.5);
    assert_close(eval("asin(1) * 2"), std::f64::consts::PI);
    assert_close(eval("acos(1)"), 0.0);
    assert_close(eval("cosh(0) + sinh(0) + tanh(0)"), 1.0);
    assert_close(eval("ln(e ^ 3)"), 3.0);
    assert_close(eval("log(1000)"), 3.0);
    assert_eq!(eval("abs(-3) + ceil(1.2) + floor(-1.2)"), 3.0);
    assert_eq!(eval("round(2.5) + round(-2.5) + round(1.4)"), 2.0);
    assert_eq!(eval("min(4, -1, 2) + sum(1, 2, 3) + avg(2, 4)"), 8.0);
    assert_eq!(eval("max(min(1, 2), sum(0.5, 0.5), -3)"), 1.0);
}

#[cfg(feature = "random")]
#[test]
fn rounding_is_exact_for_large_and_near_half_values() {
    assert_eq!(eval("round(4503599627370497)"), 4_503_599_627_370_497.0);
    assert_eq!(eval("round(0.49999999999999994)"), 0.0);
    assert_eq!(eval("round(-0.5)"), 0.0);
    assert_eq!(eval("round(2.5) + round(-2.5)"), 1.0);
}

#[test]
fn random_function() {
    let evaluator = F64Evaluator::new();
    for _ in 0..20 {
        let value = evaluator.evaluate("floor(random() * 10)").unwrap();
        assert!((0.0..10.0).contains(&value));
    }
    let err = evaluator.evaluate("random(1)").unwrap_err();
    assert_matches!(err.kind(), ErrorKind::ArityMismatch { actual: 1, .. });
}

#[test]
fn variables() {
    let vars: VariableMap<f64> = [("a", 10.0), ("b", 15.0), ("speed_2", 3.0)]
        .into_iter()
        .collect();
    let evaluator = F64Evaluator::new();
    assert_eq!(evaluator.evaluate_with("a * b - speed_2", &vars).unwrap(), 147.0);
    assert_eq!(evaluator.evaluate_with("max(a, b) / 5", &vars).unwrap(), 3.0);

    let err = evaluator.evaluate_with("a + c", &vars).unwrap_err();
    assert_matches!(err.kind(), ErrorKind::UnknownVariable { name } if name == "c");
}

#[test]
fn constants_shadow_variables() {
    let vars: VariableMap<f64> = [("pi", 3.0)].into_iter().collect();
    let value = F64Evaluator::new().evaluate_with("pi", &vars).unwrap();
    assert_eq!(value, std::f64::consts::PI);
}

#[test]
fn excel_style() {
    let evaluator = F64Evaluator::with_style(Style::Excel);
    assert_eq!(evaluator.evaluate("-2 ^ 2").unwrap(), 4.0);
    assert_eq!(evaluator.evaluate("0 - 2 ^ 2").unwrap(), -4.0);
    assert_eq!(evaluator.evaluate("2 ^ -2 ^ 2").unwrap(), 16.0);
}

#[test]
fn single_precision() {
    let evaluator = F32Evaluator::new();
    assert_eq!(evaluator.evaluate("1.5 * 4").unwrap(), 6.0_f32);
    assert_eq!(
        evaluator.evaluate("sqrt(4)").unwrap_err().kind().to_string(),
        "Unknown function `sqrt`"
    );
}

#[test]
fn invalid_math_arguments() {
    let evaluator = F64Evaluator::new();
    for expr in ["ln(-1)", "asin(2)", "acos(-1.5)", "log(-10)", "1 + ln(0 - 1)"] {
        let err = evaluator.evaluate(expr).unwrap_err();
        assert_matches!(err.kind(), ErrorKind::Host(_));
        assert!(err.to_string().contains("Invalid argument passed to"), "{}", err);
    }
    // Division by zero and infinite results are fine.
    assert_eq!(evaluator.evaluate("-1 / 0").unwrap(), f64::NEG_INFINITY);
    assert_eq!(evaluator.evaluate("round(1 / 0)").unwrap(), f64::INFINITY);
}

#[test]
fn localized_grammar() {
    let mut params = default_parameters(Style::Standard);
    params
        .set_function_argument_separator(";")
        .unwrap()
        .set_translation("sum", "somme")
        .unwrap()
        .set_translation("pi", "π")
        .unwrap();
    let evaluator = NumEvaluator::<f64>::with_parameters(params);

    assert_eq!(evaluator.evaluate("somme(1; 2; 3)").unwrap(), 6.0);
    assert_eq!(evaluator.evaluate("round(π)").unwrap(), 3.0);

    let err = evaluator.evaluate("somme(1, 2)").unwrap_err();
    assert_matches!(err.kind(), ErrorKind::Lexical(_));
    let err = evaluator.evaluate("sum(1)").unwrap_err();
    assert_matches!(err.kind(), ErrorKind::UnknownFunction { name } if name == "sum");
}
