//! Tests for the evaluator over dynamically typed values.

use assert_matches::assert_matches;

use shunt_eval::{ErrorKind, Evaluator, ObjectEvaluator, Style, Value, VariableMap};

fn record() -> VariableMap<Value> {
    let mut vars = VariableMap::new();
    vars.insert("Error", Value::from("E001"))
        .insert("Temperature", Value::from(10))
        .insert("Pressure", Value::from(15))
        .insert("P1Cases", Value::from(2))
        .insert("Testdate", Value::from("10/8/2015"))
        .insert("result", Value::from("C2"))
        .insert("date", Value::Null);
    vars
}

fn eval(expr: &str) -> Value {
    ObjectEvaluator::new().evaluate_with(expr, &record()).unwrap()
}

#[test]
fn arithmetic_and_equality() {
    assert_eq!(eval("3+5==5+3"), Value::Bool(true));
    assert_eq!(eval("2^3-1"), Value::Number(7.0));
    assert_eq!(eval("(2^3-1)*2"), Value::Number(14.0));
    assert_eq!(eval("Temperature + Pressure * 2"), Value::Number(40.0));
    assert_eq!(eval("Error==\"E001\""), Value::Bool(true));
    assert_eq!(eval("Error != 'E002'"), Value::Bool(true));
}

#[test]
fn mixed_math_expression() {
    let value = eval("(2^3-1)*sin(pi/4)/ln(pi^2)");
    let pi = std::f64::consts::PI;
    let expected = 7.0 * (pi / 4.0).sin() / (pi * pi).ln();
    assert_matches!(value, Value::Number(x) if (x - expected).abs() < 1e-12);
}

#[test]
fn logical_rules() {
    assert_eq!(eval("Temperature<15 && Pressure > 10"), Value::Bool(true));
    assert_eq!(eval("Temperature<15 && Pressure < 10"), Value::Bool(false));
    assert_eq!(eval("Temperature>15 || Pressure >= 15"), Value::Bool(true));
    assert_eq!(eval("date==null || date==\"\""), Value::Bool(true));
}

#[test]
fn nested_conditionals() {
    let expr = "if(if(Error==\"E001\",Temperature<15 && Pressure < 10,Pressure >= 10), \
                \"LT15\",\"GTOREQ15\")";
    assert_eq!(eval(expr), Value::from("GTOREQ15"));

    let expr = "if(P1Cases>5,RED,if(P1Cases>3&&P1Cases<=5,YELLOW,GREEN))";
    assert_eq!(eval(expr), Value::from("GREEN"));

    let mut vars = record();
    vars.insert("P1Cases", Value::from(4));
    let value = ObjectEvaluator::new().evaluate_with(expr, &vars).unwrap();
    assert_eq!(value, Value::from("YELLOW"));
}

#[test]
fn emptiness_checks() {
    assert_eq!(eval("isempty(Testdate)"), Value::Bool(false));
    assert_eq!(eval("isempty(date)"), Value::Bool(true));
    assert_eq!(
        eval("if(isempty(Testdate), 0, if(result == \"\", 0, 100))"),
        Value::Number(100.0)
    );

    let mut vars = record();
    vars.insert("Testdate", Value::from(""));
    let value = ObjectEvaluator::new()
        .evaluate_with("if(isempty(Testdate), 0, 100)", &vars)
        .unwrap();
    assert_eq!(value, Value::Number(0.0));
}

#[test]
fn bare_words_are_text() {
    assert_eq!(eval("test==\"Test\" || test==test"), Value::Bool(true));
    assert_eq!(eval("result == C2"), Value::Bool(true));
    // Constants take priority over bare words.
    assert_eq!(eval("true"), Value::Bool(true));
    assert_eq!(eval("null"), Value::Null);
}

#[test]
fn strict_mode() {
    let evaluator = ObjectEvaluator::new().strict();
    let vars = record();
    assert_eq!(
        evaluator.evaluate_with("Pressure >= 15", &vars).unwrap(),
        Value::Bool(true)
    );

    let err = evaluator.evaluate_with("result == C2", &vars).unwrap_err();
    assert_matches!(err.kind(), ErrorKind::UnknownVariable { name } if name == "C2");
    assert_eq!(err.span().location_offset(), 10);
}

#[test]
fn type_mismatches() {
    let evaluator = ObjectEvaluator::new();
    let vars = record();
    for (expr, fragment) in [
        ("Error + 1", "+"),
        ("Temperature && true", "&&"),
        ("Error < 5", "<"),
        ("-Error", "-"),
        ("abs(Error)", "abs"),
        ("if(Temperature, 1, 2)", "if"),
    ] {
        let err = evaluator.evaluate_with(expr, &vars).unwrap_err();
        assert_matches!(err.kind(), ErrorKind::Host(_));
        assert_eq!(*err.span().fragment(), fragment, "{}", expr);
    }
}

#[test]
fn eager_logical_operators() {
    // Both operands of `||` are evaluated, so a type error in the right operand is reported
    // even if the left one is `true`.
    let err = ObjectEvaluator::new()
        .evaluate_with("true || Error", &record())
        .unwrap_err();
    assert_matches!(err.kind(), ErrorKind::Host(_));
}

#[test]
fn excel_negation() {
    let evaluator = ObjectEvaluator::with_style(Style::Excel);
    let value = evaluator
        .evaluate_with("-Temperature ^ 2", &record())
        .unwrap();
    assert_eq!(value, Value::Number(100.0));
    let value = ObjectEvaluator::new()
        .evaluate_with("-Temperature ^ 2", &record())
        .unwrap();
    assert_eq!(value, Value::Number(-100.0));
}
