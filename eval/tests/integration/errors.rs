//! Tests for error reporting.

use assert_matches::assert_matches;

use std::error::Error as StdError;

use shunt_eval::{Error, ErrorKind, Evaluator, Malformed};
use shunt_parser::{LexErrorKind, OpArity};

use crate::{try_record, Recorder};

fn assert_error(err: &Error<'_>, offset: usize, fragment: &str) {
    assert_eq!(err.span().location_offset(), offset, "{}", err);
    assert_eq!(*err.span().fragment(), fragment, "{}", err);
}

fn malformed(expr: &str) -> (Malformed, usize) {
    let err = try_record(expr).unwrap_err();
    match err.kind() {
        ErrorKind::MalformedExpression(malformed) => (*malformed, err.span().location_offset()),
        other => panic!("Unexpected error kind for `{}`: {:?}", expr, other),
    }
}

#[test]
fn empty_expressions() {
    for expr in ["", "   ", "\n\t"] {
        let err = try_record(expr).unwrap_err();
        assert_matches!(err.kind(), ErrorKind::MalformedExpression(Malformed::Empty));
        assert_eq!(err.span().location_offset(), expr.len());
    }
}

#[test]
fn missing_operands() {
    assert_eq!(malformed("1 +"), (Malformed::MissingOperand, 3));
    assert_eq!(malformed("1 + -"), (Malformed::MissingOperand, 5));
    assert_eq!(malformed("(1 *)"), (Malformed::MissingOperand, 4));
    assert_eq!(malformed("f(1 *)"), (Malformed::MissingOperand, 5));
    assert_eq!(malformed("f(1 -, 2)"), (Malformed::MissingOperand, 5));
}

#[test]
fn missing_args_and_empty_groups() {
    assert_eq!(malformed("()"), (Malformed::EmptyGroup, 1));
    assert_eq!(malformed("1 + [ ]"), (Malformed::EmptyGroup, 6));
    assert_eq!(malformed("f(,1)"), (Malformed::MissingArgument, 2));
    assert_eq!(malformed("f(1,,2)"), (Malformed::MissingArgument, 4));
    assert_eq!(malformed("f(1,)"), (Malformed::MissingArgument, 4));
}

#[test]
fn values_following_values() {
    assert_eq!(malformed("1 2"), (Malformed::ValueAfterValue, 2));
    assert_eq!(malformed("pi (1)"), (Malformed::ValueAfterValue, 3));
    assert_eq!(malformed("(1) 2"), (Malformed::ValueAfterValue, 4));
    assert_eq!(malformed("1 f(2)"), (Malformed::ValueAfterValue, 2));
    assert_eq!(malformed("'a' 'b'"), (Malformed::ValueAfterValue, 4));

    let err = try_record("1 2").unwrap_err();
    assert!(err.kind().help().is_some());
}

#[test]
fn unmatched_brackets() {
    let cases = [
        ("(1 + 2", 0, "("),
        ("1 + 2)", 5, ")"),
        ("(1]", 2, "]"),
        ("[1)", 2, ")"),
        ("f(1]", 3, "]"),
        ("f(1, (2)", 1, "("),
        ("(", 0, "("),
        (")", 0, ")"),
    ];

    for (expr, offset, symbol) in cases {
        let err = try_record(expr).unwrap_err();
        match err.kind() {
            ErrorKind::UnmatchedBracket { symbol: s } => assert_eq!(s, symbol, "{}", expr),
            other => panic!("Unexpected error kind for `{}`: {:?}", expr, other),
        }
        assert_error(&err, offset, symbol);
    }
}

#[test]
fn separators_outside_of_calls() {
    for (expr, offset) in [("1, 2", 1), ("(1, 2)", 2), ("f((1, 2))", 4), (",", 0)] {
        let err = try_record(expr).unwrap_err();
        assert_matches!(err.kind(), ErrorKind::UnexpectedSeparator);
        assert_error(&err, offset, ",");
    }
}

#[test]
fn unknown_elements() {
    let err = try_record("g(1)").unwrap_err();
    assert_matches!(err.kind(), ErrorKind::UnknownFunction { name } if name == "g");
    assert_error(&err, 0, "g");

    let err = try_record("1 ^ * 2").unwrap_err();
    assert_matches!(
        err.kind(),
        ErrorKind::UnknownOperator { symbol, arity: OpArity::Unary } if symbol == "*"
    );
    assert_error(&err, 4, "*");
    assert!(err.kind().help().unwrap().contains("unary"));

    let err = try_record("1 ! 2").unwrap_err();
    assert_matches!(
        err.kind(),
        ErrorKind::UnknownOperator { symbol, arity: OpArity::Binary } if symbol == "!"
    );
}

#[test]
fn lexical_errors() {
    let cases = [
        ("1 ? 2", 2, LexErrorKind::UnexpectedChar),
        ("1 + 'abc", 8, LexErrorKind::UnterminatedString),
        ("2x + 1", 0, LexErrorKind::InvalidNumber),
    ];
    for (expr, offset, kind) in cases {
        let err = try_record(expr).unwrap_err();
        assert_matches!(err.kind(), ErrorKind::Lexical(k) if *k == kind);
        assert_eq!(err.span().location_offset(), offset, "{}", expr);
    }
}

#[test]
fn host_errors_point_to_operator() {
    let recorder = Recorder::new();
    let err = recorder.evaluate("1 + 2 / 0").unwrap_err();
    assert_matches!(err.kind(), ErrorKind::Host(_));
    assert_error(&err, 6, "/");
    assert_eq!(err.to_string(), "1:7: Evaluation failed: division by zero");

    let source = err.source().unwrap();
    assert_eq!(source.to_string(), "Evaluation failed: division by zero");
    assert_eq!(source.source().unwrap().to_string(), "division by zero");
}

#[test]
fn error_locations_in_multiline_expressions() {
    let err = try_record("1 +\n  2 ^ * 3").unwrap_err();
    assert_eq!(err.span().location_line(), 2);
    assert_eq!(err.span().get_column(), 7);
    assert_eq!(err.to_string(), "2:7: Unknown unary operator `*`");

    let owned = err.strip();
    assert_eq!(owned.to_string(), "2:7: Unknown unary operator `*`");
    assert_eq!(owned.span().location_offset(), 10);
    assert_matches!(owned.kind(), ErrorKind::UnknownOperator { .. });
}

#[test]
fn owned_errors_outlive_expressions() {
    let owned = {
        let expr = String::from("max(1, ");
        try_record(&expr).unwrap_err().strip()
    };
    assert_matches!(owned.kind(), ErrorKind::UnmatchedBracket { symbol } if symbol == "(");
    assert_eq!(owned.span().location_offset(), 3);
}
