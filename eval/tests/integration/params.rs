//! Tests for customized grammars.

use assert_matches::assert_matches;

use shunt_eval::{ErrorKind, Evaluator, VariableMap};
use shunt_parser::{Associativity, BracketPair, DefinitionError, Operator};

use crate::{recorder_params, Recorder};

#[test]
fn word_operators() {
    let mut params = recorder_params();
    params
        .add_operators([
            Operator::unary("not", 7, ()),
            Operator::binary("and", Associativity::Left, 2, ()),
            Operator::binary("or", Associativity::Left, 1, ()),
        ])
        .unwrap();
    let recorder = Recorder::with_params(params);

    let mut vars = VariableMap::new();
    vars.insert("android", "A".to_owned())
        .insert("orb", "O".to_owned())
        .insert("b", "B".to_owned());

    let value = recorder
        .evaluate_with("not android and b or orb", &vars)
        .unwrap();
    assert_eq!(value, "(((notA) and B) or O)");
    let value = recorder.evaluate_with("b and(android)", &vars).unwrap();
    assert_eq!(value, "(B and A)");
}

#[test]
fn custom_separator_and_brackets() {
    let mut params = recorder_params();
    params
        .set_function_argument_separator(";")
        .unwrap()
        .add_function_bracket(BracketPair::BRACES)
        .unwrap();
    let recorder = Recorder::with_params(params);

    assert_eq!(recorder.evaluate("max(1; 2)").unwrap(), "max(1, 2)");
    assert_eq!(recorder.evaluate("max{1; [2 + 3]}").unwrap(), "max(1, (2 + 3))");
    assert_eq!(recorder.evaluate("f{max(1); 2}").unwrap(), "f(max(1), 2)");

    let err = recorder.evaluate("max{1; 2)").unwrap_err();
    assert_matches!(err.kind(), ErrorKind::UnmatchedBracket { symbol } if symbol == ")");
    // Braces are not registered for grouping.
    let err = recorder.evaluate("{1}").unwrap_err();
    assert_matches!(err.kind(), ErrorKind::UnmatchedBracket { symbol } if symbol == "{");
    let err = recorder.evaluate("max(1, 2)").unwrap_err();
    assert_matches!(err.kind(), ErrorKind::Lexical(_));
}

#[test]
fn translated_names() {
    let mut params = recorder_params();
    params
        .set_translation("max", "maximum")
        .unwrap()
        .set_translation("pi", "число_пи")
        .unwrap();
    let recorder = Recorder::with_params(params);

    // The host receives elements under canonical names.
    let value = recorder.evaluate("maximum(1, число_пи)").unwrap();
    assert_eq!(value, "max(1, PI)");

    let err = recorder.evaluate("max(1)").unwrap_err();
    assert_matches!(err.kind(), ErrorKind::UnknownFunction { name } if name == "max");
    let err = recorder.evaluate("pi").unwrap_err();
    assert_matches!(err.kind(), ErrorKind::UnknownVariable { name } if name == "pi");
}

#[test]
fn conflicting_definitions() {
    let mut params = recorder_params();
    let err = params.add_operator(Operator::binary("+", Associativity::Right, 1, ()));
    assert_matches!(err, Err(DefinitionError::DuplicateOperator { .. }));

    let err = params.add_function_bracket(BracketPair::ANGLE_BRACKETS);
    assert_matches!(err, Err(DefinitionError::SymbolConflict { .. }));

    let err = params.set_translation("max", "f");
    assert_matches!(err, Err(DefinitionError::DuplicateFunction { .. }));
    let err = params.set_translation("sqrt", "racine");
    assert_matches!(err, Err(DefinitionError::UnknownName { .. }));

    // Failed definitions leave the registry intact.
    let recorder = Recorder::with_params(params);
    assert_eq!(recorder.evaluate("max(1 + 2)").unwrap(), "max((1 + 2))");
}
