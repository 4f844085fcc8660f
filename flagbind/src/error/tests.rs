//! Unit tests for error rendering and classification.

use super::{BindError, BindResult, ConversionError, ParseError, ParseResult, TagError};
use crate::convert::ValueKind;
use rstest::rstest;

fn conversion() -> ConversionError {
    ConversionError::new(ValueKind::Int32, "abc", "invalid digit")
}

#[rstest]
fn conversion_error_names_target_type() {
    let err = conversion();
    assert_eq!(err.target, "int");
    assert_eq!(err.to_string(), "cannot parse \"abc\" as int: invalid digit");
}

#[rstest]
#[case::help(ParseError::Help, 0)]
#[case::undefined(ParseError::Undefined { name: "x".into() }, 2)]
#[case::syntax(ParseError::BadSyntax { arg: "---x".into() }, 2)]
#[case::missing(ParseError::MissingArgument { name: "n".into() }, 2)]
fn exit_codes_follow_help_convention(#[case] err: ParseError, #[case] expected: i32) {
    assert_eq!(err.exit_code(), expected);
}

#[rstest]
#[case::undefined(
    ParseError::Undefined { name: "nope".into() },
    "flag provided but not defined: -nope"
)]
#[case::missing(
    ParseError::MissingArgument { name: "count".into() },
    "flag needs an argument: -count"
)]
#[case::invalid(
    ParseError::InvalidValue { name: "count".into(), value: "abc".into(), source: conversion() },
    "invalid value \"abc\" for flag -count: cannot parse \"abc\" as int: invalid digit"
)]
#[case::syntax(ParseError::BadSyntax { arg: "-=x".into() }, "bad flag syntax: -=x")]
fn parse_errors_render_for_users(#[case] err: ParseError, #[case] expected: &str) {
    assert_eq!(err.to_string(), expected);
}

#[rstest]
fn root_cause_unwraps_nested_field_errors() {
    let inner = BindError::DuplicateName {
        set: "demo".into(),
        name: "ip".into(),
    };
    let wrapped = BindError::Field {
        record: "MyFlags",
        field: "ips",
        source: Box::new(inner),
    };
    assert_eq!(
        wrapped.to_string(),
        "couldn't set up field \"ips\" for MyFlags: demo: flag redefined: ip"
    );
    assert!(matches!(
        wrapped.root_cause(),
        BindError::DuplicateName { name, .. } if name == "ip"
    ));
}

#[rstest]
fn malformed_tag_exposes_its_source() {
    let err = BindError::MalformedTag {
        tag: "ip,usage='x".into(),
        source: TagError::UnterminatedString { position: 9 },
    };
    let source = std::error::Error::source(&err).map(ToString::to_string);
    assert_eq!(
        source.as_deref(),
        Some("unterminated quoted string starting at byte 9")
    );
}

#[rstest]
fn result_aliases_default_to_unit() {
    let bound: BindResult = Ok(());
    let parsed: ParseResult<usize> = Err(ParseError::Help);
    assert_eq!(bound, Ok(()));
    assert_eq!(parsed.map_err(|err| err.exit_code()), Err(0));
}
