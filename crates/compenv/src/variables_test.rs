// Copyright (c) Contributors to the compenv project.
// SPDX-License-Identifier: Apache-2.0

use rstest::rstest;

use super::*;

#[rstest]
#[case("$SHARED_DIR/out", "/env/shared/out")]
#[case("${SHARED_DIR}/out", "/env/shared/out")]
#[case("--name=${NAME}", "--name=demo")]
#[case("plain", "plain")]
fn test_expands_known_variables(#[case] raw: &str, #[case] expected: &str) {
    let processor = VariableProcessor::isolated()
        .with(SHARED_DIR_VAR, "/env/shared")
        .with("NAME", "demo");

    assert_eq!(processor.process(raw), expected);
}

#[rstest]
fn test_unknown_variables_are_left_alone() {
    let processor = VariableProcessor::isolated();

    assert_eq!(processor.process("${MISSING}/x"), "${MISSING}/x");
}

#[rstest]
fn test_expansion_is_not_recursive() {
    let processor = VariableProcessor::isolated()
        .with("OUTER", "$INNER")
        .with("INNER", "deep");

    assert_eq!(processor.process("$OUTER"), "$INNER");
}

#[rstest]
fn test_own_variables_shadow_process_env() {
    let processor = VariableProcessor::new().with("PATH", "/custom");

    assert_eq!(processor.process("$PATH"), "/custom");
}

#[rstest]
fn test_identity() {
    assert_eq!(identity("${X}"), "${X}");
}

#[rstest]
#[case("KEY=value", "KEY", "value")]
#[case("KEY=a=b", "KEY", "a=b")]
#[case("KEY=", "KEY", "")]
fn test_parse_assignment(#[case] raw: &str, #[case] key: &str, #[case] value: &str) {
    let (k, v) = parse_assignment(raw).unwrap();
    assert_eq!(k, key);
    assert_eq!(v, value);
}

#[rstest]
#[case("novalue")]
#[case("=value")]
fn test_parse_assignment_rejects(#[case] raw: &str) {
    assert!(parse_assignment(raw).is_err());
}
