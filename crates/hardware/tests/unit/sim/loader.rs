//! Program Loader Tests.
//!
//! Covers comments, memory lines, labels, branch label resolution and the
//! malformed-input error paths, including loading from disk.

use std::io::Write;

use pipetime_core::{Program, SimError};
use rstest::rstest;
use tempfile::NamedTempFile;

#[test]
fn loads_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "% header\n100, 4\n\nstart:\nfld F0, 100(R0)\nbne F0, $0, start").unwrap();
    let p = Program::from_file(file.path()).unwrap();
    assert_eq!(p.len(), 2);
    assert_eq!(p.memory.get(&100), Some(&4.0));
    assert_eq!(p.instructions[1].branch_target(), Some(0));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        Program::from_file(dir.path().join("absent.s")),
        Err(SimError::Io(_))
    ));
}

#[test]
fn labels_bind_to_next_instruction() {
    let p: Program = "a:\nb:\nadd R1, R2, R3\nc:\naddi R1, R1, 1\nend:\n"
        .parse()
        .unwrap();
    assert_eq!(p.labels.get("a"), Some(&0));
    assert_eq!(p.labels.get("b"), Some(&0));
    assert_eq!(p.labels.get("c"), Some(&4));
    // A trailing label points one past the last instruction.
    assert_eq!(p.labels.get("end"), Some(&8));
}

#[test]
fn forward_label() {
    let p = Program::parse("bne R1, $0, skip\naddi R1, R1, 1\nskip:\nadd R2, R1, R1\n").unwrap();
    assert_eq!(p.instructions[0].branch_target(), Some(8));
}

#[test]
fn pcs_are_four_times_index() {
    let p = Program::parse("% c\nadd R1, R2, R3\n\n  add R1, R2, R3\n0, 1\nadd R1, R2, R3\n").unwrap();
    let pcs: Vec<u64> = p.instructions.iter().map(|i| i.pc).collect();
    assert_eq!(pcs, vec![0, 4, 8]);
}

#[test]
fn empty_source_is_empty_program() {
    let p = Program::parse("% nothing here\n\n").unwrap();
    assert!(p.is_empty());
}

#[rstest]
#[case("nop", 1)]
#[case("add R1 R2 R3", 1)]
#[case("add R1, R2, R3\n42", 2)]
#[case("add R1, R2, R3\n3, x", 2)]
fn malformed_lines(#[case] src: &str, #[case] line: usize) {
    assert!(matches!(
        Program::parse(src),
        Err(SimError::MalformedLine { line: l, .. }) if l == line
    ));
}

#[test]
fn undefined_label() {
    assert!(matches!(
        Program::parse("add R1, R2, R3\nadd R1, R2, R3\nbne R1, R2, missing"),
        Err(SimError::UnresolvedLabel { label, pc: 8 }) if label == "missing"
    ));
}
