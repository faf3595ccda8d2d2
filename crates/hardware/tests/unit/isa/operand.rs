//! Operand Classification Tests.

use pipetime_core::SimError;
use pipetime_core::common::Reg;
use pipetime_core::isa::{Operand, OperandKind};
use rstest::rstest;

#[rstest]
#[case("R1", OperandKind::Register)]
#[case("$0", OperandKind::Register)]
#[case("F12", OperandKind::Register)]
#[case("12", OperandKind::Immediate)]
#[case("-8", OperandKind::Immediate)]
#[case("200(R0)", OperandKind::Memory)]
#[case("-16(R3)", OperandKind::Memory)]
#[case("loop", OperandKind::Register)]
fn classify(#[case] token: &str, #[case] kind: OperandKind) {
    assert_eq!(Operand::parse(token).unwrap().kind(), kind);
}

#[test]
fn memory_parts() {
    assert_eq!(
        Operand::parse(" 200(R0) ").unwrap(),
        Operand::Memory {
            offset: 200,
            base: Reg::from("R0")
        }
    );
}

#[rstest]
#[case("1.5")]
#[case("-0.25")]
fn non_integer_immediates_rejected(#[case] token: &str) {
    assert!(matches!(
        Operand::parse(token),
        Err(SimError::InvalidImmediate(t)) if t == token
    ));
}

#[test]
fn register_sets_of_memory_operand() {
    let op = Operand::parse("8(R2)").unwrap();
    assert_eq!(op.source_reg(), Some(&Reg::from("R2")));
    assert_eq!(op.dest_reg(), None);
    assert_eq!(op.to_string(), "8(R2)");
}
