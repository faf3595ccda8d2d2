//! Instruction Decoding Tests.
//!
//! Source/destination register sets follow the opcode flow tables; the
//! rename operand count is their sum.

use pipetime_core::common::{Reg, Stage};
use pipetime_core::isa::{Instruction, Opcode, StageTimes};
use pipetime_core::SimError;
use rstest::rstest;

fn regs(names: &[&str]) -> Vec<Reg> {
    names.iter().map(|n| Reg::from(*n)).collect()
}

#[rstest]
#[case("add R1, R2, R3", &["R2", "R3"], &["R1"])]
#[case("addi R1, R1, -1", &["R1"], &["R1"])]
#[case("slt R4, R5, R6", &["R5", "R6"], &["R4"])]
#[case("fld F2, 200(R0)", &["R0"], &["F2"])]
#[case("fsd F2, 8(R1)", &["F2"], &[])]
#[case("fdiv F1, F2, F3", &["F2", "F3"], &["F1"])]
#[case("bne R1, $0, 4", &["R1", "$0"], &[])]
fn register_sets(#[case] text: &str, #[case] src: &[&str], #[case] dest: &[&str]) {
    let i = Instruction::parse(0, text).unwrap();
    assert_eq!(i.src_regs(), regs(src).as_slice());
    assert_eq!(i.dest_regs(), regs(dest).as_slice());
    assert_eq!(i.renamed_operands(), src.len() + dest.len());
}

#[rstest]
#[case("fld F2, R0")]
#[case("fsd 8(R1), F2")]
#[case("bne R1, R2, R3")]
#[case("add R1, R2, R3, R4")]
#[case("fadd F1, F2, 3")]
fn signature_mismatches(#[case] text: &str) {
    assert!(matches!(
        Instruction::parse(0, text),
        Err(SimError::OperandMismatch { .. })
    ));
}

#[test]
fn new_from_operands() {
    let i = Instruction::parse(40, "bne R1,R2,8").unwrap();
    let rebuilt = Instruction::new(40, Opcode::Bne, i.operands.clone()).unwrap();
    assert_eq!(rebuilt, i);
    assert_eq!(rebuilt.fall_through(), 44);
    assert_eq!(rebuilt.branch_target(), Some(8));
    assert_eq!(rebuilt.to_string(), "bne R1, R2, 8");
}

#[test]
fn non_branch_has_no_target() {
    let i = Instruction::parse(0, "addi R1, R1, 8").unwrap();
    assert_eq!(i.branch_target(), None);
}

#[test]
fn stage_times_reject_out_of_order() {
    let mut t = StageTimes::default();
    t.record(12, Stage::Fetch, 5).unwrap();
    assert!(matches!(
        t.record(12, Stage::Decode, 4),
        Err(SimError::StageOrder {
            pc: 12,
            stage: Stage::Decode,
            cycle: 4,
            previous: 5
        })
    ));
    t.record(12, Stage::Decode, 6).unwrap();
    assert_eq!(t.latest(), Some(6));
}
