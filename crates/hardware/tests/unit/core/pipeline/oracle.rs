//! Branch Oracle Tests.
//!
//! Drives the timing engine with a mocked oracle to check that outcomes are
//! requested once per dynamic branch, in program order, with the branch pc,
//! and that oracle failures propagate.

use mockall::Sequence;
use mockall::predicate::eq;
use pipetime_core::core::pipeline::{BranchOracle, BranchRecord, TimingEngine};
use pipetime_core::core::units::bru::BranchOutcome;
use pipetime_core::{Config, SimError};

use crate::common::harness::program;
use crate::common::mocks::oracle::MockOracle;

/// Two iterations of a one-branch loop at pc 4.
const LOOP: &str = "addi R1, $0, 1\nloop: bne R1, $0, loop\n";

#[test]
fn engine_asks_for_each_dynamic_branch_in_order() {
    let prog = program(LOOP);
    let mut oracle = MockOracle::new();
    let mut seq = Sequence::new();
    let _ = oracle
        .expect_next_outcome()
        .with(eq(4))
        .times(2)
        .in_sequence(&mut seq)
        .returning(|_| Ok(BranchOutcome::taken(4)));
    let _ = oracle
        .expect_next_outcome()
        .with(eq(4))
        .times(1)
        .in_sequence(&mut seq)
        .returning(|pc| Ok(BranchOutcome::not_taken(pc + 4)));

    let mut engine = TimingEngine::new(&Config::default()).unwrap().with_trace(true);
    let cycles = engine.run(&prog.instructions, &mut oracle).unwrap();

    assert!(cycles > 0);
    let pcs: Vec<u64> = engine.trace().iter().map(|t| t.pc).collect();
    assert_eq!(pcs, vec![0, 4, 4, 4]);
    assert_eq!(engine.stats().inst_branch, 3);
}

#[test]
fn oracle_error_propagates() {
    let prog = program(LOOP);
    let mut oracle = MockOracle::new();
    let _ = oracle
        .expect_next_outcome()
        .returning(|pc| Err(SimError::OracleExhausted { pc, consumed: 0 }));

    let mut engine = TimingEngine::new(&Config::default()).unwrap();
    assert!(matches!(
        engine.run(&prog.instructions, &mut oracle),
        Err(SimError::OracleExhausted { pc: 4, consumed: 0 })
    ));
}

#[test]
fn exhausted_record_reports_position() {
    let prog = program(LOOP);
    let mut record = BranchRecord::from(vec![BranchOutcome::taken(4)]);
    let mut engine = TimingEngine::new(&Config::default()).unwrap();
    assert!(matches!(
        engine.run(&prog.instructions, &mut record),
        Err(SimError::OracleExhausted { pc: 4, consumed: 1 })
    ));
}

#[test]
fn dyn_oracle_is_accepted() {
    let prog = program("bne R1, $0, 8\n");
    let mut record = BranchRecord::from(vec![BranchOutcome::not_taken(4)]);
    let oracle: &mut dyn BranchOracle = &mut record;
    let mut engine = TimingEngine::new(&Config::default()).unwrap();
    assert!(engine.run(&prog.instructions, oracle).is_ok());
    assert_eq!(record.remaining(), 0);
}
