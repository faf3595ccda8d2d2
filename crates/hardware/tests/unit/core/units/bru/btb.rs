//! Branch Target Buffer (BTB) Tests.
//!
//! Verifies direct-mapped indexing, 2-bit counter training, taken-only
//! allocation, and aliasing replacement.

use pipetime_core::SimError;
use pipetime_core::core::units::bru::{BranchOutcome, BranchPredictor, Btb, Prediction};
use proptest::prelude::*;
use rstest::rstest;

const PC: u64 = 0x20;
const TARGET: u64 = 0x4;

/// Trains `pc` with a sequence of directions ('T' / 'N').
fn train(btb: &mut Btb, pc: u64, pattern: &str) {
    for c in pattern.chars() {
        btb.train(pc, c == 'T', if c == 'T' { TARGET } else { pc + 4 })
            .unwrap();
    }
}

// ══════════════════════════════════════════════════════════
// 1. Construction and indexing
// ══════════════════════════════════════════════════════════

#[test]
fn zero_entries_rejected() {
    assert!(matches!(Btb::new(0), Err(SimError::InvalidConfig(_))));
}

#[rstest]
#[case(0x00, 8, 0)]
#[case(0x0c, 8, 0)]
#[case(0x10, 8, 1)]
#[case(0x7c, 8, 7)]
#[case(0x80, 8, 0)]
#[case(0x1234, 1, 0)]
fn index_drops_four_bits(#[case] pc: u64, #[case] entries: usize, #[case] index: usize) {
    assert_eq!(Btb::new(entries).unwrap().index(pc), index);
}

// ══════════════════════════════════════════════════════════
// 2. Counter trajectories
// ══════════════════════════════════════════════════════════

#[rstest]
#[case("", None)]
#[case("N", None)]
#[case("NN", None)]
#[case("T", Some(2))]
#[case("TT", Some(3))]
#[case("TTTT", Some(3))]
#[case("TN", Some(1))]
#[case("TNNN", Some(0))]
#[case("NT", Some(2))]
#[case("TNNT", Some(1))]
#[case("TTNN", Some(1))]
fn counter_after_pattern(#[case] pattern: &str, #[case] counter: Option<u8>) {
    let mut btb = Btb::new(4).unwrap();
    train(&mut btb, PC, pattern);
    assert_eq!(btb.lookup(PC).map(|e| e.counter), counter);
    assert_eq!(btb.predict_taken(PC), counter.is_some_and(|c| c >= 2));
}

#[test]
fn taken_refreshes_target() {
    let mut btb = Btb::new(4).unwrap();
    btb.train(PC, true, 0x100).unwrap();
    btb.train(PC, true, 0x200).unwrap();
    assert_eq!(btb.predicted_target(PC), Some(0x200));
}

// ══════════════════════════════════════════════════════════
// 3. Aliasing
// ══════════════════════════════════════════════════════════

#[test]
fn taken_alias_replaces_entry() {
    let mut btb = Btb::new(2).unwrap();
    let a = 0x00;
    let b = 0x20; // (0x20 >> 4) % 2 == 0
    train(&mut btb, a, "TT");
    btb.train(b, true, 0x80).unwrap();
    assert!(btb.lookup(a).is_none());
    assert_eq!(btb.lookup(b).map(|e| (e.counter, e.target)), Some((2, 0x80)));
}

#[test]
fn not_taken_alias_leaves_entry() {
    let mut btb = Btb::new(2).unwrap();
    train(&mut btb, 0x00, "TT");
    btb.train(0x20, false, 0x24).unwrap();
    assert_eq!(btb.lookup(0x00).map(|e| e.counter), Some(3));
    assert!(btb.lookup(0x20).is_none());
}

#[test]
fn predictor_trait_round() {
    let mut btb = Btb::new(16).unwrap();
    assert_eq!(btb.predict_branch(PC), Prediction::default());
    btb.update_branch(PC, &BranchOutcome::taken(TARGET)).unwrap();
    let p = btb.predict_branch(PC);
    assert_eq!(
        p,
        Prediction {
            taken: true,
            target: Some(TARGET)
        }
    );
    assert!(!p.mispredicts(&BranchOutcome::taken(TARGET)));
    assert!(p.mispredicts(&BranchOutcome::taken(TARGET + 8)));
    assert!(p.mispredicts(&BranchOutcome::not_taken(PC + 4)));
}

// ══════════════════════════════════════════════════════════
// 4. Properties
// ══════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn counters_stay_in_range(
        entries in 1usize..8,
        history in prop::collection::vec((0u64..64, any::<bool>()), 0..200),
    ) {
        let mut btb = Btb::new(entries).unwrap();
        for (slot, taken) in history {
            let pc = slot * 4;
            btb.train(pc, taken, 0x400).unwrap();
            prop_assert!(btb.entries().iter().all(|e| e.counter <= 3));
        }
    }

    #[test]
    fn taken_prediction_requires_owned_entry(
        history in prop::collection::vec((0u64..32, any::<bool>()), 0..100),
        query in 0u64..32,
    ) {
        let mut btb = Btb::new(4).unwrap();
        for (slot, taken) in history {
            btb.train(slot * 4, taken, 0x400).unwrap();
        }
        let pc = query * 4;
        if btb.predict_taken(pc) {
            let entry = btb.lookup(pc);
            prop_assert!(entry.is_some_and(|e| e.valid && e.tag == pc && e.counter >= 2));
        }
    }
}
