//! Scoreboard Tests.
//!
//! Verifies RAW stall computation and the monotonic ready-cycle rule.

use pipetime_core::common::Reg;
use pipetime_core::core::pipeline::Scoreboard;
use proptest::prelude::*;

#[test]
fn reader_stalls_until_writer_completes() {
    let mut sb = Scoreboard::new();
    let f2 = Reg::from("F2");
    sb.record_write(&f2, 12).unwrap();
    assert_eq!(sb.wait_cycles(&f2, 8), 4);
    assert_eq!(sb.wait_cycles(&Reg::from("F3"), 8), 0);
}

#[test]
fn registers_are_tracked_independently() {
    let mut sb = Scoreboard::new();
    sb.record_write(&Reg::from("R1"), 3).unwrap();
    sb.record_write(&Reg::from("R2"), 7).unwrap();
    assert_eq!(sb.len(), 2);
    assert_eq!(sb.ready_cycle(&Reg::from("R1")), Some(3));
    assert_eq!(sb.ready_cycle(&Reg::from("R2")), Some(7));
}

proptest! {
    #[test]
    fn ready_cycle_is_max_of_writes(writes in prop::collection::vec(0u64..1000, 1..30)) {
        let mut sb = Scoreboard::new();
        let r = Reg::from("F0");
        for &w in &writes {
            sb.record_write(&r, w).unwrap();
        }
        let max = writes.iter().copied().max();
        prop_assert_eq!(sb.ready_cycle(&r), max);
    }

    #[test]
    fn wait_plus_query_reaches_ready(ready in 0u64..500, at in 0u64..500) {
        let mut sb = Scoreboard::new();
        let r = Reg::from("R9");
        sb.record_write(&r, ready).unwrap();
        prop_assert_eq!(at + sb.wait_cycles(&r, at), ready.max(at));
    }
}
