//! Resource Station Tests.
//!
//! Verifies earliest-free slot selection, completion arithmetic, the
//! side-effect-free lookahead, and retroactive booking.

use pipetime_core::SimError;
use pipetime_core::config::UnitConfig;
use pipetime_core::core::units::ResourceStation;
use proptest::prelude::*;

fn station(latency: u64, slots: usize) -> ResourceStation {
    ResourceStation::new("T", latency, slots).unwrap()
}

// ══════════════════════════════════════════════════════════
// 1. Construction
// ══════════════════════════════════════════════════════════

#[test]
fn zero_slots_rejected() {
    assert!(matches!(
        ResourceStation::new("FPdiv", 8, 0),
        Err(SimError::EmptyStation("FPdiv"))
    ));
}

#[test]
fn from_config_copies_parameters() {
    let s = ResourceStation::from_config("LD", UnitConfig { latency: 2, slots: 3 }).unwrap();
    assert_eq!(s.name(), "LD");
    assert_eq!(s.latency(), 2);
    assert_eq!(s.slots(), 3);
    assert_eq!(s.next_free(), &[0, 0, 0]);
}

// ══════════════════════════════════════════════════════════
// 2. Allocation
// ══════════════════════════════════════════════════════════

#[test]
fn two_slots_fill_then_queue() {
    let mut s = station(3, 2);
    assert_eq!(s.allocate(0).unwrap(), 3);
    assert_eq!(s.allocate(0).unwrap(), 3);
    // Both slots busy until 3; slot 0 wins the tie.
    assert_eq!(s.allocate(1).unwrap(), 6);
    assert_eq!(s.next_free(), &[6, 3]);
    assert_eq!(s.allocate(10).unwrap(), 13);
    assert_eq!(s.next_free(), &[6, 13]);
}

#[test]
fn counters_are_diagnostic() {
    let mut s = station(3, 1);
    let _ = s.allocate(0).unwrap();
    let _ = s.allocate(1).unwrap();
    let stats = s.stats();
    assert_eq!(stats.requests, 2);
    assert_eq!(stats.wait_cycles, 2);
    assert_eq!(stats.slots, 1);
}

// ══════════════════════════════════════════════════════════
// 3. Lookahead and retroactive booking
// ══════════════════════════════════════════════════════════

#[test]
fn wait_cycles_is_pure() {
    let mut s = station(5, 1);
    let _ = s.allocate(0).unwrap();
    assert_eq!(s.wait_cycles(2), 3);
    assert_eq!(s.wait_cycles(2), 3);
    assert_eq!(s.wait_cycles(9), 0);
    assert_eq!(s.next_free(), &[5]);
    assert_eq!(s.stats().requests, 1);
}

#[test]
fn allocate_timed_uses_caller_latency() {
    let mut s = station(0, 2);
    s.allocate_timed(4, 6).unwrap();
    assert_eq!(s.next_free(), &[10, 0]);
    s.allocate_timed(4, 1).unwrap();
    assert_eq!(s.next_free(), &[10, 5]);
    // Earliest slot is free at 5, later than the requested cycle.
    s.allocate_timed(2, 1).unwrap();
    assert_eq!(s.next_free(), &[10, 6]);
    assert_eq!(s.wait_cycles(0), 6);
}

// ══════════════════════════════════════════════════════════
// 4. Properties
// ══════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn completion_never_precedes_request_plus_latency(
        latency in 0u64..10,
        slots in 1usize..5,
        requests in prop::collection::vec(0u64..100, 1..40),
    ) {
        let mut s = station(latency, slots);
        for req in requests {
            let wait = s.wait_cycles(req);
            let done = s.allocate(req).unwrap();
            prop_assert_eq!(done, req + wait + latency);
        }
    }

    #[test]
    fn enough_slots_means_no_waiting(
        latency in 1u64..10,
        requests in prop::collection::vec(0u64..100, 1..16),
    ) {
        let mut s = station(latency, requests.len());
        for &req in &requests {
            prop_assert_eq!(s.allocate(req).unwrap(), req + latency);
        }
        prop_assert_eq!(s.stats().wait_cycles, 0);
    }

    #[test]
    fn next_free_values_never_decrease(
        ops in prop::collection::vec((0u64..50, 0u64..5, any::<bool>()), 1..40),
    ) {
        let mut s = station(2, 3);
        let mut before = s.next_free().to_vec();
        for (cycle, lat, timed) in ops {
            if timed {
                s.allocate_timed(cycle, lat).unwrap();
            } else {
                let _ = s.allocate(cycle).unwrap();
            }
            let after = s.next_free().to_vec();
            for (b, a) in before.iter().zip(&after) {
                prop_assert!(a >= b);
            }
            before = after;
        }
    }
}
