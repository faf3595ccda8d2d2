//! Statistics Tests.
//!
//! Counters gathered by a real run, derived metrics, and section rendering.

use pipetime_core::Config;
use pipetime_core::stats::{STATS_SECTIONS, SimStats};

use crate::common::harness::{COUNTDOWN, run_traced};

#[test]
fn instruction_mix_matches_trace() {
    let report = run_traced(Config::default(), COUNTDOWN);
    let s = &report.stats;
    assert_eq!(s.instructions_retired, report.timings.len() as u64);
    assert_eq!(s.inst_alu, 3);
    assert_eq!(s.inst_branch, 2);
    assert_eq!(s.branch_predictions + s.branch_mispredictions, 2);
    assert_eq!(s.cycles, report.cycles);
}

#[test]
fn derived_metrics() {
    let s = SimStats {
        cycles: 40,
        instructions_retired: 10,
        branch_predictions: 3,
        branch_mispredictions: 1,
        ..SimStats::default()
    };
    assert_eq!(s.cpi(), 4.0);
    assert_eq!(s.ipc(), 0.25);
    assert_eq!(s.branch_accuracy(), 75.0);
}

#[test]
fn every_section_renders_by_default() {
    let report = run_traced(Config::default(), COUNTDOWN);
    let text = report.stats.render_sections(&[], &report.stations);
    for header in [
        "sim_cycles",
        "INSTRUCTION MIX",
        "BRANCH PREDICTION",
        "STALLS",
        "RESOURCE STATIONS",
    ] {
        assert!(text.contains(header), "missing {header}");
    }
    assert!(text.contains("FPmult"));
    assert_eq!(STATS_SECTIONS.len(), 5);
}

#[test]
fn selected_sections_only() {
    let s = SimStats::default();
    let text = s.render_sections(&["stalls".to_owned(), "summary".to_owned()], &[]);
    assert!(text.contains("STALLS"));
    assert!(text.contains("sim_cpi"));
    assert!(!text.contains("BRANCH PREDICTION"));
    assert!(!text.contains("RESOURCE STATIONS"));
}
