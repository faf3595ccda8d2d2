//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics of a timing run. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, fetch groups, and derived CPI/IPC.
//! 2. **Instruction mix:** Counts by functional-unit class.
//! 3. **Branch prediction:** Lookups, mispredictions, and accuracy.
//! 4. **Stalls:** Rename, data dependency, and misprediction (control) stall cycles.
//! 5. **Units:** Per-station request and wait-cycle totals.

use std::fmt::{self, Write as _};

use serde::Serialize;

use crate::core::units::StationStats;
use crate::isa::OpClass;

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct SimStats {
    /// Total elapsed cycles (maximum retire cycle).
    pub cycles: u64,
    /// Number of instructions retired.
    pub instructions_retired: u64,
    /// Number of fetch groups issued.
    pub fetch_groups: u64,

    /// Count of integer ALU instructions retired.
    pub inst_alu: u64,
    /// Count of load instructions retired.
    pub inst_load: u64,
    /// Count of store instructions retired.
    pub inst_store: u64,
    /// Count of FP add/subtract instructions retired.
    pub inst_fp_add: u64,
    /// Count of FP multiply instructions retired.
    pub inst_fp_mul: u64,
    /// Count of FP divide instructions retired.
    pub inst_fp_div: u64,
    /// Count of branch instructions retired.
    pub inst_branch: u64,

    /// Number of branch predictions that were correct.
    pub branch_predictions: u64,
    /// Number of branch predictions that were wrong (mispredictions).
    pub branch_mispredictions: u64,

    /// Cycles decode waited on rename slots.
    pub stalls_rename: u64,
    /// Cycles decode waited on source registers (RAW dependencies).
    pub stalls_data: u64,
    /// Front-end cycles lost to mispredicted branches.
    pub stalls_control: u64,
}

/// Section names for selective stats output.
///
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "instruction_mix", "branch", "stalls", "units"];

impl SimStats {
    /// Counts one retired instruction of `class`.
    pub fn record_retire(&mut self, class: OpClass) {
        self.instructions_retired += 1;
        match class {
            OpClass::IntAlu => self.inst_alu += 1,
            OpClass::Load => self.inst_load += 1,
            OpClass::Store => self.inst_store += 1,
            OpClass::FpAdd => self.inst_fp_add += 1,
            OpClass::FpMul => self.inst_fp_mul += 1,
            OpClass::FpDiv => self.inst_fp_div += 1,
            OpClass::Branch => self.inst_branch += 1,
        }
    }

    /// Counts one resolved branch.
    pub fn record_branch(&mut self, mispredicted: bool) {
        if mispredicted {
            self.branch_mispredictions += 1;
        } else {
            self.branch_predictions += 1;
        }
    }

    /// Cycles per instruction; zero when nothing retired.
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            return 0.0;
        }
        self.cycles as f64 / self.instructions_retired as f64
    }

    /// Instructions per cycle; zero for an empty run.
    pub fn ipc(&self) -> f64 {
        if self.cycles == 0 {
            return 0.0;
        }
        self.instructions_retired as f64 / self.cycles as f64
    }

    /// Percentage of branches predicted correctly; zero with no branches.
    pub fn branch_accuracy(&self) -> f64 {
        let total = self.branch_predictions + self.branch_mispredictions;
        if total == 0 {
            return 0.0;
        }
        100.0 * self.branch_predictions as f64 / total as f64
    }

    /// Writes the requested sections. An empty `sections` slice selects all.
    ///
    /// # Errors
    ///
    /// Propagates errors from the underlying writer.
    pub fn write_sections(
        &self,
        out: &mut impl fmt::Write,
        sections: &[String],
        units: &[StationStats],
    ) -> fmt::Result {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let cyc = self.cycles.max(1) as f64;
        let instr = self.instructions_retired.max(1) as f64;
        let pct = |n: u64, of: f64| (n as f64 / of) * 100.0;

        writeln!(out, "==========================================================")?;
        writeln!(out, "PIPELINE TIMING STATISTICS")?;
        writeln!(out, "==========================================================")?;
        if want("summary") {
            writeln!(out, "sim_cycles               {}", self.cycles)?;
            writeln!(out, "sim_insts                {}", self.instructions_retired)?;
            writeln!(out, "sim_fetch_groups         {}", self.fetch_groups)?;
            writeln!(out, "sim_ipc                  {:.4}", self.ipc())?;
            writeln!(out, "sim_cpi                  {:.4}", self.cpi())?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("instruction_mix") {
            writeln!(out, "INSTRUCTION MIX")?;
            let mix = [
                ("op.alu", self.inst_alu),
                ("op.load", self.inst_load),
                ("op.store", self.inst_store),
                ("op.fp_add", self.inst_fp_add),
                ("op.fp_mul", self.inst_fp_mul),
                ("op.fp_div", self.inst_fp_div),
                ("op.branch", self.inst_branch),
            ];
            for (name, n) in mix {
                writeln!(out, "  {name:<22} {n} ({:.2}%)", pct(n, instr))?;
            }
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("branch") {
            writeln!(out, "BRANCH PREDICTION")?;
            writeln!(
                out,
                "  bp.lookups             {}",
                self.branch_predictions + self.branch_mispredictions
            )?;
            writeln!(out, "  bp.mispredicts         {}", self.branch_mispredictions)?;
            writeln!(out, "  bp.accuracy            {:.2}%", self.branch_accuracy())?;
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("stalls") {
            writeln!(out, "STALLS")?;
            let stalls = [
                ("stalls.rename", self.stalls_rename),
                ("stalls.data", self.stalls_data),
                ("stalls.control", self.stalls_control),
            ];
            for (name, n) in stalls {
                writeln!(out, "  {name:<22} {n} ({:.2}%)", pct(n, cyc))?;
            }
            writeln!(out, "----------------------------------------------------------")?;
        }
        if want("units") && !units.is_empty() {
            writeln!(out, "RESOURCE STATIONS")?;
            for u in units {
                writeln!(
                    out,
                    "  {:<10} lat: {:<3} slots: {:<4} requests: {:<8} wait_cycles: {}",
                    u.name, u.latency, u.slots, u.requests, u.wait_cycles
                )?;
            }
        }
        writeln!(out, "==========================================================")
    }

    /// Renders the requested sections to a string.
    pub fn render_sections(&self, sections: &[String], units: &[StationStats]) -> String {
        let mut s = String::new();
        let _ = self.write_sections(&mut s, sections, units);
        s
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of [`STATS_SECTIONS`]. Pass an
    /// empty slice to print all sections (same as `print()`).
    pub fn print_sections(&self, sections: &[String], units: &[StationStats]) {
        print!("{}", self.render_sections(sections, units));
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[], units)`.
    pub fn print(&self, units: &[StationStats]) {
        self.print_sections(&[], units);
    }
}
