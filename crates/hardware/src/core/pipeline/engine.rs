//! Timing engine.
//!
//! The engine replays a program through the pipeline model one fetch group at a
//! time. Every instruction in a group is timed independently, in program order:
//! 1. **Decode:** rename lookahead wait, RAW dependency stall, decode station.
//! 2. **Execute:** functional unit for the opcode class; memory ops add cache latency;
//!    branches consult the oracle, the BTB, and train it.
//! 3. **Writeback:** destination registers become visible at the execute cycle.
//! 4. **Retire:** reorder buffer admission.
//! 5. **Rename booking:** the rename pool is reserved for the decode → execute span.
//!
//! Overlap between units is expressed purely through per-station slot
//! bookkeeping; nothing runs concurrently and nothing is ever squashed. A
//! mispredicted branch costs a flat front-end stall before the next fetch group.

use serde::Serialize;

use super::oracle::BranchOracle;
use super::scoreboard::Scoreboard;
use crate::common::{SimError, Stage};
use crate::config::Config;
use crate::core::units::bru::{BranchOutcome, BranchPredictor, Btb};
use crate::core::units::{ResourceStation, StationStats};
use crate::isa::{Instruction, OpClass, StageTimes};
use crate::stats::SimStats;

/// Every piece of mutable hardware state of one simulation run.
#[derive(Clone, Debug)]
pub struct MachineState {
    /// Decode station; latency is the decode latency, slots the issue width.
    pub decoder: ResourceStation,
    /// Rename pool; zero latency, one slot per physical register.
    pub rename: ResourceStation,
    /// Integer ALU.
    pub int_alu: ResourceStation,
    /// Load unit.
    pub load: ResourceStation,
    /// Store unit.
    pub store: ResourceStation,
    /// FP add/subtract unit.
    pub fp_add: ResourceStation,
    /// FP multiplier.
    pub fp_mul: ResourceStation,
    /// FP divider.
    pub fp_div: ResourceStation,
    /// Branch unit.
    pub branch_unit: ResourceStation,
    /// Reorder buffer admission.
    pub rob: ResourceStation,
    /// Register ready cycles.
    pub scoreboard: Scoreboard,
    /// Branch target buffer.
    pub btb: Btb,
}

impl MachineState {
    /// Builds fresh hardware state from a configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any station has zero slots or the BTB has no entries.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        Ok(Self {
            decoder: ResourceStation::new("Decoder", config.decode_latency, config.issue_width)?,
            rename: ResourceStation::new("RegRename", 0, config.physical_registers)?,
            int_alu: ResourceStation::from_config("INT", config.unit(OpClass::IntAlu))?,
            load: ResourceStation::from_config("LD", config.unit(OpClass::Load))?,
            store: ResourceStation::from_config("ST", config.unit(OpClass::Store))?,
            fp_add: ResourceStation::from_config("FPadd", config.unit(OpClass::FpAdd))?,
            fp_mul: ResourceStation::from_config("FPmult", config.unit(OpClass::FpMul))?,
            fp_div: ResourceStation::from_config("FPdiv", config.unit(OpClass::FpDiv))?,
            branch_unit: ResourceStation::from_config("BU", config.unit(OpClass::Branch))?,
            rob: ResourceStation::from_config("ROB", config.rob())?,
            scoreboard: Scoreboard::new(),
            btb: Btb::new(config.btb_entries)?,
        })
    }

    /// The functional unit that executes `class`.
    pub const fn unit_mut(&mut self, class: OpClass) -> &mut ResourceStation {
        match class {
            OpClass::IntAlu => &mut self.int_alu,
            OpClass::Load => &mut self.load,
            OpClass::Store => &mut self.store,
            OpClass::FpAdd => &mut self.fp_add,
            OpClass::FpMul => &mut self.fp_mul,
            OpClass::FpDiv => &mut self.fp_div,
            OpClass::Branch => &mut self.branch_unit,
        }
    }

    /// All stations in pipeline order.
    pub const fn stations(&self) -> [&ResourceStation; 10] {
        [
            &self.decoder,
            &self.rename,
            &self.int_alu,
            &self.load,
            &self.store,
            &self.fp_add,
            &self.fp_mul,
            &self.fp_div,
            &self.branch_unit,
            &self.rob,
        ]
    }

    /// Utilization counters of every station.
    pub fn station_stats(&self) -> Vec<StationStats> {
        self.stations().iter().map(|s| s.stats()).collect()
    }
}

/// What happened at one dynamic branch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BranchEvent {
    /// Direction predicted before resolution.
    pub predicted_taken: bool,
    /// Target predicted before resolution, when predicted taken.
    pub predicted_target: Option<u64>,
    /// Resolved outcome.
    pub outcome: BranchOutcome,
    /// Whether the prediction was wrong.
    pub mispredicted: bool,
    /// Direction counter of the branch's BTB entry after training, if it owns one.
    pub counter: Option<u8>,
}

/// Timing record of one dynamic instruction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InstructionTiming {
    /// Dynamic sequence number, from 0.
    pub seq: u64,
    /// Program counter.
    pub pc: u64,
    /// Disassembly.
    pub text: String,
    /// Stage cycle stamps.
    pub stages: StageTimes,
    /// Address fetched after this instruction.
    pub next_pc: u64,
    /// Branch details, for branches.
    pub branch: Option<BranchEvent>,
}

impl InstructionTiming {
    /// Retire cycle, or zero if the instruction never retired.
    pub fn retire_cycle(&self) -> u64 {
        self.stages.retire.unwrap_or(0)
    }
}

/// Cycle-level timing engine.
#[derive(Debug)]
pub struct TimingEngine {
    state: MachineState,
    group_width: usize,
    cache_latency: u64,
    mispredict_penalty: u64,
    max_instructions: Option<u64>,
    keep_trace: bool,
    trace: Vec<InstructionTiming>,
    stats: SimStats,
    seq: u64,
}

impl TimingEngine {
    /// Creates an engine with fresh hardware state.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] (or a station error) if the
    /// configuration is invalid.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            state: MachineState::new(config)?,
            group_width: config.fetch_group_width(),
            cache_latency: config.cache_latency,
            mispredict_penalty: config.mispredict_penalty(),
            max_instructions: config.max_instructions,
            keep_trace: false,
            trace: Vec::new(),
            stats: SimStats::default(),
            seq: 0,
        })
    }

    /// Enables or disables per-instruction trace collection.
    #[must_use]
    pub const fn with_trace(mut self, keep_trace: bool) -> Self {
        self.keep_trace = keep_trace;
        self
    }

    /// Hardware state.
    pub const fn state(&self) -> &MachineState {
        &self.state
    }

    /// Statistics gathered so far.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Per-instruction timings, if tracing is enabled.
    pub fn trace(&self) -> &[InstructionTiming] {
        &self.trace
    }

    /// Consumes the engine, returning its state, statistics and trace.
    pub fn into_parts(self) -> (MachineState, SimStats, Vec<InstructionTiming>) {
        (self.state, self.stats, self.trace)
    }

    /// Times `program` from pc 0 until the fetch address moves past its end,
    /// taking branch outcomes from `oracle`. Returns the total elapsed cycles:
    /// the latest retire cycle of any instruction.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::OracleExhausted`] if a branch finds no outcome,
    /// [`SimError::StageOrder`] if a unit produces a non-increasing stage
    /// stamp (a zero latency), [`SimError::InstructionLimit`] if the configured
    /// ceiling is hit, [`SimError::CycleOverflow`] or
    /// [`SimError::StationOverflow`] if a cycle leaves the `u64` range, or any
    /// station/predictor invariant error.
    pub fn run<O: BranchOracle + ?Sized>(
        &mut self,
        program: &[Instruction],
        oracle: &mut O,
    ) -> Result<u64, SimError> {
        tracing::info!(
            instructions = program.len(),
            group_width = self.group_width,
            "timing run started"
        );

        let mut pc = 0u64;
        let mut cycle = 0u64;
        let mut total = 0u64;
        loop {
            cycle = add_cycles(cycle, self.cache_latency, pc)?;
            let start = (pc / 4) as usize;
            let end = start.saturating_add(self.group_width).min(program.len());
            let Some(group) = program.get(start..end).filter(|g| !g.is_empty()) else {
                break;
            };
            self.stats.fetch_groups += 1;
            tracing::debug!(pc, cycle, size = group.len(), "fetch group");

            let mut next_pc = pc + 4 * group.len() as u64;
            let mut mispredicted = false;
            for instr in group {
                if let Some(limit) = self.max_instructions {
                    if self.seq >= limit {
                        return Err(SimError::InstructionLimit(limit));
                    }
                }
                let timing = self.time_instruction(instr, cycle, oracle)?;
                total = total.max(timing.retire_cycle());
                if timing.next_pc != instr.fall_through() {
                    next_pc = timing.next_pc;
                }
                mispredicted |= timing.branch.is_some_and(|b| b.mispredicted);
                if self.keep_trace {
                    self.trace.push(timing);
                }
            }

            if mispredicted {
                cycle = add_cycles(cycle, self.mispredict_penalty, pc)?;
                self.stats.stalls_control =
                    add_cycles(self.stats.stalls_control, self.mispredict_penalty, pc)?;
            }
            pc = next_pc;
        }

        self.stats.cycles = total;
        tracing::info!(cycles = total, instructions = self.seq, "timing run finished");
        Ok(total)
    }

    /// Runs one instruction through decode, execute, writeback and retire.
    fn time_instruction<O: BranchOracle + ?Sized>(
        &mut self,
        instr: &Instruction,
        fetch_cycle: u64,
        oracle: &mut O,
    ) -> Result<InstructionTiming, SimError> {
        let pc = instr.pc;
        let class = instr.opcode.class();
        let st = &mut self.state;
        let mut stages = StageTimes::default();
        stages.record(pc, Stage::Fetch, fetch_cycle)?;

        // Each renamed operand queues for its own rename slot estimate, so the
        // waits add up rather than overlap.
        let renamed = instr.renamed_operands() as u64;
        let rename_wait = renamed
            .checked_mul(st.rename.wait_cycles(fetch_cycle))
            .ok_or(SimError::CycleOverflow { pc })?;
        let mut cycle = add_cycles(fetch_cycle, rename_wait, pc)?;

        let data_wait = instr
            .src_regs()
            .iter()
            .map(|r| st.scoreboard.wait_cycles(r, cycle))
            .max()
            .unwrap_or(0);
        cycle = add_cycles(cycle, data_wait, pc)?;

        let decode = st.decoder.allocate(cycle)?;
        stages.record(pc, Stage::Decode, decode)?;

        let mut execute = st.unit_mut(class).allocate(decode)?;
        if matches!(class, OpClass::Load | OpClass::Store) {
            execute = add_cycles(execute, self.cache_latency, pc)?;
        }

        let mut next_pc = instr.fall_through();
        let mut branch = None;
        if class == OpClass::Branch {
            let recorded = oracle.next_outcome(pc)?;
            if recorded.taken {
                next_pc = recorded.target;
            }
            let outcome = BranchOutcome {
                taken: recorded.taken,
                target: next_pc,
            };
            let prediction = st.btb.predict_branch(pc);
            let mispredicted = prediction.mispredicts(&outcome);
            st.btb.update_branch(pc, &outcome)?;

            self.stats.record_branch(mispredicted);
            branch = Some(BranchEvent {
                predicted_taken: prediction.taken,
                predicted_target: prediction.target,
                outcome,
                mispredicted,
                counter: st.btb.lookup(pc).map(|e| e.counter),
            });
        }
        stages.record(pc, Stage::Execute, execute)?;

        for reg in instr.dest_regs() {
            st.scoreboard.record_write(reg, execute)?;
        }

        let retire = st.rob.allocate(execute)?;
        stages.record(pc, Stage::Retire, retire)?;

        for _ in 0..renamed {
            st.rename.allocate_timed(decode, execute - decode)?;
        }

        self.stats.stalls_rename = add_cycles(self.stats.stalls_rename, rename_wait, pc)?;
        self.stats.stalls_data = add_cycles(self.stats.stalls_data, data_wait, pc)?;
        self.stats.record_retire(class);

        let seq = self.seq;
        self.seq += 1;
        tracing::debug!(
            seq,
            pc,
            instr = %instr,
            fetch = fetch_cycle,
            decode,
            execute,
            retire,
            "timed"
        );

        Ok(InstructionTiming {
            seq,
            pc,
            text: instr.to_string(),
            stages,
            next_pc,
            branch,
        })
    }
}

/// `a + b`, or [`SimError::CycleOverflow`] for the instruction at `pc`.
fn add_cycles(a: u64, b: u64, pc: u64) -> Result<u64, SimError> {
    a.checked_add(b).ok_or(SimError::CycleOverflow { pc })
}
