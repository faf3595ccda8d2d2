//! Simulator: owns a program and its configuration and runs both passes.
//!
//! A run is a functional pass that records branch outcomes, followed by a
//! timing pass that replays them. Every run builds fresh hardware state, so a
//! `Simulator` can be run repeatedly with identical results.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use super::functional::FunctionalExecutor;
use super::loader::Program;
use crate::common::SimError;
use crate::config::Config;
use crate::core::pipeline::{BranchOracle, BranchRecord, InstructionTiming, TimingEngine};
use crate::core::units::StationStats;
use crate::core::units::bru::BtbEntry;
use crate::stats::SimStats;

/// Everything a run produced.
#[derive(Clone, Debug, Serialize)]
pub struct SimReport {
    /// Total elapsed cycles.
    pub cycles: u64,
    /// Run statistics.
    pub stats: SimStats,
    /// Per-instruction timings; empty unless tracing was enabled.
    pub timings: Vec<InstructionTiming>,
    /// Final BTB contents, in index order.
    pub btb: Vec<BtbEntry>,
    /// Per-station utilization.
    pub stations: Vec<StationStats>,
    /// Final architectural registers, by name.
    pub registers: BTreeMap<String, f64>,
    /// Final data memory.
    pub memory: BTreeMap<i64, f64>,
}

/// Top-level simulator: configuration plus program.
#[derive(Clone, Debug)]
pub struct Simulator {
    config: Config,
    program: Program,
    trace: bool,
}

impl Simulator {
    /// Creates a simulator after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] if the configuration is invalid.
    pub fn new(config: Config, program: Program) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            config,
            program,
            trace: false,
        })
    }

    /// Loads the program (and optionally the configuration) from files.
    ///
    /// # Errors
    ///
    /// Returns any I/O, JSON, configuration or parse error.
    pub fn from_files(
        program: impl AsRef<Path>,
        config: Option<impl AsRef<Path>>,
    ) -> Result<Self, SimError> {
        let config = match config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };
        Self::new(config, Program::from_file(program)?)
    }

    /// Enables or disables per-instruction timing collection.
    #[must_use]
    pub const fn with_trace(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Configuration in use.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Program being simulated.
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Runs the functional pass and then the timing pass.
    ///
    /// # Errors
    ///
    /// Returns any error raised by either pass.
    pub fn run(&self) -> Result<SimReport, SimError> {
        let mut exec = FunctionalExecutor::new(&self.program, self.config.max_instructions);
        let mut record = exec.run()?;

        let mut report = self.run_with_oracle(&mut record)?;
        if record.remaining() > 0 {
            tracing::warn!(
                remaining = record.remaining(),
                "branch outcomes left unconsumed by the timing pass"
            );
        }

        report.registers = exec
            .registers()
            .dump()
            .into_iter()
            .map(|(reg, value)| (reg.to_string(), value))
            .collect();
        report.memory = exec.memory().clone();
        Ok(report)
    }

    /// Runs only the timing pass, taking branch outcomes from `oracle`.
    ///
    /// The report's register and memory images are left empty.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the timing engine.
    pub fn run_with_oracle<O: BranchOracle + ?Sized>(
        &self,
        oracle: &mut O,
    ) -> Result<SimReport, SimError> {
        let mut engine = TimingEngine::new(&self.config)?.with_trace(self.trace);
        let cycles = engine.run(&self.program.instructions, oracle)?;
        let (state, stats, timings) = engine.into_parts();
        Ok(SimReport {
            cycles,
            stats,
            timings,
            btb: state.btb.entries().to_vec(),
            stations: state.station_stats(),
            registers: BTreeMap::new(),
            memory: BTreeMap::new(),
        })
    }

    /// Runs the functional pass alone and returns its branch record.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InstructionLimit`] if the ceiling is reached.
    pub fn branch_record(&self) -> Result<BranchRecord, SimError> {
        FunctionalExecutor::new(&self.program, self.config.max_instructions).run()
    }
}
