//! Configuration for the timing model.
//!
//! This module defines the flat parameter set of the pipelined core. It provides:
//! 1. **Defaults:** Baseline widths, unit latencies and slot counts.
//! 2. **Structure:** One flat [`Config`] with a (latency, slots) pair per functional unit.
//! 3. **Loading:** JSON deserialization, accepting both snake_case keys and the legacy
//!    upper-case keys (`NF`, `INT_latency`, `FPmult_RS`, ...).
//!
//! Use `Config::default()` when no file is given.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::SimError;
use crate::isa::OpClass;

/// Default configuration constants for the timing model.
mod defaults {
    /// Instructions fetched per cycle.
    pub const FETCH_WIDTH: usize = 4;
    /// Instructions decoded per cycle.
    pub const DECODE_WIDTH: usize = 4;
    /// Instructions issued per cycle; also the decode station's slot count.
    pub const ISSUE_WIDTH: usize = 4;
    /// Instructions renamed per cycle.
    pub const RENAME_WIDTH: usize = 4;
    /// Branches handled per cycle.
    pub const BRANCH_WIDTH: usize = 1;

    /// Integer ALU latency and slots.
    pub const INT: (u64, usize) = (1, 4);
    /// Load unit latency and slots (cache latency is added on top).
    pub const LOAD: (u64, usize) = (2, 2);
    /// Store unit latency and slots (cache latency is added on top).
    pub const STORE: (u64, usize) = (2, 2);
    /// FP add/subtract latency and slots.
    pub const FP_ADD: (u64, usize) = (3, 3);
    /// FP multiply latency and slots.
    pub const FP_MUL: (u64, usize) = (4, 2);
    /// FP divide latency and slots.
    pub const FP_DIV: (u64, usize) = (8, 1);
    /// Branch unit latency and slots.
    pub const BRANCH_UNIT: (u64, usize) = (1, 1);
    /// Reorder buffer admission latency and slots.
    pub const ROB: (u64, usize) = (1, 16);

    /// Fixed cache access latency in cycles.
    pub const CACHE_LATENCY: u64 = 1;
    /// Branch target buffer entries.
    pub const BTB_ENTRIES: usize = 16;
    /// Physical registers available for renaming.
    pub const PHYSICAL_REGISTERS: usize = 32;
    /// Decode station latency.
    pub const DECODE_LATENCY: u64 = 1;
}

/// Latency and parallel slot count of one functional unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitConfig {
    /// Cycles from acceptance to completion.
    pub latency: u64,
    /// Independent pipelined copies of the unit.
    pub slots: usize,
}

/// Root configuration of the pipelined core.
///
/// # Examples
///
/// Deserializing the legacy key format:
///
/// ```
/// use pipetime_core::config::Config;
///
/// let json = r#"{
///     "NF": 2, "NI": 2, "NW": 2, "NR": 2, "NB": 1,
///     "INT_latency": 1, "INT_RS": 2,
///     "FPmult_latency": 5, "FPmult_RS": 1,
///     "cache_latency": 2,
///     "btb_entries": 8,
///     "num_physical_regs": 16
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.fetch_width, 2);
/// assert_eq!(config.fp_mul_latency, 5);
/// assert_eq!(config.physical_registers, 16);
/// assert_eq!(config.fetch_group_width(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Instructions fetched per group.
    #[serde(alias = "NF")]
    pub fetch_width: usize,
    /// Decode width.
    #[serde(alias = "NW")]
    pub decode_width: usize,
    /// Issue width; sizes the decode station.
    #[serde(alias = "NI")]
    pub issue_width: usize,
    /// Rename width.
    #[serde(alias = "NR")]
    pub rename_width: usize,
    /// Branch width.
    #[serde(alias = "NB")]
    pub branch_width: usize,

    /// Integer ALU latency.
    #[serde(alias = "INT_latency")]
    pub int_latency: u64,
    /// Integer ALU slots.
    #[serde(alias = "INT_RS")]
    pub int_slots: usize,
    /// Load unit latency.
    #[serde(alias = "LD_latency")]
    pub load_latency: u64,
    /// Load unit slots.
    #[serde(alias = "LD_RS")]
    pub load_slots: usize,
    /// Store unit latency.
    #[serde(alias = "ST_latency")]
    pub store_latency: u64,
    /// Store unit slots.
    #[serde(alias = "ST_RS")]
    pub store_slots: usize,
    /// FP add/subtract latency.
    #[serde(alias = "FPadd_latency")]
    pub fp_add_latency: u64,
    /// FP add/subtract slots.
    #[serde(alias = "FPadd_RS")]
    pub fp_add_slots: usize,
    /// FP multiply latency.
    #[serde(alias = "FPmult_latency")]
    pub fp_mul_latency: u64,
    /// FP multiply slots.
    #[serde(alias = "FPmult_RS")]
    pub fp_mul_slots: usize,
    /// FP divide latency.
    #[serde(alias = "FPdiv_latency")]
    pub fp_div_latency: u64,
    /// FP divide slots.
    #[serde(alias = "FPdiv_RS")]
    pub fp_div_slots: usize,
    /// Branch unit latency.
    #[serde(alias = "BU_latency")]
    pub branch_unit_latency: u64,
    /// Branch unit slots.
    #[serde(alias = "BU_RS")]
    pub branch_unit_slots: usize,
    /// Reorder buffer admission latency.
    #[serde(alias = "ROB_latency")]
    pub rob_latency: u64,
    /// Reorder buffer slots.
    #[serde(alias = "ROB_RS")]
    pub rob_slots: usize,

    /// Fixed latency of every instruction fetch and data access.
    pub cache_latency: u64,
    /// Branch target buffer entries.
    pub btb_entries: usize,
    /// Physical registers; sizes the rename station.
    #[serde(alias = "num_physical_regs")]
    pub physical_registers: usize,
    /// Decode station latency; part of the misprediction penalty.
    pub decode_latency: u64,
    /// Optional ceiling on dynamic instructions, for programs that may not terminate.
    pub max_instructions: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_width: defaults::FETCH_WIDTH,
            decode_width: defaults::DECODE_WIDTH,
            issue_width: defaults::ISSUE_WIDTH,
            rename_width: defaults::RENAME_WIDTH,
            branch_width: defaults::BRANCH_WIDTH,
            int_latency: defaults::INT.0,
            int_slots: defaults::INT.1,
            load_latency: defaults::LOAD.0,
            load_slots: defaults::LOAD.1,
            store_latency: defaults::STORE.0,
            store_slots: defaults::STORE.1,
            fp_add_latency: defaults::FP_ADD.0,
            fp_add_slots: defaults::FP_ADD.1,
            fp_mul_latency: defaults::FP_MUL.0,
            fp_mul_slots: defaults::FP_MUL.1,
            fp_div_latency: defaults::FP_DIV.0,
            fp_div_slots: defaults::FP_DIV.1,
            branch_unit_latency: defaults::BRANCH_UNIT.0,
            branch_unit_slots: defaults::BRANCH_UNIT.1,
            rob_latency: defaults::ROB.0,
            rob_slots: defaults::ROB.1,
            cache_latency: defaults::CACHE_LATENCY,
            btb_entries: defaults::BTB_ENTRIES,
            physical_registers: defaults::PHYSICAL_REGISTERS,
            decode_latency: defaults::DECODE_LATENCY,
            max_instructions: None,
        }
    }
}

impl Config {
    /// A configuration where every width is `width`, every unit (including the
    /// ROB) has the given latency and slot count, and the cache, BTB and rename
    /// pool use `cache_latency`, `btb_entries` and `slots` respectively.
    pub const fn uniform(
        width: usize,
        latency: u64,
        slots: usize,
        cache_latency: u64,
        btb_entries: usize,
    ) -> Self {
        Self {
            fetch_width: width,
            decode_width: width,
            issue_width: width,
            rename_width: width,
            branch_width: width,
            int_latency: latency,
            int_slots: slots,
            load_latency: latency,
            load_slots: slots,
            store_latency: latency,
            store_slots: slots,
            fp_add_latency: latency,
            fp_add_slots: slots,
            fp_mul_latency: latency,
            fp_mul_slots: slots,
            fp_div_latency: latency,
            fp_div_slots: slots,
            branch_unit_latency: latency,
            branch_unit_slots: slots,
            rob_latency: latency,
            rob_slots: slots,
            cache_latency,
            btb_entries,
            physical_registers: slots,
            decode_latency: defaults::DECODE_LATENCY,
            max_instructions: None,
        }
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Json`] for malformed documents and
    /// [`SimError::InvalidConfig`] for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Io`] if the file cannot be read, otherwise as
    /// [`Config::from_json_str`].
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks that every width, slot count and table size is non-zero and that
    /// decode takes at least one cycle.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfig`] naming the first offending key.
    pub fn validate(&self) -> Result<(), SimError> {
        let counts = [
            ("fetch_width", self.fetch_width),
            ("decode_width", self.decode_width),
            ("issue_width", self.issue_width),
            ("rename_width", self.rename_width),
            ("branch_width", self.branch_width),
            ("int_slots", self.int_slots),
            ("load_slots", self.load_slots),
            ("store_slots", self.store_slots),
            ("fp_add_slots", self.fp_add_slots),
            ("fp_mul_slots", self.fp_mul_slots),
            ("fp_div_slots", self.fp_div_slots),
            ("branch_unit_slots", self.branch_unit_slots),
            ("rob_slots", self.rob_slots),
            ("btb_entries", self.btb_entries),
            ("physical_registers", self.physical_registers),
        ];
        if let Some((key, _)) = counts.iter().find(|(_, v)| *v == 0) {
            return Err(SimError::InvalidConfig(format!("{key} must be at least 1")));
        }
        if self.decode_latency == 0 {
            return Err(SimError::InvalidConfig(
                "decode_latency must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    /// Size of a fetch group: the narrowest of the five front-end widths.
    pub fn fetch_group_width(&self) -> usize {
        [
            self.fetch_width,
            self.decode_width,
            self.issue_width,
            self.rename_width,
            self.branch_width,
        ]
        .into_iter()
        .min()
        .unwrap_or(1)
    }

    /// Latency and slots of the unit that executes `class`.
    pub const fn unit(&self, class: OpClass) -> UnitConfig {
        let (latency, slots) = match class {
            OpClass::IntAlu => (self.int_latency, self.int_slots),
            OpClass::Load => (self.load_latency, self.load_slots),
            OpClass::Store => (self.store_latency, self.store_slots),
            OpClass::FpAdd => (self.fp_add_latency, self.fp_add_slots),
            OpClass::FpMul => (self.fp_mul_latency, self.fp_mul_slots),
            OpClass::FpDiv => (self.fp_div_latency, self.fp_div_slots),
            OpClass::Branch => (self.branch_unit_latency, self.branch_unit_slots),
        };
        UnitConfig { latency, slots }
    }

    /// Reorder buffer latency and slots.
    pub const fn rob(&self) -> UnitConfig {
        UnitConfig {
            latency: self.rob_latency,
            slots: self.rob_slots,
        }
    }

    /// Front-end stall charged after a mispredicted branch.
    pub const fn mispredict_penalty(&self) -> u64 {
        self.decode_latency + self.branch_unit_latency
    }
}
