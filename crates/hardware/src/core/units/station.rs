//! Resource Station.
//!
//! A resource station models a functional unit as `K` independent, fully
//! pipelined copies with a fixed latency. Each slot remembers the cycle at which
//! it next becomes free; contention is captured purely by that bookkeeping.
//!
//! # Performance
//!
//! - **Time Complexity:** `allocate()`, `wait_cycles()` and `allocate_timed()` are O(K)
//! - **Space Complexity:** O(K)

use serde::Serialize;

use crate::common::SimError;
use crate::config::UnitConfig;

/// Utilization counters of a station. Diagnostic only.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StationStats {
    /// Station name.
    pub name: &'static str,
    /// Fixed latency.
    pub latency: u64,
    /// Slot count.
    pub slots: usize,
    /// Number of `allocate` requests served.
    pub requests: u64,
    /// Cycles requests spent waiting for a free slot.
    pub wait_cycles: u64,
}

/// A functional unit with fixed latency and a fixed number of parallel slots.
#[derive(Clone, Debug)]
pub struct ResourceStation {
    name: &'static str,
    latency: u64,
    /// Next free cycle of each slot; never decreases.
    next_free: Vec<u64>,
    requests: u64,
    wait_cycles: u64,
}

impl ResourceStation {
    /// Creates a station with every slot free at cycle 0.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::EmptyStation`] if `slots` is zero.
    pub fn new(name: &'static str, latency: u64, slots: usize) -> Result<Self, SimError> {
        if slots == 0 {
            return Err(SimError::EmptyStation(name));
        }
        Ok(Self {
            name,
            latency,
            next_free: vec![0; slots],
            requests: 0,
            wait_cycles: 0,
        })
    }

    /// Creates a station from a unit configuration.
    ///
    /// # Errors
    ///
    /// As [`ResourceStation::new`].
    pub fn from_config(name: &'static str, unit: UnitConfig) -> Result<Self, SimError> {
        Self::new(name, unit.latency, unit.slots)
    }

    /// Station name.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Fixed latency of every operation.
    pub const fn latency(&self) -> u64 {
        self.latency
    }

    /// Number of parallel slots.
    pub fn slots(&self) -> usize {
        self.next_free.len()
    }

    /// Next free cycle of each slot.
    pub fn next_free(&self) -> &[u64] {
        &self.next_free
    }

    /// Index and value of the earliest-free slot; ties go to the lowest index.
    fn earliest(&self) -> (usize, u64) {
        self.next_free
            .iter()
            .copied()
            .enumerate()
            .fold((0, u64::MAX), |best, (i, c)| if c < best.1 { (i, c) } else { best })
    }

    fn slot_mut(&mut self, slot: usize) -> Result<&mut u64, SimError> {
        let slots = self.next_free.len();
        self.next_free.get_mut(slot).ok_or(SimError::StationSlot {
            station: self.name,
            slot,
            slots,
        })
    }

    /// Books the earliest-free slot for a request arriving at `request_cycle`
    /// and returns the cycle the operation completes.
    ///
    /// Completion is `max(request_cycle, slot_free) + latency`; the slot is then
    /// busy until that cycle.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::StationSlot`] if slot selection yields an index
    /// outside the station, or [`SimError::StationOverflow`] if the completion
    /// cycle does not fit in a `u64`.
    pub fn allocate(&mut self, request_cycle: u64) -> Result<u64, SimError> {
        let (slot, free) = self.earliest();
        let start = request_cycle.max(free);
        let done = self.completion(start, self.latency)?;
        *self.slot_mut(slot)? = done;

        // Diagnostic counters saturate; they never feed back into scheduling.
        self.requests = self.requests.saturating_add(1);
        self.wait_cycles = self.wait_cycles.saturating_add(start - request_cycle);
        Ok(done)
    }

    /// Cycles a request at `at_cycle` would wait for a slot. Does not book anything.
    pub fn wait_cycles(&self, at_cycle: u64) -> u64 {
        self.earliest().1.saturating_sub(at_cycle)
    }

    /// Books the earliest-free slot as busy until `max(slot_free, cycle) + latency`,
    /// with a caller-supplied latency.
    ///
    /// Used to reserve a resource retroactively once its true occupancy is known.
    ///
    /// # Errors
    ///
    /// As [`ResourceStation::allocate`].
    pub fn allocate_timed(&mut self, cycle: u64, latency: u64) -> Result<(), SimError> {
        let (slot, free) = self.earliest();
        let done = self.completion(free.max(cycle), latency)?;
        *self.slot_mut(slot)? = done;
        Ok(())
    }

    fn completion(&self, start: u64, latency: u64) -> Result<u64, SimError> {
        start
            .checked_add(latency)
            .ok_or(SimError::StationOverflow { station: self.name })
    }

    /// Snapshot of the utilization counters.
    pub fn stats(&self) -> StationStats {
        StationStats {
            name: self.name,
            latency: self.latency,
            slots: self.next_free.len(),
            requests: self.requests,
            wait_cycles: self.wait_cycles,
        }
    }
}
