//! Per-region call counts and accumulated durations
//!
//! Durations are stored as integer ticks of the region's own [`TimeUnit`].
//! Every stop truncates its elapsed time to that unit before adding it, so a
//! region accumulating in seconds ignores sub-second remainders.

use crate::error::{Result, TimerError};
use crate::node_registry::NodeId;
use crate::unit::{self, TimeUnit};
use std::collections::HashMap;
use std::time::Instant;

/// Running total for one region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accumulation {
    /// Completed start/stop cycles
    pub call_count: u64,
    /// Accumulated duration in ticks of `unit`
    pub total: u64,
    /// Unit `total` is expressed in
    pub unit: TimeUnit,
}

impl Accumulation {
    fn new(unit: TimeUnit) -> Self {
        Self {
            call_count: 0,
            total: 0,
            unit,
        }
    }
}

/// Call count and duration read back in a requested unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Totals {
    pub call_count: u64,
    /// Duration in the requested unit, or `-1.0` when not yet measured
    pub duration: f64,
}

impl Totals {
    /// Returned for a region that has never been stopped
    pub const NOT_MEASURED: Totals = Totals {
        call_count: 1,
        duration: -1.0,
    };

    pub fn is_measured(&self) -> bool {
        *self != Self::NOT_MEASURED
    }

    /// Average duration per call, in the same unit as `duration`
    pub fn average(&self) -> f64 {
        if self.call_count == 0 {
            return 0.0;
        }
        self.duration / self.call_count as f64
    }
}

/// Pending starts and accumulated totals, keyed by node id
#[derive(Debug, Default)]
pub struct DurationAccumulator {
    records: HashMap<NodeId, Accumulation>,
    pending: HashMap<NodeId, Instant>,
}

impl DurationAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `now` as the pending start of `node`
    ///
    /// An unmatched earlier start is silently replaced.
    pub fn start(&mut self, node: NodeId, now: Instant) {
        if self.pending.insert(node, now).is_some() {
            tracing::warn!(?node, "pending start overwritten before stop");
        }
    }

    pub fn is_running(&self, node: NodeId) -> bool {
        self.pending.contains_key(&node)
    }

    /// Close the pending start of `node` and fold the elapsed time into its total
    ///
    /// `name` is only used for the error. `unit` is the node's accumulation
    /// unit; a record that already exists keeps the unit it was created with.
    ///
    /// # Errors
    /// [`TimerError::NotStarted`] if `node` has no pending start.
    pub fn stop(&mut self, node: NodeId, name: &str, unit: TimeUnit, now: Instant) -> Result<Accumulation> {
        let started = self
            .pending
            .remove(&node)
            .ok_or_else(|| TimerError::not_started(name))?;
        let elapsed = now.saturating_duration_since(started);

        let record = self
            .records
            .entry(node)
            .or_insert_with(|| Accumulation::new(unit));
        record.call_count += 1;
        record.total = record.total.saturating_add(record.unit.ticks(elapsed));

        tracing::trace!(
            region = name,
            elapsed_ns = elapsed.as_nanos() as u64,
            calls = record.call_count,
            "stopped region"
        );
        Ok(*record)
    }

    /// Raw record of `node`, `None` until its first stop
    pub fn accumulation(&self, node: NodeId) -> Option<&Accumulation> {
        self.records.get(&node)
    }

    /// Totals of `node` converted to `unit`
    ///
    /// Returns [`Totals::NOT_MEASURED`] for a node that was never stopped.
    pub fn totals(&self, node: NodeId, unit: TimeUnit) -> Totals {
        match self.records.get(&node) {
            Some(record) => Totals {
                call_count: record.call_count,
                duration: unit::cast(record.total, record.unit, unit),
            },
            None => Totals::NOT_MEASURED,
        }
    }

    /// Zero the accumulated duration; call count and pending start are kept
    pub fn reset(&mut self, node: NodeId) {
        if let Some(record) = self.records.get_mut(&node) {
            record.total = 0;
        }
    }

    /// [`reset`](Self::reset) every node with accumulated data
    pub fn reset_all(&mut self) {
        for record in self.records.values_mut() {
            record.total = 0;
        }
    }

    /// Drop records and pending starts of every node in `nodes`
    pub fn remove_subtree(&mut self, nodes: &[NodeId]) {
        for node in nodes {
            self.records.remove(node);
            self.pending.remove(node);
        }
    }

    /// Number of nodes with accumulated data
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
