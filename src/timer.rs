//! Region timing engine and its public facade
//!
//! [`TimerRegistry`] ties the node tree, the duration accumulator and the
//! reporter together behind name-based operations. [`Timer`] wraps it with the
//! enable/disable switch from [`TimerConfig`].
//!
//! Neither type is thread-safe; a registry belongs to one execution context.
//!
//! # Example
//! ```
//! use timetree::timer::TimerRegistry;
//!
//! let mut timer = TimerRegistry::new();
//! timer.start_recording("total")?;
//! timer.start_child("parse", "total")?;
//! timer.stop_recording("parse")?;
//! let total = timer.stop_recording("total")?;
//! assert_eq!(total.call_count, 1);
//!
//! let report = timer.report("total", true)?;
//! assert_eq!(report.lines.len(), 2);
//! # Ok::<(), timetree::error::TimerError>(())
//! ```

use crate::accumulator::{Accumulation, DurationAccumulator, Totals};
use crate::clock::{Clock, MonotonicClock};
use crate::config::{ReportConfig, TimerConfig};
use crate::error::Result;
use crate::node_registry::NodeRegistry;
use crate::reporter::{Report, ReportScope, Reporter};
use crate::unit::TimeUnit;

/// Named region tree with per-region duration totals
#[derive(Debug)]
pub struct TimerRegistry<C: Clock = MonotonicClock> {
    nodes: NodeRegistry,
    durations: DurationAccumulator,
    default_unit: TimeUnit,
    report_config: ReportConfig,
    clock: C,
}

impl TimerRegistry<MonotonicClock> {
    /// Registry on the monotonic clock with default settings
    pub fn new() -> Self {
        Self::with_clock(MonotonicClock)
    }

    /// Registry on the monotonic clock using the unit and report settings of `config`
    pub fn from_config(config: &TimerConfig) -> Self {
        let mut registry = Self::new();
        registry.default_unit = config.default_unit;
        registry.report_config = config.report.clone();
        registry
    }
}

impl Default for TimerRegistry<MonotonicClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TimerRegistry<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            nodes: NodeRegistry::new(),
            durations: DurationAccumulator::new(),
            default_unit: TimeUnit::default(),
            report_config: ReportConfig::default(),
            clock,
        }
    }

    /// Unit given to regions created without an explicit one
    pub fn set_default_time_unit(&mut self, unit: TimeUnit) {
        self.default_unit = unit;
    }

    pub fn default_time_unit(&self) -> TimeUnit {
        self.default_unit
    }

    pub fn set_report_config(&mut self, config: ReportConfig) {
        self.report_config = config;
    }

    /// Start the top-level region `name`, creating it in the default unit
    pub fn start_recording(&mut self, name: &str) -> Result<()> {
        self.start_recording_with_unit(name, self.default_unit)
    }

    /// Start the top-level region `name`
    ///
    /// `unit` only applies when the region is created by this call.
    ///
    /// # Errors
    /// `NameConflict` if `name` already exists below another region.
    pub fn start_recording_with_unit(&mut self, name: &str, unit: TimeUnit) -> Result<()> {
        let id = self.nodes.ensure_top_level(name, unit)?;
        tracing::trace!(region = name, "start");
        self.durations.start(id, self.clock.now());
        Ok(())
    }

    /// Start `name` nested under `parent`, creating it in the default unit
    pub fn start_child(&mut self, name: &str, parent: &str) -> Result<()> {
        self.start_child_with_unit(name, parent, self.default_unit)
    }

    /// Start `name` nested under `parent`
    ///
    /// # Errors
    /// `NotFound` if `parent` is unknown, `NameConflict` if `name` already
    /// exists under a different parent.
    pub fn start_child_with_unit(&mut self, name: &str, parent: &str, unit: TimeUnit) -> Result<()> {
        let id = self.nodes.ensure_child(name, parent, unit)?;
        tracing::trace!(region = name, parent, "start");
        self.durations.start(id, self.clock.now());
        Ok(())
    }

    /// Stop `name` and return its updated totals in its own unit
    ///
    /// # Errors
    /// `NotFound` for an unknown region, `NotStarted` if it has no pending start.
    pub fn stop_recording(&mut self, name: &str) -> Result<Accumulation> {
        let now = self.clock.now();
        let id = self.nodes.lookup(name)?;
        let unit = self.nodes.get(name)?.unit();
        self.durations.stop(id, name, unit, now)
    }

    /// Run `f` inside a start/stop pair on `name`
    ///
    /// With `parent` set the region is nested under it.
    pub fn measure<F, R>(&mut self, name: &str, parent: Option<&str>, f: F) -> Result<R>
    where
        F: FnOnce() -> R,
    {
        match parent {
            Some(parent) => self.start_child(name, parent)?,
            None => self.start_recording(name)?,
        }
        let result = f();
        self.stop_recording(name)?;
        Ok(result)
    }

    /// Remove `name` and its whole subtree, including their totals
    pub fn erase(&mut self, name: &str) -> Result<()> {
        let removed = self.nodes.erase(name)?;
        self.durations.remove_subtree(&removed);
        Ok(())
    }

    /// Zero the accumulated duration of `name`, keeping its call count
    pub fn reset(&mut self, name: &str) -> Result<()> {
        let id = self.nodes.lookup(name)?;
        self.durations.reset(id);
        tracing::debug!(region = name, "reset region");
        Ok(())
    }

    /// Zero the accumulated duration of every region
    pub fn reset_all(&mut self) {
        self.durations.reset_all();
        tracing::debug!(regions = self.durations.len(), "reset all regions");
    }

    /// Call count and duration of `name` converted to `unit`
    ///
    /// A region that was never stopped yields [`Totals::NOT_MEASURED`].
    pub fn totals(&self, name: &str, unit: TimeUnit) -> Result<Totals> {
        let id = self.nodes.lookup(name)?;
        Ok(self.durations.totals(id, unit))
    }

    /// Report on `name`, including its descendants when `recursive`
    pub fn report(&self, name: &str, recursive: bool) -> Result<Report> {
        self.reporter().report(name, recursive)
    }

    /// Report on every region
    pub fn report_all(&self) -> Report {
        self.reporter().report_all()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.nodes.contains(name)
    }

    /// Number of regions in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Read access to the region tree
    pub fn nodes(&self) -> &NodeRegistry {
        &self.nodes
    }

    fn reporter(&self) -> Reporter<'_> {
        Reporter::new(&self.nodes, &self.durations, &self.report_config)
    }
}

/// Configuration-gated timer
///
/// When built from a disabled configuration no engine exists and every
/// operation succeeds without doing anything: stops return a zero
/// accumulation and reports are empty.
#[derive(Debug)]
pub struct Timer<C: Clock = MonotonicClock> {
    engine: Option<TimerRegistry<C>>,
}

impl Timer<MonotonicClock> {
    pub fn new(config: &TimerConfig) -> Self {
        if !config.enabled {
            tracing::debug!("region timing disabled");
            return Self { engine: None };
        }
        Self {
            engine: Some(TimerRegistry::from_config(config)),
        }
    }
}

impl Default for Timer<MonotonicClock> {
    fn default() -> Self {
        Self::new(&TimerConfig::default())
    }
}

impl<C: Clock> Timer<C> {
    /// Enabled timer driven by `clock`, or a no-op timer if `config` disables it
    pub fn with_clock(config: &TimerConfig, clock: C) -> Self {
        let engine = config.enabled.then(|| {
            let mut registry = TimerRegistry::with_clock(clock);
            registry.set_default_time_unit(config.default_unit);
            registry.set_report_config(config.report.clone());
            registry
        });
        Self { engine }
    }

    pub fn is_enabled(&self) -> bool {
        self.engine.is_some()
    }

    /// The underlying engine, `None` when disabled
    pub fn registry(&self) -> Option<&TimerRegistry<C>> {
        self.engine.as_ref()
    }

    pub fn set_default_time_unit(&mut self, unit: TimeUnit) {
        if let Some(engine) = self.engine.as_mut() {
            engine.set_default_time_unit(unit);
        }
    }

    pub fn start_recording(&mut self, name: &str) -> Result<()> {
        match self.engine.as_mut() {
            Some(engine) => engine.start_recording(name),
            None => Ok(()),
        }
    }

    pub fn start_recording_with_unit(&mut self, name: &str, unit: TimeUnit) -> Result<()> {
        match self.engine.as_mut() {
            Some(engine) => engine.start_recording_with_unit(name, unit),
            None => Ok(()),
        }
    }

    pub fn start_child(&mut self, name: &str, parent: &str) -> Result<()> {
        match self.engine.as_mut() {
            Some(engine) => engine.start_child(name, parent),
            None => Ok(()),
        }
    }

    pub fn start_child_with_unit(&mut self, name: &str, parent: &str, unit: TimeUnit) -> Result<()> {
        match self.engine.as_mut() {
            Some(engine) => engine.start_child_with_unit(name, parent, unit),
            None => Ok(()),
        }
    }

    pub fn stop_recording(&mut self, name: &str) -> Result<Accumulation> {
        match self.engine.as_mut() {
            Some(engine) => engine.stop_recording(name),
            None => Ok(Accumulation {
                call_count: 0,
                total: 0,
                unit: TimeUnit::default(),
            }),
        }
    }

    pub fn measure<F, R>(&mut self, name: &str, parent: Option<&str>, f: F) -> Result<R>
    where
        F: FnOnce() -> R,
    {
        match self.engine.as_mut() {
            Some(engine) => engine.measure(name, parent, f),
            None => Ok(f()),
        }
    }

    pub fn erase(&mut self, name: &str) -> Result<()> {
        match self.engine.as_mut() {
            Some(engine) => engine.erase(name),
            None => Ok(()),
        }
    }

    pub fn reset(&mut self, name: &str) -> Result<()> {
        match self.engine.as_mut() {
            Some(engine) => engine.reset(name),
            None => Ok(()),
        }
    }

    pub fn reset_all(&mut self) {
        if let Some(engine) = self.engine.as_mut() {
            engine.reset_all();
        }
    }

    pub fn report(&self, name: &str, recursive: bool) -> Result<Report> {
        match self.engine.as_ref() {
            Some(engine) => engine.report(name, recursive),
            None => Ok(Report::empty(ReportScope::Region(name.to_string()))),
        }
    }

    pub fn report_all(&self) -> Report {
        match self.engine.as_ref() {
            Some(engine) => engine.report_all(),
            None => Report::empty(ReportScope::All),
        }
    }

    /// Print the report on `name` to stdout
    pub fn print_report(&self, name: &str, recursive: bool) -> Result<()> {
        let report = self.report(name, recursive)?;
        if self.is_enabled() {
            print!("{}", report);
        }
        Ok(())
    }

    /// Print the report on every region to stdout
    pub fn print_report_all(&self) {
        if self.is_enabled() {
            print!("{}", self.report_all());
        }
    }
}
