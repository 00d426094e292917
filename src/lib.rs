//! Timetree - hierarchical instrumentation timer
//!
//! Callers mark named regions of code with start/stop calls. Regions can nest
//! under a named parent to form a reporting tree; every region accumulates a
//! call count and a total duration in its own time unit, and reports show
//! per-region averages with the ratio to the parent's average.
//!
//! The engine is [`timer::TimerRegistry`]; [`timer::Timer`] adds the
//! enable/disable switch from [`config::TimerConfig`], and [`global`] offers a
//! per-thread free-function API. All of it is single-threaded.

pub mod accumulator;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod global;
pub mod node_registry;
pub mod reporter;
pub mod timer;
pub mod unit;

pub use accumulator::{Accumulation, Totals};
pub use config::TimerConfig;
pub use error::{Result, TimerError};
pub use reporter::{Ratio, Report, ReportLine};
pub use timer::{Timer, TimerRegistry};
pub use unit::TimeUnit;
