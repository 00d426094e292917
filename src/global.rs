//! Free-function API over a per-thread timer
//!
//! Each thread lazily gets its own enabled [`Timer`] with default settings;
//! [`configure`] replaces it. Regions started on one thread are invisible to
//! every other thread.
//!
//! # Example
//! ```
//! use timetree::global;
//!
//! global::start_recording("load")?;
//! global::start_child("decode", "load")?;
//! global::stop_recording("decode")?;
//! global::stop_recording("load")?;
//! assert_eq!(global::report("load", true)?.lines.len(), 2);
//! # Ok::<(), timetree::error::TimerError>(())
//! ```

use crate::accumulator::Accumulation;
use crate::config::TimerConfig;
use crate::error::Result;
use crate::reporter::Report;
use crate::timer::Timer;
use crate::unit::TimeUnit;
use std::cell::RefCell;

thread_local! {
    static TIMER: RefCell<Timer> = RefCell::new(Timer::default());
}

/// Run `f` against this thread's timer
///
/// Calling back into this module from inside `f` panics (the timer is
/// already borrowed).
pub fn with_timer<R>(f: impl FnOnce(&mut Timer) -> R) -> R {
    TIMER.with(|timer| f(&mut timer.borrow_mut()))
}

/// Replace this thread's timer with a fresh one built from `config`
pub fn configure(config: &TimerConfig) {
    with_timer(|timer| *timer = Timer::new(config));
}

pub fn set_default_time_unit(unit: TimeUnit) {
    with_timer(|timer| timer.set_default_time_unit(unit));
}

pub fn start_recording(name: &str) -> Result<()> {
    with_timer(|timer| timer.start_recording(name))
}

pub fn start_recording_with_unit(name: &str, unit: TimeUnit) -> Result<()> {
    with_timer(|timer| timer.start_recording_with_unit(name, unit))
}

pub fn start_child(name: &str, parent: &str) -> Result<()> {
    with_timer(|timer| timer.start_child(name, parent))
}

pub fn start_child_with_unit(name: &str, parent: &str, unit: TimeUnit) -> Result<()> {
    with_timer(|timer| timer.start_child_with_unit(name, parent, unit))
}

pub fn stop_recording(name: &str) -> Result<Accumulation> {
    with_timer(|timer| timer.stop_recording(name))
}

pub fn erase(name: &str) -> Result<()> {
    with_timer(|timer| timer.erase(name))
}

pub fn reset(name: &str) -> Result<()> {
    with_timer(|timer| timer.reset(name))
}

pub fn reset_all() {
    with_timer(|timer| timer.reset_all());
}

pub fn report(name: &str, recursive: bool) -> Result<Report> {
    with_timer(|timer| timer.report(name, recursive))
}

pub fn report_all() -> Report {
    with_timer(|timer| timer.report_all())
}
