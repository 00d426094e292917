//! Tree-shaped timing reports
//!
//! A report is a depth-first walk over the region tree. Each visited region
//! yields one [`ReportLine`] with its call count, its average duration in its
//! own unit and, below depth 0, the ratio of its average to its parent's.
//! The root is never an entry: a full report starts at the top-level regions
//! with depth 0, a named report starts at the named region with depth 0.

use crate::accumulator::DurationAccumulator;
use crate::config::ReportConfig;
use crate::error::Result;
use crate::node_registry::{NodeId, NodeRegistry};
use crate::unit::TimeUnit;
use std::fmt;

/// Average of a region relative to its parent's average
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    Value(f64),
    /// The parent (or the region itself) has no usable measurement
    NotApplicable,
}

/// One region in a report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub name: String,
    pub depth: usize,
    pub call_count: u64,
    /// `total / call_count` in `unit`, or `-1` when not yet measured
    pub average: i64,
    pub unit: TimeUnit,
    /// `None` at depth 0
    pub ratio: Option<Ratio>,
}

impl ReportLine {
    /// Format this entry with the indentation and precision of `config`
    pub fn render(&self, config: &ReportConfig) -> String {
        let mut line = format!(
            "{:indent$}|----{}: {} call(s), average {}{}",
            "",
            self.name,
            self.call_count,
            self.average,
            self.unit,
            indent = config.indent_width * self.depth
        );
        match self.ratio {
            Some(Ratio::Value(ratio)) => {
                line.push_str(&format!(
                    ", ratio {:.prec$}",
                    ratio,
                    prec = config.ratio_precision
                ));
            }
            Some(Ratio::NotApplicable) => line.push_str(", ratio N/A"),
            None => {}
        }
        line
    }
}

/// What a report covers
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportScope {
    All,
    Region(String),
}

/// A rendered-on-demand report
#[derive(Debug, Clone)]
pub struct Report {
    pub scope: ReportScope,
    pub lines: Vec<ReportLine>,
    config: ReportConfig,
}

impl Report {
    /// Report with no entries, produced when timing is disabled
    pub fn empty(scope: ReportScope) -> Self {
        Self {
            scope,
            lines: Vec::new(),
            config: ReportConfig::default(),
        }
    }

    /// Find the entry for `name`
    pub fn line(&self, name: &str) -> Option<&ReportLine> {
        self.lines.iter().find(|line| line.name == name)
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match &self.scope {
            ReportScope::All => "all",
            ReportScope::Region(name) => name.as_str(),
        };
        writeln!(
            f,
            "Report {{{}}} in the recorder (-1 means recorder not stopped):",
            label
        )?;
        for line in &self.lines {
            writeln!(f, "{}", line.render(&self.config))?;
        }
        Ok(())
    }
}

/// Builds reports from the tree shape and the accumulated totals
pub struct Reporter<'a> {
    nodes: &'a NodeRegistry,
    durations: &'a DurationAccumulator,
    config: &'a ReportConfig,
}

impl<'a> Reporter<'a> {
    pub fn new(
        nodes: &'a NodeRegistry,
        durations: &'a DurationAccumulator,
        config: &'a ReportConfig,
    ) -> Self {
        Self {
            nodes,
            durations,
            config,
        }
    }

    /// Every region, top-level regions at depth 0
    pub fn report_all(&self) -> Report {
        let mut lines = Vec::with_capacity(self.nodes.len());
        for &child in self.nodes.root().children() {
            self.visit(child, None, 0, true, &mut lines);
        }
        self.finish(ReportScope::All, lines)
    }

    /// The region `name` at depth 0, followed by its descendants if `recursive`
    pub fn report(&self, name: &str, recursive: bool) -> Result<Report> {
        let id = self.nodes.lookup(name)?;
        let mut lines = Vec::new();
        self.visit(id, None, 0, recursive, &mut lines);
        Ok(self.finish(ReportScope::Region(name.to_string()), lines))
    }

    fn finish(&self, scope: ReportScope, lines: Vec<ReportLine>) -> Report {
        Report {
            scope,
            lines,
            config: self.config.clone(),
        }
    }

    fn visit(
        &self,
        id: NodeId,
        parent: Option<NodeId>,
        depth: usize,
        recursive: bool,
        lines: &mut Vec<ReportLine>,
    ) {
        let Some(node) = self.nodes.node(id) else {
            return;
        };
        let unit = node.unit();
        let totals = self.durations.totals(id, unit);
        let average = match self.durations.accumulation(id) {
            Some(record) if record.call_count > 0 => (record.total / record.call_count) as i64,
            Some(_) => 0,
            None => -1,
        };
        let ratio = parent.map(|parent| {
            let parent_totals = self.durations.totals(parent, unit);
            if !totals.is_measured() || !parent_totals.is_measured() {
                return Ratio::NotApplicable;
            }
            let parent_average = parent_totals.average();
            if parent_average <= 0.0 {
                return Ratio::NotApplicable;
            }
            Ratio::Value(totals.average() / parent_average)
        });

        lines.push(ReportLine {
            name: node.name().to_string(),
            depth,
            call_count: totals.call_count,
            average,
            unit,
            ratio,
        });

        if recursive {
            for &child in node.children() {
                self.visit(child, Some(id), depth + 1, recursive, lines);
            }
        }
    }
}
