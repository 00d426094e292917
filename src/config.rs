//! Timer configuration
//!
//! Loaded from TOML or built in code. The `enabled` flag is the on/off switch
//! for all instrumentation: it is read once when a [`Timer`](crate::timer::Timer)
//! is built, and a disabled timer never constructs its engine.
//!
//! # Example TOML
//! ```toml
//! enabled = true
//! default_unit = "us"
//!
//! [report]
//! indent_width = 4
//! ratio_precision = 2
//! ```

use crate::unit::TimeUnit;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Formatting knobs for rendered reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Spaces of indentation per tree level
    pub indent_width: usize,
    /// Digits after the decimal point for ratios
    pub ratio_precision: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            indent_width: 5,
            ratio_precision: 4,
        }
    }
}

/// Top-level timer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    /// When false every timer operation is a no-op
    pub enabled: bool,
    /// Unit given to regions whose start call names none
    pub default_unit: TimeUnit,
    pub report: ReportConfig,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_unit: TimeUnit::Milliseconds,
            report: ReportConfig::default(),
        }
    }
}

impl TimerConfig {
    /// Configuration with instrumentation switched off
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Load and validate a configuration file
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).with_context(|| {
            format!("Failed to read timer config: {}", path.as_ref().display())
        })?;
        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid timer config: {}", path.as_ref().display()))
    }

    /// Parse and validate configuration text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: TimerConfig =
            toml::from_str(content).context("Failed to parse TOML timer configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.report.indent_width == 0 {
            anyhow::bail!("report.indent_width must be >= 1, got 0");
        }
        if self.report.ratio_precision > 16 {
            anyhow::bail!(
                "report.ratio_precision must be <= 16, got {}",
                self.report.ratio_precision
            );
        }
        Ok(())
    }
}
