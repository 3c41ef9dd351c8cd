//! Data carried by lifecycle hooks.
//!
//! All payloads are plain serde types so storage observers can persist them as-is.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Experiment colors for light and dark themes (hex strings).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub light: String,
    pub dark: String,
}

impl ColorPair {
    pub fn new(light: impl Into<String>, dark: impl Into<String>) -> Self {
        Self {
            light: light.into(),
            dark: dark.into(),
        }
    }
}

impl Default for ColorPair {
    fn default() -> Self {
        Self::new("#528d59", "#5da364")
    }
}

/// What kind of data a column holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    Float,
    Image,
    Audio,
    Text,
    Chart,
}

/// A column (one chart series) declared during the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Metric key, e.g. `train/loss`.
    pub key: String,
    pub kind: ColumnKind,
    /// Section the chart is grouped under; derived from the key prefix when absent.
    pub section: Option<String>,
    pub chart_name: Option<String>,
}

impl ColumnInfo {
    pub fn new(key: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            key: key.into(),
            kind,
            section: None,
            chart_name: None,
        }
    }

    /// Explicit section, or the part of the key before the first `/`.
    pub fn section_name(&self) -> Option<&str> {
        self.section
            .as_deref()
            .or_else(|| self.key.split_once('/').map(|(prefix, _)| prefix))
    }
}

/// One metric point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricInfo {
    pub key: String,
    pub step: u64,
    pub value: f64,
    pub kind: ColumnKind,
}

impl MetricInfo {
    /// A scalar point.
    pub fn scalar(key: impl Into<String>, step: u64, value: f64) -> Self {
        Self {
            key: key.into(),
            step,
            value,
            kind: ColumnKind::Float,
        }
    }
}

/// A batch of scalar values logged at one step, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub step: u64,
    pub data: IndexMap<String, f64>,
}

impl LogRecord {
    pub fn new(step: u64) -> Self {
        Self {
            step,
            data: IndexMap::new(),
        }
    }

    /// Adds a value, replacing an earlier one under the same key.
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.data.insert(key.into(), value);
        self
    }
}
