use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One raw row of the report as read from disk. `line` is 1-based and counts
/// the header, so the first data row is line 2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRow {
    pub line: u64,
    pub fields: Vec<String>,
}

impl ReportRow {
    pub fn new(line: u64, fields: Vec<String>) -> Self {
        Self { line, fields }
    }

    pub fn width(&self) -> usize {
        self.fields.len()
    }
}

/// Positions of the consumed columns in the vendor report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub order_id: usize,
    pub tool: usize,
    pub chamber: usize,
    pub wo_type: usize,
    pub corrective: usize,
    pub mode: usize,
    pub tech_primary: usize,
    pub notes: usize,
    pub start: usize,
    pub end: usize,
    pub tech_secondary: usize,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            order_id: 0,
            tool: 2,
            chamber: 9,
            wo_type: 10,
            corrective: 12,
            mode: 13,
            tech_primary: 14,
            notes: 21,
            start: 25,
            end: 26,
            tech_secondary: 30,
        }
    }
}

impl ColumnMap {
    pub fn indices(&self) -> [usize; 11] {
        [
            self.order_id,
            self.tool,
            self.chamber,
            self.wo_type,
            self.corrective,
            self.mode,
            self.tech_primary,
            self.notes,
            self.start,
            self.end,
            self.tech_secondary,
        ]
    }

    /// Minimum number of columns a row needs for every index to resolve.
    pub fn required_width(&self) -> usize {
        self.indices().iter().copied().max().unwrap_or(0) + 1
    }
}

/// What the transformer does with a data row it cannot shape into a record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum MalformedRowPolicy {
    #[default]
    Abort,
    Skip,
}

/// A work order reshaped for the review queue. Everything after `corrective`
/// except the timestamps, techs and notes is a placeholder that the review
/// tooling fills in later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderRecord {
    pub tool: String,
    pub chamber: String,
    #[serde(rename = "type")]
    pub wo_type: String,
    pub mode: String,
    pub root: String,
    pub corrective: String,
    pub start: String,
    pub end: String,
    pub down_time: f64,
    pub delay_total: f64,
    pub total_time: f64,
    pub techs: [String; 2],
    pub notes: String,
    pub repeat: serde_json::Map<String, serde_json::Value>,
    pub delays: Vec<serde_json::Value>,
    pub exchanges: Vec<serde_json::Value>,
    pub uptime: bool,
    pub review: bool,
}

/// A record keyed by its order id; serializes as `{"<id>": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    into = "BTreeMap<String, WorkOrderRecord>",
    try_from = "BTreeMap<String, WorkOrderRecord>"
)]
pub struct ReviewEntry {
    pub order_id: String,
    pub record: WorkOrderRecord,
}

impl From<ReviewEntry> for BTreeMap<String, WorkOrderRecord> {
    fn from(entry: ReviewEntry) -> Self {
        BTreeMap::from([(entry.order_id, entry.record)])
    }
}

impl TryFrom<BTreeMap<String, WorkOrderRecord>> for ReviewEntry {
    type Error = String;

    fn try_from(map: BTreeMap<String, WorkOrderRecord>) -> Result<Self, Self::Error> {
        if map.len() != 1 {
            return Err(format!(
                "review entry must hold exactly one order, found {}",
                map.len()
            ));
        }
        let (order_id, record) = map
            .into_iter()
            .next()
            .ok_or_else(|| "review entry is empty".to_string())?;
        Ok(Self { order_id, record })
    }
}

/// A data row left out of the queue under [`MalformedRowPolicy::Skip`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    pub line: u64,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct TransformResult {
    pub entries: Vec<ReviewEntry>,
    pub skipped: Vec<SkippedRow>,
}
