use crate::core::interval::parse_interval;
use crate::core::scan_bound::ScanBound;
use crate::domain::model::{
    ColumnMap, MalformedRowPolicy, ReportRow, ReviewEntry, SkippedRow, TransformResult,
    WorkOrderRecord,
};
use crate::utils::error::{EtlError, Result};

/// Reshapes report rows into review-queue entries.
#[derive(Debug, Clone, Default)]
pub struct RecordTransformer {
    columns: ColumnMap,
}

impl RecordTransformer {
    pub fn new(columns: ColumnMap) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &ColumnMap {
        &self.columns
    }

    pub fn validate_header(&self, header: &ReportRow) -> Result<()> {
        let required = self.columns.required_width();
        if header.width() < required {
            return Err(EtlError::HeaderError {
                found: header.width(),
                required,
            });
        }
        Ok(())
    }

    /// Transforms the report: the first row is the header, then at most
    /// `bound` data rows are processed in file order.
    pub fn transform_report(
        &self,
        rows: Vec<ReportRow>,
        bound: ScanBound,
        policy: MalformedRowPolicy,
    ) -> Result<TransformResult> {
        let mut result = TransformResult::default();
        let mut rows = rows.into_iter();

        match rows.next() {
            Some(header) => self.validate_header(&header)?,
            None => {
                tracing::warn!("Report is empty, nothing to transform");
                return Ok(result);
            }
        }

        let mut remaining = bound.rows();
        for row in rows {
            if remaining == 0 {
                tracing::debug!("Scan bound of {} rows reached, stopping at line {}", bound, row.line);
                break;
            }
            remaining -= 1;

            match self.transform_row(&row) {
                Ok(entry) => result.entries.push(entry),
                Err(e) if policy == MalformedRowPolicy::Skip && is_row_error(&e) => {
                    tracing::warn!("⚠️ Skipping line {}: {}", row.line, e);
                    result.skipped.push(SkippedRow {
                        line: row.line,
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::error!("Line {} rejected: {}", row.line, e);
                    return Err(e);
                }
            }
        }

        Ok(result)
    }

    pub fn transform_row(&self, row: &ReportRow) -> Result<ReviewEntry> {
        let required = self.columns.required_width();
        if row.width() < required {
            return Err(EtlError::RowShapeError {
                line: row.line,
                reason: format!("expected at least {} columns, found {}", required, row.width()),
            });
        }

        let field = |index: usize| row.fields[index].trim().to_string();
        let cols = &self.columns;

        let order_id = field(cols.order_id);
        if order_id.is_empty() {
            return Err(EtlError::RowShapeError {
                line: row.line,
                reason: "order id is empty".to_string(),
            });
        }

        let start = parse_interval(&row.fields[cols.start])?;
        let end = parse_interval(&row.fields[cols.end])?;
        // Duration comes from the parsed stamps before they are rendered.
        let down_time = start.hours_until(&end);

        let record = WorkOrderRecord {
            tool: field(cols.tool),
            chamber: field(cols.chamber),
            wo_type: title_case(&field(cols.wo_type)),
            mode: field(cols.mode),
            root: String::new(),
            corrective: field(cols.corrective),
            start: start.to_string(),
            end: end.to_string(),
            down_time,
            delay_total: 0.0,
            total_time: 0.0,
            techs: [field(cols.tech_primary), field(cols.tech_secondary)],
            notes: field(cols.notes),
            repeat: serde_json::Map::new(),
            delays: Vec::new(),
            exchanges: Vec::new(),
            uptime: false,
            review: false,
        };

        Ok(ReviewEntry { order_id, record })
    }
}

fn is_row_error(error: &EtlError) -> bool {
    matches!(
        error,
        EtlError::RowShapeError { .. } | EtlError::DateParseError { .. }
    )
}

/// Upper-cases the first letter of every alphabetic run and lower-cases the
/// rest, so `"preventive maintenance"` becomes `"Preventive Maintenance"`.
pub fn title_case(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut in_word = false;
    for c in input.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}
