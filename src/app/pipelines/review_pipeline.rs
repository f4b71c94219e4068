use crate::core::scan_bound::ScanBound;
use crate::core::transformer::RecordTransformer;
use crate::core::{ConfigProvider, Pipeline, ReportRow, ReviewEntry, Storage, TransformResult};
use crate::utils::error::Result;
use serde::Serialize;

/// Report in, review queue out.
pub struct ReviewQueuePipeline<S: Storage, C: ConfigProvider> {
    pub(crate) storage: S,
    pub(crate) config: C,
    pub(crate) transformer: RecordTransformer,
    pub(crate) bound: ScanBound,
}

impl<S: Storage, C: ConfigProvider> ReviewQueuePipeline<S, C> {
    pub fn new(storage: S, config: C, bound: ScanBound) -> Self {
        let transformer = RecordTransformer::new(config.columns().clone());
        Self {
            storage,
            config,
            transformer,
            bound,
        }
    }

    /// Logs the first `preview_count` entries and returns how many were logged.
    fn log_preview(&self, entries: &[ReviewEntry]) -> usize {
        let preview = &entries[..entries.len().min(self.config.preview_count())];
        for (number, entry) in preview.iter().enumerate() {
            let record = &entry.record;
            tracing::info!(
                "Scrape count {}: {} {} {} {} {} {} {} -> {} ({:.2} h) techs={:?} notes={:?}",
                number,
                entry.order_id,
                record.tool,
                record.chamber,
                record.wo_type,
                record.mode,
                record.corrective,
                record.start,
                record.end,
                record.down_time,
                record.techs,
                record.notes
            );
        }
        preview.len()
    }
}

/// Pretty JSON with `indent` spaces per level.
pub fn render_queue(entries: &[ReviewEntry], indent: usize) -> Result<Vec<u8>> {
    let indent = " ".repeat(indent);
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    entries.serialize(&mut serializer)?;
    Ok(buf)
}

/// Reads every row of a CSV report, header included. Blank lines are not
/// rows: they are dropped with a warning and never reach the transformer.
pub fn parse_report(data: &[u8]) -> Result<Vec<ReportRow>> {
    let blank_lines = count_blank_lines(data);
    if blank_lines > 0 {
        tracing::warn!("⚠️ Report contains {} blank line(s), ignoring them", blank_lines);
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        let line = record
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 1);
        rows.push(ReportRow::new(
            line,
            record.iter().map(str::to_string).collect(),
        ));
    }
    Ok(rows)
}

// Empty lines outside quoted fields; a `\r` before the newline still counts as empty.
pub(crate) fn count_blank_lines(data: &[u8]) -> usize {
    let mut in_quotes = false;
    let mut line_len = 0usize;
    let mut blank = 0;
    for &byte in data {
        match byte {
            b'"' => {
                in_quotes = !in_quotes;
                line_len += 1;
            }
            b'\n' if !in_quotes => {
                if line_len == 0 {
                    blank += 1;
                }
                line_len = 0;
            }
            b'\r' if !in_quotes => {}
            _ => line_len += 1,
        }
    }
    blank
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ReviewQueuePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<ReportRow>> {
        tracing::debug!("Reading report from {}", self.config.input_path());
        let data = self.storage.read_file(self.config.input_path()).await?;
        let data = data.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(&data);
        parse_report(data)
    }

    async fn transform(&self, rows: Vec<ReportRow>) -> Result<TransformResult> {
        tracing::debug!(
            "Transforming up to {} data rows with policy {:?}",
            self.bound,
            self.config.malformed_row_policy()
        );
        let result = self.transformer.transform_report(
            rows,
            self.bound,
            self.config.malformed_row_policy(),
        )?;
        let previewed = self.log_preview(&result.entries);
        tracing::debug!("Previewed {} of {} entries", previewed, result.entries.len());
        Ok(result)
    }

    async fn load(&self, result: TransformResult) -> Result<String> {
        let output_path = self.config.output_path();
        let json = render_queue(&result.entries, self.config.indent())?;

        tracing::debug!(
            "Writing {} entries ({} bytes) to {}",
            result.entries.len(),
            json.len(),
            output_path
        );
        self.storage.write_file(output_path, &json).await?;

        Ok(output_path.to_string())
    }
}
