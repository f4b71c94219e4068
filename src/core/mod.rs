pub mod etl;
pub mod interval;
pub mod scan_bound;
pub mod transformer;

pub use crate::domain::model::{ReportRow, ReviewEntry, TransformResult, WorkOrderRecord};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
