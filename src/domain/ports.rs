use crate::domain::model::{ColumnMap, MalformedRowPolicy, ReportRow, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn columns(&self) -> &ColumnMap;
    fn malformed_row_policy(&self) -> MalformedRowPolicy;
    fn indent(&self) -> usize;
    fn default_lookback(&self) -> usize;
    fn preview_count(&self) -> usize;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<ReportRow>>;
    async fn transform(&self, rows: Vec<ReportRow>) -> Result<TransformResult>;
    async fn load(&self, result: TransformResult) -> Result<String>;
}
