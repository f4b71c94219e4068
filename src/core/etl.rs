use crate::core::Pipeline;
use crate::utils::error::Result;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting review queue build");

        tracing::info!("Extracting report rows...");
        let rows = self.pipeline.extract().await?;
        tracing::info!("Extracted {} rows (header included)", rows.len());

        tracing::info!("Transforming work orders...");
        let result = self.pipeline.transform(rows).await?;
        tracing::info!(
            "Transformed {} work orders, skipped {}",
            result.entries.len(),
            result.skipped.len()
        );

        tracing::info!("Writing review queue...");
        let output_path = self.pipeline.load(result).await?;
        tracing::info!("Review queue saved to: {}", output_path);

        Ok(output_path)
    }
}
