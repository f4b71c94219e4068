pub mod review_pipeline;

pub use review_pipeline::ReviewQueuePipeline;
