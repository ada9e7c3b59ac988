pub mod grouping_pipeline;

pub use grouping_pipeline::GroupingPipeline;
