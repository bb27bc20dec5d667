//! Rendering: pipelines and the per-frame render engine

pub mod pipeline_manager;
pub mod render_engine;

pub use pipeline_manager::{DepthConfig, PipelineConfig, PipelineManager, PipelineStats, VertexLayout};
pub use render_engine::RenderEngine;
