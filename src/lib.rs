pub mod holo_pipeline;
pub mod logger;
