pub mod aggregate;
pub mod demo;
pub mod derive;
pub mod error;
pub mod filter;
pub mod loader;
pub mod pipeline;
pub mod types;
pub mod views;

pub use error::{PipelineError, Result};
pub use pipeline::{snapshot, DashboardSnapshot, IssuePipeline, SourceKey};
