//! Orchestrator - concurrent batch probing

mod orchestrator;
mod progress;

pub use orchestrator::Orchestrator;
pub use progress::ProgressTracker;
