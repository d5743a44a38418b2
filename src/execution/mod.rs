//! Promotion pipeline execution engine

pub mod engine;
pub mod executor;
pub mod policy;

pub use engine::{EventHandler, ExecutionEngine, ExecutionEvent};
pub use executor::{ExecutionResult, StepExecutor};
pub use policy::FailurePolicy;
