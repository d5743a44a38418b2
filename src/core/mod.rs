//! Core domain models for promotion pipelines
//!
//! This module defines environments, the branch-to-plan resolution and the
//! run/step state machine.

pub mod config;
pub mod environment;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod step;

pub use environment::*;
pub use error::ConfigError;
pub use pipeline::*;
pub use state::*;
pub use step::*;
