//! mdspace: headless core of a markdown workspace.
//!
//! Modules:
//! - models: the lazily loaded file tree
//! - kernel: workspace state, orchestration and commands
//! - kernel::services: ports (traits) and their OS adapters

pub mod kernel;
pub mod models;
