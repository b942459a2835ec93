//! Services layer (ports + adapters).
//!
//! - `ports`: contracts/types the kernel depends on.
//! - `adapters`: OS/runtime specific implementations (IO/async).

pub mod adapters;
pub mod ports;
