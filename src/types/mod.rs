//! Core type definitions.
//!
//! Targets and port lists are validated or canonicalised once at the edge so
//! strategies can treat them as trusted.

mod mode;
mod port;
mod target;

pub use mode::ScanMode;
pub use port::{combine_port_lists, PortList};
pub use target::{is_valid_target, parse_target_input, TargetError, TargetInput};
