//! Configuration management for Reconnoiter.
//!
//! Settings files (JSON or TOML) with XDG fallback, and the tracing
//! subscriber built from them.

mod logging;
mod settings;

pub use logging::{base_level, init_logging, open_log_file};
pub use settings::{AppSettings, Paths, LOCAL_CONFIG_DIR};
