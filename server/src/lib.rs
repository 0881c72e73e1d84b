//! HTTP front end for the file modification tracker.
//!
//! Wires the worker subsystem to a YAML config, console plus rotating-file
//! logging, and an axum router.

pub mod config;
pub mod error;
pub mod logging;
pub mod routes;

pub use config::Config;
pub use error::{ApiError, ConfigError};
pub use routes::{SharedService, build_router, serve};
