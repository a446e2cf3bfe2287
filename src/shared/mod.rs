//! Shared Utilities Module
//!
//! Contains configuration shared across the validator engine and the bridge.

pub mod config;

pub use config::{BuildMode, Config, DirectAccess, LogConfig};
