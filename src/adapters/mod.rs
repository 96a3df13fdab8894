//! Concrete adapter implementations for ports.

pub mod csv_adapter;
pub mod fetch;
pub mod file_config_adapter;
