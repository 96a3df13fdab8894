//! Port traits the domain depends on; adapters implement them.

pub mod config_port;
pub mod data_port;

pub use config_port::ConfigPort;
pub use data_port::DataPort;
