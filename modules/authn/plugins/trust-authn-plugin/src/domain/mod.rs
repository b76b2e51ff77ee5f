//! Domain layer for the trust plugin.

pub mod client;
pub mod service;

pub use service::Service;
