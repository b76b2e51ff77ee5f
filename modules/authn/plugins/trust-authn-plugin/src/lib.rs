#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Trust `AuthN` Plugin
//!
//! Registers the `trust` scheme. The authenticator accepts every request and
//! turns the inbound headers into trusted headers: names are lower-cased and
//! the first value of each header is kept, lower-cased as well.
//!
//! ## Configuration
//!
//! ```yaml
//! authenticator: "trust://"
//! ```
//!
//! Intended for local development and tests only.

pub mod domain;
pub mod module;

pub use domain::Service;
pub use module::{SCHEME, register};
