//! tonic-backed implementations of the domain ports.

mod grpc;

pub use grpc::{GrpcAuthenticationApi, GrpcHealthApi};
