#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Request authentication middleware.
//!
//! Every wrapper authenticates first and only then runs the handler with a
//! [`RequestContext`](authn_sdk::RequestContext) carrying the trusted
//! headers. Failed authentication never reaches the handler; the caller sees
//! an [`obfuscate`]d status instead.
//!
//! - [`AuthInterceptor::unary`] / [`AuthInterceptor::stream`] for gRPC handlers
//! - [`AuthLayer`] for axum routers ([`Http`]) and tonic servers ([`Grpc`])
//! - [`Authenticated`] to read the context in axum handlers

mod deadline;
mod extract;
mod interceptor;
mod layer;
mod obfuscate;
mod problem;
mod real_ip;
mod stream;

pub use deadline::parse_grpc_timeout;
pub use extract::Authenticated;
pub use interceptor::{AuthInterceptor, StreamServerInfo, UnaryServerInfo, authenticate_request};
pub use layer::{AuthLayer, AuthService, Grpc, Http};
pub use obfuscate::{UNAVAILABLE_MESSAGE, is_infrastructure_fault, obfuscate};
pub use problem::{PROBLEM_JSON, Problem, http_status};
pub use real_ip::real_ip;
pub use stream::{AuthenticatedServerStream, GrpcServerStream, ServerStream};
