#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Drives the plugin against real gRPC servers on loopback sockets.

use std::net::SocketAddr;
use std::time::Duration;

use authn_sdk::{Registry, RequestContext, RequestHeaders};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::Code;
use tonic::transport::Server;
use tonic_health::ServingStatus;
use tonic_health::server::HealthReporter;

async fn spawn_health_server() -> (SocketAddr, HealthReporter) {
    let (reporter, service) = tonic_health::server::health_reporter();
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        Server::builder()
            .add_service(service)
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .unwrap();
    });

    (addr, reporter)
}

async fn refused_addr() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

fn bounded_ctx() -> RequestContext {
    RequestContext::new().with_timeout(Duration::from_secs(5))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn ready_follows_backend_health() {
    let (addr, reporter) = spawn_health_server().await;
    let registry = Registry::new();
    grpc_authn_plugin::register(&registry);

    let authenticator = registry.resolve(&format!("grpc://{addr}")).unwrap();
    assert!(authenticator.ready(&bounded_ctx()).await);

    reporter
        .set_service_status("", ServingStatus::NotServing)
        .await;
    assert!(!authenticator.ready(&bounded_ctx()).await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn unreachable_backend_is_not_ready_and_unavailable() {
    let addr = refused_addr().await;
    let registry = Registry::new();
    grpc_authn_plugin::register(&registry);

    let authenticator = registry
        .resolve(&format!("grpc://{addr}?connect_timeout=1s"))
        .unwrap();

    assert!(!authenticator.ready(&bounded_ctx()).await);

    let headers: RequestHeaders = vec![("Authorization", "Bearer abc")].into_iter().collect();
    let err = authenticator
        .authenticate(&bounded_ctx(), "/svc/Method", &headers, "10.0.0.5")
        .await
        .unwrap_err();
    assert_eq!(err.status().unwrap().code(), Code::Unavailable);
}

#[tokio::test]
async fn custom_scheme_resolves_lazily() {
    let registry = Registry::new();
    grpc_authn_plugin::register_as(&registry, "grpcauth");

    assert!(registry.is_registered("grpcauth"));
    assert!(!registry.is_registered(grpc_authn_plugin::SCHEME));
    assert!(registry.resolve("grpcauth://svc:9000/v1").is_ok());
}

#[tokio::test]
async fn bad_parameters_fail_resolution() {
    let registry = Registry::new();
    grpc_authn_plugin::register(&registry);

    let err = registry
        .resolve("grpc://svc:9000?timeout=whenever")
        .err()
        .unwrap();
    assert!(err.to_string().contains("timeout"));
}

#[test]
fn resolving_outside_runtime_fails() {
    let registry = Registry::new();
    grpc_authn_plugin::register(&registry);

    let err = registry.resolve("grpc://svc:9000").err().unwrap();
    assert!(err.to_string().contains("tokio runtime"));
}
