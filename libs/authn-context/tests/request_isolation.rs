#![allow(clippy::unwrap_used, clippy::expect_used)]

use authn_context::{RequestContext, TrustedHeaders};

#[tokio::test]
async fn concurrent_requests_see_only_their_own_headers() {
    let root = RequestContext::new();

    let tasks: Vec<_> = (0..32)
        .map(|i| {
            let root = root.clone();
            tokio::spawn(async move {
                let mut headers = TrustedHeaders::new();
                headers.set("X-User-Id", i.to_string());
                let ctx = root.with_trusted_headers(headers);
                tokio::task::yield_now().await;
                (i, ctx.trusted_headers().get("x-user-id").map(str::to_owned))
            })
        })
        .collect();

    for task in tasks {
        let (i, seen) = task.await.unwrap();
        assert_eq!(seen, Some(i.to_string()));
    }
    assert!(root.trusted_headers().is_empty());
}

#[test]
fn carrier_survives_serialization() {
    let mut headers = TrustedHeaders::new();
    headers.set("X-User-Id", "42");
    headers.set("X-Tenant", "acme");

    let json = serde_json::to_value(&headers).unwrap();
    let restored: TrustedHeaders = serde_json::from_value(json).unwrap();

    assert_eq!(restored, headers);
    assert_eq!(restored.get("X-TENANT"), Some("acme"));
}
