//! End-to-end classification and routing tests.

use std::net::SocketAddr;

use axum::http::StatusCode;
use priority_proxy::config::{
    validate_config, PolicyMode, ProxyConfig, RouteActionKind, RouteConfig, UpstreamConfig,
};

mod common;

fn upstream(name: &str, pool: &str, addr: SocketAddr) -> UpstreamConfig {
    UpstreamConfig {
        name: name.to_string(),
        pool: pool.to_string(),
        address: addr.to_string(),
        max_connections: 100,
    }
}

fn forward_route(label: &str, pool: &str) -> RouteConfig {
    RouteConfig {
        label: label.to_string(),
        action: RouteActionKind::Forward,
        pool: Some(pool.to_string()),
        reject_status: 429,
    }
}

#[tokio::test]
async fn test_allow_under_normal_load() {
    let backend = common::start_mock_upstream("default-pool").await;

    let mut config = ProxyConfig::default();
    config.policy.threshold = 50;
    config.upstreams = vec![upstream("d1", "default", backend)];
    assert!(validate_config(&config).is_ok());

    let (proxy, shutdown) = common::start_proxy(config).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}", proxy))
        .send()
        .await
        .expect("proxy unreachable");

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        res.headers().get("x-priority-label").unwrap(),
        "allow",
        "one in-flight request stays at or below the threshold"
    );
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "default-pool");

    shutdown.trigger();
}

#[tokio::test]
async fn test_free_user_rejected_under_high_load() {
    let backend = common::start_mock_upstream("default-pool").await;

    // threshold 0: the request itself pushes active to 1
    let mut config = ProxyConfig::default();
    config.policy.threshold = 0;
    config.upstreams = vec![upstream("d1", "default", backend)];

    let (proxy, shutdown) = common::start_proxy(config).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}", proxy))
        .send()
        .await
        .expect("proxy unreachable");

    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(res.headers().get("x-priority-label").unwrap(), "reject");

    shutdown.trigger();
}

#[tokio::test]
async fn test_premium_user_throttled_under_high_load() {
    let backend = common::start_mock_upstream("default-pool").await;

    let mut config = ProxyConfig::default();
    config.policy.threshold = 0;
    config.throttle.requests_per_second = 1;
    config.throttle.burst_size = 2;
    config.upstreams = vec![upstream("d1", "default", backend)];

    let (proxy, shutdown) = common::start_proxy(config).await;
    let client = common::test_client();

    // Within the burst the premium caller is forwarded, only labelled.
    for _ in 0..2 {
        let res = client
            .get(format!("http://{}", proxy))
            .header("X-Premium-User", "true")
            .send()
            .await
            .expect("proxy unreachable");
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers().get("x-priority-label").unwrap(),
            "limit_premium"
        );
        assert_eq!(res.text().await.unwrap(), "default-pool");
    }

    // Past the burst the throttle refuses the request.
    let res = client
        .get(format!("http://{}", proxy))
        .header("X-Premium-User", "true")
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(
        res.headers().get("x-priority-label").unwrap(),
        "limit_premium"
    );

    shutdown.trigger();
}

#[tokio::test]
async fn test_header_only_routes_by_priority_header() {
    let fast = common::start_mock_upstream("fast-pool").await;
    let slow = common::start_mock_upstream("slow-pool").await;

    let mut config = ProxyConfig::default();
    config.policy.mode = PolicyMode::HeaderOnly;
    config.policy.header_name = "X-Priority".to_string();
    config.routes = vec![
        forward_route("high_priority_stream", "fast"),
        forward_route("low_priority_stream", "slow"),
    ];
    config.upstreams = vec![upstream("f1", "fast", fast), upstream("s1", "slow", slow)];
    assert!(validate_config(&config).is_ok());

    let (proxy, shutdown) = common::start_proxy(config).await;
    let client = common::test_client();

    // "High" in any case selects the high-priority pool
    let res = client
        .get(format!("http://{}", proxy))
        .header("X-Priority", "High")
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(
        res.headers().get("x-priority-label").unwrap(),
        "high_priority_stream"
    );
    assert_eq!(res.text().await.unwrap(), "fast-pool");

    // absent header defaults to the low-priority pool
    let res = client
        .get(format!("http://{}", proxy))
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(
        res.headers().get("x-priority-label").unwrap(),
        "low_priority_stream"
    );
    assert_eq!(res.text().await.unwrap(), "slow-pool");

    // "highest" is not an exact match and stays low priority
    let res = client
        .get(format!("http://{}", proxy))
        .header("X-Priority", "highest")
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(
        res.headers().get("x-priority-label").unwrap(),
        "low_priority_stream"
    );
    assert_eq!(res.text().await.unwrap(), "slow-pool");

    shutdown.trigger();
}

#[tokio::test]
async fn test_load_only_routes_by_threshold() {
    let fast = common::start_mock_upstream("fast-pool").await;
    let slow = common::start_mock_upstream("slow-pool").await;

    let make_config = |threshold: u64| {
        let mut config = ProxyConfig::default();
        config.policy.mode = PolicyMode::LoadOnly;
        config.policy.threshold = threshold;
        config.routes = vec![
            forward_route("high_priority_stream", "fast"),
            forward_route("low_priority_stream", "slow"),
        ];
        config.upstreams = vec![upstream("f1", "fast", fast), upstream("s1", "slow", slow)];
        config
    };

    // Generous threshold: a single request is normal load.
    let (proxy, shutdown) = common::start_proxy(make_config(100)).await;
    let client = common::test_client();
    let res = client
        .get(format!("http://{}", proxy))
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(
        res.headers().get("x-priority-label").unwrap(),
        "high_priority_stream"
    );
    assert_eq!(res.text().await.unwrap(), "fast-pool");
    shutdown.trigger();

    // Zero threshold: the request itself counts as high load.
    let (proxy, shutdown) = common::start_proxy(make_config(0)).await;
    let res = client
        .get(format!("http://{}", proxy))
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(
        res.headers().get("x-priority-label").unwrap(),
        "low_priority_stream"
    );
    assert_eq!(res.text().await.unwrap(), "slow-pool");
    shutdown.trigger();
}

#[tokio::test]
async fn test_unreachable_upstream_is_bad_gateway() {
    // Bind and drop a listener to get an address nothing serves.
    let dead = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead_addr = dead.local_addr().unwrap();
    drop(dead);

    let mut config = ProxyConfig::default();
    config.policy.threshold = 50;
    config.upstreams = vec![upstream("d1", "default", dead_addr)];

    let (proxy, shutdown) = common::start_proxy(config).await;
    let client = common::test_client();

    let res = client
        .get(format!("http://{}", proxy))
        .send()
        .await
        .expect("proxy unreachable");
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    // classification happened before the failed forward
    assert_eq!(res.headers().get("x-priority-label").unwrap(), "allow");

    shutdown.trigger();
}
