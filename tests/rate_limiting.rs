//! Rate limiting behavior through a running gateway.

use std::time::Duration;

use blog_gateway::GatewayConfig;

mod common;
use common::{client, start_gateway};

#[tokio::test]
async fn sixth_login_attempt_in_a_window_is_rejected() {
    let gateway = start_gateway(GatewayConfig::default()).await;
    let client = client();
    let url = format!("http://{}/login", gateway.addr);

    for attempt in 1..=5 {
        let res = client.post(&url).send().await.unwrap();
        assert_eq!(res.status(), 200, "attempt {} should reach the app", attempt);
        assert_eq!(res.text().await.unwrap(), "login ok");
    }

    let res = client.post(&url).send().await.unwrap();
    assert_eq!(res.status(), 429);
    assert_eq!(
        res.text().await.unwrap(),
        "Too many login attempts. Please try again later."
    );
}

#[tokio::test]
async fn throttled_api_requests_get_a_json_error() {
    let gateway = start_gateway(GatewayConfig::default()).await;
    let client = client();
    let url = format!("http://{}/api/search", gateway.addr);

    for _ in 0..30 {
        let res = client.get(&url).send().await.unwrap();
        assert_eq!(res.status(), 200);
    }

    let res = client.get(&url).send().await.unwrap();
    assert_eq!(res.status(), 429);
    assert_eq!(
        res.headers().get("content-type").unwrap(),
        "application/json"
    );
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["error"], "Rate limit exceeded");
}

#[tokio::test]
async fn throttled_comments_get_the_slow_down_body() {
    let mut config = GatewayConfig::default();
    config.rate_limit.comment.limit = 2;
    let gateway = start_gateway(config).await;
    let client = client();
    let url = format!("http://{}/post/pho-in-hanoi", gateway.addr);

    for _ in 0..2 {
        assert_eq!(client.post(&url).send().await.unwrap().status(), 200);
    }

    let res = client.post(&url).send().await.unwrap();
    assert_eq!(res.status(), 429);
    assert_eq!(res.text().await.unwrap(), "Too many requests. Please slow down.");
}

#[tokio::test]
async fn categories_have_independent_budgets() {
    let gateway = start_gateway(GatewayConfig::default()).await;
    let client = client();

    // Exhaust the login budget for this address.
    let login_url = format!("http://{}/login", gateway.addr);
    for _ in 0..6 {
        client.post(&login_url).send().await.unwrap();
    }
    let res = client.post(&login_url).send().await.unwrap();
    assert_eq!(res.status(), 429);

    // The same address's other budgets are untouched.
    let res = client
        .get(format!("http://{}/api/search", gateway.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = client
        .post(format!("http://{}/post/pho-in-hanoi", gateway.addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn window_expiry_grants_a_fresh_budget() {
    let mut config = GatewayConfig::default();
    config.rate_limit.login.limit = 2;
    config.rate_limit.login.window_ms = 200;
    let gateway = start_gateway(config).await;
    let client = client();
    let url = format!("http://{}/login", gateway.addr);

    for _ in 0..2 {
        assert_eq!(client.post(&url).send().await.unwrap().status(), 200);
    }
    assert_eq!(client.post(&url).send().await.unwrap().status(), 429);

    tokio::time::sleep(Duration::from_millis(300)).await;

    // Count restarts at 1, not cumulative.
    assert_eq!(client.post(&url).send().await.unwrap().status(), 200);
    assert_eq!(client.post(&url).send().await.unwrap().status(), 200);
    assert_eq!(client.post(&url).send().await.unwrap().status(), 429);
}

#[tokio::test]
async fn distinct_client_addresses_get_distinct_buckets() {
    let gateway = start_gateway(GatewayConfig::default()).await;
    let client = client();
    let url = format!("http://{}/login", gateway.addr);

    // Headerless requests all share the "unknown" bucket.
    for _ in 0..6 {
        client.post(&url).send().await.unwrap();
    }
    assert_eq!(client.post(&url).send().await.unwrap().status(), 429);

    // A request carrying a proxy-resolved address lands in its own bucket.
    let res = client
        .post(&url)
        .header("cf-connecting-ip", "203.0.113.9")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = client
        .post(&url)
        .header("x-forwarded-for", "198.51.100.7, 10.0.0.1")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn unthrottled_routes_ignore_the_limiter() {
    let mut config = GatewayConfig::default();
    config.rate_limit.api.limit = 1;
    let gateway = start_gateway(config).await;
    let client = client();
    let url = format!("http://{}/", gateway.addr);

    for _ in 0..10 {
        assert_eq!(client.get(&url).send().await.unwrap().status(), 200);
    }
}
