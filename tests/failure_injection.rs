//! Failure injection tests: dead neighbours, slow or failing generation
//! service, missing credentials.

use axum::http::StatusCode;
use hop_relay::Shutdown;
use serde_json::Value;
use std::time::Duration;

mod common;
use common::{header, HOP_PATH};

fn log_of(response: &reqwest::Response) -> Vec<Value> {
    serde_json::from_str::<Value>(&header(response, "x-hop-log"))
        .unwrap()
        .as_array()
        .unwrap()
        .clone()
}

#[tokio::test]
async fn unreachable_next_hop_is_bad_gateway() {
    let dead = common::unused_url().await;
    let (listener, base) = common::bind().await;
    let url = format!("{}{}", base, HOP_PATH);

    let shutdown = Shutdown::new();
    common::start_hop(listener, common::hop_config("A", Some(&dead), None), &shutdown).await;

    let response = common::client().post(&url).body("seed").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(header(&response, "x-hop-chain"), "A(forward)");
    assert_eq!(header(&response, "access-control-allow-origin"), "*");

    let log = log_of(&response);
    assert_eq!(log.len(), 2);
    assert_eq!(log[0]["hop"], "A");
    assert_eq!(log[1]["hop"], "A");
    assert_eq!(log[1]["target"], dead.as_str());
    assert!(log[1]["error"].as_str().is_some());

    let body = response.text().await.unwrap();
    assert!(body.contains("Failed to reach hop"));

    shutdown.trigger();
}

#[tokio::test]
async fn unreachable_generation_service_is_bad_gateway() {
    let dead = common::unused_url().await;
    let (listener, base) = common::bind().await;
    let url = format!("{}{}", base, HOP_PATH);

    let shutdown = Shutdown::new();
    common::start_hop(
        listener,
        common::with_generation(common::hop_config("C", None, None), &dead),
        &shutdown,
    )
    .await;

    let response = common::client().post(&url).body("seed").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let log = log_of(&response);
    assert_eq!(log.len(), 2);
    assert_eq!(log[1]["target"], dead.as_str());
    assert_eq!(response.text().await.unwrap(), "Failed to reach generation service");

    shutdown.trigger();
}

#[tokio::test]
async fn slow_generation_service_times_out() {
    let (generation, calls) = common::start_mock_generation(
        common::MockGeneration::replying("late").delayed(Duration::from_secs(5)),
    )
    .await;
    let (listener, base) = common::bind().await;
    let url = format!("{}{}", base, HOP_PATH);

    let mut config = common::with_generation(common::hop_config("C", None, None), &generation);
    config.timeouts.outbound_secs = 1;

    let shutdown = Shutdown::new();
    common::start_hop(listener, config, &shutdown).await;

    let response = common::client().post(&url).body("seed").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(calls.lock().unwrap().len(), 1);
    assert_eq!(log_of(&response).len(), 2);

    shutdown.trigger();
}

#[tokio::test]
async fn missing_api_key_is_server_error() {
    let (listener, base) = common::bind().await;
    let url = format!("{}{}", base, HOP_PATH);

    let shutdown = Shutdown::new();
    common::start_hop(listener, common::hop_config("C", None, None), &shutdown).await;

    let response = common::client().post(&url).body("seed").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(header(&response, "x-hop-chain"), "C(forward)");
    assert_eq!(log_of(&response).len(), 1);
    assert!(response.text().await.unwrap().contains("API key"));

    shutdown.trigger();
}

#[tokio::test]
async fn invalid_direction_sends_nothing_onward() {
    let (generation, calls) =
        common::start_mock_generation(common::MockGeneration::replying("never")).await;
    let (listener, base) = common::bind().await;
    let url = format!("{}{}", base, HOP_PATH);

    let shutdown = Shutdown::new();
    common::start_hop(
        listener,
        common::with_generation(common::hop_config("C", None, None), &generation),
        &shutdown,
    )
    .await;

    let response = common::client()
        .post(&url)
        .header("x-direction", "sideways")
        .body("seed")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.headers().get("x-hop-chain").is_none());
    assert_eq!(response.text().await.unwrap(), "Invalid direction state");
    assert!(calls.lock().unwrap().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn generation_error_is_relayed_and_summarized() {
    let (generation, _calls) = common::start_mock_generation(common::MockGeneration::raw(
        StatusCode::TOO_MANY_REQUESTS,
        r#"{"error":{"message":"rate limited"}}"#,
    ))
    .await;

    let (la, base_a) = common::bind().await;
    let (lb, base_b) = common::bind().await;
    let url_a = format!("{}{}", base_a, HOP_PATH);
    let url_b = format!("{}{}", base_b, HOP_PATH);

    let shutdown = Shutdown::new();
    common::start_hop(la, common::hop_config("A", Some(&url_b), None), &shutdown).await;
    common::start_hop(
        lb,
        common::with_generation(common::hop_config("B", None, Some(&url_a)), &generation),
        &shutdown,
    )
    .await;

    let response = common::client().post(&url_a).body("seed").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let summary: Value = response.json().await.unwrap();
    assert_eq!(summary["openrouter_response"]["error"]["message"], "rate limited");
    assert_eq!(summary["assistant_text"], "(no assistant message found)");

    shutdown.trigger();
}

#[tokio::test]
async fn dead_return_path_surfaces_at_origin() {
    let (generation, _calls) =
        common::start_mock_generation(common::MockGeneration::replying("lost")).await;
    let dead = common::unused_url().await;

    let (la, base_a) = common::bind().await;
    let (lb, base_b) = common::bind().await;
    let (lc, base_c) = common::bind().await;
    let url_b = format!("{}{}", base_b, HOP_PATH);
    let url_c = format!("{}{}", base_c, HOP_PATH);
    let url_a = format!("{}{}", base_a, HOP_PATH);

    let shutdown = Shutdown::new();
    common::start_hop(la, common::hop_config("A", Some(&url_b), None), &shutdown).await;
    // B returns towards a hop that does not exist.
    common::start_hop(lb, common::hop_config("B", Some(&url_c), Some(&dead)), &shutdown).await;
    common::start_hop(
        lc,
        common::with_generation(common::hop_config("C", None, Some(&url_b)), &generation),
        &shutdown,
    )
    .await;

    let response = common::client().post(&url_a).body("seed").send().await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        header(&response, "x-hop-chain"),
        "A(forward),B(forward),C(forward),B(return)"
    );
    let log = log_of(&response);
    let last = log.last().unwrap();
    assert_eq!(last["hop"], "B");
    assert_eq!(last["target"], dead.as_str());

    shutdown.trigger();
}

#[tokio::test]
async fn delay_applies_on_forward_only() {
    let (listener, base) = common::bind().await;
    let url = format!("{}{}", base, HOP_PATH);

    let mut config = common::hop_config("slow", None, None);
    config.hop.delay_ms = 1500;

    let shutdown = Shutdown::new();
    common::start_hop(listener, config, &shutdown).await;

    let started = std::time::Instant::now();
    let response = common::client()
        .post(&url)
        .header("x-direction", "return")
        .body("{}")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(started.elapsed() < Duration::from_millis(1500));

    let summary: Value = response.json().await.unwrap();
    assert_eq!(summary["hop_log"][0]["delay_ms"], 1500);

    let started = std::time::Instant::now();
    let response = common::client().post(&url).body("seed").send().await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(started.elapsed() >= Duration::from_millis(1500));

    shutdown.trigger();
}
