use chrono::{Duration as ChronoDuration, Utc};
use rust_decimal_macros::dec;
use std::time::Duration;
use trip_planner::config::RatesConfig;
use trip_planner::currency::{CurrencyPair, RateSource};
use trip_planner::error::Error;
use trip_planner::rates::cache::RateCache;
use trip_planner::rates::client::RateClient;
use trip_planner::rates::load_rates;
use trip_planner::rates::models::{RateOrigin, RateTable};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(api_url: &str) -> RatesConfig {
    RatesConfig {
        api_url: api_url.to_string(),
        max_retries: 1,
        retry_backoff_ms: 1,
        timeout_secs: 5,
        ..RatesConfig::default()
    }
}

fn latest_body() -> serde_json::Value {
    serde_json::json!({
        "provider": "https://www.exchangerate-api.com",
        "base": "TWD",
        "date": "2026-10-19",
        "time_last_updated": 1792368001,
        "rates": {
            "TWD": 1,
            "JPY": 4.71,
            "USD": 0.0311,
            "CNY": 0.2214,
            "KRW": 44.02,
            "EUR": 0.0287
        }
    })
}

#[tokio::test]
async fn test_fetch_latest_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/latest/TWD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(latest_body()))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let latest = tokio::task::spawn_blocking(move || {
        let client = RateClient::new(&uri, Duration::from_secs(5)).unwrap();
        client.fetch_latest("TWD")
    })
    .await
    .unwrap()
    .unwrap();

    assert_eq!(latest.base, "TWD");
    assert_eq!(latest.rates["JPY"], dec!(4.71));
    assert_eq!(latest.rates["KRW"], dec!(44.02));
}

#[tokio::test]
async fn test_fetch_latest_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/latest/TWD"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let uri = mock_server.uri();
    let err = tokio::task::spawn_blocking(move || {
        let client = RateClient::new("http://unused", Duration::from_secs(5))
            .unwrap()
            .with_base_url(&uri);
        client.fetch_latest("TWD")
    })
    .await
    .unwrap()
    .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<Error>(),
        Some(Error::RateService(503))
    ));
}

#[tokio::test]
async fn test_live_rates_are_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/latest/TWD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(latest_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = RateCache::in_dir(dir.path());
    let config = settings(&mock_server.uri());

    let (first, second) = tokio::task::spawn_blocking(move || {
        let client = RateClient::new(&config.api_url, config.timeout()).unwrap();
        let first = load_rates(&client, &cache, &config, false);
        // Fresh cache: no second request
        let second = load_rates(&client, &cache, &config, false);
        (first, second)
    })
    .await
    .unwrap();

    assert_eq!(first.origin, RateOrigin::Live);
    assert_eq!(first.rate(CurrencyPair::TwdJpy), Some(dec!(4.71)));
    assert_eq!(second.origin, RateOrigin::Cached);
    assert_eq!(second.rate(CurrencyPair::TwdUsd), Some(dec!(0.0311)));
    assert!(dir.path().join("rates.json").exists());
}

#[tokio::test]
async fn test_forced_refresh_bypasses_fresh_cache() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/latest/TWD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(latest_body()))
        .expect(1)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = RateCache::in_dir(dir.path());
    let mut fresh = RateTable::defaults();
    fresh.fetched_at = Some(Utc::now());
    cache.save(&fresh).unwrap();

    let config = settings(&mock_server.uri());
    let table = tokio::task::spawn_blocking(move || {
        let client = RateClient::new(&config.api_url, config.timeout()).unwrap();
        load_rates(&client, &cache, &config, true)
    })
    .await
    .unwrap();

    assert_eq!(table.origin, RateOrigin::Live);
    assert_eq!(table.rate(CurrencyPair::TwdCny), Some(dec!(0.2214)));
}

#[tokio::test]
async fn test_failure_falls_back_to_stale_cache() {
    let mock_server = MockServer::start().await;

    // One attempt plus one retry
    Mock::given(method("GET"))
        .and(path("/v4/latest/TWD"))
        .respond_with(ResponseTemplate::new(500))
        .expect(2)
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = RateCache::in_dir(dir.path());
    let mut stale = RateTable::defaults();
    stale.rates.insert("JPY".to_string(), dec!(4.5));
    stale.fetched_at = Some(Utc::now() - ChronoDuration::hours(3));
    cache.save(&stale).unwrap();

    let config = settings(&mock_server.uri());
    let table = tokio::task::spawn_blocking(move || {
        let client = RateClient::new(&config.api_url, config.timeout()).unwrap();
        load_rates(&client, &cache, &config, false)
    })
    .await
    .unwrap();

    assert_eq!(table.origin, RateOrigin::Cached);
    assert_eq!(table.rate(CurrencyPair::TwdJpy), Some(dec!(4.5)));
}

#[tokio::test]
async fn test_failure_without_cache_uses_defaults() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/latest/TWD"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = RateCache::in_dir(dir.path());
    let config = settings(&mock_server.uri());

    let table = tokio::task::spawn_blocking(move || {
        let client = RateClient::new(&config.api_url, config.timeout()).unwrap();
        load_rates(&client, &cache, &config, false)
    })
    .await
    .unwrap();

    assert_eq!(table.origin, RateOrigin::Default);
    assert_eq!(table.rate(CurrencyPair::TwdJpy), Some(dec!(4.32)));
    assert_eq!(table.rate(CurrencyPair::TwdKrw), Some(dec!(42.5)));
    assert!(!dir.path().join("rates.json").exists());
}

#[tokio::test]
async fn test_missing_codes_take_default_rates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v4/latest/TWD"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "base": "TWD",
            "rates": { "JPY": 4.8, "USD": 0 }
        })))
        .mount(&mock_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let cache = RateCache::in_dir(dir.path());
    let config = settings(&mock_server.uri());

    let table = tokio::task::spawn_blocking(move || {
        let client = RateClient::new(&config.api_url, config.timeout()).unwrap();
        load_rates(&client, &cache, &config, false)
    })
    .await
    .unwrap();

    assert_eq!(table.rate(CurrencyPair::TwdJpy), Some(dec!(4.8)));
    assert_eq!(table.rate(CurrencyPair::TwdUsd), Some(dec!(0.032)));
    assert_eq!(table.rate(CurrencyPair::TwdCny), Some(dec!(0.23)));
}
