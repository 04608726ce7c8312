use folio::AppCommand;
use folio::core::asset::{AssetDraft, AssetId, AssetType, AssetUpdateDraft};
use folio::core::error::LOAD_ASSETS_FAILED;
use serde_json::json;
use std::fs;
use tempfile::TempDir;
use tracing::info;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Adds automatic logging to test
mod test_utils {
    use super::*;

    pub fn assets_json() -> serde_json::Value {
        json!([
            {"id": 1, "symbol": "RELIANCE.NS", "asset_type": "Indian Stock",
             "purchase_price": 2500, "quantity": 10, "purchase_date": "2023-01-10"},
            {"id": 2, "symbol": "BTC", "asset_type": "Crypto",
             "purchase_price": 2500000, "quantity": 0.05, "purchase_date": "2024-01-01T00:00:00"}
        ])
    }

    pub async fn create_backend() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/assets"))
            .respond_with(ResponseTemplate::new(200).set_body_json(assets_json()))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/prices"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"BTC": 2700000.0, "RELIANCE.NS": null})),
            )
            .mount(&server)
            .await;
        server
    }

    /// Writes a config pointing at `server` and returns its directory and path.
    pub fn write_config(server: &MockServer) -> (TempDir, String) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("config.yaml");
        let config_content = format!(
            "api:\n  base_url: \"{}\"\nrefresh_interval_secs: 60\ncurrency_symbol: \"₹\"\n",
            server.uri()
        );
        fs::write(&config_path, config_content).expect("Failed to write config");
        let path = config_path.to_str().expect("Non UTF-8 path").to_string();
        (temp_dir, path)
    }

    pub async fn requests_to(server: &MockServer, verb: &str, url_path: &str) -> usize {
        server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|r| r.method.as_str() == verb && r.url.path() == url_path)
            .count()
    }
}

#[test_log::test(tokio::test)]
async fn test_summary_flow() {
    let server = test_utils::create_backend().await;
    let (_dir, config_path) = test_utils::write_config(&server);

    let result = folio::run_command(AppCommand::Summary, Some(&config_path)).await;
    assert!(result.is_ok(), "summary failed: {result:?}");

    assert_eq!(test_utils::requests_to(&server, "GET", "/assets").await, 1);
    assert_eq!(test_utils::requests_to(&server, "POST", "/api/prices").await, 1);
}

#[test_log::test(tokio::test)]
async fn test_list_fails_when_backend_is_down() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/assets"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let (_dir, config_path) = test_utils::write_config(&server);

    let err = folio::run_command(AppCommand::List { asset_type: None }, Some(&config_path))
        .await
        .unwrap_err();
    info!("List failed as expected: {err}");

    assert_eq!(err.to_string(), LOAD_ASSETS_FAILED);
    assert_eq!(test_utils::requests_to(&server, "POST", "/api/prices").await, 0);
}

#[test_log::test(tokio::test)]
async fn test_add_rejects_invalid_input() {
    let server = test_utils::create_backend().await;
    let (_dir, config_path) = test_utils::write_config(&server);

    let draft = AssetDraft {
        symbol: "tcs.ns".to_string(),
        asset_type: Some(AssetType::IndianStock),
        purchase_price: "abc".to_string(),
        quantity: "5".to_string(),
        purchase_date: "2024-02-01".to_string(),
    };
    let err = folio::run_command(AppCommand::Add(draft), Some(&config_path))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Purchase price must be a positive number.");
    assert!(server.received_requests().await.unwrap_or_default().is_empty());
}

#[test_log::test(tokio::test)]
async fn test_add_submits_and_reloads() {
    let server = test_utils::create_backend().await;
    Mock::given(method("POST"))
        .and(path("/assets"))
        .and(body_json(json!({
            "symbol": "TCS.NS",
            "asset_type": "Indian Stock",
            "purchase_price": 3500.0,
            "quantity": 5.0,
            "purchase_date": "2024-02-01"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 3, "symbol": "TCS.NS", "asset_type": "Indian Stock",
            "purchase_price": 3500, "quantity": 5, "purchase_date": "2024-02-01"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (_dir, config_path) = test_utils::write_config(&server);

    let draft = AssetDraft {
        symbol: " tcs.ns ".to_string(),
        asset_type: Some(AssetType::IndianStock),
        purchase_price: "3500".to_string(),
        quantity: "5".to_string(),
        purchase_date: "2024-02-01".to_string(),
    };
    folio::run_command(AppCommand::Add(draft), Some(&config_path))
        .await
        .unwrap();

    assert_eq!(test_utils::requests_to(&server, "GET", "/assets").await, 1);
}

#[test_log::test(tokio::test)]
async fn test_update_carries_symbol_without_repricing() {
    let server = test_utils::create_backend().await;
    Mock::given(method("PUT"))
        .and(path("/assets/2"))
        .and(body_partial_json(json!({"symbol": "BTC", "asset_type": "Crypto"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": 2, "symbol": "BTC", "asset_type": "Crypto",
            "purchase_price": 2600000, "quantity": 0.04, "purchase_date": "2024-01-02"
        })))
        .expect(1)
        .mount(&server)
        .await;
    let (_dir, config_path) = test_utils::write_config(&server);

    let changes = AssetUpdateDraft {
        purchase_price: "2600000".to_string(),
        quantity: "0.04".to_string(),
        purchase_date: "2024-01-02".to_string(),
    };
    folio::run_command(
        AppCommand::Update {
            id: AssetId::from(2),
            changes,
        },
        Some(&config_path),
    )
    .await
    .unwrap();

    assert_eq!(test_utils::requests_to(&server, "GET", "/assets").await, 1);
    assert_eq!(test_utils::requests_to(&server, "POST", "/api/prices").await, 0);
}

#[test_log::test(tokio::test)]
async fn test_bulk_delete_refetches_collection() {
    let server = test_utils::create_backend().await;
    Mock::given(method("DELETE"))
        .and(path("/assets"))
        .and(body_json(json!({"ids": ["1", "2"]})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "2 assets deleted successfully"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (_dir, config_path) = test_utils::write_config(&server);

    let ids = vec![AssetId::from(1), AssetId::from(2)];
    folio::run_command(AppCommand::Delete { ids }, Some(&config_path))
        .await
        .unwrap();

    assert_eq!(test_utils::requests_to(&server, "GET", "/assets").await, 1);
}

#[test_log::test(tokio::test)]
async fn test_failed_delete_reports_server_message() {
    let server = test_utils::create_backend().await;
    Mock::given(method("DELETE"))
        .and(path("/assets/9"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"error": "Asset not found"})))
        .mount(&server)
        .await;
    let (_dir, config_path) = test_utils::write_config(&server);

    let err = folio::run_command(
        AppCommand::Delete {
            ids: vec![AssetId::from(9)],
        },
        Some(&config_path),
    )
    .await
    .unwrap_err();

    assert_eq!(err.to_string(), "Failed to delete asset: Asset not found");
}

#[test_log::test(tokio::test)]
async fn test_single_price_lookup() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/prices/ETH"))
        .and(query_param("type", "Crypto"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"symbol": "ETH", "price": 210000.5})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (_dir, config_path) = test_utils::write_config(&server);

    folio::run_command(
        AppCommand::Price {
            symbol: "eth".to_string(),
            asset_type: AssetType::Crypto,
        },
        Some(&config_path),
    )
    .await
    .unwrap();
}

#[test_log::test(tokio::test)]
async fn test_forced_price_refresh_clears_cache() {
    let server = test_utils::create_backend().await;
    Mock::given(method("POST"))
        .and(path("/api/prices/refresh"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"status": "success", "message": "Price cache cleared"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    let (_dir, config_path) = test_utils::write_config(&server);

    folio::run_command(AppCommand::Prices { force: true }, Some(&config_path))
        .await
        .unwrap();

    assert_eq!(test_utils::requests_to(&server, "POST", "/api/prices").await, 1);
}

#[test_log::test(tokio::test)]
async fn test_symbols_with_partial_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/symbols/crypto"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([{"symbol": "btc", "name": "Bitcoin"}])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/symbols/us_stocks"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let (_dir, config_path) = test_utils::write_config(&server);

    // One catalogue answering is enough.
    folio::run_command(AppCommand::Symbols { asset_type: None }, Some(&config_path))
        .await
        .unwrap();

    let err = folio::run_command(
        AppCommand::Symbols {
            asset_type: Some(AssetType::UsStock),
        },
        Some(&config_path),
    )
    .await
    .unwrap_err();
    assert!(err.to_string().contains("HTTP error! status: 500"));
}
