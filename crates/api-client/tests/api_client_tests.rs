//! HTTP contract tests for the quote API client, against a local mock server.

use devis_api_client::ApiClient;
use devis_core::clients::{Client, ClientRepositoryTrait, NewSite};
use devis_core::errors::{Error, PersistenceError};
use devis_core::fx::{ExchangeRateProviderTrait, FxError};
use devis_core::quotes::{QuotePersistenceTrait, SupplyItem};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn quote_json(id: &str, confirmed: bool) -> Value {
    json!({
        "id": id,
        "client": "0003",
        "site": "Hôtel Corniche",
        "object": "Remplacement centrale",
        "date": "2024-03-14",
        "supplyPricing": {
            "fromCurrency": "EUR",
            "toCurrency": "TND",
            "exchangeRate": 3.35,
            "marginRate": 0.2
        },
        "laborPricing": {
            "fromCurrency": "TND",
            "toCurrency": "TND",
            "exchangeRate": 1,
            "marginRate": 0.2
        },
        "supplyItems": [],
        "laborItems": [],
        "totalSuppliesHT": 0,
        "totalLaborHT": 0,
        "totalHT": 0,
        "tva": 0,
        "totalTTC": 0,
        "vatRate": 0.19,
        "createdAt": "2024-03-14T09:00:00",
        "updatedAt": "2024-03-14T09:00:00",
        "version": 0,
        "parentId": "0",
        "confirmed": confirmed
    })
}

async fn client_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), Some("secret")).unwrap()
}

#[tokio::test]
async fn test_get_quote_decodes_legacy_parent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quotes/P-00000042"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_json("P-00000042", false)))
        .expect(1)
        .mount(&server)
        .await;

    let quote = client_for(&server)
        .await
        .get_quote_by_id("P-00000042")
        .await
        .unwrap();

    assert_eq!(quote.id, "P-00000042");
    assert_eq!(quote.parent_id, None);
    assert_eq!(quote.supply_pricing.exchange_rate, dec!(3.35));
}

#[tokio::test]
async fn test_missing_quote_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quotes/P-00000404"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "No such quote"})))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .get_quote_by_id("P-00000404")
        .await
        .unwrap_err();

    assert!(err.is_not_found());
    assert!(matches!(
        err,
        Error::Persistence(PersistenceError::NotFound(ref message)) if message == "No such quote"
    ));
}

#[tokio::test]
async fn test_server_error_keeps_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/quotes"))
        .respond_with(ResponseTemplate::new(500).set_body_string("database unavailable"))
        .mount(&server)
        .await;

    let quote: devis_core::quotes::Quote =
        serde_json::from_value(quote_json("P-00000001", false)).unwrap();
    let err = client_for(&server).await.save_quote(&quote).await.unwrap_err();

    assert!(matches!(
        err,
        Error::Persistence(PersistenceError::Server { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quotes/P-00000001"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .get_quote_by_id("P-00000001")
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Persistence(PersistenceError::Decode(_))));
}

#[tokio::test]
async fn test_create_supply_item_posts_to_quote() {
    let server = MockServer::start().await;
    let item = SupplyItem {
        id: "k1".to_string(),
        description: "Split mural".to_string(),
        reference: None,
        source_price: dec!(100),
        quantity: dec!(3),
        converted_cost: dec!(120),
        unit_sell_price: dec!(150),
        line_total: dec!(450),
    };
    Mock::given(method("POST"))
        .and(path("/quotes/P-00000042/supplies"))
        .respond_with(ResponseTemplate::new(201).set_body_json(&item))
        .expect(1)
        .mount(&server)
        .await;

    let stored = client_for(&server)
        .await
        .create_supply_item("P-00000042", &item)
        .await
        .unwrap();

    assert_eq!(stored, item);
}

#[tokio::test]
async fn test_confirm_sends_reference_number() {
    let server = MockServer::start().await;
    Mock::given(method("PATCH"))
        .and(path("/quotes/P-00000042/confirm"))
        .and(body_json(json!({"confirmed": true, "referenceNumber": "BC-2024-7"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(quote_json("P-00000042", true)))
        .expect(1)
        .mount(&server)
        .await;

    let quote = client_for(&server)
        .await
        .confirm_quote("P-00000042", true, "BC-2024-7")
        .await
        .unwrap();

    assert!(quote.confirmed);
}

#[tokio::test]
async fn test_delete_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/quotes/P-00000042"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server)
        .await
        .delete_quote("P-00000042")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_exchange_rate_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exchange-rates"))
        .and(query_param("from", "EUR"))
        .and(query_param("to", "TND"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rate": 3.41})))
        .mount(&server)
        .await;

    let rate = client_for(&server)
        .await
        .get_exchange_rate("EUR", "TND")
        .await
        .unwrap();

    assert_eq!(rate.rate, dec!(3.41));
    assert_eq!(rate.source, "API");
    assert!(!rate.is_fallback());
}

#[tokio::test]
async fn test_duplicate_client_is_conflict() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clients"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({"error": "duplicate id"})))
        .mount(&server)
        .await;

    let client = Client {
        id: "0004".to_string(),
        name: "STEG".to_string(),
        margin_rate: Decimal::new(2, 1),
        email: None,
        phone: None,
        address: None,
    };
    let err = client_for(&server)
        .await
        .create_client(&client)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Persistence(PersistenceError::Conflict(_))
    ));
}

#[tokio::test]
async fn test_create_site_nests_under_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clients/0004/sites"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "site-9",
            "clientId": "0004",
            "name": "Poste Bir Kassaa"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let site = client_for(&server)
        .await
        .create_site(&NewSite {
            client_id: "0004".to_string(),
            name: "Poste Bir Kassaa".to_string(),
            address: None,
        })
        .await
        .unwrap();

    assert_eq!(site.id, "site-9");
    assert_eq!(site.address, None);
}

#[tokio::test]
async fn test_unknown_pair_is_rate_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/exchange-rates"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .await
        .get_exchange_rate("USD", "CDF")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Fx(FxError::RateNotFound(ref pair)) if pair == "USD/CDF"
    ));
}
