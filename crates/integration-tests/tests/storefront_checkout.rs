//! Integration tests for the checkout flow and order placement.

#![allow(clippy::indexing_slicing, clippy::unwrap_used)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use axum::http::StatusCode;
use serde_json::json;
use threadline_core::{OrderId, OrderReceipt};
use threadline_integration_tests::{TestClient, test_config};
use threadline_storefront::services::gateway::{
    DECLINED_MESSAGE, GatewayError, OrderGateway, OrderRequest,
};

const TEE: &str = "ao-thun-co-tron-don-gian";
const HAT: &str = "non-bucket-unisex";

/// Declines the first submission, accepts the rest.
struct FlakyGateway {
    failed_once: AtomicBool,
}

#[async_trait]
impl OrderGateway for FlakyGateway {
    async fn submit(&self, _request: &OrderRequest) -> Result<OrderReceipt, GatewayError> {
        if self.failed_once.swap(true, Ordering::SeqCst) {
            Ok(OrderReceipt {
                order_id: OrderId::new("ord-retry"),
                order_number: "DH-424242".to_string(),
            })
        } else {
            Err(GatewayError::Declined("try again".to_string()))
        }
    }
}

/// Cart with two tees (selected) and a hat (deselected).
async fn shopper_with_cart(client: &mut TestClient) {
    client.add_to_cart(TEE, "M", "Đen", 2).await;
    let cart = client.add_to_cart(HAT, "Freesize", "Kem", 1).await;
    let hat_line = cart["items"][1]["id"].clone();
    let response = client
        .post(
            "/cart/select",
            json!({ "line_id": hat_line, "selected": false }),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_full_checkout() {
    let mut client = TestClient::new();
    shopper_with_cart(&mut client).await;

    let begin = client.post_empty("/checkout").await;
    assert_eq!(begin.status, StatusCode::CREATED);
    assert_eq!(begin.body["step"], "address");
    assert_eq!(begin.body["address"]["id"], "addr1");
    assert_eq!(begin.body["payment_method"], "cod");
    assert_eq!(begin.body["lines"].as_array().unwrap().len(), 1);
    assert_eq!(begin.body["quote"]["total_display"], "370.000₫");

    let payment = client.post_empty("/checkout/next").await;
    assert_eq!(payment.status, StatusCode::OK);
    assert_eq!(payment.body["step"], "payment");

    let bank = client
        .post("/checkout/payment-method", json!({ "method": "bank" }))
        .await;
    assert_eq!(bank.body["payment_method"], "bank");

    let placed = client.post_empty("/checkout/place-order").await;
    assert_eq!(placed.status, StatusCode::CREATED, "{}", placed.body);
    assert_eq!(placed.body["checkout"]["step"], "confirmation");
    assert_eq!(placed.body["checkout"]["receipt"]["order_number"], "DH-001237");
    assert_eq!(placed.body["order"]["id"], "ord4");
    assert_eq!(placed.body["order"]["orderNumber"], "DH-001237");
    assert_eq!(placed.body["order"]["status"], "processing");
    assert_eq!(placed.body["order"]["items"][0]["quantity"], 2);

    // Only the purchased line leaves the cart
    let cart = client.get("/cart").await.body;
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["product_id"], "8");
    assert_eq!(cart["items"][0]["selected"], false);

    let orders = client.get("/account/orders").await.body;
    assert_eq!(orders.as_array().unwrap().len(), 4);
    assert_eq!(orders[0]["order_number"], "DH-001237");
    assert_eq!(orders[0]["total_display"], "370.000₫");

    let order = client.get("/account/orders/ord4").await;
    assert_eq!(order.status, StatusCode::OK);
}

#[tokio::test]
async fn test_repeated_submission_places_one_order() {
    let mut config = test_config();
    config.orders.latency = Duration::from_millis(200);
    let mut client = TestClient::with_config(config);
    shopper_with_cart(&mut client).await;
    client.post_empty("/checkout").await;
    client.post_empty("/checkout/next").await;
    let mut other_tab = client.same_shopper();

    let (first, second) = tokio::join!(
        client.post_empty("/checkout/place-order"),
        other_tab.post_empty("/checkout/place-order"),
    );

    let mut statuses = [first.status.as_u16(), second.status.as_u16()];
    statuses.sort_unstable();
    assert_eq!(statuses, [201, 409]);

    let orders = client.get("/account/orders").await.body;
    let numbers: Vec<&str> = orders
        .as_array()
        .unwrap()
        .iter()
        .map(|o| o["order_number"].as_str().unwrap())
        .collect();
    assert_eq!(numbers, vec!["DH-001237", "DH-001236", "DH-001235", "DH-001234"]);
    assert_eq!(client.get("/checkout").await.body["step"], "confirmation");
}

#[tokio::test]
async fn test_delivery_note_reaches_order() {
    let mut client = TestClient::new();
    shopper_with_cart(&mut client).await;
    client.post_empty("/checkout").await;

    let chosen = client
        .post(
            "/checkout/address",
            json!({ "address_id": "addr2", "note": "Gọi trước khi giao" }),
        )
        .await;
    assert_eq!(chosen.status, StatusCode::OK);
    assert_eq!(chosen.body["note"], "Gọi trước khi giao");

    // Changing the address alone keeps the note
    let kept = client
        .post("/checkout/address", json!({ "address_id": "addr1" }))
        .await;
    assert_eq!(kept.body["note"], "Gọi trước khi giao");

    client.post_empty("/checkout/next").await;
    let late = client
        .post(
            "/checkout/address",
            json!({ "address_id": "addr1", "note": "muộn" }),
        )
        .await;
    assert_eq!(late.status, StatusCode::CONFLICT);

    let placed = client.post_empty("/checkout/place-order").await;
    assert_eq!(placed.status, StatusCode::CREATED);
    assert_eq!(placed.body["order"]["note"], "Gọi trước khi giao");

    let order = client.get("/account/orders/ord4").await.body;
    assert_eq!(order["note"], "Gọi trước khi giao");
}

#[tokio::test]
async fn test_note_with_new_address() {
    let mut client = TestClient::new();
    shopper_with_cart(&mut client).await;
    client.post_empty("/checkout").await;

    let created = client
        .post(
            "/checkout/address/new",
            json!({
                "full_name": "Trần Thị B",
                "phone": "0987654321",
                "address": "12 Nguyễn Trãi",
                "city": "Hà Nội",
                "note": "Để ở bảo vệ",
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["address"]["id"], "addr3");
    assert_eq!(created.body["note"], "Để ở bảo vệ");
}

#[tokio::test]
async fn test_bank_transfer_details() {
    let mut client = TestClient::new();
    shopper_with_cart(&mut client).await;

    let begin = client.post_empty("/checkout").await;
    assert!(begin.body["bank_transfer"].is_null());

    let bank = client
        .post("/checkout/payment-method", json!({ "method": "bank" }))
        .await;
    assert_eq!(bank.body["bank_transfer"]["bank_name"], "VCB - Vietcombank");
    assert_eq!(bank.body["bank_transfer"]["account_number"], "1234567890");
    assert_eq!(
        bank.body["bank_transfer"]["transfer_reference"],
        "Thanh toan don hang online"
    );

    client.post_empty("/checkout/next").await;
    let placed = client.post_empty("/checkout/place-order").await;
    assert_eq!(
        placed.body["checkout"]["bank_transfer"]["account_holder"],
        "CÔNG TY TNHH XYZ"
    );

    let mut cod_client = TestClient::new();
    shopper_with_cart(&mut cod_client).await;
    cod_client.post_empty("/checkout").await;
    let cod = cod_client
        .post("/checkout/payment-method", json!({ "method": "cod" }))
        .await;
    assert!(cod.body["bank_transfer"].is_null());
}

#[tokio::test]
async fn test_order_numbers_increase() {
    let mut client = TestClient::new();

    for expected in ["DH-001237", "DH-001238"] {
        client.add_to_cart(HAT, "Freesize", "Đen", 1).await;
        client.post_empty("/checkout").await;
        client.post_empty("/checkout/next").await;
        let placed = client.post_empty("/checkout/place-order").await;
        assert_eq!(placed.body["order"]["orderNumber"], expected);
    }
}

#[tokio::test]
async fn test_confirmation_is_terminal() {
    let mut client = TestClient::new();
    client.add_to_cart(HAT, "Freesize", "Kem", 1).await;
    client.post_empty("/checkout").await;
    client.post_empty("/checkout/next").await;
    client.post_empty("/checkout/place-order").await;

    for path in ["/checkout/next", "/checkout/previous", "/checkout/place-order"] {
        let response = client.post_empty(path).await;
        assert_eq!(response.status, StatusCode::CONFLICT, "{path}");
    }
    assert_eq!(client.get("/account").await.body["order_count"], 4);
}

#[tokio::test]
async fn test_empty_selection_redirects_to_cart() {
    let mut client = TestClient::new();

    let response = client.post_empty("/checkout").await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["redirect"], "/cart");

    client.add_to_cart(TEE, "S", "Xám", 1).await;
    client.post_empty("/cart/clear-selection").await;
    let response = client.post_empty("/checkout").await;
    assert_eq!(response.status, StatusCode::CONFLICT);
    assert_eq!(response.body["redirect"], "/cart");
}

#[tokio::test]
async fn test_no_checkout_in_progress() {
    let mut client = TestClient::new();

    assert_eq!(client.get("/checkout").await.status, StatusCode::NOT_FOUND);
    assert_eq!(
        client.post_empty("/checkout/next").await.status,
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn test_step_guards() {
    let mut client = TestClient::new();
    shopper_with_cart(&mut client).await;
    client.post_empty("/checkout").await;

    // No way back from the first step, no submission before payment
    assert_eq!(
        client.post_empty("/checkout/previous").await.status,
        StatusCode::CONFLICT
    );
    assert_eq!(
        client.post_empty("/checkout/place-order").await.status,
        StatusCode::CONFLICT
    );

    client.post_empty("/checkout/next").await;

    // Payment only moves forward by submitting
    assert_eq!(
        client.post_empty("/checkout/next").await.status,
        StatusCode::CONFLICT
    );
    let back = client.post_empty("/checkout/previous").await;
    assert_eq!(back.status, StatusCode::OK);
    assert_eq!(back.body["step"], "address");
}

#[tokio::test]
async fn test_choose_saved_address() {
    let mut client = TestClient::new();
    shopper_with_cart(&mut client).await;
    client.post_empty("/checkout").await;

    let response = client
        .post("/checkout/address", json!({ "address_id": "addr2" }))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["address"]["id"], "addr2");

    let response = client
        .post("/checkout/address", json!({ "address_id": "addr9" }))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_new_address_during_checkout() {
    let mut client = TestClient::new();
    shopper_with_cart(&mut client).await;
    client.post_empty("/checkout").await;

    let invalid = client
        .post(
            "/checkout/address/new",
            json!({ "full_name": "", "phone": "123", "address": "", "city": "" }),
        )
        .await;
    assert_eq!(invalid.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(invalid.body["errors"]["full_name"].is_string());
    assert!(invalid.body["errors"]["phone"].is_string());

    let created = client
        .post(
            "/checkout/address/new",
            json!({
                "full_name": "Trần Thị B",
                "phone": "0987654321",
                "address": "12 Nguyễn Trãi",
                "district": "Thanh Xuân",
                "city": "Hà Nội",
            }),
        )
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["address"]["id"], "addr3");
    assert_eq!(created.body["address"]["isDefault"], false);

    let addresses = client.get("/account/addresses").await.body;
    assert_eq!(addresses.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_declined_order_stays_in_payment() {
    let mut config = test_config();
    config.orders.decline = true;
    let mut client = TestClient::with_config(config);
    shopper_with_cart(&mut client).await;
    client.post_empty("/checkout").await;
    client.post_empty("/checkout/next").await;

    let response = client.post_empty("/checkout/place-order").await;
    assert_eq!(response.status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(response.body["error"], DECLINED_MESSAGE);

    let checkout = client.get("/checkout").await.body;
    assert_eq!(checkout["step"], "payment");
    assert_eq!(checkout["last_failure"], DECLINED_MESSAGE);

    // Nothing was bought
    assert_eq!(client.get("/cart").await.body["items"].as_array().unwrap().len(), 2);
    assert_eq!(client.get("/account").await.body["order_count"], 3);
}

#[tokio::test]
async fn test_retry_after_decline() {
    let mut client = TestClient::with_gateway(Arc::new(FlakyGateway {
        failed_once: AtomicBool::new(false),
    }));
    shopper_with_cart(&mut client).await;
    client.post_empty("/checkout").await;
    client.post_empty("/checkout/next").await;

    let first = client.post_empty("/checkout/place-order").await;
    assert_eq!(first.status, StatusCode::PAYMENT_REQUIRED);
    assert_eq!(first.body["error"], "try again");

    let second = client.post_empty("/checkout/place-order").await;
    assert_eq!(second.status, StatusCode::CREATED);
    assert_eq!(second.body["order"]["orderNumber"], "DH-424242");
    assert!(second.body["checkout"]["last_failure"].is_null());
}
