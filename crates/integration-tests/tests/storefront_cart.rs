//! Integration tests for the session-backed cart.

#![allow(clippy::indexing_slicing, clippy::unwrap_used)]

use axum::http::StatusCode;
use serde_json::json;
use threadline_integration_tests::TestClient;

const TEE: &str = "ao-thun-co-tron-don-gian";
const JACKET: &str = "ao-khoac-du-unisex";
const HAT: &str = "non-bucket-unisex";

#[tokio::test]
async fn test_empty_cart() {
    let mut client = TestClient::new();

    let response = client.get("/cart").await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"], json!([]));
    assert_eq!(response.body["quote"]["subtotal_display"], "0₫");
    assert_eq!(response.body["quote"]["line_count"], 0);
}

#[tokio::test]
async fn test_small_order_pays_shipping() {
    let mut client = TestClient::new();

    let cart = client.add_to_cart(TEE, "M", "Đen", 1).await;

    assert_eq!(cart["quote"]["subtotal_display"], "185.000₫");
    assert_eq!(cart["quote"]["shipping_fee_display"], "30.000₫");
    assert_eq!(cart["quote"]["total_display"], "215.000₫");
    assert_eq!(cart["quote"]["free_shipping"], false);
}

#[tokio::test]
async fn test_free_shipping_over_threshold() {
    let mut client = TestClient::new();

    client.add_to_cart(TEE, "M", "Đen", 1).await;
    let cart = client.add_to_cart(JACKET, "L", "Xanh rêu", 2).await;

    // 185,000 + 2 × 355,000
    assert_eq!(cart["quote"]["subtotal_display"], "895.000₫");
    assert_eq!(cart["quote"]["free_shipping"], true);
    assert_eq!(cart["quote"]["total_display"], "895.000₫");
    assert_eq!(cart["total_quantity"], 3);
    assert_eq!(cart["all_selected"], true);
}

#[tokio::test]
async fn test_same_variant_merges() {
    let mut client = TestClient::new();

    client.add_to_cart(TEE, "M", "Đen", 1).await;
    let cart = client.add_to_cart(TEE, "M", "Đen", 2).await;

    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["items"][0]["quantity"], 3);
}

#[tokio::test]
async fn test_different_variants_are_separate_lines() {
    let mut client = TestClient::new();

    client.add_to_cart(TEE, "M", "Đen", 1).await;
    let cart = client.add_to_cart(TEE, "L", "Đen", 1).await;

    assert_eq!(cart["items"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_quantity_clamped_to_one() {
    let mut client = TestClient::new();

    let cart = client.add_to_cart(HAT, "Freesize", "Kem", -3).await;
    assert_eq!(cart["items"][0]["quantity"], 1);

    let line_id = cart["items"][0]["id"].clone();
    let response = client
        .post("/cart/update", json!({ "line_id": line_id, "quantity": 0 }))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["items"][0]["quantity"], 1);
}

#[tokio::test]
async fn test_missing_size_rejected() {
    let mut client = TestClient::new();

    let response = client
        .post("/cart/add", json!({ "slug": TEE, "color": "Đen" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(client.get("/cart").await.body["items"], json!([]));
}

#[tokio::test]
async fn test_unknown_product() {
    let mut client = TestClient::new();

    let response = client
        .post("/cart/add", json!({ "slug": "missing", "size": "M" }))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_line() {
    let mut client = TestClient::new();

    let response = client
        .post("/cart/remove", json!({ "line_id": "nope" }))
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_selection_drives_quote() {
    let mut client = TestClient::new();

    client.add_to_cart(TEE, "M", "Đen", 1).await;
    let cart = client.add_to_cart(JACKET, "L", "Đen", 1).await;
    let jacket_line = cart["items"][1]["id"].clone();

    let cart = client
        .post(
            "/cart/select",
            json!({ "line_id": jacket_line, "selected": false }),
        )
        .await
        .body;
    assert_eq!(cart["all_selected"], false);
    assert_eq!(cart["quote"]["subtotal_display"], "185.000₫");

    // Toggle back on
    let cart = client
        .post("/cart/select", json!({ "line_id": jacket_line }))
        .await
        .body;
    assert_eq!(cart["items"][1]["selected"], true);

    let cart = client.post_empty("/cart/clear-selection").await.body;
    // The flat fee applies to any subtotal under the threshold, zero included
    assert_eq!(cart["quote"]["subtotal_display"], "0₫");
    assert_eq!(cart["quote"]["shipping_fee_display"], "30.000₫");

    let cart = client.post_empty("/cart/select-all").await.body;
    assert_eq!(cart["quote"]["subtotal_display"], "540.000₫");
}

#[tokio::test]
async fn test_remove_drops_selection() {
    let mut client = TestClient::new();

    let cart = client.add_to_cart(TEE, "M", "Đen", 1).await;
    let line_id = cart["items"][0]["id"].clone();

    let cart = client
        .post("/cart/remove", json!({ "line_id": line_id }))
        .await
        .body;

    assert_eq!(cart["items"], json!([]));
    assert_eq!(cart["quote"]["line_count"], 0);
}

#[tokio::test]
async fn test_carts_are_per_session() {
    let mut client = TestClient::new();
    client.add_to_cart(TEE, "M", "Đen", 1).await;

    let mut other = client.other_shopper();
    let response = other.get("/cart").await;

    assert_eq!(response.body["items"], json!([]));
    assert_eq!(client.get("/cart").await.body["total_quantity"], 1);
}
