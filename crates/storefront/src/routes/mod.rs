//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Featured products and categories
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /categories/{slug}      - Category listing (?price=&sort=)
//! GET  /products/{slug}        - Product detail, related products, reviews
//!
//! # Cart
//! GET  /cart                   - Cart lines, selection and quote
//! POST /cart/add               - Add a product variant
//! POST /cart/update            - Set a line's quantity
//! POST /cart/remove            - Remove a line
//! POST /cart/select            - Select, deselect or toggle a line
//! POST /cart/select-all        - Select every line
//! POST /cart/clear-selection   - Deselect every line
//!
//! # Checkout
//! POST /checkout               - Begin from the current selection
//! GET  /checkout               - Current checkout
//! POST /checkout/address       - Choose a saved address
//! POST /checkout/address/new   - Save a new address and choose it
//! POST /checkout/payment-method - Choose cod or bank
//! POST /checkout/next          - Address to payment
//! POST /checkout/previous      - Payment to address
//! POST /checkout/place-order   - Submit the order
//!
//! # Account
//! GET  /account                - Profile overview
//! POST /account/personal-info  - Update name, email and phone
//! GET  /account/addresses      - Address list
//! POST /account/addresses      - Add an address
//! POST /account/addresses/{id}/default - Set the default address
//! GET  /account/orders         - Order history
//! GET  /account/orders/{id}    - Order detail
//! ```

pub mod account;
pub mod cart;
pub mod categories;
pub mod checkout;
pub mod home;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::error::AppError;
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/select", post(cart::select))
        .route("/select-all", post(cart::select_all))
        .route("/clear-selection", post(cart::clear_selection))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show).post(checkout::begin))
        .route("/address", post(checkout::select_address))
        .route("/address/new", post(checkout::add_address))
        .route("/payment-method", post(checkout::select_payment_method))
        .route("/next", post(checkout::next))
        .route("/previous", post(checkout::previous))
        .route("/place-order", post(checkout::place_order))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::index))
        .route("/personal-info", post(account::update_personal_info))
        .route(
            "/addresses",
            get(account::addresses).post(account::create_address),
        )
        .route("/addresses/{id}/default", post(account::set_default_address))
        .route("/orders", get(account::orders))
        .route("/orders/{id}", get(account::order))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/categories/{slug}", get(categories::show))
        .route("/products/{slug}", get(products::show))
        .nest("/cart", cart_routes())
        .nest("/checkout", checkout_routes())
        .nest("/account", account_routes())
        .fallback(not_found)
}

/// JSON 404 for unmatched paths.
async fn not_found(uri: axum::http::Uri) -> AppError {
    AppError::NotFound(format!("route {}", uri.path()))
}
