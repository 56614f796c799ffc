//! Order placement.
//!
//! Submitting an order spans the session (checkout, cart), the shared
//! profile and the order gateway, so it lives here rather than in a route.

use chrono::Utc;
use threadline_core::{CartAction, Checkout, CheckoutEvent, Order};
use tower_sessions::Session;

use crate::error::{AppError, Result};
use crate::services::cart_store;
use crate::services::gateway::OrderRequest;
use crate::state::AppState;

/// Load the checkout in progress.
///
/// # Errors
///
/// Returns [`AppError::NotFound`] when no checkout was started.
pub async fn current_checkout(session: &Session) -> Result<Checkout> {
    cart_store::load_checkout(session)
        .await?
        .ok_or_else(|| AppError::NotFound("checkout".to_string()))
}

/// Submit the checkout's order to the gateway.
///
/// On success the checkout moves to confirmation, the purchased lines leave
/// the cart and the order is appended to the profile. On a decline the
/// checkout stays in the payment step with the failure recorded.
///
/// Submissions from one session run one at a time, and each writes the
/// session back to the store before the next starts, so a repeated
/// submission finds the checkout already confirmed.
///
/// # Errors
///
/// Fails if no checkout is in progress, it is not in the payment step, the
/// chosen address no longer exists, or the gateway declines the order.
pub async fn place_order(state: &AppState, session: &Session) -> Result<(Checkout, Order)> {
    // A session without an ID has never been stored, so it holds no checkout
    let session_id = session
        .id()
        .ok_or_else(|| AppError::NotFound("checkout".to_string()))?;
    let _submission = state.lock_submission(session_id).await;

    let outcome = submit(state, session).await;
    if session.is_modified() {
        session.save().await?;
    }
    outcome
}

async fn submit(state: &AppState, session: &Session) -> Result<(Checkout, Order)> {
    let mut checkout = current_checkout(session).await?;
    let address_id = checkout.submission_address()?.clone();

    let address = state
        .profile()
        .read()
        .await
        .addresses()
        .get(&address_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("address {address_id}")))?;

    let request = OrderRequest {
        lines: checkout.lines().to_vec(),
        address,
        payment_method: checkout.payment_method(),
        quote: *checkout.quote(),
        note: checkout.note().map(str::to_owned),
    };

    let receipt = match state.gateway().submit(&request).await {
        Ok(receipt) => receipt,
        Err(err) => {
            checkout.apply(CheckoutEvent::OrderFailed(err.to_string()))?;
            cart_store::save_checkout(session, &checkout).await?;
            return Err(err.into());
        }
    };

    checkout.apply(CheckoutEvent::OrderPlaced(receipt.clone()))?;

    let order = Order::from_receipt(
        &receipt,
        Utc::now().date_naive(),
        checkout.lines(),
        checkout.quote().total,
    )
    .with_note(request.note);
    state.profile().write().await.record_order(order.clone());

    let mut cart = cart_store::load_cart(session).await?;
    cart.apply(CartAction::RemovePurchased(checkout.line_ids()))?;
    cart_store::save_cart(session, &cart).await?;
    cart_store::save_checkout(session, &checkout).await?;

    tracing::info!(
        order_number = %order.order_number,
        total = %order.total_amount.amount(),
        "Order placed"
    );

    Ok((checkout, order))
}
