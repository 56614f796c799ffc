//! Session persistence for the cart and checkout.
//!
//! Every mutation writes the full line-item array and the selection set
//! back to the session. Loading re-applies the selection invariant, so a
//! stale selection entry never survives a round trip.

use threadline_core::{Cart, CartItem, Checkout, LineId};
use tower_sessions::Session;
use tower_sessions::session::Error as SessionError;

use crate::models::session_keys;

/// Load the shopper's cart. A missing cart is empty.
///
/// # Errors
///
/// Returns an error if the session store fails or holds malformed data.
pub async fn load_cart(session: &Session) -> Result<Cart, SessionError> {
    let items: Vec<CartItem> = session
        .get(session_keys::CART)
        .await?
        .unwrap_or_default();
    let selection: Vec<LineId> = session
        .get(session_keys::CART_SELECTION)
        .await?
        .unwrap_or_default();
    Ok(Cart::from_parts(items, selection))
}

/// Overwrite the stored cart.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_cart(session: &Session, cart: &Cart) -> Result<(), SessionError> {
    session.insert(session_keys::CART, cart.items()).await?;
    session
        .insert(session_keys::CART_SELECTION, cart.selection())
        .await
}

/// Load the checkout in progress, if any.
///
/// # Errors
///
/// Returns an error if the session store fails or holds malformed data.
pub async fn load_checkout(session: &Session) -> Result<Option<Checkout>, SessionError> {
    session.get(session_keys::CHECKOUT).await
}

/// Overwrite the stored checkout.
///
/// # Errors
///
/// Returns an error if the session store fails.
pub async fn save_checkout(session: &Session, checkout: &Checkout) -> Result<(), SessionError> {
    session.insert(session_keys::CHECKOUT, checkout).await
}
