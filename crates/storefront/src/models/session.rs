//! Session keys.
//!
//! Per-shopper state lives in the session. The cart is stored as two
//! values, both overwritten wholesale on every change.

/// Session keys for shopper data.
pub mod keys {
    /// Key for the cart's line items (`Vec<CartItem>`).
    pub const CART: &str = "cart";

    /// Key for the IDs of the lines selected for checkout.
    pub const CART_SELECTION: &str = "cart_selection";

    /// Key for the checkout in progress.
    pub const CHECKOUT: &str = "checkout";
}
