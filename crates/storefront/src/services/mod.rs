//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart_store` - Session persistence for the cart and checkout
//! - `checkout` - Order placement across session, profile and gateway
//! - `gateway` - Order submission collaborator

pub mod cart_store;
pub mod checkout;
pub mod gateway;
