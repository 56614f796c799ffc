//! Threadline Core - Storefront domain library.
//!
//! This crate holds the business rules shared by every Threadline component:
//! - `storefront` - JSON HTTP storefront
//! - `cli` - Command-line tools for inspecting the catalog and quoting carts
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no sessions,
//! no HTTP. State changes go through explicit reducers ([`Cart::apply`],
//! [`Checkout::apply`]) so every caller sees the same rules.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, phones, and statuses
//! - [`catalog`] - Products, categories, filtering
//! - [`cart`] - Cart lines, selection, mutations
//! - [`pricing`] - Subtotal, discount, shipping and total
//! - [`checkout`] - Address → payment → confirmation state machine
//! - [`address`] - Address book with a single default
//! - [`order`] - Placed orders and order numbers
//! - [`profile`] - The shopper's account
//! - [`reviews`] - Product reviews and rating summaries
//! - [`validation`] - Form field validation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod address;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;
pub mod pricing;
pub mod profile;
pub mod reviews;
pub mod types;
pub mod validation;

pub use address::{Address, AddressBook, AddressError};
pub use cart::{Cart, CartAction, CartError, CartItem, VariantChoice};
pub use catalog::{Catalog, CatalogError, Category, Product, ProductFilter};
pub use checkout::{Checkout, CheckoutError, CheckoutEvent};
pub use order::{Order, OrderItem, OrderReceipt};
pub use pricing::{DiscountRule, PricingPolicy, Quote};
pub use profile::UserProfile;
pub use reviews::{ReviewStore, ReviewSummary};
pub use types::*;
pub use validation::{AddressInput, PersonalInfoInput, ValidationErrors};
