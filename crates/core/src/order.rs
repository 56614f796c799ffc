//! Placed orders.
//!
//! Orders are immutable once created. The storefront only ever appends them
//! to a profile's history; there are no status transitions.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::cart::CartItem;
use crate::types::{OrderId, OrderStatus, Price, ProductId};

/// Prefix shared by every order number, e.g. `DH-001234`.
pub const ORDER_NUMBER_PREFIX: &str = "DH-";

/// Format a sequence number as an order number (`DH-` plus six digits).
#[must_use]
pub fn format_order_number(sequence: u64) -> String {
    format!("{ORDER_NUMBER_PREFIX}{sequence:06}")
}

/// Sequence part of an order number, or `None` if it is not one.
#[must_use]
pub fn order_sequence(order_number: &str) -> Option<u64> {
    order_number
        .strip_prefix(ORDER_NUMBER_PREFIX)?
        .parse()
        .ok()
}

/// One product line of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: u32,
    pub price: Price,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl From<&CartItem> for OrderItem {
    fn from(line: &CartItem) -> Self {
        Self {
            product_id: line.product_id.clone(),
            product_name: line.name.clone(),
            quantity: line.quantity,
            price: line.price,
            image_url: line.image.clone(),
        }
    }
}

/// What the order gateway hands back for an accepted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: OrderId,
    pub order_number: String,
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub date: NaiveDate,
    pub total_amount: Price,
    #[serde(default)]
    pub status: OrderStatus,
    pub items: Vec<OrderItem>,
    /// Delivery note given at checkout.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Order {
    /// Build a new `processing` order from an accepted receipt.
    #[must_use]
    pub fn from_receipt(
        receipt: &OrderReceipt,
        date: NaiveDate,
        lines: &[CartItem],
        total_amount: Price,
    ) -> Self {
        Self {
            id: receipt.order_id.clone(),
            order_number: receipt.order_number.clone(),
            date,
            total_amount,
            status: OrderStatus::Processing,
            items: lines.iter().map(OrderItem::from).collect(),
            note: None,
        }
    }

    /// Attach the delivery note.
    #[must_use]
    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    /// Total units across all items.
    #[must_use]
    pub fn unit_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }
}
