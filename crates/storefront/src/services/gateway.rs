//! Order submission.
//!
//! Checkout hands the finished order to an [`OrderGateway`]. The storefront
//! ships with [`SimulatedGateway`], which waits a fixed latency and then
//! accepts or declines every order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use threadline_core::order::format_order_number;
use threadline_core::{Address, CartItem, OrderId, OrderReceipt, PaymentMethod, Quote};

/// Message shown to the shopper when an order is declined.
pub const DECLINED_MESSAGE: &str = "Đặt hàng không thành công, vui lòng thử lại";

/// Everything the gateway needs to place an order.
#[derive(Debug, Clone)]
pub struct OrderRequest {
    pub lines: Vec<CartItem>,
    pub address: Address,
    pub payment_method: PaymentMethod,
    pub quote: Quote,
    /// Note for the courier.
    pub note: Option<String>,
}

/// Errors returned by an order gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The order was refused; the shopper may retry.
    #[error("{0}")]
    Declined(String),
}

/// Places orders.
#[async_trait]
pub trait OrderGateway: Send + Sync {
    /// Submit an order, returning its receipt.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Declined`] when the order is refused.
    async fn submit(&self, request: &OrderRequest) -> Result<OrderReceipt, GatewayError>;
}

/// In-process gateway with a configurable delay.
///
/// Order IDs (`ord<N>`) and order numbers (`DH-<NNNNNN>`) are issued from
/// counters, so the sequence is deterministic for a given starting point.
/// A declined submission consumes no numbers.
#[derive(Debug)]
pub struct SimulatedGateway {
    latency: Duration,
    decline: bool,
    next_index: AtomicU64,
    next_sequence: AtomicU64,
}

impl SimulatedGateway {
    /// Create a gateway whose first order is `ord<first_index>` with number
    /// `DH-<first_sequence>`.
    #[must_use]
    pub const fn new(latency: Duration, first_index: u64, first_sequence: u64) -> Self {
        Self {
            latency,
            decline: false,
            next_index: AtomicU64::new(first_index),
            next_sequence: AtomicU64::new(first_sequence),
        }
    }

    /// Decline every submission.
    #[must_use]
    pub fn declining(mut self, decline: bool) -> Self {
        self.decline = decline;
        self
    }
}

#[async_trait]
impl OrderGateway for SimulatedGateway {
    async fn submit(&self, request: &OrderRequest) -> Result<OrderReceipt, GatewayError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if self.decline {
            tracing::warn!(
                lines = request.lines.len(),
                total = %request.quote.total.amount(),
                "Order declined by simulated gateway"
            );
            return Err(GatewayError::Declined(DECLINED_MESSAGE.to_string()));
        }

        let index = self.next_index.fetch_add(1, Ordering::Relaxed);
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        let receipt = OrderReceipt {
            order_id: OrderId::new(format!("ord{index}")),
            order_number: format_order_number(sequence),
        };

        tracing::info!(
            order_number = %receipt.order_number,
            payment_method = %request.payment_method,
            address_id = %request.address.id,
            "Order accepted"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use threadline_core::{AddressBook, AddressInput, PricingPolicy};

    use super::*;

    fn request() -> OrderRequest {
        let mut book = AddressBook::default();
        let address = book
            .add(&AddressInput {
                full_name: "Nguyễn Văn A".into(),
                phone: "0912345678".into(),
                address: "123 Đường Lê Lợi".into(),
                district: "Quận 1".into(),
                city: "TP. Hồ Chí Minh".into(),
            })
            .unwrap();
        OrderRequest {
            lines: Vec::new(),
            address,
            payment_method: PaymentMethod::Cod,
            quote: PricingPolicy::default().quote_lines(std::iter::empty()),
            note: None,
        }
    }

    #[tokio::test]
    async fn test_sequential_receipts() {
        let gateway = SimulatedGateway::new(Duration::ZERO, 4, 1237);
        let first = gateway.submit(&request()).await.unwrap();
        let second = gateway.submit(&request()).await.unwrap();

        assert_eq!(first.order_id.as_str(), "ord4");
        assert_eq!(first.order_number, "DH-001237");
        assert_eq!(second.order_id.as_str(), "ord5");
        assert_eq!(second.order_number, "DH-001238");
    }

    #[tokio::test]
    async fn test_declining_gateway() {
        let gateway = SimulatedGateway::new(Duration::ZERO, 1, 1).declining(true);
        let err = gateway.submit(&request()).await.unwrap_err();
        assert_eq!(err.to_string(), DECLINED_MESSAGE);
    }

    #[tokio::test]
    async fn test_latency_is_simulated() {
        let gateway = SimulatedGateway::new(Duration::from_millis(20), 1, 1);
        let started = tokio::time::Instant::now();
        gateway.submit(&request()).await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(20));
    }
}
