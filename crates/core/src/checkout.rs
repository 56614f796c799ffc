//! Checkout state machine.
//!
//! ```text
//! address ──Next──▶ payment ──OrderPlaced──▶ confirmation
//!    ▲                 │
//!    └────Previous─────┘   (OrderFailed stays in payment)
//! ```
//!
//! A [`Checkout`] snapshots the selected cart lines and their quote when it
//! begins. Later cart edits do not change what is being bought.
//!
//! The delivery note travels with the shipping address and can only be
//! changed in the address step.

use serde::{Deserialize, Serialize};

use crate::cart::{Cart, CartItem};
use crate::order::OrderReceipt;
use crate::pricing::{PricingPolicy, Quote};
use crate::types::{AddressId, CheckoutStep, LineId, PaymentMethod};

/// Errors from checkout transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    /// Checkout was started with no cart lines selected.
    #[error("no cart items selected for checkout")]
    EmptySelection,

    /// Moving past the address step needs a shipping address.
    #[error("choose a shipping address before continuing")]
    MissingAddress,

    /// The payment step is only left by submitting the order.
    #[error("the order must be submitted to leave the payment step")]
    SubmissionRequired,

    /// The event is not accepted in the current step.
    #[error("cannot {event} during the {from} step")]
    InvalidTransition {
        from: CheckoutStep,
        event: &'static str,
    },

    /// The checkout already reached confirmation.
    #[error("checkout is already complete")]
    Completed,
}

/// An input to the checkout state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutEvent {
    SelectAddress(AddressId),
    /// Set or clear the note for the courier. Blank notes clear it.
    SetNote(Option<String>),
    SelectPaymentMethod(PaymentMethod),
    Next,
    Previous,
    OrderPlaced(OrderReceipt),
    OrderFailed(String),
}

impl CheckoutEvent {
    /// Short verb phrase used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::SelectAddress(_) => "select an address",
            Self::SetNote(_) => "change the delivery note",
            Self::SelectPaymentMethod(_) => "select a payment method",
            Self::Next => "go forward",
            Self::Previous => "go back",
            Self::OrderPlaced(_) => "confirm an order",
            Self::OrderFailed(_) => "record a failed order",
        }
    }
}

/// An in-progress checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    step: CheckoutStep,
    lines: Vec<CartItem>,
    quote: Quote,
    address_id: Option<AddressId>,
    #[serde(default)]
    note: Option<String>,
    payment_method: PaymentMethod,
    receipt: Option<OrderReceipt>,
    last_failure: Option<String>,
}

impl Checkout {
    /// Start checking out the cart's selected lines.
    ///
    /// The address defaults to `default_address` and payment to cash on
    /// delivery.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptySelection`] if nothing is selected.
    pub fn begin(
        cart: &Cart,
        policy: &PricingPolicy,
        default_address: Option<AddressId>,
    ) -> Result<Self, CheckoutError> {
        let lines: Vec<CartItem> = cart.selected_items().cloned().collect();
        if lines.is_empty() {
            return Err(CheckoutError::EmptySelection);
        }
        let quote = policy.quote_lines(&lines);
        Ok(Self {
            step: CheckoutStep::Address,
            lines,
            quote,
            address_id: default_address,
            note: None,
            payment_method: PaymentMethod::default(),
            receipt: None,
            last_failure: None,
        })
    }

    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Lines being bought.
    #[must_use]
    pub fn lines(&self) -> &[CartItem] {
        &self.lines
    }

    #[must_use]
    pub const fn quote(&self) -> &Quote {
        &self.quote
    }

    #[must_use]
    pub const fn address_id(&self) -> Option<&AddressId> {
        self.address_id.as_ref()
    }

    /// Note for the courier, if any.
    #[must_use]
    pub fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    #[must_use]
    pub const fn payment_method(&self) -> PaymentMethod {
        self.payment_method
    }

    /// Receipt of the placed order, once confirmed.
    #[must_use]
    pub const fn receipt(&self) -> Option<&OrderReceipt> {
        self.receipt.as_ref()
    }

    /// Message from the most recent failed submission.
    #[must_use]
    pub fn last_failure(&self) -> Option<&str> {
        self.last_failure.as_deref()
    }

    /// Whether the checkout reached confirmation.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.step == CheckoutStep::Confirmation
    }

    /// IDs of the lines being bought.
    #[must_use]
    pub fn line_ids(&self) -> Vec<LineId> {
        self.lines.iter().map(|l| l.id.clone()).collect()
    }

    /// The chosen address, if the order can be submitted now.
    ///
    /// # Errors
    ///
    /// Fails unless the checkout is in the payment step with an address.
    pub fn submission_address(&self) -> Result<&AddressId, CheckoutError> {
        match self.step {
            CheckoutStep::Payment => self.address_id.as_ref().ok_or(CheckoutError::MissingAddress),
            CheckoutStep::Confirmation => Err(CheckoutError::Completed),
            CheckoutStep::Address => Err(CheckoutError::InvalidTransition {
                from: self.step,
                event: "submit the order",
            }),
        }
    }

    /// Apply an event.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] when the event is not accepted in the
    /// current step. The checkout is unchanged in that case.
    pub fn apply(&mut self, event: CheckoutEvent) -> Result<(), CheckoutError> {
        use CheckoutStep::{Address, Confirmation, Payment};

        match (self.step, event) {
            (Confirmation, _) => return Err(CheckoutError::Completed),
            (Address, CheckoutEvent::SelectAddress(id)) => self.address_id = Some(id),
            (Address, CheckoutEvent::SetNote(note)) => {
                self.note = note
                    .map(|n| n.trim().to_string())
                    .filter(|n| !n.is_empty());
            }
            (Address | Payment, CheckoutEvent::SelectPaymentMethod(method)) => {
                self.payment_method = method;
            }
            (Address, CheckoutEvent::Next) => {
                if self.address_id.is_none() {
                    return Err(CheckoutError::MissingAddress);
                }
                self.step = Payment;
            }
            (Payment, CheckoutEvent::Next) => return Err(CheckoutError::SubmissionRequired),
            (Payment, CheckoutEvent::Previous) => self.step = Address,
            (Payment, CheckoutEvent::OrderPlaced(receipt)) => {
                self.receipt = Some(receipt);
                self.last_failure = None;
                self.step = Confirmation;
            }
            (Payment, CheckoutEvent::OrderFailed(message)) => self.last_failure = Some(message),
            (from, event) => {
                return Err(CheckoutError::InvalidTransition {
                    from,
                    event: event.name(),
                });
            }
        }
        Ok(())
    }
}
