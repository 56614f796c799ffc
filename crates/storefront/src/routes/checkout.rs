//! Checkout route handlers.
//!
//! The checkout itself lives in the session. Each handler loads it, applies
//! its [`CheckoutEvent`]s and stores it again.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use threadline_core::{
    Address, AddressId, AddressInput, Checkout, CheckoutEvent, CheckoutStep, Order,
    OrderReceipt, PaymentMethod,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::config::BankTransferDetails;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::routes::cart::{CartLineView, QuoteView};
use crate::services::{cart_store, checkout as checkout_service};
use crate::state::AppState;

/// Checkout display data.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub step: CheckoutStep,
    pub lines: Vec<CartLineView>,
    pub quote: QuoteView,
    pub address: Option<Address>,
    pub addresses: Vec<Address>,
    pub note: Option<String>,
    pub payment_method: PaymentMethod,
    /// Where to transfer the money, present when paying by bank transfer.
    pub bank_transfer: Option<BankTransferDetails>,
    pub receipt: Option<OrderReceipt>,
    pub last_failure: Option<String>,
}

impl CheckoutView {
    async fn new(state: &AppState, checkout: &Checkout) -> Self {
        let currency = state.config().currency;
        let profile = state.profile().read().await;
        let book = profile.addresses();

        Self {
            step: checkout.step(),
            lines: CartLineView::purchased(checkout.lines(), currency),
            quote: QuoteView::new(*checkout.quote(), currency),
            address: checkout.address_id().and_then(|id| book.get(id)).cloned(),
            addresses: book.addresses().to_vec(),
            note: checkout.note().map(str::to_owned),
            payment_method: checkout.payment_method(),
            bank_transfer: (checkout.payment_method() == PaymentMethod::Bank)
                .then(|| state.config().bank_transfer.clone()),
            receipt: checkout.receipt().cloned(),
            last_failure: checkout.last_failure().map(str::to_owned),
        }
    }
}

/// Confirmation data returned after placing an order.
#[derive(Debug, Serialize)]
pub struct ConfirmationView {
    pub checkout: CheckoutView,
    pub order: Order,
}

/// Choose address request body.
///
/// An absent `note` keeps the current one; a blank note clears it.
#[derive(Debug, Deserialize)]
pub struct SelectAddressForm {
    pub address_id: AddressId,
    #[serde(default)]
    pub note: Option<String>,
}

/// New address request body.
#[derive(Debug, Deserialize)]
pub struct NewAddressForm {
    #[serde(flatten)]
    pub address: AddressInput,
    #[serde(default)]
    pub note: Option<String>,
}

/// Choose payment method request body.
#[derive(Debug, Deserialize)]
pub struct PaymentMethodForm {
    pub method: PaymentMethod,
}

/// Apply `events` in order to the stored checkout and render it.
///
/// Nothing is stored if any event is rejected.
async fn transition(
    state: &AppState,
    session: &Session,
    events: impl IntoIterator<Item = CheckoutEvent>,
) -> Result<Json<CheckoutView>> {
    let mut checkout = checkout_service::current_checkout(session).await?;
    for event in events {
        checkout.apply(event)?;
    }
    cart_store::save_checkout(session, &checkout).await?;
    Ok(Json(CheckoutView::new(state, &checkout).await))
}

/// Begin checking out the selected cart lines.
///
/// Replaces any checkout already in progress. Answers 409 with a redirect
/// to the cart when nothing is selected.
#[instrument(skip(state, session))]
pub async fn begin(
    State(state): State<AppState>,
    session: Session,
) -> Result<(StatusCode, Json<CheckoutView>)> {
    let cart = cart_store::load_cart(&session).await?;
    let default_address = state
        .profile()
        .read()
        .await
        .addresses()
        .default_address()
        .map(|a| a.id.clone());

    let checkout = Checkout::begin(&cart, state.pricing(), default_address)?;
    cart_store::save_checkout(&session, &checkout).await?;
    add_breadcrumb("checkout", "Checkout started", &[]);

    Ok((
        StatusCode::CREATED,
        Json(CheckoutView::new(&state, &checkout).await),
    ))
}

/// Display the checkout in progress.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CheckoutView>> {
    let checkout = checkout_service::current_checkout(&session).await?;
    Ok(Json(CheckoutView::new(&state, &checkout).await))
}

/// Choose a saved shipping address.
#[instrument(skip(state, session))]
pub async fn select_address(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<SelectAddressForm>,
) -> Result<Json<CheckoutView>> {
    if state
        .profile()
        .read()
        .await
        .addresses()
        .get(&form.address_id)
        .is_none()
    {
        return Err(AppError::NotFound(format!("address {}", form.address_id)));
    }
    let note = form.note.map(|note| CheckoutEvent::SetNote(Some(note)));
    let events = std::iter::once(CheckoutEvent::SelectAddress(form.address_id)).chain(note);
    transition(&state, &session, events).await
}

/// Save a new address to the profile and ship to it.
#[instrument(skip(state, session))]
pub async fn add_address(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<NewAddressForm>,
) -> Result<Json<CheckoutView>> {
    let checkout = checkout_service::current_checkout(&session).await?;
    if checkout.step() != CheckoutStep::Address {
        return Err(AppError::from(threadline_core::CheckoutError::InvalidTransition {
            from: checkout.step(),
            event: "add an address",
        }));
    }

    let address = state.profile().write().await.add_address(&form.address)?;
    let note = form.note.map(|note| CheckoutEvent::SetNote(Some(note)));
    let events = std::iter::once(CheckoutEvent::SelectAddress(address.id)).chain(note);
    transition(&state, &session, events).await
}

/// Choose cash on delivery or bank transfer.
#[instrument(skip(state, session))]
pub async fn select_payment_method(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<PaymentMethodForm>,
) -> Result<Json<CheckoutView>> {
    let event = CheckoutEvent::SelectPaymentMethod(form.method);
    transition(&state, &session, [event]).await
}

/// Move from the address step to the payment step.
#[instrument(skip(state, session))]
pub async fn next(State(state): State<AppState>, session: Session) -> Result<Json<CheckoutView>> {
    transition(&state, &session, [CheckoutEvent::Next]).await
}

/// Move from the payment step back to the address step.
#[instrument(skip(state, session))]
pub async fn previous(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CheckoutView>> {
    transition(&state, &session, [CheckoutEvent::Previous]).await
}

/// Submit the order.
///
/// Waits for the order gateway. A declined order answers 402 and leaves the
/// checkout in the payment step so the shopper can retry.
#[instrument(skip(state, session))]
pub async fn place_order(
    State(state): State<AppState>,
    session: Session,
) -> Result<(StatusCode, Json<ConfirmationView>)> {
    let (checkout, order) = checkout_service::place_order(&state, &session).await?;
    add_breadcrumb(
        "checkout",
        "Order placed",
        &[("order_number", order.order_number.as_str())],
    );

    Ok((
        StatusCode::CREATED,
        Json(ConfirmationView {
            checkout: CheckoutView::new(&state, &checkout).await,
            order,
        }),
    ))
}
