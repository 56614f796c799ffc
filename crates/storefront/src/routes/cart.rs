//! Cart route handlers.
//!
//! Every mutation loads the cart from the session, applies one
//! [`CartAction`], writes the cart back and answers with the refreshed
//! cart and quote.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use threadline_core::{
    Cart, CartAction, CartItem, CurrencyCode, LineId, Price, PricingPolicy, Quote, VariantChoice,
};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::cart_store;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    #[serde(flatten)]
    pub item: CartItem,
    pub selected: bool,
    pub price_display: String,
    pub line_total: Price,
    pub line_total_display: String,
}

impl CartLineView {
    fn new(item: &CartItem, selected: bool, currency: CurrencyCode) -> Self {
        Self {
            item: item.clone(),
            selected,
            price_display: item.price.display(currency),
            line_total: item.line_total(),
            line_total_display: item.line_total().display(currency),
        }
    }

    /// Display data for checkout lines, which are all being bought.
    #[must_use]
    pub fn purchased(items: &[CartItem], currency: CurrencyCode) -> Vec<Self> {
        items
            .iter()
            .map(|item| Self::new(item, true, currency))
            .collect()
    }
}

/// Quote display data.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteView {
    #[serde(flatten)]
    pub quote: Quote,
    pub free_shipping: bool,
    pub subtotal_display: String,
    pub discount_display: String,
    pub shipping_fee_display: String,
    pub total_display: String,
}

impl QuoteView {
    #[must_use]
    pub fn new(quote: Quote, currency: CurrencyCode) -> Self {
        Self {
            free_shipping: quote.free_shipping(),
            subtotal_display: quote.subtotal.display(currency),
            discount_display: quote.discount.display(currency),
            shipping_fee_display: quote.shipping_fee.display(currency),
            total_display: quote.total.display(currency),
            quote,
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub all_selected: bool,
    pub total_quantity: u64,
    pub quote: QuoteView,
}

impl CartView {
    #[must_use]
    pub fn new(cart: &Cart, policy: &PricingPolicy, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .items()
                .iter()
                .map(|item| CartLineView::new(item, cart.is_selected(&item.id), currency))
                .collect(),
            all_selected: cart.all_selected(),
            total_quantity: cart.total_quantity(),
            quote: QuoteView::new(cart.quote(policy), currency),
        }
    }
}

/// Add to cart request body.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub slug: String,
    #[serde(flatten)]
    pub variant: VariantChoice,
    pub quantity: Option<i64>,
}

/// Update quantity request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub line_id: LineId,
    pub quantity: i64,
}

/// Remove line request body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub line_id: LineId,
}

/// Select line request body. Omitting `selected` toggles the line.
#[derive(Debug, Deserialize)]
pub struct SelectForm {
    pub line_id: LineId,
    pub selected: Option<bool>,
}

/// Load, mutate, save and render.
async fn mutate(state: &AppState, session: &Session, action: CartAction) -> Result<Json<CartView>> {
    let mut cart = cart_store::load_cart(session).await?;
    cart.apply(action)?;
    cart_store::save_cart(session, &cart).await?;
    Ok(Json(CartView::new(&cart, state.pricing(), state.config().currency)))
}

/// Display the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    let cart = cart_store::load_cart(&session).await?;
    Ok(Json(CartView::new(&cart, state.pricing(), state.config().currency)))
}

/// Add a product variant to the cart.
///
/// Size and color are required when the product offers them. Quantities
/// below one become one.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<AddToCartForm>,
) -> Result<Json<CartView>> {
    let product = state
        .catalog()
        .product_by_slug(&form.slug)
        .ok_or_else(|| AppError::NotFound(format!("product {}", form.slug)))?;

    let item = CartItem::from_product(product, &form.variant, form.quantity.unwrap_or(1))?;
    add_breadcrumb("cart", "Added to cart", &[("line_id", item.id.as_str())]);

    mutate(&state, &session, CartAction::Add(item)).await
}

/// Set a line's quantity.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<UpdateCartForm>,
) -> Result<Json<CartView>> {
    let action = CartAction::UpdateQuantity {
        line: form.line_id,
        quantity: form.quantity,
    };
    mutate(&state, &session, action).await
}

/// Remove a line.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<RemoveFromCartForm>,
) -> Result<Json<CartView>> {
    mutate(&state, &session, CartAction::Remove(form.line_id)).await
}

/// Select, deselect or toggle a line.
#[instrument(skip(state, session))]
pub async fn select(
    State(state): State<AppState>,
    session: Session,
    Json(form): Json<SelectForm>,
) -> Result<Json<CartView>> {
    let action = match form.selected {
        Some(selected) => CartAction::SetSelected {
            line: form.line_id,
            selected,
        },
        None => CartAction::Toggle(form.line_id),
    };
    mutate(&state, &session, action).await
}

/// Select every line.
#[instrument(skip(state, session))]
pub async fn select_all(State(state): State<AppState>, session: Session) -> Result<Json<CartView>> {
    mutate(&state, &session, CartAction::SelectAll).await
}

/// Deselect every line.
#[instrument(skip(state, session))]
pub async fn clear_selection(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CartView>> {
    mutate(&state, &session, CartAction::ClearSelection).await
}
