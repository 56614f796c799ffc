//! Account route handlers.
//!
//! There is a single fixture shopper. Changes live in memory until the
//! process exits.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use threadline_core::{
    Address, AddressId, AddressInput, CurrencyCode, Order, OrderId, OrderStatus, PersonalInfoInput,
    UserId,
};
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Profile overview data.
#[derive(Debug, Serialize)]
pub struct ProfileView {
    pub id: UserId,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub default_address: Option<Address>,
    pub address_count: usize,
    pub order_count: usize,
}

/// Order history row.
#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub order_number: String,
    pub date: chrono::NaiveDate,
    pub status: OrderStatus,
    pub status_label: &'static str,
    pub item_count: u64,
    pub total_display: String,
}

impl OrderSummary {
    fn new(order: &Order, currency: CurrencyCode) -> Self {
        Self {
            id: order.id.clone(),
            order_number: order.order_number.clone(),
            date: order.date,
            status: order.status,
            status_label: order.status.label(),
            item_count: order.unit_count(),
            total_display: order.total_amount.display(currency),
        }
    }
}

/// Display the profile overview.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Json<ProfileView> {
    let profile = state.profile().read().await;

    Json(ProfileView {
        id: profile.id.clone(),
        full_name: profile.full_name.clone(),
        email: profile.email.to_string(),
        phone: profile.phone.to_string(),
        default_address: profile.addresses().default_address().cloned(),
        address_count: profile.addresses().addresses().len(),
        order_count: profile.orders().len(),
    })
}

/// Update name, email and phone.
///
/// Nothing changes unless every field is valid.
#[instrument(skip(state))]
pub async fn update_personal_info(
    State(state): State<AppState>,
    Json(form): Json<PersonalInfoInput>,
) -> Result<Json<ProfileView>> {
    state.profile().write().await.update_personal_info(&form)?;
    tracing::info!("Personal info updated");
    Ok(index(State(state)).await)
}

/// List saved addresses in the order they were added.
#[instrument(skip(state))]
pub async fn addresses(State(state): State<AppState>) -> Json<Vec<Address>> {
    Json(state.profile().read().await.addresses().addresses().to_vec())
}

/// Save a new address.
#[instrument(skip(state))]
pub async fn create_address(
    State(state): State<AppState>,
    Json(form): Json<AddressInput>,
) -> Result<(StatusCode, Json<Address>)> {
    let address = state.profile().write().await.add_address(&form)?;
    tracing::info!(address_id = %address.id, "Address added");
    Ok((StatusCode::CREATED, Json(address)))
}

/// Make an address the default.
#[instrument(skip(state))]
pub async fn set_default_address(
    State(state): State<AppState>,
    Path(id): Path<AddressId>,
) -> Result<Json<Vec<Address>>> {
    let mut profile = state.profile().write().await;
    profile.set_default_address(&id)?;
    Ok(Json(profile.addresses().addresses().to_vec()))
}

/// List past orders, newest first.
#[instrument(skip(state))]
pub async fn orders(State(state): State<AppState>) -> Json<Vec<OrderSummary>> {
    let currency = state.config().currency;
    let profile = state.profile().read().await;

    Json(
        profile
            .orders()
            .iter()
            .rev()
            .map(|order| OrderSummary::new(order, currency))
            .collect(),
    )
}

/// Display one order with its items.
#[instrument(skip(state))]
pub async fn order(
    State(state): State<AppState>,
    Path(id): Path<OrderId>,
) -> Result<Json<Order>> {
    state
        .profile()
        .read()
        .await
        .order(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("order {id}")))
}
