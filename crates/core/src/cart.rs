//! Shopping cart state.
//!
//! A [`Cart`] holds line items and the set of lines selected for checkout.
//! All mutations go through [`Cart::apply`], which takes a [`CartAction`] and
//! re-establishes the invariant that the selection only names existing lines.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::pricing::{PricingPolicy, Quote};
use crate::types::{LineId, Price, ProductId};

/// Errors from cart mutations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    /// The product has sizes but none was chosen.
    #[error("please choose a size before adding to the cart")]
    MissingSize,

    /// The product has colors but none was chosen.
    #[error("please choose a color before adding to the cart")]
    MissingColor,

    /// The chosen size is not offered for the product.
    #[error("size {0} is not available for this product")]
    UnknownSize(String),

    /// The chosen color is not offered for the product.
    #[error("color {0} is not available for this product")]
    UnknownColor(String),

    /// No line with this ID is in the cart.
    #[error("cart line not found: {0}")]
    LineNotFound(LineId),
}

/// Clamp a requested quantity to the accepted range `1..=u32::MAX`.
#[must_use]
pub fn clamp_quantity(requested: i64) -> u32 {
    u32::try_from(requested.max(1)).unwrap_or(u32::MAX)
}

/// Size and color picked on the product page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantChoice {
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

/// One line of the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: LineId,
    pub product_id: ProductId,
    pub name: String,
    /// Unit price at the time the line was added.
    pub price: Price,
    pub quantity: u32,
    pub size: String,
    pub color: String,
    pub image: Option<String>,
}

impl CartItem {
    /// Build a line for `product` after checking the chosen variant.
    ///
    /// Size is required when the product lists sizes, color when it lists
    /// colors, and both must be among the product's options.
    ///
    /// # Errors
    ///
    /// Returns a [`CartError`] naming the missing or unknown option.
    pub fn from_product(
        product: &Product,
        choice: &VariantChoice,
        quantity: i64,
    ) -> Result<Self, CartError> {
        let size = match choice.size.as_deref().filter(|s| !s.is_empty()) {
            Some(size) if product.has_size(size) => size.to_owned(),
            Some(size) => return Err(CartError::UnknownSize(size.to_owned())),
            None if product.sizes.is_empty() => String::new(),
            None => return Err(CartError::MissingSize),
        };

        let color = match choice.color.as_deref().filter(|c| !c.is_empty()) {
            Some(color) if product.has_color(color) => color.to_owned(),
            Some(color) => return Err(CartError::UnknownColor(color.to_owned())),
            None if product.colors.is_empty() => String::new(),
            None => return Err(CartError::MissingColor),
        };

        Ok(Self {
            id: LineId::for_variant(&product.id, &size, &color),
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            quantity: clamp_quantity(quantity),
            size,
            color,
            image: product.primary_image().map(str::to_owned),
        })
    }

    /// Unit price × quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A cart mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartAction {
    /// Add a line, merging quantities with an existing line of the same variant.
    Add(CartItem),
    /// Set a line's quantity; values below 1 become 1.
    UpdateQuantity { line: LineId, quantity: i64 },
    /// Delete a line.
    Remove(LineId),
    /// Flip a line's selection.
    Toggle(LineId),
    /// Select or deselect a line.
    SetSelected { line: LineId, selected: bool },
    /// Select every line.
    SelectAll,
    /// Deselect every line.
    ClearSelection,
    /// Drop lines that were just purchased.
    RemovePurchased(Vec<LineId>),
}

/// Cart lines plus the selection set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Cart {
    items: Vec<CartItem>,
    selection: BTreeSet<LineId>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a cart from stored parts.
    ///
    /// Selection entries that no longer name a line are dropped.
    #[must_use]
    pub fn from_parts(items: Vec<CartItem>, selection: impl IntoIterator<Item = LineId>) -> Self {
        let mut cart = Self {
            items,
            selection: selection.into_iter().collect(),
        };
        cart.retain_known_selection();
        cart
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// IDs of the selected lines.
    #[must_use]
    pub const fn selection(&self) -> &BTreeSet<LineId> {
        &self.selection
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether `line` is selected.
    #[must_use]
    pub fn is_selected(&self, line: &LineId) -> bool {
        self.selection.contains(line)
    }

    /// Whether every line is selected (false for an empty cart).
    #[must_use]
    pub fn all_selected(&self) -> bool {
        !self.items.is_empty() && self.selection.len() == self.items.len()
    }

    /// Selected lines, in cart order.
    pub fn selected_items(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter().filter(|item| self.selection.contains(&item.id))
    }

    /// Total units across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Look up a line.
    #[must_use]
    pub fn item(&self, line: &LineId) -> Option<&CartItem> {
        self.items.iter().find(|item| &item.id == line)
    }

    /// Price the selected lines.
    #[must_use]
    pub fn quote(&self, policy: &PricingPolicy) -> Quote {
        policy.quote(self.items(), self.selection())
    }

    /// Apply a mutation.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::LineNotFound`] when an action names a line that
    /// is not in the cart. The cart is unchanged in that case.
    pub fn apply(&mut self, action: CartAction) -> Result<(), CartError> {
        match action {
            CartAction::Add(item) => {
                if let Some(existing) = self.items.iter_mut().find(|i| i.id == item.id) {
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                } else {
                    self.selection.insert(item.id.clone());
                    self.items.push(item);
                }
            }
            CartAction::UpdateQuantity { line, quantity } => {
                let item = self
                    .items
                    .iter_mut()
                    .find(|i| i.id == line)
                    .ok_or(CartError::LineNotFound(line))?;
                item.quantity = clamp_quantity(quantity);
            }
            CartAction::Remove(line) => {
                let before = self.items.len();
                self.items.retain(|i| i.id != line);
                if self.items.len() == before {
                    return Err(CartError::LineNotFound(line));
                }
                self.selection.remove(&line);
            }
            CartAction::Toggle(line) => {
                self.require_line(&line)?;
                if !self.selection.remove(&line) {
                    self.selection.insert(line);
                }
            }
            CartAction::SetSelected { line, selected } => {
                self.require_line(&line)?;
                if selected {
                    self.selection.insert(line);
                } else {
                    self.selection.remove(&line);
                }
            }
            CartAction::SelectAll => {
                self.selection = self.items.iter().map(|i| i.id.clone()).collect();
            }
            CartAction::ClearSelection => self.selection.clear(),
            CartAction::RemovePurchased(lines) => {
                self.items.retain(|i| !lines.contains(&i.id));
                self.retain_known_selection();
            }
        }
        Ok(())
    }

    /// Split into the stored parts.
    #[must_use]
    pub fn into_parts(self) -> (Vec<CartItem>, BTreeSet<LineId>) {
        (self.items, self.selection)
    }

    fn require_line(&self, line: &LineId) -> Result<(), CartError> {
        if self.item(line).is_some() {
            Ok(())
        } else {
            Err(CartError::LineNotFound(line.clone()))
        }
    }

    fn retain_known_selection(&mut self) {
        let items = &self.items;
        self.selection
            .retain(|line| items.iter().any(|item| &item.id == line));
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::catalog::tests::catalog;

    fn choice(size: &str, color: &str) -> VariantChoice {
        VariantChoice {
            size: Some(size.to_owned()),
            color: Some(color.to_owned()),
        }
    }

    fn line(slug: &str, size: &str, color: &str, quantity: i64) -> CartItem {
        let catalog = catalog();
        let product = catalog.product_by_slug(slug).unwrap();
        CartItem::from_product(product, &choice(size, color), quantity).unwrap()
    }

    fn assert_selection_subset(cart: &Cart) {
        for id in cart.selection() {
            assert!(cart.item(id).is_some(), "selection names missing line {id}");
        }
    }

    #[test]
    fn test_variant_is_required() {
        let catalog = catalog();
        let product = catalog.product_by_slug("ao-thun").unwrap();

        let no_size = VariantChoice {
            size: None,
            color: Some("Đen".into()),
        };
        assert_eq!(
            CartItem::from_product(product, &no_size, 1),
            Err(CartError::MissingSize)
        );

        let no_color = VariantChoice {
            size: Some("M".into()),
            color: Some(String::new()),
        };
        assert_eq!(
            CartItem::from_product(product, &no_color, 1),
            Err(CartError::MissingColor)
        );

        assert_eq!(
            CartItem::from_product(product, &choice("XXL", "Đen"), 1),
            Err(CartError::UnknownSize("XXL".into()))
        );
    }

    #[test]
    fn test_colorless_product_needs_no_color() {
        let catalog = catalog();
        let product = catalog.product_by_slug("non-bucket").unwrap();
        let choice = VariantChoice {
            size: Some("Freesize".into()),
            color: None,
        };
        let item = CartItem::from_product(product, &choice, 1).unwrap();
        assert_eq!(item.color, "");
        assert_eq!(item.image, None);
    }

    #[test]
    fn test_add_selects_and_merges() {
        let mut cart = Cart::new();
        cart.apply(CartAction::Add(line("ao-thun", "M", "Đen", 1))).unwrap();
        cart.apply(CartAction::Add(line("ao-thun", "M", "Đen", 2))).unwrap();
        cart.apply(CartAction::Add(line("ao-thun", "L", "Đen", 1))).unwrap();

        assert_eq!(cart.items().len(), 2);
        assert_eq!(cart.items()[0].quantity, 3);
        assert!(cart.all_selected());
        assert_eq!(cart.total_quantity(), 4);
    }

    #[test]
    fn test_quantity_clamped_to_one() {
        let mut cart = Cart::new();
        let item = line("ao-khoac", "L", "Đen", 2);
        let id = item.id.clone();
        cart.apply(CartAction::Add(item)).unwrap();

        cart.apply(CartAction::UpdateQuantity {
            line: id.clone(),
            quantity: 0,
        })
        .unwrap();
        assert_eq!(cart.item(&id).unwrap().quantity, 1);

        cart.apply(CartAction::UpdateQuantity {
            line: id.clone(),
            quantity: -5,
        })
        .unwrap();
        assert_eq!(cart.item(&id).unwrap().quantity, 1);

        cart.apply(CartAction::UpdateQuantity {
            line: id.clone(),
            quantity: 7,
        })
        .unwrap();
        assert_eq!(cart.item(&id).unwrap().quantity, 7);
    }

    #[test]
    fn test_added_quantity_clamped() {
        assert_eq!(line("ao-thun", "S", "Đen", 0).quantity, 1);
        assert_eq!(clamp_quantity(i64::MAX), u32::MAX);
    }

    #[test]
    fn test_remove_drops_selection() {
        let mut cart = Cart::new();
        let a = line("ao-thun", "M", "Đen", 1);
        let b = line("ao-khoac", "L", "Đen", 2);
        let a_id = a.id.clone();
        cart.apply(CartAction::Add(a)).unwrap();
        cart.apply(CartAction::Add(b)).unwrap();

        cart.apply(CartAction::Remove(a_id.clone())).unwrap();
        assert!(!cart.is_selected(&a_id));
        assert_eq!(cart.selection().len(), 1);
        assert_selection_subset(&cart);

        assert_eq!(
            cart.apply(CartAction::Remove(a_id.clone())),
            Err(CartError::LineNotFound(a_id))
        );
    }

    #[test]
    fn test_selection_actions() {
        let mut cart = Cart::new();
        let a = line("ao-thun", "M", "Đen", 1);
        let a_id = a.id.clone();
        cart.apply(CartAction::Add(a)).unwrap();
        cart.apply(CartAction::Add(line("quan-jean", "30", "Xanh", 1)))
            .unwrap();

        cart.apply(CartAction::Toggle(a_id.clone())).unwrap();
        assert!(!cart.is_selected(&a_id));
        assert!(!cart.all_selected());

        cart.apply(CartAction::SetSelected {
            line: a_id.clone(),
            selected: true,
        })
        .unwrap();
        assert!(cart.all_selected());

        cart.apply(CartAction::ClearSelection).unwrap();
        assert!(cart.selection().is_empty());

        cart.apply(CartAction::SelectAll).unwrap();
        assert!(cart.all_selected());

        let unknown = LineId::new("nope");
        assert!(cart.apply(CartAction::Toggle(unknown)).is_err());
        assert_selection_subset(&cart);
    }

    #[test]
    fn test_from_parts_drops_stale_selection() {
        let item = line("ao-thun", "M", "Đen", 1);
        let id = item.id.clone();
        let cart = Cart::from_parts(vec![item], [id.clone(), LineId::new("gone")]);
        assert_eq!(cart.selection().len(), 1);
        assert!(cart.is_selected(&id));
    }

    #[test]
    fn test_remove_purchased_keeps_rest() {
        let mut cart = Cart::new();
        let a = line("ao-thun", "M", "Đen", 1);
        let b = line("ao-khoac", "L", "Đen", 2);
        let (a_id, b_id) = (a.id.clone(), b.id.clone());
        cart.apply(CartAction::Add(a)).unwrap();
        cart.apply(CartAction::Add(b)).unwrap();
        cart.apply(CartAction::Toggle(b_id.clone())).unwrap();

        cart.apply(CartAction::RemovePurchased(vec![a_id])).unwrap();
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].id, b_id);
        assert!(cart.selection().is_empty());
    }
}
