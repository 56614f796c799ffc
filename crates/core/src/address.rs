//! Shipping address book.
//!
//! Invariant: at most one address is the default. Addresses are never
//! edited or deleted.

use serde::{Deserialize, Serialize};

use crate::types::{AddressId, Phone};
use crate::validation::{AddressInput, ValidationErrors};

/// Errors from address book operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The form input failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    /// No address has this ID.
    #[error("address not found: {0}")]
    NotFound(AddressId),
}

/// A saved shipping address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub id: AddressId,
    pub full_name: String,
    pub phone: Phone,
    pub address: String,
    #[serde(default)]
    pub district: String,
    pub city: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Address {
    /// Single-line form, e.g. `123 Đường Lê Lợi, Quận 1, TP. Hồ Chí Minh`.
    #[must_use]
    pub fn one_line(&self) -> String {
        [self.address.as_str(), self.district.as_str(), self.city.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A user's addresses.
///
/// Serialized as a plain list. Deserializing goes through
/// [`AddressBook::new`], so the single-default invariant holds for any
/// loaded book.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<Address>", into = "Vec<Address>")]
pub struct AddressBook {
    addresses: Vec<Address>,
}

impl From<Vec<Address>> for AddressBook {
    fn from(addresses: Vec<Address>) -> Self {
        Self::new(addresses)
    }
}

impl From<AddressBook> for Vec<Address> {
    fn from(book: AddressBook) -> Self {
        book.addresses
    }
}

impl AddressBook {
    /// Wrap existing addresses.
    ///
    /// If the input marks several defaults, only the first keeps the flag.
    #[must_use]
    pub fn new(mut addresses: Vec<Address>) -> Self {
        let mut seen_default = false;
        for address in &mut addresses {
            if address.is_default && seen_default {
                address.is_default = false;
            }
            seen_default |= address.is_default;
        }
        Self { addresses }
    }

    /// All addresses in insertion order.
    #[must_use]
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// Whether the book is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Look up an address.
    #[must_use]
    pub fn get(&self, id: &AddressId) -> Option<&Address> {
        self.addresses.iter().find(|a| &a.id == id)
    }

    /// The default address, if any.
    #[must_use]
    pub fn default_address(&self) -> Option<&Address> {
        self.addresses.iter().find(|a| a.is_default)
    }

    /// Validate and append a new address, returning the stored copy.
    ///
    /// The new address becomes the default only when the book was empty.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Invalid`] when the form fails validation.
    pub fn add(&mut self, input: &AddressInput) -> Result<Address, AddressError> {
        let valid = input.validate()?;
        let address = Address {
            id: self.next_id(),
            full_name: valid.full_name,
            phone: valid.phone,
            address: valid.address,
            district: valid.district,
            city: valid.city,
            is_default: self.addresses.is_empty(),
        };
        self.addresses.push(address.clone());
        Ok(address)
    }

    /// Make `id` the only default address.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::NotFound`] and leaves the book unchanged if
    /// no address has this ID.
    pub fn set_default(&mut self, id: &AddressId) -> Result<(), AddressError> {
        if self.get(id).is_none() {
            return Err(AddressError::NotFound(id.clone()));
        }
        for address in &mut self.addresses {
            address.is_default = &address.id == id;
        }
        Ok(())
    }

    /// `addr<N>` with N one past the highest numeric suffix in use.
    fn next_id(&self) -> AddressId {
        let highest = self
            .addresses
            .iter()
            .filter_map(|a| a.id.as_str().strip_prefix("addr")?.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        AddressId::new(format!("addr{}", highest + 1))
    }
}
