//! The shopper's account.

use serde::{Deserialize, Serialize};

use crate::address::{Address, AddressBook, AddressError};
use crate::order::{Order, order_sequence};
use crate::types::{AddressId, Email, OrderId, Phone, UserId};
use crate::validation::{AddressInput, PersonalInfoInput, ValidationErrors};

/// Account details, saved addresses and order history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    pub full_name: String,
    pub email: Email,
    pub phone: Phone,
    #[serde(default)]
    addresses: AddressBook,
    #[serde(default)]
    orders: Vec<Order>,
}

impl UserProfile {
    /// Load a profile from its JSON fixture.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the profile schema.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Replace name, email and phone.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] and changes nothing if any field is
    /// invalid.
    pub fn update_personal_info(&mut self, input: &PersonalInfoInput) -> Result<(), ValidationErrors> {
        let valid = input.validate()?;
        self.full_name = valid.full_name;
        self.email = valid.email;
        self.phone = valid.phone;
        Ok(())
    }

    #[must_use]
    pub const fn addresses(&self) -> &AddressBook {
        &self.addresses
    }

    /// See [`AddressBook::add`].
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Invalid`] when the form fails validation.
    pub fn add_address(&mut self, input: &AddressInput) -> Result<Address, AddressError> {
        self.addresses.add(input)
    }

    /// See [`AddressBook::set_default`].
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::NotFound`] for an unknown ID.
    pub fn set_default_address(&mut self, id: &AddressId) -> Result<(), AddressError> {
        self.addresses.set_default(id)
    }

    /// Order history, oldest first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    #[must_use]
    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| &o.id == id)
    }

    /// Append a newly placed order.
    pub fn record_order(&mut self, order: Order) {
        self.orders.push(order);
    }

    /// Highest sequence among the order numbers in the history.
    #[must_use]
    pub fn highest_order_sequence(&self) -> Option<u64> {
        self.orders
            .iter()
            .filter_map(|o| order_sequence(&o.order_number))
            .max()
    }

    /// Highest numeric suffix among `ord<N>` order IDs.
    #[must_use]
    pub fn highest_order_index(&self) -> Option<u64> {
        self.orders
            .iter()
            .filter_map(|o| o.id.as_str().strip_prefix("ord")?.parse().ok())
            .max()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use crate::types::OrderStatus;

    pub(crate) const FIXTURE: &str = r#"{
        "id": "user123",
        "fullName": "Nguyễn Văn A",
        "email": "nguyenvana@example.com",
        "phone": "0912345678",
        "addresses": [
            {"id": "addr1", "fullName": "Nguyễn Văn A", "phone": "0912345678",
             "address": "123 Đường Lê Lợi", "district": "Quận 1",
             "city": "TP. Hồ Chí Minh", "isDefault": true},
            {"id": "addr2", "fullName": "Nguyễn Văn A", "phone": "0912345678",
             "address": "456 Đường Nguyễn Huệ", "district": "Quận 1",
             "city": "TP. Hồ Chí Minh", "isDefault": false}
        ],
        "orders": [
            {"id": "ord1", "orderNumber": "DH-001234", "date": "2025-05-01",
             "totalAmount": 850000, "status": "delivered", "items": []},
            {"id": "ord3", "orderNumber": "DH-001236", "date": "2025-05-08",
             "totalAmount": 680000, "status": "canceled", "items": []}
        ]
    }"#;

    pub(crate) fn profile() -> UserProfile {
        UserProfile::from_json(FIXTURE).unwrap()
    }

    #[test]
    fn test_fixture_loads() {
        let profile = profile();
        assert_eq!(profile.email.as_str(), "nguyenvana@example.com");
        assert_eq!(profile.addresses().default_address().unwrap().id.as_str(), "addr1");
        assert_eq!(profile.highest_order_sequence(), Some(1236));
        assert_eq!(profile.highest_order_index(), Some(3));
        assert_eq!(
            profile.order(&OrderId::new("ord3")).unwrap().status,
            OrderStatus::Canceled
        );
    }

    #[test]
    fn test_update_personal_info() {
        let mut profile = profile();
        let input = PersonalInfoInput {
            full_name: "Nguyễn Văn B".into(),
            email: "b@example.com".into(),
            phone: "0987654321".into(),
        };
        profile.update_personal_info(&input).unwrap();
        assert_eq!(profile.full_name, "Nguyễn Văn B");
        assert_eq!(profile.phone.as_str(), "0987654321");

        let before = profile.clone();
        let bad = PersonalInfoInput {
            email: "nope".into(),
            ..input
        };
        assert!(profile.update_personal_info(&bad).is_err());
        assert_eq!(profile, before);
    }

    #[test]
    fn test_add_address_keeps_default() {
        let mut profile = profile();
        let added = profile
            .add_address(&AddressInput {
                full_name: "Trần Thị C".into(),
                phone: "0900000000".into(),
                address: "1 Lý Thái Tổ".into(),
                district: String::new(),
                city: "Hà Nội".into(),
            })
            .unwrap();
        assert_eq!(added.id.as_str(), "addr3");
        assert!(!added.is_default);

        profile.set_default_address(&added.id).unwrap();
        assert_eq!(profile.addresses().default_address().unwrap().id, added.id);
    }
}
