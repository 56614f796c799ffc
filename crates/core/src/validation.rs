//! Form validation.
//!
//! Address and personal-info forms are checked field by field. Every
//! failing field gets one message, so a form can show all of its errors at
//! once.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::{Email, Phone};

/// Field-level validation failures, keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("invalid fields: {}", .errors.keys().cloned().collect::<Vec<_>>().join(", "))]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    /// Record a message for `field`. The first message per field wins.
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_owned())
            .or_insert_with(|| message.into());
    }

    /// Whether no field failed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Message for `field`, if it failed.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    /// Names of the failing fields.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.errors.keys().map(String::as_str)
    }

    /// All `field → message` pairs.
    #[must_use]
    pub const fn messages(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    /// `Ok(value)` when nothing failed, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one field failed.
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }

    fn required(&mut self, field: &str, value: &str, message: &str) -> String {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            self.add(field, message);
        }
        trimmed.to_owned()
    }

    fn phone(&mut self, field: &str, value: &str) -> Option<Phone> {
        Phone::parse(value)
            .map_err(|_| self.add(field, "Số điện thoại không hợp lệ"))
            .ok()
    }

    fn email(&mut self, field: &str, value: &str) -> Option<Email> {
        Email::parse(value)
            .map_err(|_| self.add(field, "Email không hợp lệ"))
            .ok()
    }
}

/// Raw address form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressInput {
    pub full_name: String,
    pub phone: String,
    pub address: String,
    #[serde(default)]
    pub district: String,
    pub city: String,
}

/// Address fields that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidAddress {
    pub full_name: String,
    pub phone: Phone,
    pub address: String,
    pub district: String,
    pub city: String,
}

impl AddressInput {
    /// Check the address form.
    ///
    /// Full name, street address and city are required; the phone needs at
    /// least ten characters. District is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] naming each failing field.
    pub fn validate(&self) -> Result<ValidAddress, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let full_name = errors.required("full_name", &self.full_name, "Vui lòng nhập họ tên");
        let phone = errors.phone("phone", &self.phone);
        let address = errors.required("address", &self.address, "Vui lòng nhập địa chỉ");
        let city = errors.required("city", &self.city, "Vui lòng nhập thành phố");

        match phone {
            Some(phone) => errors.finish(|| ValidAddress {
                full_name,
                phone,
                address,
                district: self.district.trim().to_owned(),
                city,
            }),
            None => Err(errors),
        }
    }
}

/// Raw personal-info form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfoInput {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// Personal info that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidPersonalInfo {
    pub full_name: String,
    pub email: Email,
    pub phone: Phone,
}

impl PersonalInfoInput {
    /// Check the personal-info form: name required, valid email and phone.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] naming each failing field.
    pub fn validate(&self) -> Result<ValidPersonalInfo, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let full_name = errors.required("full_name", &self.full_name, "Vui lòng nhập họ tên");
        let email = errors.email("email", &self.email);
        let phone = errors.phone("phone", &self.phone);

        match (email, phone) {
            (Some(email), Some(phone)) => errors.finish(|| ValidPersonalInfo {
                full_name,
                email,
                phone,
            }),
            _ => Err(errors),
        }
    }
}
