//! Test Data Builders
//!
//! Builder patterns for constructing test data with sensible defaults.
//! Tests specify only the relevant fields.

use chrono::NaiveDate;
use core_kernel::AddressId;
use domain_membership::{Address, AddressType, Phone, Profile};

use crate::fixtures::{ProfileFixtures, TemporalFixtures};
use crate::generators::birth_date_for_age;

/// Builder for constructing test profiles
pub struct TestProfileBuilder {
    profile: Profile,
}

impl Default for TestProfileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProfileBuilder {
    /// Starts from [`ProfileFixtures::adult`]
    pub fn new() -> Self {
        Self {
            profile: ProfileFixtures::adult(),
        }
    }

    pub fn with_name(mut self, first: impl Into<String>, last: impl Into<String>) -> Self {
        self.profile.first_name = first.into();
        self.profile.last_name = last.into();
        self
    }

    pub fn with_birth_date(mut self, date: Option<NaiveDate>) -> Self {
        self.profile.youth_profile.birth_date = date;
        self
    }

    /// Sets a birth date giving `age` on [`TemporalFixtures::today`]
    pub fn with_age(self, age: u32) -> Self {
        self.with_birth_date(Some(birth_date_for_age(age, TemporalFixtures::today())))
    }

    /// Replaces the primary address; `None` removes it
    pub fn with_primary_address(mut self, address: Option<Address>) -> Self {
        self.profile.addresses.retain(|a| !a.is_primary);
        if let Some(address) = &address {
            let mut stored = address.clone();
            stored.is_primary = true;
            self.profile.addresses.insert(0, stored);
        }
        self.profile.primary_address = address.map(|a| a.primary());
        self
    }

    pub fn with_secondary(mut self, address: Address) -> Self {
        let mut address = address;
        address.is_primary = false;
        self.profile.addresses.push(address);
        self
    }

    pub fn with_phone(mut self, phone: Option<Phone>) -> Self {
        self.profile.primary_phone = phone;
        self
    }

    pub fn with_photo_consent(mut self, approved: Option<bool>) -> Self {
        self.profile.youth_profile.photo_usage_approved = approved;
        self
    }

    pub fn without_approver(mut self) -> Self {
        let youth = &mut self.profile.youth_profile;
        youth.approver_first_name = None;
        youth.approver_last_name = None;
        youth.approver_phone = None;
        youth.approver_email = None;
        self
    }

    pub fn build(self) -> Profile {
        self.profile
    }
}

/// Builder for constructing test addresses
pub struct TestAddressBuilder {
    address: Address,
}

impl Default for TestAddressBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestAddressBuilder {
    /// Starts from a valid Finnish address without id
    pub fn new() -> Self {
        Self {
            address: Address::new("Hämeentie 3", "00530", "Helsinki", "FI"),
        }
    }

    pub fn with_id(mut self, id: impl Into<AddressId>) -> Self {
        self.address.id = Some(id.into());
        self
    }

    pub fn with_street(mut self, street: impl Into<String>) -> Self {
        self.address.address = street.into();
        self
    }

    pub fn with_postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.address.postal_code = postal_code.into();
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.address.city = city.into();
        self
    }

    pub fn with_country(mut self, code: impl Into<String>) -> Self {
        self.address.country_code = code.into();
        self
    }

    pub fn with_type(mut self, address_type: AddressType) -> Self {
        self.address.address_type = address_type;
        self
    }

    pub fn primary(mut self) -> Self {
        self.address.is_primary = true;
        self
    }

    pub fn build(self) -> Address {
        self.address
    }
}
