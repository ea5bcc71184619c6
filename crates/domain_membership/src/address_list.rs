//! Primary address plus an ordered list of secondary addresses
//!
//! Add and remove are plain state transitions; whatever triggers them lives
//! in the presentation layer.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::address::{Address, DEFAULT_COUNTRY_CODE};

fn default_primary() -> Address {
    Address::blank(DEFAULT_COUNTRY_CODE).primary()
}

/// The address set of a draft
///
/// Exactly one entry is primary. Secondary order is insertion order and
/// survives removals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressList {
    #[serde(rename = "primaryAddress", default = "default_primary")]
    primary: Address,
    #[serde(rename = "addresses", default)]
    secondaries: Vec<Address>,
}

/// Owned copy of an [`AddressList`] taken at submission time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSnapshot {
    pub primary: Address,
    pub secondaries: Vec<Address>,
}

impl Default for AddressList {
    fn default() -> Self {
        Self::new(default_primary())
    }
}

impl AddressList {
    /// Creates a list with only a primary address
    pub fn new(mut primary: Address) -> Self {
        primary.is_primary = true;
        Self {
            primary,
            secondaries: Vec::new(),
        }
    }

    pub fn with_secondaries(mut self, secondaries: impl IntoIterator<Item = Address>) -> Self {
        self.secondaries.extend(secondaries.into_iter().map(|mut address| {
            address.is_primary = false;
            address
        }));
        self
    }

    pub fn primary(&self) -> &Address {
        &self.primary
    }

    pub fn primary_mut(&mut self) -> &mut Address {
        &mut self.primary
    }

    pub fn secondaries(&self) -> &[Address] {
        &self.secondaries
    }

    pub fn secondary_mut(&mut self, index: usize) -> Option<&mut Address> {
        self.secondaries.get_mut(index)
    }

    pub fn len_secondaries(&self) -> usize {
        self.secondaries.len()
    }

    /// Appends a secondary address and returns its index
    ///
    /// Without `defaults` a blank entry in `default_country` is added. The
    /// new entry is never primary.
    pub fn add_secondary(&mut self, defaults: Option<Address>, default_country: &str) -> usize {
        let mut address = defaults.unwrap_or_else(|| Address::blank(default_country));
        address.is_primary = false;
        self.secondaries.push(address);
        self.secondaries.len() - 1
    }

    /// Removes the secondary at `index`; out-of-range indices are ignored
    pub fn remove_secondary(&mut self, index: usize) {
        if index < self.secondaries.len() {
            self.secondaries.remove(index);
        } else {
            debug!(
                index,
                len = self.secondaries.len(),
                "Ignoring removal of missing secondary address"
            );
        }
    }

    /// Secondaries with something entered beyond the defaults, with their index
    pub fn filled_secondaries<'a>(
        &'a self,
        default_country: &'a str,
    ) -> impl Iterator<Item = (usize, &'a Address)> + 'a {
        self.secondaries
            .iter()
            .enumerate()
            .filter(move |(_, address)| !address.is_blank_beyond_defaults(default_country))
    }

    pub fn snapshot(&self) -> AddressSnapshot {
        let mut primary = self.primary.clone();
        primary.is_primary = true;
        let secondaries = self
            .secondaries
            .iter()
            .cloned()
            .map(|mut address| {
                address.is_primary = false;
                address
            })
            .collect();
        AddressSnapshot {
            primary,
            secondaries,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list_with(cities: &[&str]) -> AddressList {
        let mut list = AddressList::default();
        for city in cities {
            list.add_secondary(Some(Address::new("Katu 1", "00100", *city, "FI")), "FI");
        }
        list
    }

    fn cities(list: &AddressList) -> Vec<&str> {
        list.secondaries().iter().map(|a| a.city.as_str()).collect()
    }

    #[test]
    fn test_add_returns_index_and_forces_secondary() {
        let mut list = AddressList::default();
        let first = list.add_secondary(None, "FI");
        let second = list.add_secondary(Some(Address::blank("SE").primary()), "FI");
        assert_eq!((first, second), (0, 1));
        assert!(list.secondaries().iter().all(|a| !a.is_primary));
        assert!(list.primary().is_primary);
        assert_eq!(list.secondaries()[0].country_code, "FI");
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut list = list_with(&["Espoo", "Vantaa", "Turku"]);
        list.remove_secondary(1);
        assert_eq!(cities(&list), vec!["Espoo", "Turku"]);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut list = list_with(&["Espoo"]);
        list.remove_secondary(5);
        assert_eq!(cities(&list), vec!["Espoo"]);
    }

    #[test]
    fn test_filled_secondaries_skip_blank_entries() {
        let mut list = list_with(&["Espoo"]);
        list.add_secondary(None, "FI");
        list.add_secondary(Some(Address::new("", "", "Oulu", "FI")), "FI");
        let filled: Vec<usize> = list.filled_secondaries("FI").map(|(i, _)| i).collect();
        assert_eq!(filled, vec![0, 2]);
    }

    #[test]
    fn test_blank_entry_in_configured_country_stays_unfilled() {
        let mut list = AddressList::new(Address::blank("SE"));
        list.add_secondary(None, "SE");
        let json = serde_json::to_value(&list).unwrap();
        let restored: AddressList = serde_json::from_value(json).unwrap();
        assert_eq!(restored.filled_secondaries("SE").count(), 0);
        assert_eq!(restored.filled_secondaries("FI").count(), 1);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut list = list_with(&["Espoo"]);
        let snapshot = list.snapshot();
        list.secondary_mut(0).unwrap().city = "Lahti".to_string();
        assert_eq!(snapshot.secondaries[0].city, "Espoo");
        assert!(snapshot.primary.is_primary);
    }
}
