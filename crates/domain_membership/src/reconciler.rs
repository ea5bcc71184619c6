//! Builds store requests from a draft
//!
//! The update path is edit-only for the primary relations: the primary
//! address and the primary phone are sent only when the stored profile
//! already has an identifier for them, otherwise their slot is `null`.
//! Secondary addresses are an open collection and may be created through
//! the same request.

use tracing::debug;

use crate::address::{Address, AddressType, DEFAULT_COUNTRY_CODE};
use crate::draft::Draft;
use crate::profile::{PhoneType, Profile};
use crate::request::{
    AddressInput, AddressUpdate, CreateProfileInput, CreateRequest, PhoneInput, PhoneUpdate,
    UpdateProfileInput, UpdateRequest, YouthProfileInput,
};

/// Reconciles a draft with the profile it was loaded from
#[derive(Debug, Clone)]
pub struct ProfileReconciler {
    default_country: String,
}

impl Default for ProfileReconciler {
    fn default() -> Self {
        Self::new(DEFAULT_COUNTRY_CODE)
    }
}

impl ProfileReconciler {
    pub fn new(default_country: impl Into<String>) -> Self {
        Self {
            default_country: default_country.into(),
        }
    }

    fn country_of(&self, address: &Address) -> String {
        if address.country_code.trim().is_empty() {
            self.default_country.clone()
        } else {
            address.country_code.clone()
        }
    }

    fn address_update(&self, address: &Address, primary: bool) -> AddressUpdate {
        AddressUpdate {
            id: None,
            address: address.address.clone(),
            postal_code: address.postal_code.clone(),
            city: address.city.clone(),
            address_type: AddressType::Other,
            primary,
            country_code: self.country_of(address),
        }
    }

    /// Builds the update request for an edited profile
    ///
    /// The result depends only on the arguments.
    pub fn build_update_request(&self, original: Option<&Profile>, draft: &Draft) -> UpdateRequest {
        let snapshot = draft.address_list.snapshot();

        let primary_id = original
            .and_then(|profile| profile.primary_address.as_ref())
            .and_then(|address| address.id.clone());
        let primary = match primary_id {
            Some(id) => Some(AddressUpdate {
                id: Some(id),
                ..self.address_update(&snapshot.primary, true)
            }),
            None => {
                debug!("Original profile has no primary address id, leaving the slot empty");
                None
            }
        };

        let mut update_addresses = vec![primary];
        update_addresses.extend(
            snapshot
                .secondaries
                .iter()
                .filter(|address| !address.is_blank_beyond_defaults(&self.default_country))
                .map(|address| {
                    Some(AddressUpdate {
                        id: address.id.clone(),
                        ..self.address_update(address, false)
                    })
                }),
        );

        let phone_id = original
            .and_then(|profile| profile.primary_phone.as_ref())
            .and_then(|phone| phone.id.clone());
        let phone = match phone_id {
            Some(id) => Some(PhoneUpdate {
                id: Some(id),
                phone: draft.phone.clone(),
                phone_type: PhoneType::Other,
                primary: true,
            }),
            None => {
                debug!("Original profile has no primary phone id, leaving the slot empty");
                None
            }
        };

        let birth_date = original.and_then(|profile| profile.youth_profile.birth_date);

        UpdateRequest {
            profile: UpdateProfileInput {
                first_name: draft.first_name.clone(),
                last_name: draft.last_name.clone(),
                language: draft.profile_language,
                update_addresses,
                update_phones: vec![phone],
            },
            youth_profile: youth_input(draft, birth_date),
        }
    }

    /// Builds the request creating a new profile from a draft
    pub fn build_create_request(&self, draft: &Draft) -> CreateRequest {
        let snapshot = draft.address_list.snapshot();
        let to_input = |address: &Address, primary: bool| AddressInput {
            address: address.address.clone(),
            postal_code: address.postal_code.clone(),
            city: address.city.clone(),
            address_type: AddressType::Other,
            primary,
            country_code: self.country_of(address),
        };

        let mut add_addresses = vec![to_input(&snapshot.primary, true)];
        add_addresses.extend(
            snapshot
                .secondaries
                .iter()
                .filter(|address| !address.is_blank_beyond_defaults(&self.default_country))
                .map(|address| to_input(address, false)),
        );

        CreateRequest {
            profile: CreateProfileInput {
                first_name: draft.first_name.clone(),
                last_name: draft.last_name.clone(),
                language: draft.profile_language,
                add_addresses,
                add_phones: vec![PhoneInput {
                    phone: draft.phone.clone(),
                    phone_type: PhoneType::Other,
                    primary: true,
                }],
            },
            youth_profile: youth_input(draft, draft.birth_date),
        }
    }
}

fn youth_input(draft: &Draft, birth_date: Option<chrono::NaiveDate>) -> YouthProfileInput {
    YouthProfileInput {
        birth_date,
        school_name: draft.school_name.clone(),
        school_class: draft.school_class.clone(),
        approver_first_name: draft.approver_first_name.clone(),
        approver_last_name: draft.approver_last_name.clone(),
        approver_phone: draft.approver_phone.clone(),
        approver_email: draft.approver_email.clone(),
        language_at_home: draft.language_at_home,
        photo_usage_approved: draft.photo_usage_approved.as_bool(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draft::{DraftDefaults, PhotoConsent};
    use crate::profile::{Phone, YouthProfile};
    use chrono::NaiveDate;

    fn stored() -> Profile {
        Profile {
            primary_address: Some(Address::new("Katu 1", "00100", "Helsinki", "FI").with_id("A1")),
            primary_phone: Some(Phone {
                id: Some("P1".into()),
                phone: "0401111111".to_string(),
                ..Phone::default()
            }),
            youth_profile: YouthProfile {
                birth_date: NaiveDate::from_ymd_opt(2009, 3, 3),
                ..YouthProfile::default()
            },
            ..Profile::default()
        }
    }

    #[test]
    fn test_primary_relations_keep_original_ids() {
        let original = stored();
        let mut draft = Draft::from_profile(&original, &DraftDefaults::default());
        draft.phone = "0402222222".to_string();
        draft.address_list.primary_mut().city = "Espoo".to_string();

        let request = ProfileReconciler::default().build_update_request(Some(&original), &draft);
        let primary = request.profile.update_addresses[0].as_ref().unwrap();
        assert_eq!(primary.id.as_ref().map(|id| id.as_str()), Some("A1"));
        assert_eq!(primary.city, "Espoo");
        assert!(primary.primary);

        let phone = request.profile.update_phones[0].as_ref().unwrap();
        assert_eq!(phone.id.as_ref().map(|id| id.as_str()), Some("P1"));
        assert_eq!(phone.phone, "0402222222");
    }

    #[test]
    fn test_missing_relations_become_null() {
        let draft = Draft::empty(&DraftDefaults::default());
        let request = ProfileReconciler::default().build_update_request(None, &draft);
        assert_eq!(request.profile.update_addresses, vec![None]);
        assert_eq!(request.profile.update_phones, vec![None]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["profile"]["updateAddresses"], serde_json::json!([null]));
    }

    #[test]
    fn test_secondaries_appended_in_order() {
        let original = stored();
        let mut draft = Draft::from_profile(&original, &DraftDefaults::default());
        draft
            .address_list
            .add_secondary(Some(Address::new("Tie 1", "20100", "Turku", "FI").with_id("A2")), "FI");
        draft.address_list.add_secondary(None, "FI");
        draft
            .address_list
            .add_secondary(Some(Address::new("Polku 3", "33100", "Tampere", "FI")), "FI");

        let request = ProfileReconciler::default().build_update_request(Some(&original), &draft);
        let addresses = &request.profile.update_addresses;
        assert_eq!(addresses.len(), 3);
        let turku = addresses[1].as_ref().unwrap();
        assert_eq!(turku.id.as_ref().map(|id| id.as_str()), Some("A2"));
        assert!(!turku.primary);
        let tampere = addresses[2].as_ref().unwrap();
        assert!(tampere.id.is_none());

        let json = serde_json::to_value(tampere).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["addressType"], "OTHER");
    }

    #[test]
    fn test_birth_date_comes_from_original() {
        let original = stored();
        let mut draft = Draft::from_profile(&original, &DraftDefaults::default());
        draft.birth_date = NaiveDate::from_ymd_opt(1990, 1, 1);
        let request = ProfileReconciler::default().build_update_request(Some(&original), &draft);
        assert_eq!(request.youth_profile.birth_date, NaiveDate::from_ymd_opt(2009, 3, 3));
    }

    #[test]
    fn test_photo_consent_persisted_as_bool() {
        let mut draft = Draft::empty(&DraftDefaults::default());
        let reconciler = ProfileReconciler::default();
        for (consent, expected) in [
            (PhotoConsent::Yes, true),
            (PhotoConsent::No, false),
            (PhotoConsent::Unanswered, false),
        ] {
            draft.photo_usage_approved = consent;
            let request = reconciler.build_update_request(None, &draft);
            assert_eq!(request.youth_profile.photo_usage_approved, expected);
        }
    }

    #[test]
    fn test_create_request_uses_draft_values() {
        let mut draft = Draft::empty(&DraftDefaults::default());
        draft.birth_date = NaiveDate::from_ymd_opt(2008, 8, 8);
        draft.phone = "0403333333".to_string();
        draft.address_list.add_secondary(None, "FI");

        let request = ProfileReconciler::default().build_create_request(&draft);
        assert_eq!(request.profile.add_addresses.len(), 1);
        assert!(request.profile.add_addresses[0].primary);
        assert_eq!(request.profile.add_phones[0].phone, "0403333333");
        assert_eq!(request.youth_profile.birth_date, NaiveDate::from_ymd_opt(2008, 8, 8));
    }
}
