//! Tests for building store requests from drafts

use domain_membership::{
    Address, Draft, DraftDefaults, PhotoConsent, ProfileReconciler, YouthLanguage,
};
use test_utils::{
    assert_address_slot, AddressFixtures, ProfileFixtures, TestAddressBuilder, TestProfileBuilder,
};

fn edit_draft(profile: &domain_membership::Profile) -> Draft {
    Draft::from_profile(profile, &DraftDefaults::default())
}

mod primary_relations {
    use super::*;

    #[test]
    fn test_primary_address_keeps_original_id() {
        let original = ProfileFixtures::adult();
        let mut draft = edit_draft(&original);
        draft.address_list.primary_mut().address = "Uusi katu 7".to_string();

        let request = ProfileReconciler::default().build_update_request(Some(&original), &draft);
        assert_address_slot(&request, 0, Some("A1"));
        let primary = request.profile.update_addresses[0].as_ref().unwrap();
        assert_eq!(primary.address, "Uusi katu 7");
        assert!(primary.primary);
    }

    #[test]
    fn test_missing_primary_address_is_null() {
        let original = TestProfileBuilder::new().with_primary_address(None).build();
        let draft = edit_draft(&original);

        let request = ProfileReconciler::default().build_update_request(Some(&original), &draft);
        assert_eq!(request.profile.update_addresses, vec![None]);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["profile"]["updateAddresses"], serde_json::json!([null]));
    }

    #[test]
    fn test_primary_address_without_id_is_null() {
        let original = TestProfileBuilder::new()
            .with_primary_address(Some(AddressFixtures::test_address()))
            .build();
        let request =
            ProfileReconciler::default().build_update_request(Some(&original), &edit_draft(&original));
        assert_address_slot(&request, 0, None);
    }

    #[test]
    fn test_phone_without_id_is_null() {
        let original = ProfileFixtures::without_relations();
        let request =
            ProfileReconciler::default().build_update_request(Some(&original), &edit_draft(&original));
        assert_eq!(request.profile.update_phones, vec![None]);

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["profile"]["updatePhones"], serde_json::json!([null]));
    }

    #[test]
    fn test_phone_update_shape() {
        let original = ProfileFixtures::adult();
        let request =
            ProfileReconciler::default().build_update_request(Some(&original), &edit_draft(&original));
        let json = serde_json::to_value(&request.profile.update_phones[0]).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "T1",
                "phone": "0401234567",
                "phoneType": "OTHER",
                "primary": true
            })
        );
    }
}

mod secondary_addresses {
    use super::*;

    #[test]
    fn test_stored_and_new_secondaries() {
        let original = TestProfileBuilder::new()
            .with_secondary(AddressFixtures::stored_secondary())
            .build();
        let mut draft = edit_draft(&original);
        draft
            .address_list
            .add_secondary(Some(TestAddressBuilder::new().with_city("Oulu").build()), "FI");

        let request = ProfileReconciler::default().build_update_request(Some(&original), &draft);
        assert_eq!(request.profile.update_addresses.len(), 3);
        assert_address_slot(&request, 1, Some("A2"));

        let created = request.profile.update_addresses[2].as_ref().unwrap();
        assert!(created.id.is_none());
        assert!(!created.primary);
        assert_eq!(created.city, "Oulu");
    }

    #[test]
    fn test_removed_secondary_not_sent() {
        let original = TestProfileBuilder::new()
            .with_secondary(AddressFixtures::stored_secondary())
            .with_secondary(TestAddressBuilder::new().with_id("A3").build())
            .build();
        let mut draft = edit_draft(&original);
        draft.address_list.remove_secondary(0);
        draft.address_list.remove_secondary(9);

        let request = ProfileReconciler::default().build_update_request(Some(&original), &draft);
        assert_eq!(request.profile.update_addresses.len(), 2);
        assert_address_slot(&request, 1, Some("A3"));
    }

    #[test]
    fn test_blank_secondary_skipped() {
        let original = ProfileFixtures::adult();
        let mut draft = edit_draft(&original);
        draft.address_list.add_secondary(None, "FI");
        let request = ProfileReconciler::default().build_update_request(Some(&original), &draft);
        assert_eq!(request.profile.update_addresses.len(), 1);
    }

    #[test]
    fn test_empty_country_defaults() {
        let original = ProfileFixtures::adult();
        let mut draft = edit_draft(&original);
        draft
            .address_list
            .add_secondary(Some(Address::new("Tie 1", "90100", "Oulu", "")), "FI");
        let request = ProfileReconciler::default().build_update_request(Some(&original), &draft);
        assert_eq!(
            request.profile.update_addresses[1].as_ref().unwrap().country_code,
            "FI"
        );
    }
}

mod youth_profile {
    use super::*;

    #[test]
    fn test_birth_date_unchanged_and_fields_from_draft() {
        let original = ProfileFixtures::minor();
        let mut draft = edit_draft(&original);
        draft.birth_date = None;
        draft.school_class = "9C".to_string();
        draft.language_at_home = YouthLanguage::Swedish;
        draft.photo_usage_approved = PhotoConsent::Yes;

        let request = ProfileReconciler::default().build_update_request(Some(&original), &draft);
        let youth = &request.youth_profile;
        assert_eq!(youth.birth_date, original.youth_profile.birth_date);
        assert_eq!(youth.school_class, "9C");
        assert_eq!(youth.language_at_home, YouthLanguage::Swedish);
        assert!(youth.photo_usage_approved);
        assert_eq!(youth.approver_email, "pirjo.virtanen@example.fi");
    }

    #[test]
    fn test_hidden_photo_question_persists_false() {
        let original = TestProfileBuilder::new()
            .with_age(14)
            .with_photo_consent(None)
            .build();
        let request =
            ProfileReconciler::default().build_update_request(Some(&original), &edit_draft(&original));
        assert!(!request.youth_profile.photo_usage_approved);
    }
}

#[test]
fn test_building_twice_gives_identical_requests() {
    let original = TestProfileBuilder::new()
        .with_secondary(AddressFixtures::stored_secondary())
        .build();
    let mut draft = edit_draft(&original);
    draft.address_list.add_secondary(Some(AddressFixtures::swedish()), "FI");

    let reconciler = ProfileReconciler::default();
    let first = reconciler.build_update_request(Some(&original), &draft);
    let second = reconciler.build_update_request(Some(&original), &draft);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_update_request_shape() {
    let original = ProfileFixtures::adult();
    let request =
        ProfileReconciler::default().build_update_request(Some(&original), &edit_draft(&original));
    let json = serde_json::to_value(&request).unwrap();

    let profile = &json["profile"];
    assert_eq!(profile["firstName"], "Aino");
    assert_eq!(profile["language"], "FINNISH");
    assert_eq!(profile["updateAddresses"][0]["addressType"], "OTHER");
    assert_eq!(profile["updateAddresses"][0]["postalCode"], "00100");
    assert_eq!(json["youthProfile"]["photoUsageApproved"], false);
    assert_eq!(json["youthProfile"]["schoolName"], "Kallion lukio");
}
