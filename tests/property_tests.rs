/// Property-based tests using proptest
/// Tests invariants of lead scoring and UTM extraction for arbitrary input
use proptest::prelude::*;
use tint_funnel_api::models::{Lead, UtmParams};
use tint_funnel_api::scoring::{score_lead, MAX_SCORE};
use tint_funnel_api::utm::extract_utm;

fn arb_lead() -> impl Strategy<Value = Lead> {
    (
        proptest::option::of("[a-zA-Z ]{0,20}"),
        proptest::option::of("[a-z]{1,8}@[a-z]{1,8}\\.com"),
        proptest::option::of("[0-9]{0,12}"),
        proptest::option::of("[a-zA-Z ]{0,20}"),
        proptest::option::of("\\PC{0,160}"),
    )
        .prop_map(|(name, email, phone, business, challenges)| Lead {
            name: name.unwrap_or_default(),
            email: email.unwrap_or_default(),
            phone,
            business,
            challenges,
            ..Lead::default()
        })
}

// Property: score is always within bounds
proptest! {
    #[test]
    fn score_never_exceeds_max(lead in arb_lead()) {
        prop_assert!(score_lead(&lead) <= MAX_SCORE);
    }

    #[test]
    fn complete_contact_with_short_challenges_scores_75(
        name in "[a-zA-Z]{1,10}",
        email in "[a-z]{1,8}@[a-z]{1,8}\\.com",
        phone in "[0-9]{7,12}",
        business in "[a-zA-Z]{1,15}",
        challenges in proptest::option::of("[a-z]{0,10}")
    ) {
        let lead = Lead {
            name,
            email,
            phone: Some(phone),
            business: Some(business),
            challenges,
            ..Lead::default()
        };
        prop_assert_eq!(score_lead(&lead), 75);
    }
}

// Property: adding a field never lowers the score
proptest! {
    #[test]
    fn adding_fields_is_monotonic(
        lead in arb_lead(),
        name in "[a-zA-Z]{1,10}",
        phone in "[0-9]{7,12}",
        business in "[a-zA-Z]{1,15}",
        extra in "[a-z]{0,120}"
    ) {
        let base = score_lead(&lead);

        let with_name = Lead { name, ..lead.clone() };
        prop_assert!(score_lead(&with_name) >= base);

        let with_phone = Lead { phone: Some(phone), ..lead.clone() };
        prop_assert!(score_lead(&with_phone) >= base);

        let with_business = Lead { business: Some(business), ..lead.clone() };
        prop_assert!(score_lead(&with_business) >= base);

        let longer = format!("{}{}", lead.challenges.clone().unwrap_or_default(), extra);
        let with_longer_challenges = Lead { challenges: Some(longer), ..lead.clone() };
        prop_assert!(score_lead(&with_longer_challenges) >= base);
    }

    #[test]
    fn scoring_is_deterministic(lead in arb_lead()) {
        prop_assert_eq!(score_lead(&lead), score_lead(&lead));
    }
}

// Property: UTM extraction never panics and ignores non-URLs
proptest! {
    #[test]
    fn utm_extraction_never_panics(referer in "\\PC*") {
        let _ = extract_utm(&referer);
    }

    #[test]
    fn relative_paths_yield_empty_mapping(path in "/[a-z]{0,10}\\?utm_source=[a-z]{1,8}") {
        prop_assert_eq!(extract_utm(&path), UtmParams::default());
    }

    #[test]
    fn source_round_trips_through_query(source in "[a-zA-Z0-9_-]{1,20}") {
        let utm = extract_utm(&format!("https://tintflow.io/pricing?utm_source={}", source));
        prop_assert_eq!(utm.utm_source, Some(source));
        prop_assert_eq!(utm.utm_medium, None);
    }
}
