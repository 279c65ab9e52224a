// SPDX-FileCopyrightText: 2026 Folio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Property tests for classification and the never-fail router boundary.

use folio_core::HandlerId;
use folio_router::KeywordClassifier;
use folio_test_utils::TestHarness;
use proptest::prelude::*;

fn handler_id() -> impl Strategy<Value = HandlerId> {
    prop::sample::select(HandlerId::ALL.to_vec())
}

proptest! {
    #[test]
    fn classification_is_deterministic(query in ".{0,200}") {
        let classifier = KeywordClassifier::new();
        prop_assert_eq!(classifier.classify(&query), classifier.classify(&query));
    }

    #[test]
    fn confidence_stays_in_unit_interval(query in ".{0,200}") {
        let result = KeywordClassifier::new().classify(&query);
        prop_assert!((0.0..=1.0).contains(&result.confidence));
        if result.score == 0.0 {
            prop_assert_eq!(result.category, HandlerId::DEFAULT);
        }
    }

    #[test]
    fn adding_a_high_phrase_never_lowers_its_score(
        query in "[a-z ]{0,80}",
        id in handler_id(),
        pick in any::<prop::sample::Index>(),
    ) {
        let classifier = KeywordClassifier::new();
        let phrases = classifier.high_phrases(id);
        let phrase = phrases[pick.index(phrases.len())];
        let before = classifier.score(&query, id);
        let after = classifier.score(&format!("{query} {phrase}"), id);
        prop_assert!(after >= before);
        prop_assert!(after >= 1.0);
    }

    #[test]
    fn offline_router_always_returns_a_result(query in "\\PC{0,300}") {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let harness = TestHarness::builder().offline().build().unwrap();
        let result = runtime.block_on(harness.ask(&query));
        prop_assert!(result.total_processing_time_secs.is_some());
        prop_assert!(!result.response.is_empty());
        if query.trim().is_empty() {
            prop_assert_eq!(result.handler_id.as_str(), "router");
        } else {
            prop_assert!(result.handler_id.ends_with("_offline"));
        }
    }
}
