//! Property-based tests for criteria merge and slug sanitization.
//!
//! The merge rule has to be safe to apply repeatedly within a request:
//! - Idempotence: merge(A, A) == A
//! - Associativity: merge(merge(A, B), C) == merge(A, merge(B, C))
//! - The newest `load` flag always wins
//!
//! Sanitization has to be a projection: applying it twice changes nothing.

use blockramp_types::{Criteria, LoadOverride, PostId, PostTypeSlug};
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn load_strategy() -> impl Strategy<Value = Option<LoadOverride>> {
    prop_oneof![
        Just(None),
        Just(Some(LoadOverride::Always)),
        Just(Some(LoadOverride::Never)),
    ]
}

fn post_ids_strategy() -> impl Strategy<Value = BTreeSet<PostId>> {
    prop::collection::btree_set((1u64..500).prop_map(|n| PostId::new(n).unwrap()), 0..8)
}

fn post_types_strategy() -> impl Strategy<Value = BTreeSet<PostTypeSlug>> {
    prop::collection::btree_set(
        prop::string::string_regex("[a-z][a-z0-9_]{0,10}")
            .unwrap()
            .prop_map(|s| PostTypeSlug::new(&s).unwrap()),
        0..5,
    )
}

fn criteria_strategy() -> impl Strategy<Value = Criteria> {
    (load_strategy(), post_types_strategy(), post_ids_strategy()).prop_map(
        |(load, post_types, post_ids)| Criteria {
            load,
            post_types,
            post_ids,
        },
    )
}

// =============================================================================
// MERGE PROPERTIES
// =============================================================================

proptest! {
    /// Idempotence: merging a record over itself changes nothing.
    #[test]
    fn merge_is_idempotent(c in criteria_strategy()) {
        let merged = c.clone().merged_over(c.clone());
        prop_assert_eq!(merged, c);
    }

    /// Associativity: merge(merge(A, B), C) == merge(A, merge(B, C)).
    #[test]
    fn merge_is_associative(
        a in criteria_strategy(),
        b in criteria_strategy(),
        c in criteria_strategy(),
    ) {
        let left = a.clone().merged_over(b.clone()).merged_over(c.clone());
        let right = a.merged_over(b.merged_over(c));
        prop_assert_eq!(left, right);
    }

    /// The newer record's load flag always survives a merge; the stored
    /// flag only survives when the newer record carries none.
    #[test]
    fn newest_load_flag_wins(a in criteria_strategy(), b in criteria_strategy()) {
        let expected = a.load.or(b.load);
        let merged = a.merged_over(b);
        prop_assert_eq!(merged.load, expected);
    }

    /// Merged sets contain exactly the union of both inputs.
    #[test]
    fn merge_unions_post_ids(a in criteria_strategy(), b in criteria_strategy()) {
        let expected: BTreeSet<_> = a.post_ids.union(&b.post_ids).copied().collect();
        let merged = a.merged_over(b);
        prop_assert_eq!(merged.post_ids, expected);
    }
}

// =============================================================================
// SANITIZATION PROPERTIES
// =============================================================================

proptest! {
    /// Sanitizing already-sanitized input is the identity.
    #[test]
    fn sanitize_is_idempotent(raw in "[ -~]{0,40}") {
        if let Some(slug) = PostTypeSlug::sanitized(&raw) {
            let again = PostTypeSlug::sanitized(slug.as_str()).unwrap();
            prop_assert_eq!(again, slug);
        }
    }

    /// Every produced slug satisfies the strict constructor.
    #[test]
    fn sanitized_output_is_strictly_valid(raw in "[ -~]{0,40}") {
        if let Some(slug) = PostTypeSlug::sanitized(&raw) {
            prop_assert!(PostTypeSlug::new(slug.as_str()).is_ok());
        }
    }
}
