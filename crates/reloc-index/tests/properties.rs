use pretty_assertions::assert_eq;
use proptest::prelude::*;
use reloc_index::{CollisionPolicy, IndexError, MigrationIndex, MigrationRecord};
use reloc_test_utils::{precedence_records, record};
use std::collections::HashSet;

#[derive(Debug, Clone)]
enum Scope {
    Any,
    Exact(u32, u32),
    Range(u32, u32),
}

impl Scope {
    fn pattern(&self) -> Option<String> {
        match self {
            Scope::Any => None,
            Scope::Exact(major, minor) => Some(format!("{major}.{minor}")),
            Scope::Range(lo, hi) => Some(format!("[{lo},{hi})")),
        }
    }

    /// A version the scope matches
    fn sample_version(&self) -> Option<String> {
        match self {
            Scope::Any => None,
            Scope::Exact(major, minor) => Some(format!("{major}.{minor}")),
            Scope::Range(lo, _) => Some(lo.to_string()),
        }
    }
}

fn scope() -> impl Strategy<Value = Scope> {
    prop_oneof![
        Just(Scope::Any),
        (0u32..5, 0u32..5).prop_map(|(a, b)| Scope::Exact(a, b)),
        (0u32..5, 1u32..5).prop_map(|(lo, width)| Scope::Range(lo, lo + width)),
    ]
}

fn rule() -> impl Strategy<Value = (String, String, Scope)> {
    ("[a-c]", "[x-z]", scope())
}

fn unique_rules() -> impl Strategy<Value = Vec<(String, String, Scope)>> {
    proptest::collection::vec(rule(), 0..24).prop_map(|rules| {
        let mut seen = HashSet::new();
        rules
            .into_iter()
            .filter(|(g, a, s)| seen.insert((g.clone(), a.clone(), s.pattern())))
            .collect()
    })
}

fn to_record(i: usize, (g, a, s): &(String, String, Scope)) -> MigrationRecord {
    let r = record(g, a, &format!("new.{i}"), a);
    match s.pattern() {
        Some(p) => r.with_version_pattern(p),
        None => r,
    }
}

proptest! {
    #[test]
    fn prop_every_record_is_resolvable(rules in unique_rules()) {
        let records: Vec<_> = rules.iter().enumerate().map(|(i, r)| to_record(i, r)).collect();
        let index = MigrationIndex::build_with(records.clone(), CollisionPolicy::Reject).unwrap();
        prop_assert_eq!(index.len(), records.len());

        for ((g, a, scope), expected) in rules.iter().zip(&records) {
            let version = scope.sample_version();
            let found = index.resolve(g, a, version.as_deref());
            prop_assert!(found.is_some());

            // exact and wildcard keys are unique per coordinate, so they resolve to themselves
            if !matches!(scope, Scope::Range(..)) {
                prop_assert_eq!(found, Some(expected));
            }
        }
    }

    #[test]
    fn prop_blank_identity_fails_whole_build(
        rules in unique_rules(),
        position in 0usize..24,
        blank_group in any::<bool>(),
    ) {
        let mut records: Vec<_> = rules.iter().enumerate().map(|(i, r)| to_record(i, r)).collect();
        let bad = if blank_group { record("", "x", "n", "x") } else { record("a", "", "n", "x") };
        let position = position.min(records.len());
        records.insert(position, bad);

        let result = MigrationIndex::build(records);
        let is_malformed = matches!(result, Err(IndexError::MalformedRecord { ordinal, .. }) if ordinal == position);
        prop_assert!(is_malformed);
    }

    #[test]
    fn prop_queries_are_idempotent(
        rules in unique_rules(),
        queries in proptest::collection::vec(("[a-c]", "[x-z]", proptest::option::of(0u32..8)), 1..16),
    ) {
        let records: Vec<_> = rules.iter().enumerate().map(|(i, r)| to_record(i, r)).collect();
        let index = MigrationIndex::build(records).unwrap();

        for (g, a, v) in &queries {
            let v = v.map(|n| n.to_string());
            let first = index.resolve(g, a, v.as_deref()).cloned();
            let second = index.resolve(g, a, v.as_deref()).cloned();
            prop_assert_eq!(first, second);
        }
    }

    #[test]
    fn prop_unknown_group_is_none(v in proptest::option::of("[0-9]\\.[0-9]")) {
        let index = MigrationIndex::build(precedence_records("g", "a")).unwrap();
        prop_assert!(index.resolve("com.unknown", "lib", v.as_deref()).is_none());
    }
}

#[test]
fn precedence_law_with_fixture() {
    let index = MigrationIndex::build(precedence_records("g", "a")).unwrap();
    let hit = |v: Option<&str>| index.resolve("g", "a", v).map(|r| r.new_group_id.clone());

    assert_eq!(hit(Some("1.2.3")).as_deref(), Some("org.exact"));
    assert_eq!(hit(Some("1.5.0")).as_deref(), Some("org.range"));
    assert_eq!(hit(Some("3.0.0")).as_deref(), Some("org.wildcard"));
    assert_eq!(hit(None).as_deref(), Some("org.wildcard"));
}

#[test]
fn swapping_equal_class_records_swaps_winner() {
    let first = record("g", "a", "first", "a").with_version_pattern("[1.0,2.0)");
    let second = record("g", "a", "second", "a").with_version_pattern("[1.5,3.0)");

    let forward = MigrationIndex::build(vec![first.clone(), second.clone()]).unwrap();
    let backward = MigrationIndex::build(vec![second, first]).unwrap();

    assert_eq!(forward.resolve("g", "a", Some("1.7")).unwrap().new_group_id, "second");
    assert_eq!(backward.resolve("g", "a", Some("1.7")).unwrap().new_group_id, "first");
}

#[test]
fn index_shared_across_threads() {
    let index = MigrationIndex::build(precedence_records("g", "a")).unwrap();

    std::thread::scope(|s| {
        for v in ["1.2.3", "1.5.0", "3.0.0"] {
            let index = &index;
            s.spawn(move || {
                for _ in 0..1_000 {
                    assert!(index.resolve("g", "a", Some(v)).is_some());
                }
            });
        }
    });
}
