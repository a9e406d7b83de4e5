//! Property tests over generated component values.

use portal_id::contexts;
use proptest::prelude::*;

fn segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9_.-]{1,12}"
}

/// Two to five portlet components.
fn portlet_components() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(segment(), 2..=5)
}

fn navigation_components() -> impl Strategy<Value = Vec<String>> {
    (
        prop::sample::select(vec!["site", "space", "dashboard"]),
        segment(),
        prop::collection::vec(segment(), 1..6),
    )
        .prop_map(|(site_type, site, nodes)| {
            let mut components = vec![site_type.to_string(), site];
            components.extend(nodes);
            components
        })
}

proptest! {
    #[test]
    fn portlet_ids_round_trip(components in portlet_components()) {
        let context = contexts::portlet().unwrap();
        let id = context.create(&components).unwrap();
        let parsed = context.parse(&context.format(&id).unwrap()).unwrap();
        prop_assert_eq!(parsed.components(), id.components());
        prop_assert_eq!(parsed, id);
    }

    #[test]
    fn navigation_ids_round_trip(components in navigation_components()) {
        let context = contexts::navigation().unwrap();
        let id = context.create(&components).unwrap();
        let formatted = id.to_string();
        prop_assert!(formatted.starts_with('/'));
        prop_assert_eq!(context.parse(&formatted).unwrap(), id);
    }

    #[test]
    fn navigation_parent_child_symmetry(components in navigation_components()) {
        let context = contexts::navigation().unwrap();
        let id = context.create(&components).unwrap();
        match id.parent() {
            Ok(Some(parent)) => {
                let child = parent.child(id.last_component()).unwrap();
                prop_assert_eq!(child, id);
            }
            // Dropping the only node leaves the navigation context unsatisfied.
            Err(err) => prop_assert!(err.is_cardinality_error() && components.len() == 3),
            Ok(None) => prop_assert!(false, "navigation ids always have a parent"),
        }
    }

    #[test]
    fn portlet_parent_child_symmetry(components in prop::collection::vec(segment(), 3..=4)) {
        let context = contexts::portlet().unwrap();
        let id = context.create(&components).unwrap();
        let parent = id.parent().unwrap().unwrap();
        prop_assert_eq!(parent.child(id.last_component()).unwrap(), id);
    }

    #[test]
    fn portlet_rejects_more_than_declared(components in prop::collection::vec(segment(), 6..9)) {
        let context = contexts::portlet().unwrap();
        let err = context.create(&components).unwrap_err();
        prop_assert!(err.is_cardinality_error());
    }
}
