//! Tests for the live form tree

#[cfg(test)]
mod tests {
    use crate::models::{
        FaultKind, FormGroup, FormNode, FormPath, GroupValidatorSpec, SchemaField, ValidatorSpec,
    };
    use serde_json::json;

    fn path(s: &str) -> FormPath {
        s.parse().unwrap()
    }

    fn sample_tree() -> FormNode {
        let fields = vec![
            SchemaField::control("name", json!(""), vec![ValidatorSpec::Required]),
            SchemaField::group(
                "pair",
                vec![
                    SchemaField::control("a", json!(""), vec![]),
                    SchemaField::control("b", json!(""), vec![]),
                ],
                vec![GroupValidatorSpec::FieldsMatch {
                    left: "a".to_string(),
                    right: "b".to_string(),
                }],
            ),
            SchemaField::list(
                "items",
                vec![SchemaField::control(
                    "label",
                    json!("x"),
                    vec![ValidatorSpec::MinLength { value: 2 }],
                )],
                1,
            ),
        ];
        FormNode::Group(FormGroup::from_fields(&fields, &[]).unwrap())
    }

    #[test]
    fn test_initial_faults_are_computed() {
        let tree = sample_tree();

        assert_eq!(
            tree.field(&path("name")).unwrap().faults().iter().collect::<Vec<_>>(),
            vec![FaultKind::Required]
        );
        // Length checks skip empty values, but "x" is too short
        assert!(tree
            .field(&path("items.0.label"))
            .unwrap()
            .faults()
            .contains(FaultKind::MinLength));
        // Pristine fields never fail the match check
        assert!(tree.find(&path("pair")).unwrap().faults().is_empty());
        assert!(!tree.is_valid());
    }

    #[test]
    fn test_find_and_kind_errors() {
        let mut tree = sample_tree();

        assert_eq!(tree.find(&FormPath::root()).unwrap().kind_name(), "group");
        assert_eq!(tree.find(&path("items")).unwrap().kind_name(), "list");
        assert!(tree.find(&path("items.1")).is_none());
        assert!(tree.find(&path("name.deeper")).is_none());

        assert!(matches!(
            tree.field(&path("pair")),
            Err(crate::FormError::WrongNodeKind { .. })
        ));
        assert!(matches!(
            tree.list_mut(&path("name")),
            Err(crate::FormError::WrongNodeKind { .. })
        ));
        assert!(matches!(
            tree.field_mut(&path("missing")),
            Err(crate::FormError::PathNotFound { .. })
        ));
    }

    #[test]
    fn test_group_match_after_both_dirty() {
        let mut tree = sample_tree();

        tree.field_mut(&path("pair.a")).unwrap().set_value(json!("one"), true);
        assert!(tree.revalidate_ancestors(&path("pair.a")).is_empty());

        tree.field_mut(&path("pair.b")).unwrap().set_value(json!("two"), true);
        let changed = tree.revalidate_ancestors(&path("pair.b"));
        assert_eq!(changed, vec![path("pair")]);
        assert!(tree.find(&path("pair")).unwrap().faults().contains(FaultKind::Match));

        tree.field_mut(&path("pair.b")).unwrap().set_value(json!("one"), true);
        tree.revalidate_ancestors(&path("pair.b"));
        assert!(tree.find(&path("pair")).unwrap().faults().is_empty());
    }

    #[test]
    fn test_programmatic_values_stay_pristine() {
        let mut tree = sample_tree();

        tree.field_mut(&path("pair.a")).unwrap().set_value(json!("one"), false);
        tree.field_mut(&path("pair.b")).unwrap().set_value(json!("two"), false);
        tree.revalidate_ancestors(&path("pair.b"));

        assert!(tree.field(&path("pair.a")).unwrap().is_pristine());
        assert!(tree.find(&path("pair")).unwrap().faults().is_empty());
    }

    #[test]
    fn test_push_default_clones_template() {
        let mut tree = sample_tree();

        tree.field_mut(&path("items.0.label"))
            .unwrap()
            .set_value(json!("edited"), true);
        let index = tree.list_mut(&path("items")).unwrap().push_default();

        assert_eq!(index, 1);
        assert_eq!(
            tree.value()["items"],
            json!([{ "label": "edited" }, { "label": "x" }])
        );
        assert!(tree.field(&path("items.1.label")).unwrap().is_pristine());
    }

    #[test]
    fn test_value_snapshot_preserves_field_order() {
        let tree = sample_tree();
        let snapshot = tree.value();
        let keys: Vec<&String> = snapshot.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["name", "pair", "items"]);
    }

    #[test]
    fn test_collect_invalid_lists_own_faults() {
        let mut tree = sample_tree();
        tree.field_mut(&path("pair.a")).unwrap().set_value(json!("1"), true);
        tree.field_mut(&path("pair.b")).unwrap().set_value(json!("2"), true);
        tree.revalidate_all();

        let mut invalid = Vec::new();
        tree.collect_invalid(&FormPath::root(), &mut invalid);
        let paths: Vec<&str> = invalid.iter().map(|n| n.path.as_str()).collect();
        assert_eq!(paths, vec!["name", "pair", "items.0.label"]);
    }

    #[test]
    fn test_patch_leaves_ignores_unknown_and_missing() {
        let tree = sample_tree();
        let patch = json!({
            "name": "Ann",
            "unknown": 5,
            "pair": { "b": "z", "c": "ignored" },
            "items": [{ "label": "ok" }, { "label": "no such item" }]
        });

        let mut leaves = Vec::new();
        tree.patch_leaves(&patch, &FormPath::root(), &mut leaves);

        let resolved: Vec<(String, serde_json::Value)> = leaves
            .into_iter()
            .map(|(p, v)| (p.to_string(), v))
            .collect();
        assert_eq!(
            resolved,
            vec![
                ("name".to_string(), json!("Ann")),
                ("pair.b".to_string(), json!("z")),
                ("items.0.label".to_string(), json!("ok")),
            ]
        );
    }

    #[test]
    fn test_patch_leaves_skips_shape_mismatch() {
        let tree = sample_tree();
        let mut leaves = Vec::new();
        tree.patch_leaves(&json!({ "pair": "flat", "items": {} }), &FormPath::root(), &mut leaves);
        assert!(leaves.is_empty());
    }
}
