//! Tests for keyword selection over vertex and edge sequences

use super::*;
use crate::error::GraphError;
use crate::graph::{EntityKind, EntitySeq, Graph};
use crate::storage::Value;

/// 0-1, 0-3, 1-2, 2-3, 3-4 with a few vertex and edge attributes
fn sample() -> Graph {
    let mut g = Graph::with_edges(5, vec![(0, 1), (0, 3), (1, 2), (2, 3), (3, 4)], false);
    g.vs_mut().set_attribute("name", vec!["ann", "bob", "cid", "dee", "eve"]).unwrap();
    g.vs_mut().set_attribute("age", vec![31, 19, 44, 27, 19]).unwrap();
    g.vs_mut().set_attribute("team", vec!["red", "blue"]).unwrap();
    g.es_mut().set_attribute("weight", vec![1.0, 2.5, 0.5, 4.0, 2.5]).unwrap();
    g
}

// ============================================================================
// Positional part
// ============================================================================

mod positional_tests {
    use super::*;

    #[test]
    fn test_empty_query_is_identity() {
        let g = sample();
        let all = g.vs().select(&Query::new()).unwrap();
        assert_eq!(all.indices(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_none_selects_nothing() {
        let g = sample();
        assert!(g.vs().select(&Query::new().none()).unwrap().is_empty());
        assert!(g.es().select(&Query::new().none()).unwrap().is_empty());
    }

    #[test]
    fn test_positions_are_relative_to_the_sequence() {
        let g = Graph::new(10, false);
        let seq = EntitySeq::with_indices(&g, EntityKind::Vertex, vec![5, 2, 9]).unwrap();
        let picked = seq.select(&Query::new().positions([0, 2])).unwrap();
        assert_eq!(picked.indices(), &[5, 9]);
    }

    #[test]
    fn test_positions_keep_given_order() {
        let g = sample();
        let picked = g.vs().select(&Query::new().position(3).position(0)).unwrap();
        assert_eq!(picked.indices(), &[3, 0]);
    }

    #[test]
    fn test_position_out_of_range() {
        let g = sample();
        let seq = EntitySeq::with_indices(&g, EntityKind::Vertex, vec![1, 2]).unwrap();
        assert!(matches!(
            seq.select(&Query::new().positions([2])),
            Err(GraphError::Lookup(_))
        ));
    }

    #[test]
    fn test_filter_callable() {
        let g = sample();
        let odd = g
            .vs()
            .select(&Query::new().filter(|v| v.index() % 2 == 1))
            .unwrap();
        assert_eq!(odd.indices(), &[1, 3]);

        let heavy = g
            .es()
            .select(&Query::new().filter(|e| {
                e.get("weight").and_then(Value::as_f64).unwrap_or(0.0) > 2.0
            }))
            .unwrap();
        assert_eq!(heavy.indices(), &[1, 3, 4]);
    }

    #[test]
    fn test_filter_then_predicate() {
        let g = sample();
        let picked = g
            .vs()
            .select(&Query::new().filter(|v| v.index() > 0).pred("age_lt", 30))
            .unwrap();
        assert_eq!(picked.indices(), &[1, 3, 4]);
    }
}

// ============================================================================
// Attribute predicates
// ============================================================================

mod attribute_tests {
    use super::*;

    #[test]
    fn test_comparison_operators() {
        let g = sample();
        let vs = g.vs();
        let idx = |q: Query<'_>| vs.select(&q).unwrap().indices().to_vec();

        assert_eq!(idx(Query::new().pred("age", 19)), vec![1, 4]);
        assert_eq!(idx(Query::new().pred("age_eq", 19)), vec![1, 4]);
        assert_eq!(idx(Query::new().pred("age_ne", 19)), vec![0, 2, 3]);
        assert_eq!(idx(Query::new().pred("age_lt", 27)), vec![1, 4]);
        assert_eq!(idx(Query::new().pred("age_le", 27)), vec![1, 3, 4]);
        assert_eq!(idx(Query::new().pred("age_gt", 31)), vec![2]);
        assert_eq!(idx(Query::new().pred("age_ge", 31)), vec![0, 2]);
    }

    #[test]
    fn test_membership_operators() {
        let g = sample();
        let inside = g.vs().select(&Query::new().pred("name_in", ["bob", "eve", "zed"])).unwrap();
        assert_eq!(inside.indices(), &[1, 4]);

        let outside = g.vs().select(&Query::new().pred("name_notin", vec!["bob", "eve"])).unwrap();
        assert_eq!(outside.indices(), &[0, 2, 3]);
    }

    #[test]
    fn test_membership_needs_a_collection() {
        let g = sample();
        assert!(matches!(
            g.vs().select(&Query::new().pred("age_in", 19)),
            Err(GraphError::Configuration(_))
        ));
    }

    #[test]
    fn test_numeric_comparison_crosses_int_and_float() {
        let g = sample();
        assert_eq!(g.es().select(&Query::new().pred("weight", 4)).unwrap().indices(), &[3]);
        assert_eq!(g.vs().select(&Query::new().pred("age_lt", 19.5)).unwrap().indices(), &[1, 4]);
    }

    #[test]
    fn test_incomparable_values_never_match() {
        let g = sample();
        assert!(g.vs().select(&Query::new().pred("age_lt", "zzz")).unwrap().is_empty());
        assert!(g.vs().select(&Query::new().pred("name_gt", 3)).unwrap().is_empty());
    }

    #[test]
    fn test_unknown_attribute_is_lookup_error() {
        let g = sample();
        assert!(matches!(
            g.vs().select(&Query::new().pred("height_gt", 2)),
            Err(GraphError::Lookup(_))
        ));
    }

    #[test]
    fn test_attribute_ending_in_operator_token() {
        let mut g = sample();
        g.vs_mut().set_attribute("plug_in", vec![true, false]).unwrap();

        // read as `plug` + `in`, and `plug` does not exist
        assert!(matches!(
            g.vs().select(&Query::new().pred("plug_in", vec![true])),
            Err(GraphError::Lookup(_))
        ));
        // an explicit operator reaches the real column
        let picked = g.vs().select(&Query::new().pred("plug_in_eq", true)).unwrap();
        assert_eq!(picked.indices(), &[0, 2, 4]);
    }

    #[test]
    fn test_unknown_trailing_token_stays_in_attribute() {
        let mut g = sample();
        g.vs_mut().set_attribute("is_big", vec![false, false, true, false, false]).unwrap();
        let picked = g.vs().select(&Query::new().pred("is_big", true)).unwrap();
        assert_eq!(picked.indices(), &[2]);
    }

    #[test]
    fn test_query_from_map() {
        let g = sample();
        let query: Query<'_> = vec![("team", "red"), ("name_ne", "ann")].into_iter().collect();
        assert_eq!(g.vs().select(&query).unwrap().indices(), &[2, 4]);
    }
}

// ============================================================================
// Composition
// ============================================================================

mod composition_tests {
    use super::*;

    #[test]
    fn test_predicates_compose_like_chained_selects() {
        let g = sample();
        let combined = g
            .vs()
            .select(&Query::new().pred("team", "red").pred("age_lt", 40))
            .unwrap();
        let chained = g
            .vs()
            .select(&Query::new().pred("team", "red"))
            .unwrap()
            .select(&Query::new().pred("age_lt", 40))
            .unwrap();
        assert_eq!(combined.indices(), chained.indices());
        assert_eq!(combined.indices(), &[0, 4]);
    }

    #[test]
    fn test_positions_apply_before_predicates() {
        let g = sample();
        let picked = g
            .vs()
            .select(&Query::new().positions([4, 3, 1]).pred("age", 19))
            .unwrap();
        assert_eq!(picked.indices(), &[4, 1]);
    }

    #[test]
    fn test_call_matches_select() {
        let g = sample();
        let q = Query::new().pred("age_ge", 27);
        assert_eq!(
            g.vs().call(&q).unwrap().indices(),
            g.vs().select(&q).unwrap().indices()
        );
    }

    #[test]
    fn test_selection_does_not_touch_the_source_sequence() {
        let g = sample();
        let vs = g.vs();
        let _ = vs.select(&Query::new().pred("age", 19)).unwrap();
        assert_eq!(vs.len(), 5);
    }

    #[test]
    fn test_narrowed_write_only_reaches_selected_entities() {
        let mut g = sample();
        g.vs_mut()
            .narrow(&Query::new().pred("age_lt", 30))
            .unwrap()
            .set_attribute("young", true)
            .unwrap();
        let young = g.vs().attribute("young").unwrap();
        assert_eq!(
            young,
            vec![Value::Null, Value::Bool(true), Value::Null, Value::Bool(true), Value::Bool(true)]
        );
    }

    #[test]
    fn test_delete_where() {
        let mut g = sample();
        let removed = g.delete_edges_where(&Query::new().pred("weight_ge", 2.5)).unwrap();
        assert_eq!(removed, 3);
        assert_eq!(g.edges(), &[(0, 1), (1, 2)]);

        let removed = g.delete_vertices_where(&Query::new().pred("name", "bob")).unwrap();
        assert_eq!(removed, 1);
        assert_eq!(g.vcount(), 4);
        assert_eq!(g.ecount(), 0);
    }
}

// ============================================================================
// Structural edge properties
// ============================================================================

mod structural_tests {
    use super::*;

    #[test]
    fn test_source_and_target() {
        let g = sample();
        assert_eq!(g.es().select(&Query::new().pred("_source", 0)).unwrap().indices(), &[0, 1]);
        assert_eq!(g.es().select(&Query::new().pred("_from", 0)).unwrap().indices(), &[0, 1]);
        assert_eq!(g.es().select(&Query::new().pred("_target_in", [3, 4])).unwrap().indices(), &[1, 3, 4]);
        assert_eq!(g.es().select(&Query::new().pred("_to_gt", 2)).unwrap().indices(), &[1, 3, 4]);
    }

    #[test]
    fn test_source_in_vertex_sequence() {
        let g = sample();
        let young = g.vs().select(&Query::new().pred("age_lt", 28)).unwrap();
        let out = g.es().select(&Query::new().pred("_source_in", &young)).unwrap();
        assert_eq!(out.indices(), &[2, 4]);
    }

    #[test]
    fn test_within() {
        let g = sample();
        let inner = g.es().select(&Query::new().pred("_within", vec![0, 1, 3])).unwrap();
        assert_eq!(inner.indices(), &[0, 1]);
        let tuples: Vec<_> = inner.iter().filter_map(|e| e.tuple()).collect();
        assert_eq!(tuples, vec![(0, 1), (0, 3)]);
    }

    #[test]
    fn test_between() {
        let g = sample();
        let across = g.es().select(&Query::new().pred("_between", (vec![0], vec![1, 2]))).unwrap();
        assert_eq!(across.indices(), &[0]);
    }

    #[test]
    fn test_between_is_orientation_free() {
        let g = Graph::with_edges(3, vec![(1, 0), (0, 2), (2, 1)], true);
        let across = g.es().select(&Query::new().pred("_between", (vec![0], vec![1]))).unwrap();
        assert_eq!(across.indices(), &[0]);
    }

    #[test]
    fn test_between_with_sequences() {
        let g = sample();
        let left = EntitySeq::with_indices(&g, EntityKind::Vertex, vec![3]).unwrap();
        let right = EntitySeq::with_indices(&g, EntityKind::Vertex, vec![2, 4]).unwrap();
        let across = g.es().select(&Query::new().pred("_between", (&left, &right))).unwrap();
        assert_eq!(across.indices(), &[3, 4]);
    }

    #[test]
    fn test_within_and_between_on_square() {
        let g = Graph::with_edges(4, vec![(0, 1), (1, 2), (2, 3), (0, 3)], false);

        let inner = g.es().select(&Query::new().pred("_within", vec![0, 1, 3])).unwrap();
        assert_eq!(inner.indices(), &[0, 3]);

        let across = g.es().select(&Query::new().pred("_between", (vec![0], vec![1, 2]))).unwrap();
        assert_eq!(across.indices(), &[0]);
        let tuples: Vec<_> = across.iter().filter_map(|e| e.tuple()).collect();
        assert_eq!(tuples, vec![(0, 1)]);
    }

    #[test]
    fn test_endpoint_notin() {
        let g = Graph::with_edges(4, vec![(0, 1), (1, 2), (2, 3), (0, 3)], false);
        let not_from_zero = g.es().select(&Query::new().pred("_source_notin", vec![0])).unwrap();
        assert_eq!(not_from_zero.indices(), &[1, 2]);

        let zero = EntitySeq::with_indices(&g, EntityKind::Vertex, vec![0]).unwrap();
        let not_into_three = g.es().select(&Query::new().pred("_target_notin", [3])).unwrap();
        assert_eq!(not_into_three.indices(), &[0, 1]);
        let chained = not_into_three
            .select(&Query::new().pred("_source_notin", &zero))
            .unwrap();
        assert_eq!(chained.indices(), &[1]);
    }

    #[test]
    fn test_edge_sequence_is_not_a_vertex_set() {
        let g = sample();
        let edges = EntitySeq::with_indices(&g, EntityKind::Edge, vec![2, 3]).unwrap();
        let vertices = EntitySeq::with_indices(&g, EntityKind::Vertex, vec![2, 3]).unwrap();

        assert!(matches!(
            g.es().select(&Query::new().pred("_within", &edges)),
            Err(GraphError::Configuration(_))
        ));
        assert!(matches!(
            g.es().select(&Query::new().pred("_source_in", &edges)),
            Err(GraphError::Configuration(_))
        ));
        assert!(matches!(
            g.es().select(&Query::new().pred("_between", (&vertices, &edges))),
            Err(GraphError::Configuration(_))
        ));
        assert_eq!(
            g.es().select(&Query::new().pred("_within", &vertices)).unwrap().indices(),
            &[3]
        );
    }

    #[test]
    fn test_between_needs_two_sets() {
        let g = sample();
        assert!(matches!(
            g.es().select(&Query::new().pred("_between", vec![vec![0], vec![1], vec![2]])),
            Err(GraphError::Configuration(_))
        ));
        assert!(matches!(
            g.es().select(&Query::new().pred("_between", 0)),
            Err(GraphError::Configuration(_))
        ));
    }
}

// ============================================================================
// Delegated (computed) properties
// ============================================================================

mod delegation_tests {
    use super::*;

    #[test]
    fn test_degree() {
        let g = sample();
        assert_eq!(g.vs().select(&Query::new().pred("_degree_gt", 2)).unwrap().indices(), &[3]);
        assert_eq!(g.vs().select(&Query::new().pred("_degree", 1)).unwrap().indices(), &[4]);
    }

    #[test]
    fn test_degree_on_subsequence() {
        let g = sample();
        let seq = EntitySeq::with_indices(&g, EntityKind::Vertex, vec![4, 3, 2]).unwrap();
        let picked = seq.select(&Query::new().pred("_degree_ge", 2)).unwrap();
        assert_eq!(picked.indices(), &[3, 2]);
    }

    #[test]
    fn test_directed_degrees() {
        let g = Graph::with_edges(3, vec![(0, 1), (0, 2), (1, 2)], true);
        assert_eq!(g.vs().select(&Query::new().pred("_outdegree", 0)).unwrap().indices(), &[2]);
        assert_eq!(g.vs().select(&Query::new().pred("_indegree", 2)).unwrap().indices(), &[2]);
    }

    #[test]
    fn test_edge_computations() {
        let g = Graph::with_edges(3, vec![(0, 1), (1, 1), (0, 1), (2, 0)], false);
        assert_eq!(g.es().select(&Query::new().pred("_is_loop", true)).unwrap().indices(), &[1]);
        assert_eq!(g.es().select(&Query::new().pred("_is_multiple", true)).unwrap().indices(), &[2]);
    }

    #[test]
    fn test_registered_computation() {
        let mut g = sample();
        g.register_vertex_computation("name_len", |g, idx| {
            idx.iter()
                .map(|&i| {
                    g.vertex_attrs()
                        .value("name", i)
                        .and_then(Value::as_str)
                        .map(|s| Value::from(s.len()))
                        .unwrap_or_default()
                })
                .collect()
        });
        let picked = g.vs().select(&Query::new().pred("_name_len_lt", 4)).unwrap();
        assert_eq!(picked.len(), 5);
    }

    #[test]
    fn test_unregistered_property_is_delegation_error() {
        let g = sample();
        assert!(matches!(
            g.vs().select(&Query::new().pred("_pagerank_gt", 0.1)),
            Err(GraphError::Delegation { .. })
        ));
        // structural edge properties do not exist on vertices
        assert!(matches!(
            g.vs().select(&Query::new().pred("_within", vec![0])),
            Err(GraphError::Delegation { .. })
        ));
    }
}
