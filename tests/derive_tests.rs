use networkdata::{
    Endpoint, GraphType, NetworkDataError, NodeRecord, RawEdge, derive,
    model::{GraphTypeMetrics, NodeId},
};
use serde_json::json;

fn edges(pairs: &[(NodeId, NodeId)]) -> Vec<RawEdge> {
    pairs.iter().copied().map(RawEdge::from).collect()
}

fn counts(metrics: GraphTypeMetrics) -> (usize, usize) {
    (metrics.edge_count, metrics.parallel_edge_count)
}

#[test]
fn reversed_pair_is_parallel_only_when_undirected() {
    let dataset = derive(edges(&[(1, 2), (2, 1)]), None).unwrap();
    let meta = dataset.metadata();
    assert_eq!(counts(meta.metrics(GraphType::Directed)), (2, 0));
    assert_eq!(counts(meta.metrics(GraphType::DirectedMulti)), (2, 0));
    assert_eq!(counts(meta.metrics(GraphType::Undirected)), (1, 1));
    assert_eq!(counts(meta.metrics(GraphType::UndirectedMulti)), (2, 1));
    assert_eq!(meta.number_of_self_loops(), 0);
}

#[test]
fn single_self_loop() {
    let dataset = derive(edges(&[(7, 7)]), None).unwrap();
    let meta = dataset.metadata();
    assert_eq!(meta.number_of_self_loops(), 1);
    assert_eq!(meta.number_of_nodes(), 1);
    for graph_type in GraphType::ALL {
        assert_eq!(counts(meta.metrics(graph_type)), (1, 0), "{graph_type}");
    }
}

#[test]
fn repeated_self_loops_are_parallel_but_counted_per_row() {
    let dataset = derive(edges(&[(1, 1), (1, 1), (1, 2)]), None).unwrap();
    let meta = dataset.metadata();
    assert_eq!(meta.number_of_self_loops(), 2);
    assert_eq!(counts(meta.metrics(GraphType::Directed)), (2, 1));
    assert_eq!(counts(meta.metrics(GraphType::UndirectedMulti)), (3, 1));
}

#[test]
fn nodes_are_synthesized_from_endpoints() {
    let dataset = derive(edges(&[(1, 2), (2, 3)]), None).unwrap();
    let ids: Vec<NodeId> = dataset.nodes().iter().map(|node| node.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(dataset.metadata().number_of_nodes(), 3);
    assert_eq!(dataset.node(2).unwrap().label, "2");
}

#[test]
fn supplied_nodes_keep_isolated_members() {
    let nodes = vec![
        NodeRecord::new(1, "a"),
        NodeRecord::new(2, "b"),
        NodeRecord::new(3, "isolated").with_attribute("group", "x"),
    ];
    let dataset = derive(edges(&[(1, 2)]), Some(nodes)).unwrap();
    let meta = dataset.metadata();
    assert_eq!(meta.number_of_nodes(), 3);
    assert_eq!(meta.number_of_components(), 2);
    assert!(!meta.is_connected());
    assert_eq!(dataset.node(3).unwrap().attributes["group"], json!("x"));
}

#[test]
fn dangling_reference_is_rejected() {
    let nodes = vec![NodeRecord::new(1, "a"), NodeRecord::new(2, "b")];
    let err = derive(edges(&[(1, 2), (2, 9)]), Some(nodes)).unwrap_err();
    assert_eq!(err, NetworkDataError::dangling(1, 9));
}

#[test]
fn missing_endpoint_is_rejected() {
    let mut input = edges(&[(1, 2)]);
    input.push(RawEdge {
        source: Some(3),
        target: None,
        ..RawEdge::default()
    });
    let err = derive(input, None).unwrap_err();
    assert_eq!(
        err,
        NetworkDataError::MissingEndpoint {
            edge_index: 1,
            endpoint: Endpoint::Target,
        }
    );
}

#[test]
fn empty_edges_are_rejected() {
    assert_eq!(derive(Vec::new(), None).unwrap_err(), NetworkDataError::EmptyEdges);
}

#[test]
fn duplicate_node_ids_are_rejected() {
    let nodes = vec![NodeRecord::new(1, "a"), NodeRecord::new(1, "b")];
    let err = derive(edges(&[(1, 1)]), Some(nodes)).unwrap_err();
    assert_eq!(err, NetworkDataError::DuplicateNodeId("1".into()));
}

#[test]
fn reserved_attribute_names_are_rejected() {
    let input = vec![RawEdge::new(1, 2).with_attribute("_source", 5)];
    let err = derive(input, None).unwrap_err();
    assert_eq!(err, NetworkDataError::ReservedAttributeName("_source".into()));
}

#[test]
fn parallel_edges_ignore_attributes() {
    let input = vec![
        RawEdge::new(1, 2).with_attribute("weight", 1),
        RawEdge::new(1, 2).with_attribute("weight", 2),
    ];
    let dataset = derive(input, None).unwrap();
    assert_eq!(counts(dataset.metadata().metrics(GraphType::Directed)), (1, 1));
    assert_eq!(dataset.edges()[1].attributes["weight"], json!(2));
}

#[test]
fn edge_stats_track_duplicate_positions() {
    let dataset = derive(edges(&[(1, 2), (2, 1), (1, 2)]), None).unwrap();
    let stats = dataset.edge_stats();
    assert_eq!(
        stats.iter().map(|s| s.count_dup_directed).collect::<Vec<_>>(),
        vec![2, 1, 2]
    );
    assert_eq!(
        stats.iter().map(|s| s.idx_dup_directed).collect::<Vec<_>>(),
        vec![1, 1, 2]
    );
    assert_eq!(
        stats.iter().map(|s| s.count_dup_undirected).collect::<Vec<_>>(),
        vec![3, 3, 3]
    );
    assert_eq!(
        stats.iter().map(|s| s.idx_dup_undirected).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[test]
fn node_stats_split_distinct_and_multi_degrees() {
    let dataset = derive(edges(&[(1, 2), (1, 2), (2, 1), (3, 3)]), None).unwrap();
    let one = dataset.node_stats_for(1).unwrap();
    assert_eq!((one.out_edges, one.out_edges_multi), (1, 2));
    assert_eq!((one.in_edges, one.in_edges_multi), (1, 1));
    assert_eq!(one.count_edges, 2);
    assert_eq!(one.count_edges_multi, 3);

    let loop_node = dataset.node_stats_for(3).unwrap();
    assert_eq!((loop_node.in_edges, loop_node.out_edges), (1, 1));
    assert_eq!(loop_node.count_edges, 2);
}

#[test]
fn interpreted_edges_match_edge_counts() {
    let dataset = derive(edges(&[(1, 2), (2, 1), (1, 2), (3, 3)]), None).unwrap();
    let meta = dataset.metadata();
    for graph_type in GraphType::ALL {
        assert_eq!(
            dataset.interpreted_edges(graph_type, false).len(),
            meta.metrics(graph_type).edge_count,
            "{graph_type}"
        );
    }
    assert_eq!(
        dataset.interpreted_edges(GraphType::Undirected, true),
        vec![(1, 2)]
    );
}

#[test]
fn recomputed_metadata_is_identical() {
    let dataset = derive(edges(&[(1, 2), (2, 1), (4, 4), (5, 6)]), None).unwrap();
    assert_eq!(&dataset.recompute_metadata(), dataset.metadata());
}

#[test]
fn datasets_can_be_shared_across_threads() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<networkdata::NetworkDataset>();

    let dataset = std::sync::Arc::new(derive(edges(&[(1, 2), (2, 3)]), None).unwrap());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let dataset = std::sync::Arc::clone(&dataset);
            std::thread::spawn(move || dataset.metadata().metrics(GraphType::Undirected).edge_count)
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 2);
    }
}
