use ahash::AHashSet;
use networkdata::{
    GraphType, RawEdge,
    bench_utils::{EdgeListShape, generate_edges, generate_nodes},
    derive, filter_to_nodes,
};

fn shapes() -> Vec<(EdgeListShape, usize)> {
    vec![
        (EdgeListShape::Line, 64),
        (EdgeListShape::Star, 64),
        (EdgeListShape::Grid2D { width: 8, height: 8 }, 64),
        (EdgeListShape::ScaleFree { m: 3 }, 128),
        (EdgeListShape::Random { edges: 400 }, 50),
        (EdgeListShape::Random { edges: 50 }, 400),
    ]
}

#[test]
fn simple_edge_lists_have_no_parallels() {
    for (shape, nodes) in shapes().into_iter().take(4) {
        let edges = generate_edges(shape.clone(), nodes, 7);
        let total = edges.len();
        let meta = derive(edges, None).unwrap().metadata().clone();
        for graph_type in GraphType::ALL {
            let metrics = meta.metrics(graph_type);
            assert_eq!(metrics.edge_count, total, "{shape:?} {graph_type}");
            assert_eq!(metrics.parallel_edge_count, 0, "{shape:?} {graph_type}");
        }
    }
}

#[test]
fn multi_counts_minus_parallels_equal_simple_counts() {
    for seed in 0..16u64 {
        for (shape, nodes) in shapes() {
            let dataset = derive(generate_edges(shape, nodes, seed), None).unwrap();
            let meta = dataset.metadata();
            for (multi, simple) in [
                (GraphType::DirectedMulti, GraphType::Directed),
                (GraphType::UndirectedMulti, GraphType::Undirected),
            ] {
                let multi = meta.metrics(multi);
                assert_eq!(multi.edge_count, dataset.num_edges());
                assert_eq!(
                    multi.edge_count - multi.parallel_edge_count,
                    meta.metrics(simple).edge_count
                );
                assert_eq!(multi.parallel_edge_count, meta.metrics(simple).parallel_edge_count);
            }
            assert!(
                meta.metrics(GraphType::Undirected).edge_count
                    <= meta.metrics(GraphType::Directed).edge_count
            );
        }
    }
}

#[test]
fn self_loop_count_matches_edge_rows() {
    for seed in 0..16u64 {
        let edges = generate_edges(EdgeListShape::Random { edges: 300 }, 20, seed);
        let expected = edges
            .iter()
            .filter(|edge| edge.source == edge.target)
            .count();
        let dataset = derive(edges, None).unwrap();
        assert_eq!(dataset.metadata().number_of_self_loops(), expected);
    }
}

#[test]
fn deriving_twice_is_identical() {
    for seed in 0..8u64 {
        let edges = generate_edges(EdgeListShape::Random { edges: 200 }, 40, seed);
        let first = derive(edges.clone(), None).unwrap();
        let second = derive(edges, None).unwrap();
        assert_eq!(first.metadata(), second.metadata());
        assert_eq!(first.recompute_metadata(), *first.metadata());
        assert_eq!(
            first.metadata().to_json().unwrap(),
            second.metadata().to_json().unwrap()
        );
    }
}

#[test]
fn full_filter_preserves_metrics() {
    for seed in 0..8u64 {
        let nodes = generate_nodes(60);
        let edges: Vec<RawEdge> = generate_edges(EdgeListShape::Random { edges: 90 }, 50, seed);
        let dataset = derive(edges, Some(nodes)).unwrap();
        let filtered = filter_to_nodes(&dataset, dataset.nodes().iter().map(|node| node.id));
        assert_eq!(filtered.metadata(), dataset.metadata());
    }
}

#[test]
fn components_partition_the_nodes() {
    for seed in 0..8u64 {
        let dataset = derive(
            generate_edges(EdgeListShape::Random { edges: 40 }, 80, seed),
            Some(generate_nodes(80)),
        )
        .unwrap();
        let meta = dataset.metadata();
        let sizes: Vec<usize> = meta.components().values().map(|c| c.number_of_nodes).collect();
        assert_eq!(sizes.iter().sum::<usize>(), dataset.num_nodes());
        assert!(sizes.windows(2).all(|pair| pair[0] >= pair[1]));
        let edge_rows: usize = meta
            .components()
            .values()
            .map(|c| c.number_of_associated_edge_rows)
            .sum();
        assert_eq!(edge_rows, dataset.num_edges());

        let mut seen = AHashSet::new();
        for component_id in dataset.component_ids() {
            for id in dataset.component_node_ids(component_id) {
                assert!(seen.insert(id));
            }
        }
        assert_eq!(seen.len(), dataset.num_nodes());
    }
}
