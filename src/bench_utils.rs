use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::model::{NodeId, NodeRecord, RawEdge};

#[derive(Clone, Debug)]
pub enum EdgeListShape {
    Line,
    Star,
    Grid2D { width: usize, height: usize },
    /// Uniform endpoint pairs drawn with replacement, so the list contains
    /// parallel edges, reversed pairs and self loops.
    Random { edges: usize },
    ScaleFree { m: usize },
}

/// Edge list over node ids `0..node_count`. Each edge carries a `kind`
/// attribute naming its generator.
pub fn generate_edges(shape: EdgeListShape, node_count: usize, seed: u64) -> Vec<RawEdge> {
    assert!(node_count > 1, "node_count must exceed 1");
    match shape {
        EdgeListShape::Line => generate_line_edges(node_count),
        EdgeListShape::Star => generate_star_edges(node_count),
        EdgeListShape::Grid2D { width, height } => generate_grid_edges(width, height, node_count),
        EdgeListShape::Random { edges } => generate_random_edges(node_count, edges, seed),
        EdgeListShape::ScaleFree { m } => generate_scale_free_edges(node_count, m, seed),
    }
}

/// Nodes `0..count` labelled `Node{idx}`.
pub fn generate_nodes(count: usize) -> Vec<NodeRecord> {
    (0..count)
        .map(|idx| NodeRecord::new(idx as NodeId, format!("Node{idx}")).with_attribute("idx", idx))
        .collect()
}

fn generate_line_edges(count: usize) -> Vec<RawEdge> {
    (0..count - 1)
        .map(|idx| new_edge(idx, idx + 1, "line"))
        .collect()
}

fn generate_star_edges(count: usize) -> Vec<RawEdge> {
    (1..count).map(|leaf| new_edge(0, leaf, "star")).collect()
}

fn generate_grid_edges(width: usize, height: usize, node_count: usize) -> Vec<RawEdge> {
    assert_eq!(
        width * height,
        node_count,
        "grid dimensions must match node count"
    );
    let mut edges = Vec::with_capacity(width * height * 2);
    for y in 0..height {
        for x in 0..width {
            let base = y * width + x;
            if x + 1 < width {
                edges.push(new_edge(base, base + 1, "grid"));
            }
            if y + 1 < height {
                edges.push(new_edge(base, base + width, "grid"));
            }
        }
    }
    edges
}

fn generate_random_edges(node_count: usize, edge_count: usize, seed: u64) -> Vec<RawEdge> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..edge_count)
        .map(|_| {
            let from = rng.gen_range(0..node_count);
            let to = rng.gen_range(0..node_count);
            new_edge(from, to, "random").with_attribute("weight", rng.r#gen::<f64>())
        })
        .collect()
}

fn generate_scale_free_edges(node_count: usize, m: usize, seed: u64) -> Vec<RawEdge> {
    assert!(m > 0, "m must be positive");
    assert!(node_count > m + 1, "node_count must exceed m + 1");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut degrees = vec![0usize; node_count];
    let mut edges = Vec::new();
    let seed_nodes = m + 1;
    for u in 0..seed_nodes {
        for v in (u + 1)..seed_nodes {
            edges.push(new_edge(u, v, "scale_free"));
            degrees[u] += 1;
            degrees[v] += 1;
        }
    }
    let mut total_degree: usize = degrees.iter().sum();
    for new_node in seed_nodes..node_count {
        let mut targets: Vec<usize> = Vec::with_capacity(m);
        while targets.len() < m {
            let pick = rng.gen_range(0..total_degree);
            let mut cumulative = 0usize;
            for (candidate, &degree) in degrees.iter().enumerate().take(new_node) {
                cumulative += degree;
                if pick < cumulative {
                    if !targets.contains(&candidate) {
                        targets.push(candidate);
                    }
                    break;
                }
            }
        }
        for target in targets {
            edges.push(new_edge(target, new_node, "scale_free"));
            degrees[target] += 1;
            degrees[new_node] += 1;
            total_degree += 2;
        }
    }
    edges
}

fn new_edge(from: usize, to: usize, kind: &str) -> RawEdge {
    RawEdge::new(from as NodeId, to as NodeId).with_attribute("kind", kind)
}
