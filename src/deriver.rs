//! Derivation of a [`NetworkDataset`] and its [`NetworkMetadata`] from raw
//! edge and node sequences.
//!
//! The four graph-type interpretations differ only in the identity key used to
//! collapse edges:
//!
//! | graph type         | identity key    | `edge_count`   |
//! |--------------------|-----------------|----------------|
//! | `directed`         | ordered pair    | distinct keys  |
//! | `directed_multi`   | ordered pair    | raw edges      |
//! | `undirected`       | unordered pair  | distinct keys  |
//! | `undirected_multi` | unordered pair  | raw edges      |
//!
//! `parallel_edge_count` is always `raw - distinct` under the row's key. Self
//! loops are counted once globally and take part in every other count.

use ahash::{AHashMap, AHashSet};
use tracing::{debug, info, instrument};

use crate::{
    components::assign_components,
    dataset::NetworkDataset,
    defaults::is_reserved,
    errors::{Endpoint, NetworkDataError},
    model::{
        Attributes, EdgeRecord, EdgeStats, GraphType, GraphTypeMetrics, NetworkMetadata, NodeId,
        NodeRecord, NodeStats, RawEdge,
    },
};

/// Validates the inputs and builds an immutable dataset with eagerly computed
/// metadata.
///
/// When `nodes` is `None` the node set is the sorted set of edge endpoints,
/// each labelled with its id. When `nodes` is given, every endpoint must
/// resolve to one of them.
#[instrument(skip_all, fields(edges = edges.len()))]
pub fn derive(
    edges: Vec<RawEdge>,
    nodes: Option<Vec<NodeRecord>>,
) -> Result<NetworkDataset, NetworkDataError> {
    if edges.is_empty() {
        return Err(NetworkDataError::EmptyEdges);
    }
    build(edges, nodes)
}

/// Same validation as [`derive`] without the non-empty edge requirement; used
/// for derived datasets (filters, reloads) that may legitimately hold no edges.
pub(crate) fn build(
    edges: Vec<RawEdge>,
    nodes: Option<Vec<NodeRecord>>,
) -> Result<NetworkDataset, NetworkDataError> {
    debug!(
        edges = edges.len(),
        nodes = nodes.as_ref().map(Vec::len),
        "deriving network dataset"
    );
    let edges = resolve_endpoints(edges)?;
    let nodes = match nodes {
        Some(nodes) => {
            check_nodes(&nodes)?;
            check_references(&edges, &nodes)?;
            nodes
        }
        None => {
            let nodes = synthesize_nodes(&edges);
            debug!(nodes = nodes.len(), "synthesized nodes from edge endpoints");
            nodes
        }
    };
    let dataset = NetworkDataset::from_validated(nodes, edges);
    let metadata = dataset.metadata();
    info!(
        nodes = metadata.number_of_nodes(),
        self_loops = metadata.number_of_self_loops(),
        components = metadata.number_of_components(),
        "derived network dataset"
    );
    Ok(dataset)
}

/// Everything computed from a validated (nodes, edges) pair.
#[derive(Clone, Debug)]
pub(crate) struct Derived {
    pub metadata: NetworkMetadata,
    pub edge_stats: Vec<EdgeStats>,
    pub node_stats: Vec<NodeStats>,
}

pub(crate) fn compute(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> Derived {
    let directed = duplicate_counts(edges, EdgeRecord::directed_key);
    let undirected = duplicate_counts(edges, EdgeRecord::undirected_key);
    let components = assign_components(nodes, edges);
    let raw = edges.len();

    let metrics = GraphType::ALL.map(|graph_type| {
        let distinct = if graph_type.is_directed() {
            directed.distinct
        } else {
            undirected.distinct
        };
        GraphTypeMetrics {
            graph_type,
            edge_count: if graph_type.is_multi() { raw } else { distinct },
            parallel_edge_count: raw - distinct,
        }
    });
    let self_loops = edges.iter().filter(|edge| edge.is_self_loop()).count();

    let edge_stats = (0..raw)
        .map(|idx| EdgeStats {
            edge_id: idx,
            count_dup_directed: directed.counts[idx],
            idx_dup_directed: directed.positions[idx],
            count_dup_undirected: undirected.counts[idx],
            idx_dup_undirected: undirected.positions[idx],
            component_id: components.edge_components[idx],
        })
        .collect();

    let position: AHashMap<NodeId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id, idx))
        .collect();
    let mut node_stats: Vec<NodeStats> = nodes
        .iter()
        .zip(&components.node_components)
        .map(|(node, &component_id)| NodeStats {
            node_id: node.id,
            count_edges: 0,
            count_edges_multi: 0,
            in_edges: 0,
            in_edges_multi: 0,
            out_edges: 0,
            out_edges_multi: 0,
            component_id,
        })
        .collect();
    for (idx, edge) in edges.iter().enumerate() {
        let first_of_pair = directed.positions[idx] == 1;
        if let Some(&src) = position.get(&edge.source) {
            let stats = &mut node_stats[src];
            stats.out_edges_multi += 1;
            if first_of_pair {
                stats.out_edges += 1;
            }
        }
        if let Some(&tgt) = position.get(&edge.target) {
            let stats = &mut node_stats[tgt];
            stats.in_edges_multi += 1;
            if first_of_pair {
                stats.in_edges += 1;
            }
        }
    }
    for stats in &mut node_stats {
        stats.count_edges = stats.in_edges + stats.out_edges;
        stats.count_edges_multi = stats.in_edges_multi + stats.out_edges_multi;
    }

    Derived {
        metadata: NetworkMetadata::new(nodes.len(), self_loops, metrics, components.properties),
        edge_stats,
        node_stats,
    }
}

struct KeyCounts {
    /// Edges sharing each edge's identity key (including itself).
    counts: Vec<usize>,
    /// 1-based position of each edge among those sharing its key, input order.
    positions: Vec<usize>,
    distinct: usize,
}

fn duplicate_counts<F>(edges: &[EdgeRecord], key: F) -> KeyCounts
where
    F: Fn(&EdgeRecord) -> (NodeId, NodeId),
{
    let mut totals: AHashMap<(NodeId, NodeId), usize> = AHashMap::with_capacity(edges.len());
    let mut positions = Vec::with_capacity(edges.len());
    for edge in edges {
        let seen = totals.entry(key(edge)).or_insert(0);
        *seen += 1;
        positions.push(*seen);
    }
    let counts = edges
        .iter()
        .map(|edge| totals.get(&key(edge)).copied().unwrap_or(1))
        .collect();
    KeyCounts {
        counts,
        positions,
        distinct: totals.len(),
    }
}

fn resolve_endpoints(edges: Vec<RawEdge>) -> Result<Vec<EdgeRecord>, NetworkDataError> {
    let mut resolved = Vec::with_capacity(edges.len());
    for (edge_index, edge) in edges.into_iter().enumerate() {
        let source = edge
            .source
            .ok_or_else(|| NetworkDataError::missing_endpoint(edge_index, Endpoint::Source))?;
        let target = edge
            .target
            .ok_or_else(|| NetworkDataError::missing_endpoint(edge_index, Endpoint::Target))?;
        check_attribute_names(&edge.attributes)?;
        resolved.push(EdgeRecord {
            source,
            target,
            attributes: edge.attributes,
        });
    }
    Ok(resolved)
}

fn check_nodes(nodes: &[NodeRecord]) -> Result<(), NetworkDataError> {
    let mut seen = AHashSet::with_capacity(nodes.len());
    for node in nodes {
        if !seen.insert(node.id) {
            return Err(NetworkDataError::DuplicateNodeId(node.id.to_string()));
        }
        check_attribute_names(&node.attributes)?;
    }
    Ok(())
}

fn check_references(edges: &[EdgeRecord], nodes: &[NodeRecord]) -> Result<(), NetworkDataError> {
    let known: AHashSet<NodeId> = nodes.iter().map(|node| node.id).collect();
    for (edge_index, edge) in edges.iter().enumerate() {
        for id in [edge.source, edge.target] {
            if !known.contains(&id) {
                return Err(NetworkDataError::dangling(edge_index, id));
            }
        }
    }
    Ok(())
}

fn check_attribute_names(attributes: &Attributes) -> Result<(), NetworkDataError> {
    match attributes.keys().find(|key| is_reserved(key)) {
        Some(key) => Err(NetworkDataError::ReservedAttributeName(key.clone())),
        None => Ok(()),
    }
}

fn synthesize_nodes(edges: &[EdgeRecord]) -> Vec<NodeRecord> {
    let mut ids: Vec<NodeId> = edges
        .iter()
        .flat_map(|edge| [edge.source, edge.target])
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids.into_iter().map(NodeRecord::from_id).collect()
}
