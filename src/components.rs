use std::collections::{BTreeMap, VecDeque};

use ahash::{AHashMap, AHashSet};

use crate::model::{ComponentProperties, EdgeRecord, NodeId, NodeRecord};

/// Connected components of the undirected view, self loops ignored.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ComponentAssignment {
    /// Component id per node, indexed like the node slice.
    pub node_components: Vec<u32>,
    /// Component id per edge (the component of its source node).
    pub edge_components: Vec<u32>,
    pub properties: BTreeMap<u32, ComponentProperties>,
}

/// Assigns component ids by size descending; equal sizes are ordered by their
/// smallest node id.
///
/// Every edge endpoint must be present in `nodes`.
pub fn assign_components(nodes: &[NodeRecord], edges: &[EdgeRecord]) -> ComponentAssignment {
    let position: AHashMap<NodeId, usize> = nodes
        .iter()
        .enumerate()
        .map(|(idx, node)| (node.id, idx))
        .collect();
    let mut neighbors: AHashMap<NodeId, Vec<NodeId>> = AHashMap::with_capacity(nodes.len());
    for edge in edges {
        if edge.is_self_loop() {
            continue;
        }
        neighbors.entry(edge.source).or_default().push(edge.target);
        neighbors.entry(edge.target).or_default().push(edge.source);
    }

    let mut components: Vec<Vec<usize>> = Vec::new();
    let mut visited = AHashSet::with_capacity(nodes.len());
    for node in nodes {
        if !visited.insert(node.id) {
            continue;
        }
        let mut queue = VecDeque::new();
        queue.push_back(node.id);
        let mut component = Vec::new();
        while let Some(current) = queue.pop_front() {
            if let Some(&idx) = position.get(&current) {
                component.push(idx);
            }
            for &next in neighbors.get(&current).map(Vec::as_slice).unwrap_or(&[]) {
                if visited.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        components.push(component);
    }

    components.sort_by_cached_key(|component| {
        let min_id = component.iter().map(|&idx| nodes[idx].id).min();
        (std::cmp::Reverse(component.len()), min_id)
    });

    let mut node_components = vec![0u32; nodes.len()];
    let mut properties = BTreeMap::new();
    for (component_id, component) in components.iter().enumerate() {
        let component_id = component_id as u32;
        for &idx in component {
            node_components[idx] = component_id;
        }
        properties.insert(
            component_id,
            ComponentProperties {
                component_id,
                number_of_nodes: component.len(),
                number_of_associated_edge_rows: 0,
            },
        );
    }

    let mut edge_components = Vec::with_capacity(edges.len());
    for edge in edges {
        let component_id = position
            .get(&edge.source)
            .map(|&idx| node_components[idx])
            .unwrap_or_default();
        if let Some(props) = properties.get_mut(&component_id) {
            props.number_of_associated_edge_rows += 1;
        }
        edge_components.push(component_id);
    }

    ComponentAssignment {
        node_components,
        edge_components,
        properties,
    }
}
