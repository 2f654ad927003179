use ahash::{AHashMap, AHashSet};
use tracing::{debug, instrument};

use crate::{
    dataset::NetworkDataset,
    errors::NetworkDataError,
    model::{EdgeRecord, NodeId, NodeRecord},
};

/// Keeps the nodes whose id is in `keep_ids` and the edges with both endpoints
/// kept. Kept nodes are renumbered `0..k` in their original order; metadata is
/// derived from scratch. Ids not present in the dataset are ignored.
#[instrument(skip_all)]
pub fn filter_to_nodes<I>(dataset: &NetworkDataset, keep_ids: I) -> NetworkDataset
where
    I: IntoIterator<Item = NodeId>,
{
    let keep: AHashSet<NodeId> = keep_ids.into_iter().collect();
    let mut renumbered: AHashMap<NodeId, NodeId> = AHashMap::with_capacity(keep.len());
    let mut nodes = Vec::new();
    for node in dataset.nodes() {
        if !keep.contains(&node.id) {
            continue;
        }
        let new_id = nodes.len() as NodeId;
        renumbered.insert(node.id, new_id);
        nodes.push(NodeRecord {
            id: new_id,
            label: node.label.clone(),
            attributes: node.attributes.clone(),
        });
    }
    let edges: Vec<EdgeRecord> = dataset
        .edges()
        .iter()
        .filter_map(|edge| {
            let source = *renumbered.get(&edge.source)?;
            let target = *renumbered.get(&edge.target)?;
            Some(EdgeRecord {
                source,
                target,
                attributes: edge.attributes.clone(),
            })
        })
        .collect();
    debug!(
        nodes = nodes.len(),
        edges = edges.len(),
        "filtered network dataset"
    );
    NetworkDataset::from_validated(nodes, edges)
}

/// The sub-network formed by one connected component.
pub fn select_component(
    dataset: &NetworkDataset,
    component_id: u32,
) -> Result<NetworkDataset, NetworkDataError> {
    if !dataset.metadata().components().contains_key(&component_id) {
        return Err(NetworkDataError::UnknownComponent(component_id));
    }
    Ok(filter_to_nodes(
        dataset,
        dataset.component_node_ids(component_id),
    ))
}

/// The sub-network formed by the largest component (component `0`).
pub fn largest_component(dataset: &NetworkDataset) -> Result<NetworkDataset, NetworkDataError> {
    select_component(dataset, 0)
}
