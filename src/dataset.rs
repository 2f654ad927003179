use std::collections::BTreeSet;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::{
    deriver::{self, Derived},
    errors::NetworkDataError,
    model::{EdgeRecord, EdgeStats, GraphType, NetworkMetadata, NodeId, NodeRecord, NodeStats},
};

/// An immutable edge/node pair together with its derived metadata.
///
/// Built only through [`crate::deriver::derive`] (or the operations layered on
/// it); filtered views are new datasets and may renumber node ids.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(into = "NetworkDatasetRecord", try_from = "NetworkDatasetRecord")]
pub struct NetworkDataset {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    node_index: AHashMap<NodeId, usize>,
    node_stats: Vec<NodeStats>,
    edge_stats: Vec<EdgeStats>,
    metadata: NetworkMetadata,
}

impl NetworkDataset {
    pub(crate) fn from_validated(nodes: Vec<NodeRecord>, edges: Vec<EdgeRecord>) -> Self {
        let Derived {
            metadata,
            edge_stats,
            node_stats,
        } = deriver::compute(&nodes, &edges);
        let node_index = nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| (node.id, idx))
            .collect();
        Self {
            nodes,
            edges,
            node_index,
            node_stats,
            edge_stats,
            metadata,
        }
    }

    pub fn nodes(&self) -> &[NodeRecord] {
        &self.nodes
    }

    pub fn edges(&self) -> &[EdgeRecord] {
        &self.edges
    }

    pub fn metadata(&self) -> &NetworkMetadata {
        &self.metadata
    }

    pub fn node_stats(&self) -> &[NodeStats] {
        &self.node_stats
    }

    pub fn edge_stats(&self) -> &[EdgeStats] {
        &self.edge_stats
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Raw edge rows, parallel edges included.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&NodeRecord> {
        self.node_index.get(&id).map(|&idx| &self.nodes[idx])
    }

    pub fn node_stats_for(&self, id: NodeId) -> Option<&NodeStats> {
        self.node_index.get(&id).map(|&idx| &self.node_stats[idx])
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.node_index.contains_key(&id)
    }

    pub fn component_ids(&self) -> BTreeSet<u32> {
        self.metadata.components().keys().copied().collect()
    }

    /// Node ids belonging to one component, in dataset order.
    pub fn component_node_ids(&self, component_id: u32) -> Vec<NodeId> {
        self.node_stats
            .iter()
            .filter(|stats| stats.component_id == component_id)
            .map(|stats| stats.node_id)
            .collect()
    }

    /// Edge endpoints as seen by one graph-type interpretation.
    ///
    /// Non-multi views keep the first occurrence of every identity key; multi
    /// views keep every edge row.
    pub fn interpreted_edges(
        &self,
        graph_type: GraphType,
        omit_self_loops: bool,
    ) -> Vec<(NodeId, NodeId)> {
        self.edges
            .iter()
            .zip(&self.edge_stats)
            .filter(|(edge, _)| !(omit_self_loops && edge.is_self_loop()))
            .filter(|(_, stats)| {
                if graph_type.is_multi() {
                    true
                } else if graph_type.is_directed() {
                    stats.idx_dup_directed == 1
                } else {
                    stats.idx_dup_undirected == 1
                }
            })
            .map(|(edge, _)| (edge.source, edge.target))
            .collect()
    }

    /// Runs the derivation again over this dataset's own edges and nodes.
    pub fn recompute_metadata(&self) -> NetworkMetadata {
        deriver::compute(&self.nodes, &self.edges).metadata
    }

    pub fn to_json(&self) -> Result<String, NetworkDataError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, NetworkDataError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Wire shape: node and edge lists only; everything else is re-derived.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct NetworkDatasetRecord {
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
}

impl From<NetworkDataset> for NetworkDatasetRecord {
    fn from(dataset: NetworkDataset) -> Self {
        Self {
            nodes: dataset.nodes,
            edges: dataset.edges,
        }
    }
}

impl TryFrom<NetworkDatasetRecord> for NetworkDataset {
    type Error = NetworkDataError;

    fn try_from(record: NetworkDatasetRecord) -> Result<Self, Self::Error> {
        let edges = record.edges.into_iter().map(Into::into).collect();
        deriver::build(edges, Some(record.nodes))
    }
}
