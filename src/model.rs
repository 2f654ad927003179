use std::{collections::BTreeMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::NetworkDataError;

pub type NodeId = i64;
pub type Attributes = serde_json::Map<String, Value>;

/// Unvalidated edge input: endpoints may still be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RawEdge {
    pub source: Option<NodeId>,
    pub target: Option<NodeId>,
    #[serde(default)]
    pub attributes: Attributes,
}

impl RawEdge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            source: Some(source),
            target: Some(target),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl From<(NodeId, NodeId)> for RawEdge {
    fn from((source, target): (NodeId, NodeId)) -> Self {
        RawEdge::new(source, target)
    }
}

impl From<EdgeRecord> for RawEdge {
    fn from(edge: EdgeRecord) -> Self {
        Self {
            source: Some(edge.source),
            target: Some(edge.target),
            attributes: edge.attributes,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EdgeRecord {
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub attributes: Attributes,
}

impl EdgeRecord {
    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    /// Identity under the directed interpretation: the ordered pair.
    pub fn directed_key(&self) -> (NodeId, NodeId) {
        (self.source, self.target)
    }

    /// Identity under the undirected interpretation: the unordered pair.
    pub fn undirected_key(&self) -> (NodeId, NodeId) {
        if self.source <= self.target {
            (self.source, self.target)
        } else {
            (self.target, self.source)
        }
    }

    pub fn identity_key(&self, graph_type: GraphType) -> (NodeId, NodeId) {
        if graph_type.is_directed() {
            self.directed_key()
        } else {
            self.undirected_key()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeRecord {
    pub id: NodeId,
    pub label: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl NodeRecord {
    pub fn new<L: Into<String>>(id: NodeId, label: L) -> Self {
        Self {
            id,
            label: label.into(),
            attributes: Attributes::new(),
        }
    }

    /// A node labelled with its own id.
    pub fn from_id(id: NodeId) -> Self {
        Self::new(id, id.to_string())
    }

    pub fn with_attribute<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraphType {
    Directed,
    DirectedMulti,
    Undirected,
    UndirectedMulti,
}

impl GraphType {
    pub const ALL: [GraphType; 4] = [
        GraphType::Directed,
        GraphType::DirectedMulti,
        GraphType::Undirected,
        GraphType::UndirectedMulti,
    ];

    pub fn is_directed(self) -> bool {
        matches!(self, GraphType::Directed | GraphType::DirectedMulti)
    }

    pub fn is_multi(self) -> bool {
        matches!(self, GraphType::DirectedMulti | GraphType::UndirectedMulti)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GraphType::Directed => "directed",
            GraphType::DirectedMulti => "directed_multi",
            GraphType::Undirected => "undirected",
            GraphType::UndirectedMulti => "undirected_multi",
        }
    }
}

impl fmt::Display for GraphType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GraphType {
    type Err = NetworkDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        GraphType::ALL
            .into_iter()
            .find(|ty| ty.as_str() == s)
            .ok_or_else(|| NetworkDataError::invalid_input(format!("unknown graph type {s}")))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GraphTypeMetrics {
    pub graph_type: GraphType,
    pub edge_count: usize,
    pub parallel_edge_count: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentProperties {
    pub component_id: u32,
    pub number_of_nodes: usize,
    pub number_of_associated_edge_rows: usize,
}

/// Computed per-edge columns, indexed like the dataset's edges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeStats {
    pub edge_id: usize,
    pub count_dup_directed: usize,
    pub idx_dup_directed: usize,
    pub count_dup_undirected: usize,
    pub idx_dup_undirected: usize,
    pub component_id: u32,
}

/// Computed per-node columns, indexed like the dataset's nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeStats {
    pub node_id: NodeId,
    pub count_edges: usize,
    pub count_edges_multi: usize,
    pub in_edges: usize,
    pub in_edges_multi: usize,
    pub out_edges: usize,
    pub out_edges_multi: usize,
    pub component_id: u32,
}

/// Summary of a dataset under every graph-type interpretation.
///
/// Serializes to the shape hosts consume:
/// `{"number_of_nodes", "number_of_self_loops", "properties_by_graph_type": {ty: {"number_of_edges", "parallel_edges"}}, ...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "NetworkMetadataRecord", try_from = "NetworkMetadataRecord")]
pub struct NetworkMetadata {
    number_of_nodes: usize,
    number_of_self_loops: usize,
    metrics_by_graph_type: BTreeMap<GraphType, GraphTypeMetrics>,
    components: BTreeMap<u32, ComponentProperties>,
}

impl NetworkMetadata {
    /// `metrics` must hold exactly one entry per graph type.
    pub(crate) fn new(
        number_of_nodes: usize,
        number_of_self_loops: usize,
        metrics: [GraphTypeMetrics; 4],
        components: BTreeMap<u32, ComponentProperties>,
    ) -> Self {
        Self {
            number_of_nodes,
            number_of_self_loops,
            metrics_by_graph_type: metrics.into_iter().map(|m| (m.graph_type, m)).collect(),
            components,
        }
    }

    pub fn number_of_nodes(&self) -> usize {
        self.number_of_nodes
    }

    pub fn number_of_self_loops(&self) -> usize {
        self.number_of_self_loops
    }

    pub fn metrics(&self, graph_type: GraphType) -> GraphTypeMetrics {
        self.metrics_by_graph_type
            .get(&graph_type)
            .copied()
            .unwrap_or(GraphTypeMetrics {
                graph_type,
                edge_count: 0,
                parallel_edge_count: 0,
            })
    }

    pub fn metrics_by_graph_type(&self) -> &BTreeMap<GraphType, GraphTypeMetrics> {
        &self.metrics_by_graph_type
    }

    pub fn number_of_components(&self) -> usize {
        self.components.len()
    }

    pub fn components(&self) -> &BTreeMap<u32, ComponentProperties> {
        &self.components
    }

    pub fn is_connected(&self) -> bool {
        self.components.len() <= 1
    }

    pub fn to_json(&self) -> Result<String, NetworkDataError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, NetworkDataError> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct GraphProperties {
    number_of_edges: usize,
    #[serde(default)]
    parallel_edges: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct NetworkMetadataRecord {
    number_of_nodes: usize,
    number_of_self_loops: usize,
    properties_by_graph_type: BTreeMap<GraphType, GraphProperties>,
    #[serde(default)]
    number_of_components: usize,
    #[serde(default)]
    components: BTreeMap<u32, ComponentProperties>,
}

impl From<NetworkMetadata> for NetworkMetadataRecord {
    fn from(meta: NetworkMetadata) -> Self {
        let properties_by_graph_type = meta
            .metrics_by_graph_type
            .values()
            .map(|m| {
                (
                    m.graph_type,
                    GraphProperties {
                        number_of_edges: m.edge_count,
                        parallel_edges: m.parallel_edge_count,
                    },
                )
            })
            .collect();
        Self {
            number_of_nodes: meta.number_of_nodes,
            number_of_self_loops: meta.number_of_self_loops,
            properties_by_graph_type,
            number_of_components: meta.components.len(),
            components: meta.components,
        }
    }
}

impl TryFrom<NetworkMetadataRecord> for NetworkMetadata {
    type Error = String;

    fn try_from(record: NetworkMetadataRecord) -> Result<Self, Self::Error> {
        let mut metrics_by_graph_type = BTreeMap::new();
        for graph_type in GraphType::ALL {
            let props = record
                .properties_by_graph_type
                .get(&graph_type)
                .ok_or_else(|| format!("missing properties for graph type {graph_type}"))?;
            metrics_by_graph_type.insert(
                graph_type,
                GraphTypeMetrics {
                    graph_type,
                    edge_count: props.number_of_edges,
                    parallel_edge_count: props.parallel_edges,
                },
            );
        }
        if record.number_of_components != record.components.len() {
            return Err(format!(
                "number_of_components is {} but {} components are listed",
                record.number_of_components,
                record.components.len()
            ));
        }
        Ok(Self {
            number_of_nodes: record.number_of_nodes,
            number_of_self_loops: record.number_of_self_loops,
            metrics_by_graph_type,
            components: record.components,
        })
    }
}
