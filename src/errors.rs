use std::fmt;

use thiserror::Error;

/// Which end of an edge a validation failure refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Source,
    Target,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Source => f.write_str("source"),
            Endpoint::Target => f.write_str("target"),
        }
    }
}

/// The column a detection pass was trying to resolve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ColumnRole {
    Source,
    Target,
    NodeId,
    Label,
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnRole::Source => f.write_str("source"),
            ColumnRole::Target => f.write_str("target"),
            ColumnRole::NodeId => f.write_str("node id"),
            ColumnRole::Label => f.write_str("label"),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum NetworkDataError {
    #[error("edge {edge_index} has no {endpoint} node")]
    MissingEndpoint { edge_index: usize, endpoint: Endpoint },
    #[error("edge {edge_index} references unknown node id {node_id}")]
    DanglingEdgeReference { edge_index: usize, node_id: String },
    #[error("cannot resolve {role} column unambiguously, candidates: [{}]", .candidates.join(", "))]
    AmbiguousColumn {
        role: ColumnRole,
        candidates: Vec<String>,
    },
    #[error("edge list is empty")]
    EmptyEdges,
    #[error("duplicate node id {0}")]
    DuplicateNodeId(String),
    #[error("column '{column}' not found, available: [{}]", .available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },
    #[error("attribute name '{0}' is reserved (names starting with '_' are computed)")]
    ReservedAttributeName(String),
    #[error("row {row}: value {value} cannot be used as a node id")]
    InvalidId { row: usize, value: String },
    #[error("unknown component id {0}")]
    UnknownComponent(u32),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl NetworkDataError {
    pub fn missing_endpoint(edge_index: usize, endpoint: Endpoint) -> Self {
        NetworkDataError::MissingEndpoint {
            edge_index,
            endpoint,
        }
    }

    pub fn dangling<T: ToString>(edge_index: usize, node_id: T) -> Self {
        NetworkDataError::DanglingEdgeReference {
            edge_index,
            node_id: node_id.to_string(),
        }
    }

    pub fn ambiguous(role: ColumnRole, candidates: Vec<String>) -> Self {
        NetworkDataError::AmbiguousColumn { role, candidates }
    }

    pub fn column_not_found<T: Into<String>>(column: T, available: &[String]) -> Self {
        NetworkDataError::ColumnNotFound {
            column: column.into(),
            available: available.to_vec(),
        }
    }

    pub fn invalid_input<T: Into<String>>(msg: T) -> Self {
        NetworkDataError::InvalidInput(msg.into())
    }

    pub fn serialization<T: Into<String>>(msg: T) -> Self {
        NetworkDataError::Serialization(msg.into())
    }

    pub fn storage<T: Into<String>>(msg: T) -> Self {
        NetworkDataError::Storage(msg.into())
    }
}

impl From<serde_json::Error> for NetworkDataError {
    fn from(err: serde_json::Error) -> Self {
        NetworkDataError::serialization(err.to_string())
    }
}
