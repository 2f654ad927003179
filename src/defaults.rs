//! Reserved column names and default alias lists.
//!
//! Names starting with `_` are computed by this crate and may not be used for
//! user attributes.

pub const NODE_ID_COLUMN_NAME: &str = "_node_id";
pub const LABEL_COLUMN_NAME: &str = "_label";
pub const EDGE_ID_COLUMN_NAME: &str = "_edge_id";
pub const SOURCE_COLUMN_NAME: &str = "_source";
pub const TARGET_COLUMN_NAME: &str = "_target";
pub const COMPONENT_ID_COLUMN_NAME: &str = "_component_id";

pub const COUNT_DIRECTED_COLUMN_NAME: &str = "_count_dup_directed";
pub const COUNT_IDX_DIRECTED_COLUMN_NAME: &str = "_idx_dup_directed";
pub const COUNT_UNDIRECTED_COLUMN_NAME: &str = "_count_dup_undirected";
pub const COUNT_IDX_UNDIRECTED_COLUMN_NAME: &str = "_idx_dup_undirected";

pub const CONNECTIONS_COLUMN_NAME: &str = "_count_edges";
pub const CONNECTIONS_MULTI_COLUMN_NAME: &str = "_count_edges_multi";
pub const IN_DIRECTED_COLUMN_NAME: &str = "_in_edges";
pub const IN_DIRECTED_MULTI_COLUMN_NAME: &str = "_in_edges_multi";
pub const OUT_DIRECTED_COLUMN_NAME: &str = "_out_edges";
pub const OUT_DIRECTED_MULTI_COLUMN_NAME: &str = "_out_edges_multi";

pub const ATTRIBUTES_COLUMN_NAME: &str = "attributes";

pub const NODES_TABLE_NAME: &str = "nodes";
pub const EDGES_TABLE_NAME: &str = "edges";
pub const METADATA_TABLE_NAME: &str = "network_metadata";

/// Attribute under which `assemble` keeps the original id of synthesized nodes.
pub const ORIGINAL_ID_ATTRIBUTE: &str = "id";

pub const RESERVED_PREFIX: char = '_';

pub const NODE_ID_ALIAS_NAMES: &[&str] = &["id", "node_id"];
pub const LABEL_ALIAS_NAMES: &[&str] = &["label", "node_label"];
pub const SOURCE_COLUMN_ALIAS_NAMES: &[&str] = &["source", "sources", "source_id", "from", "sender"];
pub const TARGET_COLUMN_ALIAS_NAMES: &[&str] = &["target", "targets", "target_id", "to", "receiver"];

pub fn is_reserved(name: &str) -> bool {
    name.starts_with(RESERVED_PREFIX)
}
