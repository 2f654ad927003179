//! Network datasets built from edge and node tables, with metadata derived for
//! the four graph-type interpretations (directed, directed multi, undirected,
//! undirected multi).
//! Run Criterion benchmarks with `cargo bench` to inspect reports under `target/criterion`.

pub mod assemble;
pub mod bench_utils;
pub mod components;
pub mod config;
pub mod dataset;
pub mod defaults;
pub mod deriver;
pub mod errors;
pub mod filter;
pub mod model;
#[cfg(feature = "sqlite-store")]
pub mod store;
pub mod table;

pub use crate::assemble::{AssembleOptions, assemble};
pub use crate::config::{AssembleConfig, ColumnAliases};
pub use crate::dataset::NetworkDataset;
pub use crate::deriver::derive;
pub use crate::errors::{ColumnRole, Endpoint, NetworkDataError};
pub use crate::filter::{filter_to_nodes, largest_component, select_component};
pub use crate::model::{
    ComponentProperties, EdgeRecord, EdgeStats, GraphType, GraphTypeMetrics, NetworkMetadata,
    NodeId, NodeRecord, NodeStats, RawEdge,
};
#[cfg(feature = "sqlite-store")]
pub use crate::store::NetworkStore;
pub use crate::table::Table;
