//! Joins an edges table and an optional nodes table into a [`NetworkDataset`].
//!
//! Column resolution order for each role: explicit option, then ranked alias
//! detection ([`detect_column`]), then the two-column fallback for edges.
//! Anything else that cannot be resolved to exactly one column is reported as
//! [`NetworkDataError::AmbiguousColumn`]; nothing is guessed silently.
//!
//! Node ids are renumbered to `0..n`. Without a nodes table they follow the
//! sorted unique endpoint values (integers before strings) and keep the
//! original value in the `id` attribute; with a nodes table they follow its
//! row order.

use std::collections::{BTreeMap, BTreeSet};

use ahash::AHashMap;
use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    config::AssembleConfig,
    dataset::NetworkDataset,
    defaults::ORIGINAL_ID_ATTRIBUTE,
    deriver,
    errors::{ColumnRole, Endpoint, NetworkDataError},
    model::{Attributes, NodeId, NodeRecord, RawEdge},
    table::Table,
};

/// Per-call column choices. Explicit names may be given before or after the
/// matching column map is applied.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AssembleOptions {
    pub source_column: Option<String>,
    pub target_column: Option<String>,
    /// Original column name -> new column name, applied to the edges table.
    pub edges_column_map: BTreeMap<String, String>,
    pub id_column: Option<String>,
    pub label_column: Option<String>,
    /// Original column name -> new column name, applied to the nodes table.
    pub nodes_column_map: BTreeMap<String, String>,
}

impl AssembleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source_column<S: Into<String>>(mut self, name: S) -> Self {
        self.source_column = Some(name.into());
        self
    }

    pub fn with_target_column<S: Into<String>>(mut self, name: S) -> Self {
        self.target_column = Some(name.into());
        self
    }

    pub fn with_id_column<S: Into<String>>(mut self, name: S) -> Self {
        self.id_column = Some(name.into());
        self
    }

    pub fn with_label_column<S: Into<String>>(mut self, name: S) -> Self {
        self.label_column = Some(name.into());
        self
    }

    pub fn rename_edges_column<A: Into<String>, B: Into<String>>(mut self, from: A, to: B) -> Self {
        self.edges_column_map.insert(from.into(), to.into());
        self
    }

    pub fn rename_nodes_column<A: Into<String>, B: Into<String>>(mut self, from: A, to: B) -> Self {
        self.nodes_column_map.insert(from.into(), to.into());
        self
    }
}

#[instrument(skip_all, fields(edge_rows = edges.num_rows()))]
pub fn assemble(
    edges: &Table,
    nodes: Option<&Table>,
    options: &AssembleOptions,
    config: &AssembleConfig,
) -> Result<NetworkDataset, NetworkDataError> {
    let edges_table = edges.renamed(&options.edges_column_map)?;
    let (source_col, target_col) = resolve_edge_columns(
        &edges_table,
        explicit(&options.source_column, &options.edges_column_map),
        explicit(&options.target_column, &options.edges_column_map),
        config,
    )?;
    let endpoints = parse_endpoints(&edges_table, &source_col, &target_col)?;

    let (node_records, id_map) = match nodes {
        Some(table) => nodes_from_table(table, options, config)?,
        None => synthesize_nodes(&endpoints),
    };

    let columns = edges_table.column_names();
    let mut raw_edges = Vec::with_capacity(endpoints.len());
    for (row, ((source, target), cells)) in endpoints.into_iter().zip(edges_table.rows()).enumerate() {
        let source_id = lookup(&id_map, row, &source)?;
        let target_id = lookup(&id_map, row, &target)?;
        let attributes =
            collect_attributes(columns, cells, &[source_col.as_str(), target_col.as_str()]);
        raw_edges.push(RawEdge {
            source: Some(source_id),
            target: Some(target_id),
            attributes,
        });
    }
    deriver::derive(raw_edges, Some(node_records))
}

/// Ranked alias detection.
///
/// The first alias present verbatim wins. Otherwise, when `case_insensitive`
/// is set, aliases are tried in rank order ignoring ASCII case: a single match
/// wins, several matches for the same alias are ambiguous.
pub fn detect_column(
    columns: &[String],
    aliases: &[String],
    role: ColumnRole,
    case_insensitive: bool,
) -> Result<Option<String>, NetworkDataError> {
    if let Some(alias) = aliases.iter().find(|alias| columns.contains(alias)) {
        return Ok(Some(alias.clone()));
    }
    if !case_insensitive {
        return Ok(None);
    }
    for alias in aliases {
        let matches: Vec<String> = columns
            .iter()
            .filter(|col| col.eq_ignore_ascii_case(alias))
            .cloned()
            .collect();
        match matches.len() {
            0 => continue,
            1 => return Ok(matches.into_iter().next()),
            _ => return Err(NetworkDataError::ambiguous(role, matches)),
        }
    }
    Ok(None)
}

/// Resolves the (source, target) column pair of an edges table.
pub fn resolve_edge_columns(
    table: &Table,
    source: Option<&str>,
    target: Option<&str>,
    config: &AssembleConfig,
) -> Result<(String, String), NetworkDataError> {
    let columns = table.column_names();
    let source = match source {
        Some(name) => Some(require_column(table, name)?),
        None => detect_logged(columns, &config.aliases.source, ColumnRole::Source, config)?,
    };
    let target = match target {
        Some(name) => Some(require_column(table, name)?),
        None => detect_logged(columns, &config.aliases.target, ColumnRole::Target, config)?,
    };
    match (source, target) {
        (Some(source), Some(target)) if source == target => {
            Err(NetworkDataError::ambiguous(ColumnRole::Target, vec![target]))
        }
        (Some(source), Some(target)) => Ok((source, target)),
        (None, None) if columns.len() == 2 => {
            info!("using first two columns as source and target columns");
            Ok((columns[0].clone(), columns[1].clone()))
        }
        (None, None) => Err(NetworkDataError::ambiguous(
            ColumnRole::Source,
            columns.to_vec(),
        )),
        (Some(source), None) => Err(NetworkDataError::ambiguous(
            ColumnRole::Target,
            others(columns, &[source.as_str()]),
        )),
        (None, Some(target)) => Err(NetworkDataError::ambiguous(
            ColumnRole::Source,
            others(columns, &[target.as_str()]),
        )),
    }
}

/// A node id as found in a table cell.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum IdValue {
    Int(i64),
    Text(String),
}

impl IdValue {
    fn parse(row: usize, value: &Value) -> Result<Option<Self>, NetworkDataError> {
        match value {
            Value::Null => Ok(None),
            Value::String(text) => Ok(Some(IdValue::Text(text.clone()))),
            Value::Number(num) => num.as_i64().map(|id| Some(IdValue::Int(id))).ok_or_else(|| {
                NetworkDataError::InvalidId {
                    row,
                    value: num.to_string(),
                }
            }),
            other => Err(NetworkDataError::InvalidId {
                row,
                value: other.to_string(),
            }),
        }
    }

    fn label(&self) -> String {
        match self {
            IdValue::Int(id) => id.to_string(),
            IdValue::Text(text) => text.clone(),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            IdValue::Int(id) => Value::from(*id),
            IdValue::Text(text) => Value::from(text.as_str()),
        }
    }
}

fn parse_endpoints(
    table: &Table,
    source_col: &str,
    target_col: &str,
) -> Result<Vec<(IdValue, IdValue)>, NetworkDataError> {
    let missing = |col: &str| NetworkDataError::column_not_found(col, table.column_names());
    let source_idx = table.column_index(source_col).ok_or_else(|| missing(source_col))?;
    let target_idx = table.column_index(target_col).ok_or_else(|| missing(target_col))?;
    let mut endpoints = Vec::with_capacity(table.num_rows());
    for (row, cells) in table.rows().enumerate() {
        let source = IdValue::parse(row, &cells[source_idx])?
            .ok_or_else(|| NetworkDataError::missing_endpoint(row, Endpoint::Source))?;
        let target = IdValue::parse(row, &cells[target_idx])?
            .ok_or_else(|| NetworkDataError::missing_endpoint(row, Endpoint::Target))?;
        endpoints.push((source, target));
    }
    Ok(endpoints)
}

fn nodes_from_table(
    table: &Table,
    options: &AssembleOptions,
    config: &AssembleConfig,
) -> Result<(Vec<NodeRecord>, AHashMap<IdValue, NodeId>), NetworkDataError> {
    let table = table.renamed(&options.nodes_column_map)?;
    let columns = table.column_names();
    let id_col = match explicit(&options.id_column, &options.nodes_column_map) {
        Some(name) => require_column(&table, name)?,
        None => detect_logged(columns, &config.aliases.node_id, ColumnRole::NodeId, config)?
            .ok_or_else(|| NetworkDataError::ambiguous(ColumnRole::NodeId, columns.to_vec()))?,
    };
    let label_col = match explicit(&options.label_column, &options.nodes_column_map) {
        Some(name) => Some(require_column(&table, name)?),
        None => {
            let detected =
                detect_logged(columns, &config.aliases.label, ColumnRole::Label, config)?;
            if detected.is_none() {
                info!("no label column found, will use id column as label");
            }
            detected
        }
    };

    let id_idx = table
        .column_index(&id_col)
        .ok_or_else(|| NetworkDataError::column_not_found(id_col.as_str(), columns))?;
    let label_idx = label_col.as_deref().and_then(|col| table.column_index(col));
    let mut excluded: Vec<&str> = vec![id_col.as_str()];
    if let Some(col) = label_col.as_deref() {
        excluded.push(col);
    }

    let mut records = Vec::with_capacity(table.num_rows());
    let mut id_map = AHashMap::with_capacity(table.num_rows());
    for (row, cells) in table.rows().enumerate() {
        let id = IdValue::parse(row, &cells[id_idx])?.ok_or_else(|| {
            NetworkDataError::InvalidId {
                row,
                value: Value::Null.to_string(),
            }
        })?;
        let new_id = row as NodeId;
        let label = match label_idx.map(|idx| &cells[idx]) {
            None => id.label(),
            Some(Value::Null) => {
                return Err(NetworkDataError::invalid_input(format!(
                    "label column contains a null value at row {row}"
                )));
            }
            Some(Value::String(text)) => text.clone(),
            Some(other) => other.to_string(),
        };
        if id_map.insert(id.clone(), new_id).is_some() {
            return Err(NetworkDataError::DuplicateNodeId(id.label()));
        }
        records.push(NodeRecord {
            id: new_id,
            label,
            attributes: collect_attributes(columns, cells, &excluded),
        });
    }
    Ok((records, id_map))
}

fn synthesize_nodes(
    endpoints: &[(IdValue, IdValue)],
) -> (Vec<NodeRecord>, AHashMap<IdValue, NodeId>) {
    let unique: BTreeSet<&IdValue> = endpoints
        .iter()
        .flat_map(|(source, target)| [source, target])
        .collect();
    let mut records = Vec::with_capacity(unique.len());
    let mut id_map = AHashMap::with_capacity(unique.len());
    for (idx, value) in unique.into_iter().enumerate() {
        let id = idx as NodeId;
        id_map.insert(value.clone(), id);
        records.push(NodeRecord::new(id, value.label()).with_attribute(ORIGINAL_ID_ATTRIBUTE, value.to_json()));
    }
    (records, id_map)
}

fn lookup(
    id_map: &AHashMap<IdValue, NodeId>,
    row: usize,
    value: &IdValue,
) -> Result<NodeId, NetworkDataError> {
    id_map
        .get(value)
        .copied()
        .ok_or_else(|| NetworkDataError::dangling(row, value.label()))
}

fn collect_attributes(columns: &[String], cells: &[Value], excluded: &[&str]) -> Attributes {
    columns
        .iter()
        .zip(cells)
        .filter(|(col, value)| !value.is_null() && !excluded.contains(&col.as_str()))
        .map(|(col, value)| (col.clone(), value.clone()))
        .collect()
}

fn detect_logged(
    columns: &[String],
    aliases: &[String],
    role: ColumnRole,
    config: &AssembleConfig,
) -> Result<Option<String>, NetworkDataError> {
    let detected = detect_column(columns, aliases, role, config.case_insensitive)?;
    if let Some(column) = detected.as_deref() {
        info!(%role, column, "auto-detected column");
    }
    Ok(detected)
}

fn require_column(table: &Table, name: &str) -> Result<String, NetworkDataError> {
    if table.has_column(name) {
        Ok(name.to_string())
    } else {
        Err(NetworkDataError::column_not_found(name, table.column_names()))
    }
}

fn explicit<'a>(name: &'a Option<String>, map: &'a BTreeMap<String, String>) -> Option<&'a str> {
    name.as_deref()
        .map(|name| map.get(name).map(String::as_str).unwrap_or(name))
}

fn others(columns: &[String], taken: &[&str]) -> Vec<String> {
    columns
        .iter()
        .filter(|col| !taken.contains(&col.as_str()))
        .cloned()
        .collect()
}
