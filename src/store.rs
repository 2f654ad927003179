//! SQLite materialization of a [`NetworkDataset`].
//!
//! The computed per-node and per-edge statistics are written as `_`-prefixed
//! columns next to the user attributes (stored as one JSON text column), so
//! they can be queried with plain SQL. Loading reads only ids, labels,
//! endpoints and attributes and derives everything else again.

use std::path::Path;

use parking_lot::Mutex;
use rusqlite::{Connection, OptionalExtension, params, types::ValueRef};
use serde_json::{Map, Number, Value};
use tracing::{debug, instrument};

use crate::{
    dataset::NetworkDataset,
    defaults::{
        ATTRIBUTES_COLUMN_NAME, COMPONENT_ID_COLUMN_NAME, CONNECTIONS_COLUMN_NAME,
        CONNECTIONS_MULTI_COLUMN_NAME, COUNT_DIRECTED_COLUMN_NAME, COUNT_IDX_DIRECTED_COLUMN_NAME,
        COUNT_IDX_UNDIRECTED_COLUMN_NAME, COUNT_UNDIRECTED_COLUMN_NAME, EDGE_ID_COLUMN_NAME,
        EDGES_TABLE_NAME, IN_DIRECTED_COLUMN_NAME, IN_DIRECTED_MULTI_COLUMN_NAME,
        LABEL_COLUMN_NAME, METADATA_TABLE_NAME, NODE_ID_COLUMN_NAME, NODES_TABLE_NAME,
        OUT_DIRECTED_COLUMN_NAME, OUT_DIRECTED_MULTI_COLUMN_NAME, SOURCE_COLUMN_NAME,
        TARGET_COLUMN_NAME,
    },
    deriver,
    errors::NetworkDataError,
    model::{Attributes, NetworkMetadata, NodeRecord, RawEdge},
};

pub struct NetworkStore {
    conn: Mutex<Connection>,
}

impl NetworkStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, NetworkDataError> {
        let conn = Connection::open(path).map_err(storage)?;
        ensure_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, NetworkDataError> {
        let conn = Connection::open_in_memory().map_err(storage)?;
        ensure_schema(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    /// Replaces whatever network is stored with `dataset`.
    #[instrument(skip_all)]
    pub fn save(&self, dataset: &NetworkDataset) -> Result<(), NetworkDataError> {
        let metadata = dataset.metadata().to_json()?;
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(storage)?;
        tx.execute_batch(&format!(
            "DELETE FROM {NODES_TABLE_NAME}; DELETE FROM {EDGES_TABLE_NAME}; \
             DELETE FROM {METADATA_TABLE_NAME};"
        ))
        .map_err(storage)?;
        {
            let mut insert_node = tx
                .prepare(&format!(
                    "INSERT INTO {NODES_TABLE_NAME}({NODE_ID_COLUMN_NAME}, {LABEL_COLUMN_NAME},
                        {CONNECTIONS_COLUMN_NAME}, {CONNECTIONS_MULTI_COLUMN_NAME},
                        {IN_DIRECTED_COLUMN_NAME}, {IN_DIRECTED_MULTI_COLUMN_NAME},
                        {OUT_DIRECTED_COLUMN_NAME}, {OUT_DIRECTED_MULTI_COLUMN_NAME},
                        {COMPONENT_ID_COLUMN_NAME}, {ATTRIBUTES_COLUMN_NAME})
                     VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)"
                ))
                .map_err(storage)?;
            for (node, stats) in dataset.nodes().iter().zip(dataset.node_stats()) {
                let attributes = serde_json::to_string(&node.attributes)?;
                insert_node
                    .execute(params![
                        node.id,
                        node.label.as_str(),
                        stats.count_edges as i64,
                        stats.count_edges_multi as i64,
                        stats.in_edges as i64,
                        stats.in_edges_multi as i64,
                        stats.out_edges as i64,
                        stats.out_edges_multi as i64,
                        stats.component_id,
                        attributes,
                    ])
                    .map_err(storage)?;
            }

            let mut insert_edge = tx
                .prepare(&format!(
                    "INSERT INTO {EDGES_TABLE_NAME}({EDGE_ID_COLUMN_NAME}, {SOURCE_COLUMN_NAME},
                        {TARGET_COLUMN_NAME}, {COUNT_DIRECTED_COLUMN_NAME},
                        {COUNT_IDX_DIRECTED_COLUMN_NAME}, {COUNT_UNDIRECTED_COLUMN_NAME},
                        {COUNT_IDX_UNDIRECTED_COLUMN_NAME}, {COMPONENT_ID_COLUMN_NAME},
                        {ATTRIBUTES_COLUMN_NAME})
                     VALUES(?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                ))
                .map_err(storage)?;
            for (edge, stats) in dataset.edges().iter().zip(dataset.edge_stats()) {
                let attributes = serde_json::to_string(&edge.attributes)?;
                insert_edge
                    .execute(params![
                        stats.edge_id as i64,
                        edge.source,
                        edge.target,
                        stats.count_dup_directed as i64,
                        stats.idx_dup_directed as i64,
                        stats.count_dup_undirected as i64,
                        stats.idx_dup_undirected as i64,
                        stats.component_id,
                        attributes,
                    ])
                    .map_err(storage)?;
            }
        }
        tx.execute(
            &format!("INSERT INTO {METADATA_TABLE_NAME}(id, metadata) VALUES(1, ?1)"),
            params![metadata],
        )
        .map_err(storage)?;
        tx.commit().map_err(storage)?;
        debug!(
            nodes = dataset.num_nodes(),
            edges = dataset.num_edges(),
            "saved network dataset"
        );
        Ok(())
    }

    /// Rebuilds the stored network. Fails if nothing has been saved yet.
    #[instrument(skip_all)]
    pub fn load(&self) -> Result<NetworkDataset, NetworkDataError> {
        let (node_rows, edge_rows) = {
            let conn = self.conn.lock();
            if read_metadata(&conn)?.is_none() {
                return Err(NetworkDataError::storage("no network stored"));
            }
            let node_rows = collect_rows(
                &conn,
                &format!(
                    "SELECT {NODE_ID_COLUMN_NAME}, {LABEL_COLUMN_NAME}, {ATTRIBUTES_COLUMN_NAME}
                     FROM {NODES_TABLE_NAME} ORDER BY rowid"
                ),
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)),
            )?;
            let edge_rows = collect_rows(
                &conn,
                &format!(
                    "SELECT {SOURCE_COLUMN_NAME}, {TARGET_COLUMN_NAME}, {ATTRIBUTES_COLUMN_NAME}
                     FROM {EDGES_TABLE_NAME} ORDER BY {EDGE_ID_COLUMN_NAME}"
                ),
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, String>(2)?)),
            )?;
            (node_rows, edge_rows)
        };

        let mut nodes = Vec::with_capacity(node_rows.len());
        for (id, label, attributes) in node_rows {
            nodes.push(NodeRecord {
                id,
                label,
                attributes: serde_json::from_str::<Attributes>(&attributes)?,
            });
        }
        let mut edges = Vec::with_capacity(edge_rows.len());
        for (source, target, attributes) in edge_rows {
            edges.push(RawEdge {
                source: Some(source),
                target: Some(target),
                attributes: serde_json::from_str::<Attributes>(&attributes)?,
            });
        }
        debug!(nodes = nodes.len(), edges = edges.len(), "loaded network dataset");
        deriver::build(edges, Some(nodes))
    }

    /// Metadata as it was computed when the network was saved.
    pub fn stored_metadata(&self) -> Result<Option<NetworkMetadata>, NetworkDataError> {
        read_metadata(&self.conn.lock())
    }

    /// Runs a read-only query; each result row becomes a JSON object keyed by
    /// column name. Statements that would modify the database are rejected.
    pub fn query(&self, sql: &str) -> Result<Vec<Map<String, Value>>, NetworkDataError> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(sql).map_err(storage)?;
        if !stmt.readonly() {
            return Err(NetworkDataError::storage(format!(
                "only read-only statements may be queried: {sql}"
            )));
        }
        let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
        let rows = stmt
            .query_map([], |row| {
                let mut record = Map::with_capacity(columns.len());
                for (idx, name) in columns.iter().enumerate() {
                    record.insert(name.clone(), sql_to_json(row.get_ref(idx)?));
                }
                Ok(record)
            })
            .map_err(storage)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(storage)
    }

    /// Queries the edges table, accepting `relation_name` as an alias for it.
    pub fn query_edges(
        &self,
        sql: &str,
        relation_name: &str,
    ) -> Result<Vec<Map<String, Value>>, NetworkDataError> {
        self.query(&rewrite_relation(sql, relation_name, EDGES_TABLE_NAME))
    }

    /// Queries the nodes table, accepting `relation_name` as an alias for it.
    pub fn query_nodes(
        &self,
        sql: &str,
        relation_name: &str,
    ) -> Result<Vec<Map<String, Value>>, NetworkDataError> {
        self.query(&rewrite_relation(sql, relation_name, NODES_TABLE_NAME))
    }
}

pub fn ensure_schema(conn: &Connection) -> Result<(), NetworkDataError> {
    conn.execute_batch(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {NODES_TABLE_NAME} (
            {NODE_ID_COLUMN_NAME}            INTEGER NOT NULL UNIQUE,
            {LABEL_COLUMN_NAME}              TEXT NOT NULL,
            {CONNECTIONS_COLUMN_NAME}        INTEGER NOT NULL,
            {CONNECTIONS_MULTI_COLUMN_NAME}  INTEGER NOT NULL,
            {IN_DIRECTED_COLUMN_NAME}        INTEGER NOT NULL,
            {IN_DIRECTED_MULTI_COLUMN_NAME}  INTEGER NOT NULL,
            {OUT_DIRECTED_COLUMN_NAME}       INTEGER NOT NULL,
            {OUT_DIRECTED_MULTI_COLUMN_NAME} INTEGER NOT NULL,
            {COMPONENT_ID_COLUMN_NAME}       INTEGER NOT NULL,
            {ATTRIBUTES_COLUMN_NAME}         TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS {EDGES_TABLE_NAME} (
            {EDGE_ID_COLUMN_NAME}              INTEGER PRIMARY KEY,
            {SOURCE_COLUMN_NAME}               INTEGER NOT NULL,
            {TARGET_COLUMN_NAME}               INTEGER NOT NULL,
            {COUNT_DIRECTED_COLUMN_NAME}       INTEGER NOT NULL,
            {COUNT_IDX_DIRECTED_COLUMN_NAME}   INTEGER NOT NULL,
            {COUNT_UNDIRECTED_COLUMN_NAME}     INTEGER NOT NULL,
            {COUNT_IDX_UNDIRECTED_COLUMN_NAME} INTEGER NOT NULL,
            {COMPONENT_ID_COLUMN_NAME}         INTEGER NOT NULL,
            {ATTRIBUTES_COLUMN_NAME}           TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS {METADATA_TABLE_NAME} (
            id       INTEGER PRIMARY KEY CHECK (id = 1),
            metadata TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_edges_source ON {EDGES_TABLE_NAME}({SOURCE_COLUMN_NAME});
        CREATE INDEX IF NOT EXISTS idx_edges_target ON {EDGES_TABLE_NAME}({TARGET_COLUMN_NAME});
        CREATE INDEX IF NOT EXISTS idx_nodes_component ON {NODES_TABLE_NAME}({COMPONENT_ID_COLUMN_NAME});
        "#
    ))
    .map_err(storage)
}

fn read_metadata(conn: &Connection) -> Result<Option<NetworkMetadata>, NetworkDataError> {
    let raw: Option<String> = conn
        .query_row(
            &format!("SELECT metadata FROM {METADATA_TABLE_NAME} WHERE id=1"),
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(storage)?;
    raw.map(|raw| NetworkMetadata::from_json(&raw)).transpose()
}

fn collect_rows<T, F>(conn: &Connection, sql: &str, map: F) -> Result<Vec<T>, NetworkDataError>
where
    F: FnMut(&rusqlite::Row<'_>) -> rusqlite::Result<T>,
{
    let mut stmt = conn.prepare(sql).map_err(storage)?;
    let rows = stmt.query_map([], map).map_err(storage)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(storage)
}

fn rewrite_relation(sql: &str, relation_name: &str, table: &str) -> String {
    if relation_name == table || relation_name.is_empty() {
        sql.to_string()
    } else {
        sql.replace(relation_name, table)
    }
}

fn sql_to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(int) => Value::from(int),
        ValueRef::Real(real) => Number::from_f64(real).map(Value::Number).unwrap_or(Value::Null),
        ValueRef::Text(text) => Value::String(String::from_utf8_lossy(text).into_owned()),
        ValueRef::Blob(bytes) => Value::Array(bytes.iter().map(|&b| Value::from(b)).collect()),
    }
}

fn storage(err: rusqlite::Error) -> NetworkDataError {
    NetworkDataError::storage(err.to_string())
}
