#![cfg(feature = "sqlite-store")]

use networkdata::{
    GraphType, NetworkDataError, NetworkStore, NodeRecord, RawEdge,
    defaults::{COUNT_DIRECTED_COLUMN_NAME, SOURCE_COLUMN_NAME, TARGET_COLUMN_NAME},
    derive,
};
use serde_json::json;
use tempfile::tempdir;

fn sample() -> networkdata::NetworkDataset {
    let nodes = vec![
        NodeRecord::new(3, "c"),
        NodeRecord::new(1, "a").with_attribute("score", 0.25),
        NodeRecord::new(2, "b"),
    ];
    let edges = vec![
        RawEdge::new(1, 2).with_attribute("kind", "x"),
        RawEdge::new(1, 2),
        RawEdge::new(2, 1),
        RawEdge::new(3, 3),
    ];
    derive(edges, Some(nodes)).unwrap()
}

#[test]
fn save_and_load_round_trip() {
    let store = NetworkStore::open_in_memory().unwrap();
    let dataset = sample();
    store.save(&dataset).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded, dataset);
    assert_eq!(store.stored_metadata().unwrap().as_ref(), Some(dataset.metadata()));
}

#[test]
fn save_replaces_previous_network() {
    let store = NetworkStore::open_in_memory().unwrap();
    store.save(&sample()).unwrap();
    let smaller = derive(vec![RawEdge::new(1, 2)], None).unwrap();
    store.save(&smaller).unwrap();

    let loaded = store.load().unwrap();
    assert_eq!(loaded.num_nodes(), 2);
    assert_eq!(loaded.metadata().metrics(GraphType::Directed).edge_count, 1);
}

#[test]
fn load_without_saved_network_fails() {
    let store = NetworkStore::open_in_memory().unwrap();
    assert!(store.stored_metadata().unwrap().is_none());
    assert!(matches!(store.load(), Err(NetworkDataError::Storage(_))));
}

#[test]
fn persists_to_disk() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("network.db");
    {
        let store = NetworkStore::open(&path).unwrap();
        store.save(&sample()).unwrap();
    }
    let reopened = NetworkStore::open(&path).unwrap();
    let loaded = reopened.load().unwrap();
    assert_eq!(loaded.node(1).unwrap().attributes["score"], json!(0.25));
    assert_eq!(loaded.nodes()[0].label, "c");
}

#[test]
fn computed_columns_are_queryable() {
    let store = NetworkStore::open_in_memory().unwrap();
    store.save(&sample()).unwrap();

    let rows = store
        .query_edges(
            &format!(
                "SELECT {SOURCE_COLUMN_NAME}, {TARGET_COLUMN_NAME}, {COUNT_DIRECTED_COLUMN_NAME} \
                 FROM network_edges WHERE {COUNT_DIRECTED_COLUMN_NAME} > 1"
            ),
            "network_edges",
        )
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0][SOURCE_COLUMN_NAME], json!(1));
    assert_eq!(rows[0][COUNT_DIRECTED_COLUMN_NAME], json!(2));

    let rows = store
        .query_nodes(
            "SELECT _label, _in_edges_multi FROM nodes ORDER BY _in_edges_multi DESC",
            "nodes",
        )
        .unwrap();
    assert_eq!(rows[0]["_label"], json!("b"));
    assert_eq!(rows[0]["_in_edges_multi"], json!(2));

    let totals = store
        .query("SELECT COUNT(*) AS total, AVG(_count_dup_undirected) AS avg FROM edges")
        .unwrap();
    assert_eq!(totals[0]["total"], json!(4));
    assert_eq!(totals[0]["avg"], json!(2.5));
}

#[test]
fn invalid_sql_is_a_storage_error() {
    let store = NetworkStore::open_in_memory().unwrap();
    assert!(matches!(
        store.query("SELECT * FROM nowhere"),
        Err(NetworkDataError::Storage(_))
    ));
}

#[test]
fn queries_cannot_modify_the_stored_network() {
    let store = NetworkStore::open_in_memory().unwrap();
    let dataset = derive(vec![RawEdge::new(1, 2), RawEdge::new(2, 3)], None).unwrap();
    store.save(&dataset).unwrap();

    for sql in [
        "DELETE FROM edges",
        "UPDATE nodes SET _label = 'x'",
        "DROP TABLE network_metadata",
    ] {
        assert!(
            matches!(store.query(sql), Err(NetworkDataError::Storage(_))),
            "{sql}"
        );
    }
    assert!(matches!(
        store.query_edges("DELETE FROM links", "links"),
        Err(NetworkDataError::Storage(_))
    ));

    let loaded = store.load().unwrap();
    let stored = store.stored_metadata().unwrap().expect("metadata");
    assert_eq!(loaded.metadata(), &stored);
    assert_eq!(loaded.metadata().metrics(GraphType::Directed).edge_count, 2);
}

#[test]
fn load_reads_metadata_and_rows_from_one_snapshot() {
    let store = std::sync::Arc::new(NetworkStore::open_in_memory().unwrap());
    let small = derive(vec![RawEdge::new(1, 2)], None).unwrap();
    let large = sample();
    store.save(&small).unwrap();

    let writer = {
        let store = std::sync::Arc::clone(&store);
        let (small, large) = (small.clone(), large.clone());
        std::thread::spawn(move || {
            for round in 0..50 {
                let dataset = if round % 2 == 0 { &large } else { &small };
                store.save(dataset).unwrap();
            }
        })
    };
    for _ in 0..50 {
        let loaded = store.load().unwrap();
        assert!(loaded == small || loaded == large);
    }
    writer.join().unwrap();
}
