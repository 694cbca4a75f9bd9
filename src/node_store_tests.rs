use super::*;

#[test]
fn identify_is_stable_for_equal_payloads() {
    let store = NodeStore::open(None).unwrap();
    let a = store.identify(b"alice").unwrap();
    let b = store.identify(b"alice").unwrap();
    assert_eq!(a, b);
    assert!(!a.is_triple());
}

#[test]
fn identify_assigns_distinct_indices_for_distinct_payloads() {
    let store = NodeStore::open(None).unwrap();
    let a = store.identify(b"alice").unwrap();
    let b = store.identify(b"bob").unwrap();
    assert_ne!(a, b);
}

#[test]
fn resolve_round_trips_the_payload() {
    let store = NodeStore::open(None).unwrap();
    let nid = store.identify(b"hello world").unwrap();
    assert_eq!(store.resolve(nid).unwrap(), b"hello world");
}

#[test]
fn resolve_unknown_node_is_an_error() {
    let store = NodeStore::open(None).unwrap();
    let bogus = Nid::node(999);
    assert!(matches!(store.resolve(bogus), Err(Error::NoSuchNode(_))));
}

#[test]
fn resolve_rejects_triple_nids() {
    let store = NodeStore::open(None).unwrap();
    let triple_nid = Nid::triple(0);
    assert!(matches!(store.resolve(triple_nid), Err(Error::NotANodeNid)));
}

#[test]
fn resolve_into_reports_required_size_when_buffer_is_small() {
    let store = NodeStore::open(None).unwrap();
    let nid = store.identify(b"hello world").unwrap();
    let mut buf = [0u8; 4];
    let err = store.resolve_into(nid, &mut buf).unwrap_err();
    match err {
        Error::BufferTooSmall { needed, available } => {
            assert_eq!(needed, 11);
            assert_eq!(available, 4);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn resolve_into_fills_a_large_enough_buffer() {
    let store = NodeStore::open(None).unwrap();
    let nid = store.identify(b"hi").unwrap();
    let mut buf = [0u8; 8];
    let n = store.resolve_into(nid, &mut buf).unwrap();
    assert_eq!(&buf[..n], b"hi");
}

#[test]
fn len_and_is_empty_track_interned_count() {
    let store = NodeStore::open(None).unwrap();
    assert!(store.is_empty());
    store.identify(b"a").unwrap();
    store.identify(b"b").unwrap();
    store.identify(b"a").unwrap();
    assert_eq!(store.len(), 2);
    assert!(!store.is_empty());
}

#[test]
fn reopening_a_persistent_store_preserves_identities() {
    let dir = tempfile::tempdir().unwrap();
    let (a, b) = {
        let store = NodeStore::open(Some(dir.path())).unwrap();
        let a = store.identify(b"alice").unwrap();
        let b = store.identify(b"bob").unwrap();
        (a, b)
    };
    let store = NodeStore::open(Some(dir.path())).unwrap();
    assert_eq!(store.identify(b"alice").unwrap(), a);
    assert_eq!(store.identify(b"bob").unwrap(), b);
    assert_eq!(store.resolve(a).unwrap(), b"alice");
    assert_eq!(store.resolve(b).unwrap(), b"bob");
}

#[test]
fn reverse_log_rebuilds_when_shorter_than_forward_log() {
    // Simulate a crash between the forward append and the reverse append:
    // truncate nodes_index.db after the store has recorded two nodes.
    let dir = tempfile::tempdir().unwrap();
    {
        let store = NodeStore::open(Some(dir.path())).unwrap();
        store.identify(b"alice").unwrap();
        store.identify(b"bob").unwrap();
    }
    std::fs::write(dir.path().join("nodes_index.db"), []).unwrap();

    let store = NodeStore::open(Some(dir.path())).unwrap();
    assert_eq!(store.len(), 2);
    let nid = store.identify(b"alice").unwrap();
    assert_eq!(store.resolve(nid).unwrap(), b"alice");
    // No new node should have been created for an already-known payload.
    assert_eq!(store.len(), 2);
}
