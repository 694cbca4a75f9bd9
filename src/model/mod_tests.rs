use super::*;
use crate::nid::Nid;

fn t(s: u32, p: u32, o: u32) -> Triple {
    Triple::new(Nid::node(s), Nid::node(p), Nid::node(o))
}

#[test]
fn add_find_and_remove_round_trip() {
    let model = Model::new(Some(b"people".to_vec()), ModelIndex::open(None).unwrap());
    assert_eq!(model.name(), Some(b"people".as_slice()));

    assert!(!model.add_triple(1, t(1, 2, 3)).unwrap());
    assert_eq!(model.len(), 1);
    assert_eq!(model.find_triple(&t(1, 2, 3), 0), Some(Nid::triple(1)));

    assert!(model.remove_triple(1, t(1, 2, 3)).unwrap());
    assert!(model.is_empty());
}

#[test]
fn empty_removes_every_triple() {
    let model = Model::new(None, ModelIndex::open(None).unwrap());
    model.add_triple(1, t(1, 2, 3)).unwrap();
    model.add_triple(2, t(4, 5, 6)).unwrap();
    assert_eq!(model.empty().unwrap(), 2);
    assert!(model.is_empty());
}

#[test]
fn maybe_compact_is_a_no_op_below_threshold() {
    let model = Model::new(None, ModelIndex::open(None).unwrap());
    model.add_triple(1, t(1, 2, 3)).unwrap();
    // Should not panic and should leave the model queryable.
    model.maybe_compact(1_000_000).unwrap();
    assert_eq!(model.len(), 1);
}
