use super::*;
use crate::error::Error;

fn open_db() -> TripleDb {
    TripleDb::open_at(None, 4096).unwrap()
}

#[test]
fn identifying_a_node_twice_returns_the_same_nid() {
    let db = open_db();
    let a = db.identify_node(b"alice").unwrap();
    let b = db.identify_node(b"alice").unwrap();
    assert_eq!(a, b);
    assert_eq!(db.resolve_node(a).unwrap(), b"alice");
}

#[test]
fn a_triple_can_be_added_found_and_removed_through_a_named_model() {
    let db = open_db();
    let alice = db.identify_node(b"alice").unwrap();
    let knows = db.identify_node(b"knows").unwrap();
    let bob = db.identify_node(b"bob").unwrap();
    let triple = Triple::new(alice, knows, bob);

    let model = db.open_model(b"social").unwrap();
    assert!(!db.add_triple(&model, triple).unwrap());
    assert!(db.add_triple(&model, triple).unwrap());

    let pattern = Triple::new(alice, knows, Nid::NULL);
    let found = db.find_triple(&model, &pattern, Nid::NULL).unwrap();
    assert_eq!(db.resolve_triple(found).unwrap(), triple);
    assert!(db.find_triple(&model, &pattern, found).is_none());

    assert!(db.remove_triple(&model, triple).unwrap());
    assert!(db.find_triple(&model, &pattern, Nid::NULL).is_none());

    db.close_model(model).unwrap();
}

#[test]
fn a_triple_can_itself_be_the_subject_of_another_triple() {
    let db = open_db();
    let alice = db.identify_node(b"alice").unwrap();
    let knows = db.identify_node(b"knows").unwrap();
    let bob = db.identify_node(b"bob").unwrap();
    let says = db.identify_node(b"says").unwrap();
    let reported_by = db.identify_node(b"reported_by").unwrap();

    let fact = db.identify_triple(Triple::new(alice, knows, bob)).unwrap();
    assert!(fact.is_triple());

    let reification = Triple::new(fact, says, reported_by);
    let model = db.open_anonymous_model().unwrap();
    db.add_triple(&model, reification).unwrap();

    let pattern = Triple::new(fact, Nid::NULL, Nid::NULL);
    let found = db.find_triple(&model, &pattern, Nid::NULL).unwrap();
    assert_eq!(db.resolve_triple(found).unwrap(), reification);
}

#[test]
fn models_are_independent_until_absorbed() {
    let db = open_db();
    let a = db.identify_node(b"a").unwrap();
    let b = db.identify_node(b"b").unwrap();
    let c = db.identify_node(b"c").unwrap();

    let m1 = db.open_anonymous_model().unwrap();
    let m2 = db.open_anonymous_model().unwrap();
    db.add_triple(&m1, Triple::new(a, b, c)).unwrap();
    db.add_triple(&m2, Triple::new(c, b, a)).unwrap();

    let wildcard = Triple::new(Nid::NULL, Nid::NULL, Nid::NULL);
    assert!(db.find_triple(&m1, &wildcard, Nid::NULL).is_some());
    assert!(db.find_triple(&m2, &wildcard, Nid::NULL).is_some());

    db.absorb_model(&m1, &m2).unwrap();
    assert_eq!(m1.len(), 2);
    assert_eq!(m2.len(), 1);
}

#[test]
fn emptying_a_model_removes_every_triple_but_keeps_it_open() {
    let db = open_db();
    let a = db.identify_node(b"a").unwrap();
    let b = db.identify_node(b"b").unwrap();
    let c = db.identify_node(b"c").unwrap();
    let model = db.open_model(b"scratch").unwrap();
    db.add_triple(&model, Triple::new(a, b, c)).unwrap();

    assert_eq!(db.empty_model(&model).unwrap(), 1);
    assert!(model.is_empty());

    db.add_triple(&model, Triple::new(a, b, c)).unwrap();
    assert_eq!(model.len(), 1);
}

#[test]
fn resolving_a_triple_nid_as_a_node_is_an_error() {
    let db = open_db();
    let a = db.identify_node(b"a").unwrap();
    let b = db.identify_node(b"b").unwrap();
    let c = db.identify_node(b"c").unwrap();
    let triple_nid = db.identify_triple(Triple::new(a, b, c)).unwrap();
    assert!(matches!(
        db.resolve_node(triple_nid),
        Err(Error::NotANodeNid)
    ));
}

#[test]
fn node_and_triple_counts_track_interning() {
    let db = open_db();
    assert_eq!(db.node_count(), 0);
    assert_eq!(db.triple_count(), 0);
    let a = db.identify_node(b"a").unwrap();
    let b = db.identify_node(b"b").unwrap();
    let c = db.identify_node(b"c").unwrap();
    db.identify_triple(Triple::new(a, b, c)).unwrap();
    assert_eq!(db.node_count(), 3);
    assert_eq!(db.triple_count(), 1);
}
