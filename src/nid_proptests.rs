use super::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Property: packing and unpacking a node NID is lossless for every
    /// index within the packed-index range.
    #[test]
    fn prop_node_nid_pack_round_trips(index in 0u32..PACKED_INDEX_MASK) {
        let nid = Nid::node(index);
        prop_assert_eq!(Nid::unpack(nid.pack()), nid);
    }

    /// Property: packing and unpacking a triple NID is lossless and never
    /// collides with a node NID's packed form.
    #[test]
    fn prop_triple_nid_pack_round_trips(index in 0u32..PACKED_INDEX_MASK) {
        let nid = Nid::triple(index);
        prop_assert_eq!(Nid::unpack(nid.pack()), nid);
        prop_assert_ne!(nid.pack(), Nid::node(index).pack());
    }

    /// Property: a triple's packed form round-trips through `Triple::unpack`
    /// regardless of which positions are concrete vs. null.
    #[test]
    fn prop_triple_pack_round_trips(
        s in 0u32..PACKED_INDEX_MASK,
        p in 0u32..PACKED_INDEX_MASK,
        o in 0u32..PACKED_INDEX_MASK,
        triple_flags in proptest::array::uniform3(any::<bool>()),
    ) {
        let make = |index: u32, is_triple: bool| {
            if is_triple { Nid::triple(index) } else { Nid::node(index) }
        };
        let triple = Triple::new(
            make(s, triple_flags[0]),
            make(p, triple_flags[1]),
            make(o, triple_flags[2]),
        );
        prop_assert_eq!(Triple::unpack(&triple.pack()), triple);
    }

    /// Property: a triple always matches the fully-wildcard pattern, and
    /// masking it down to its own concrete_mask and back produces a
    /// pattern it still matches.
    #[test]
    fn prop_masked_triple_always_matches_its_source(
        s in 1u32..1000, p in 1u32..1000, o in 1u32..1000,
    ) {
        let triple = Triple::new(Nid::node(s), Nid::node(p), Nid::node(o));
        let wildcard = Triple::new(Nid::NULL, Nid::NULL, Nid::NULL);
        prop_assert!(triple.matches(&wildcard));

        let mask = triple.concrete_mask();
        let masked = triple.masked(mask);
        prop_assert_eq!(masked, triple);
        prop_assert!(triple.matches(&masked));
    }
}
