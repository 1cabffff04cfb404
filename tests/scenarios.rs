use petgraph::graph::NodeIndex;

use stereocrab::cip::descriptor;
use stereocrab::{
    Atom, Bond, BondOrder, Chirality, Descriptor, Element, Inconsistency, Mol, QueryAtom,
    QueryBond, QueryMol, StereoConfig, StereoError, assign_chirality_from_template,
};

/// 2-bromo-2-chlorobutane: C0 bonded to ethyl (1-2), Cl3, methyl 4, Br5.
fn bromochlorobutane() -> Mol<Atom, Bond> {
    Mol::from_parts(
        vec![
            Atom::new(Element::C),
            Atom::new(Element::C).with_hydrogens(2),
            Atom::new(Element::C).with_hydrogens(3),
            Atom::new(Element::Cl),
            Atom::new(Element::C).with_hydrogens(3),
            Atom::new(Element::Br),
        ],
        vec![
            (0, 1, Bond::default()),
            (1, 2, Bond::default()),
            (0, 3, Bond::default()),
            (0, 4, Bond::default()),
            (0, 5, Bond::default()),
        ],
        None,
    )
    .unwrap()
}

#[test]
fn halogenated_stereocenter_matches_reference() {
    // template: C(Br)(Cl)(CH3)(CH2CH3), tag read in that neighbor order
    let mut b = QueryMol::builder();
    let c = b.add_atom(QueryAtom::element(Element::C).with_chirality(Chirality::Cw));
    let br = b.add_atom(QueryAtom::element(Element::Br));
    let cl = b.add_atom(QueryAtom::element(Element::Cl));
    let me = b.add_atom(QueryAtom::element(Element::C));
    let et = b.add_atom(QueryAtom::element(Element::C));
    let et2 = b.add_atom(QueryAtom::element(Element::C));
    b.add_bond(c, br, QueryBond::default());
    b.add_bond(c, cl, QueryBond::default());
    b.add_bond(c, me, QueryBond::default());
    b.add_bond(c, et, QueryBond::default());
    b.add_bond(et, et2, QueryBond::default());
    let query = b.build().unwrap();

    let target = bromochlorobutane();
    let result = assign_chirality_from_template(&target, &query, &StereoConfig::default()).unwrap();
    let center = NodeIndex::new(0);

    assert_eq!(result.mol().atom(center).chirality, Chirality::Cw);
    assert_eq!(
        result.mol().neighbors(center).collect::<Vec<_>>(),
        vec![
            NodeIndex::new(5),
            NodeIndex::new(3),
            NodeIndex::new(4),
            NodeIndex::new(1)
        ]
    );

    // the same molecule written by hand in ethyl, Cl, methyl, Br order;
    // swapping first and last neighbors flips the tag
    let reference = bromochlorobutane()
        .with_atom(center, Atom::new(Element::C).with_chirality(Chirality::Ccw))
        .unwrap();
    assert_eq!(descriptor(&reference, center), Some(Descriptor::S));
    assert_eq!(result.descriptor(center), descriptor(&reference, center));
}

#[test]
fn carbon_first_template_matches_reference() {
    // template: C(CH3)(Br)(Cl)(CH2CH3), tag read from the methyl carbon
    let mut b = QueryMol::builder();
    let c = b.add_atom(QueryAtom::element(Element::C).with_chirality(Chirality::Ccw));
    let me = b.add_atom(QueryAtom::element(Element::C));
    let br = b.add_atom(QueryAtom::element(Element::Br));
    let cl = b.add_atom(QueryAtom::element(Element::Cl));
    let et = b.add_atom(QueryAtom::element(Element::C));
    let et2 = b.add_atom(QueryAtom::element(Element::C));
    b.add_bond(c, me, QueryBond::default());
    b.add_bond(c, br, QueryBond::default());
    b.add_bond(c, cl, QueryBond::default());
    b.add_bond(c, et, QueryBond::default());
    b.add_bond(et, et2, QueryBond::default());
    let query = b.build().unwrap();

    let result = assign_chirality_from_template(
        &bromochlorobutane(),
        &query,
        &StereoConfig::default(),
    )
    .unwrap();
    let center = NodeIndex::new(0);

    // the first C candidate is the ethyl CH2; only the methyl lets et2 map
    assert_eq!(result.mapping().and_then(|m| m.target(me)), Some(NodeIndex::new(4)));
    assert_eq!(result.mol().atom(center).chirality, Chirality::Ccw);
    assert_eq!(
        result.mol().neighbors(center).collect::<Vec<_>>(),
        [4, 5, 3, 1].map(NodeIndex::new).to_vec()
    );

    // methyl, Br, Cl, ethyl to ethyl, Cl, methyl, Br has five inversions
    let reference = bromochlorobutane()
        .with_atom(center, Atom::new(Element::C).with_chirality(Chirality::Cw))
        .unwrap();
    assert_eq!(descriptor(&reference, center), Some(Descriptor::R));
    assert_eq!(result.descriptor(center), descriptor(&reference, center));
}

#[test]
fn repeated_substituent_is_not_a_stereocenter() {
    // CHF2Cl: the template is well formed, the two fluorines are not
    // distinguishable once the tag lands on the target
    let target = Mol::from_parts(
        vec![
            Atom::new(Element::C).with_hydrogens(1),
            Atom::new(Element::F),
            Atom::new(Element::F),
            Atom::new(Element::Cl),
        ],
        vec![
            (0, 1, Bond::default()),
            (0, 2, Bond::default()),
            (0, 3, Bond::default()),
        ],
        None,
    )
    .unwrap();

    let mut b = QueryMol::builder();
    let c = b.add_atom(QueryAtom::element(Element::C).with_chirality(Chirality::Cw));
    for e in [Element::F, Element::F, Element::Cl] {
        let nb = b.add_atom(QueryAtom::element(e));
        b.add_bond(c, nb, QueryBond::default());
    }
    let query = b.build().unwrap();

    assert_eq!(
        assign_chirality_from_template(&target, &query, &StereoConfig::default()),
        Err(StereoError::PostTransferInconsistency {
            atom: 0,
            reason: Inconsistency::StereoNeighborsIdentical,
        })
    );
    assert_eq!(target.atom(NodeIndex::new(0)).chirality, Chirality::None);
}

#[test]
fn ring_template_does_not_match_chain() {
    // template: fluorocyclopentane with the fluorinated carbon tagged
    let mut atoms = vec![QueryAtom::element(Element::C); 5];
    atoms[0] = QueryAtom::element(Element::C).with_chirality(Chirality::Cw);
    atoms.push(QueryAtom::element(Element::F));
    let mut bonds: Vec<_> = (0..5).map(|i| (i, (i + 1) % 5, QueryBond::default())).collect();
    bonds.push((0, 5, QueryBond::default()));
    let query = QueryMol::from_parts(atoms, bonds, None).unwrap();

    // 2-fluoroheptane: plenty of carbons and bonds, no ring
    let mut atoms = vec![Atom::new(Element::C).with_hydrogens(2); 7];
    atoms[0].hydrogen_count = 3;
    atoms[1].hydrogen_count = 1;
    atoms[6].hydrogen_count = 3;
    atoms.push(Atom::new(Element::F));
    let mut bonds: Vec<_> = (0..6).map(|i| (i, i + 1, Bond::default())).collect();
    bonds.push((1, 7, Bond::default()));
    let target = Mol::from_parts(atoms, bonds, None).unwrap();
    let before = target.clone();

    assert_eq!(
        assign_chirality_from_template(&target, &query, &StereoConfig::default()),
        Err(StereoError::MatchNotFound)
    );
    assert_eq!(target, before);
}

#[test]
fn wildcard_next_to_stereocenter() {
    // target: Cl0, C1(H) center, F2, O3(H); center order Cl, O, F
    let target = Mol::from_parts(
        vec![
            Atom::new(Element::Cl),
            Atom::new(Element::C).with_hydrogens(1),
            Atom::new(Element::F),
            Atom::new(Element::O).with_hydrogens(1),
        ],
        vec![
            (1, 0, Bond::default()),
            (1, 3, Bond::default()),
            (1, 2, Bond::default()),
        ],
        None,
    )
    .unwrap();

    // template: C(*)(F)(Cl), tagged Ccw
    let mut b = QueryMol::builder();
    let c = b.add_atom(QueryAtom::element(Element::C).with_chirality(Chirality::Ccw));
    let any = b.add_atom(QueryAtom::any());
    let f = b.add_atom(QueryAtom::element(Element::F));
    let cl = b.add_atom(QueryAtom::element(Element::Cl));
    b.add_bond(c, any, QueryBond::default());
    b.add_bond(c, f, QueryBond::default());
    b.add_bond(c, cl, QueryBond::default());
    let query = b.build().unwrap();

    let result = assign_chirality_from_template(&target, &query, &StereoConfig::default()).unwrap();
    let center = NodeIndex::new(1);
    let mapping = result.mapping().unwrap();
    assert_eq!(mapping.target(any), Some(NodeIndex::new(3)));
    assert_eq!(
        result.mol().neighbors(center).collect::<Vec<_>>(),
        vec![NodeIndex::new(3), NodeIndex::new(2), NodeIndex::new(0)]
    );
    assert_eq!(result.mol().atom(center).chirality, Chirality::Ccw);
    // O, F, Cl, H against priority Cl, F, O, H is one swap
    assert_eq!(result.descriptor(center), Some(Descriptor::R));
}

#[test]
fn bond_order_constraint_is_honored() {
    // template asks for C=O next to the center; target only has C-O
    let mut b = QueryMol::builder();
    let c = b.add_atom(QueryAtom::element(Element::C).with_chirality(Chirality::Cw));
    let c2 = b.add_atom(QueryAtom::element(Element::C));
    let o = b.add_atom(QueryAtom::element(Element::O));
    let f = b.add_atom(QueryAtom::element(Element::F));
    let cl = b.add_atom(QueryAtom::element(Element::Cl));
    b.add_bond(c, c2, QueryBond::default());
    b.add_bond(c2, o, QueryBond::new(BondOrder::Double));
    b.add_bond(c, f, QueryBond::default());
    b.add_bond(c, cl, QueryBond::default());
    let query = b.build().unwrap();

    let target = Mol::from_parts(
        vec![
            Atom::new(Element::C).with_hydrogens(1),
            Atom::new(Element::C).with_hydrogens(2),
            Atom::new(Element::O).with_hydrogens(1),
            Atom::new(Element::F),
            Atom::new(Element::Cl),
        ],
        vec![
            (0, 1, Bond::default()),
            (1, 2, Bond::default()),
            (0, 3, Bond::default()),
            (0, 4, Bond::default()),
        ],
        None,
    )
    .unwrap();

    let err = assign_chirality_from_template(&target, &query, &StereoConfig::default()).unwrap_err();
    assert!(matches!(err, StereoError::IncompatibleQuery(_)));
}
