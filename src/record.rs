//! Plain serde records for graphs, so molecules and templates can be stored
//! in any serde format and turned into checked [`Mol`]s.

use serde::{Deserialize, Serialize};

use crate::atom::Atom;
use crate::bond::Bond;
use crate::mol::{GraphError, Mol};
use crate::query::{QueryAtom, QueryBond};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondRecord<B> {
    pub a: usize,
    pub b: usize,
    #[serde(flatten)]
    pub bond: B,
}

/// A graph as atoms, bonds and an optional per-atom neighbor order.
///
/// `adjacency[i]` lists positions in `bonds`. Without it every atom's order
/// follows the bond list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MolRecord<A = Atom, B = Bond> {
    pub atoms: Vec<A>,
    #[serde(default)]
    pub bonds: Vec<BondRecord<B>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjacency: Option<Vec<Vec<usize>>>,
}

pub type QueryMolRecord = MolRecord<QueryAtom, QueryBond>;

impl<A, B> TryFrom<MolRecord<A, B>> for Mol<A, B> {
    type Error = GraphError;

    fn try_from(record: MolRecord<A, B>) -> Result<Self, Self::Error> {
        let bonds = record
            .bonds
            .into_iter()
            .map(|r| (r.a, r.b, r.bond))
            .collect();
        Mol::from_parts(record.atoms, bonds, record.adjacency)
    }
}

impl<A: Clone, B: Clone> From<&Mol<A, B>> for MolRecord<A, B> {
    /// Always records the adjacency, so the chirality frame survives a round
    /// trip.
    fn from(mol: &Mol<A, B>) -> Self {
        let atoms = mol.atoms().map(|idx| mol.atom(idx).clone()).collect();
        let bonds = mol
            .bonds()
            .filter_map(|e| {
                let (a, b) = mol.bond_endpoints(e)?;
                Some(BondRecord {
                    a: a.index(),
                    b: b.index(),
                    bond: mol.bond(e).clone(),
                })
            })
            .collect();
        let adjacency = mol
            .atoms()
            .map(|idx| mol.adjacency(idx).iter().map(|e| e.index()).collect())
            .collect();
        Self {
            atoms,
            bonds,
            adjacency: Some(adjacency),
        }
    }
}

#[cfg(test)]
mod tests {
    use petgraph::graph::{EdgeIndex, NodeIndex};

    use super::*;
    use crate::atom::Chirality;
    use crate::bond::BondOrder;
    use crate::element::Element;
    use crate::query::{AtomPattern, BondPattern};

    #[test]
    fn parses_target_record() {
        let json = r#"{
            "atoms": [
                {"element": "C", "hydrogen_count": 2},
                {"element": "O"}
            ],
            "bonds": [{"a": 0, "b": 1, "order": "Double"}]
        }"#;
        let record: MolRecord = serde_json::from_str(json).unwrap();
        let mol = Mol::try_from(record).unwrap();
        assert_eq!(mol.atom_count(), 2);
        assert_eq!(mol.atom(NodeIndex::new(0)).hydrogen_count, 2);
        assert_eq!(mol.bond(EdgeIndex::new(0)).order, BondOrder::Double);
    }

    #[test]
    fn parses_query_record_with_adjacency() {
        let json = r#"{
            "atoms": [
                {"element": "C", "chirality": "Cw"},
                {"element": "*"},
                {"element": "F"},
                {"element": "Cl"}
            ],
            "bonds": [
                {"a": 0, "b": 1, "order": "~"},
                {"a": 0, "b": 2},
                {"a": 0, "b": 3}
            ],
            "adjacency": [[2, 0, 1], [0], [1], [2]]
        }"#;
        let record: QueryMolRecord = serde_json::from_str(json).unwrap();
        let query = Mol::try_from(record).unwrap();
        assert_eq!(query.atom(NodeIndex::new(0)).chirality, Chirality::Cw);
        assert_eq!(query.atom(NodeIndex::new(1)).element, AtomPattern::Any);
        assert_eq!(query.bond(EdgeIndex::new(0)).order, BondPattern::Any);
        assert_eq!(
            query.bond(EdgeIndex::new(1)).order,
            BondPattern::Order(BondOrder::Single)
        );
        assert_eq!(
            query.neighbors(NodeIndex::new(0)).collect::<Vec<_>>(),
            vec![NodeIndex::new(3), NodeIndex::new(1), NodeIndex::new(2)]
        );
    }

    #[test]
    fn malformed_record_rejected() {
        let record: MolRecord = serde_json::from_str(
            r#"{"atoms": [{"element": "C"}], "bonds": [{"a": 0, "b": 3}]}"#,
        )
        .unwrap();
        assert_eq!(
            Mol::try_from(record),
            Err(GraphError::DanglingBond { bond: 0, atom: 3 })
        );
    }

    #[test]
    fn record_keeps_adjacency_order() {
        let mut b = Mol::builder();
        let c = b.add_atom(Atom::new(Element::C).with_hydrogens(1));
        let f = b.add_atom(Atom::new(Element::F));
        let cl = b.add_atom(Atom::new(Element::Cl));
        let br = b.add_atom(Atom::new(Element::Br));
        let e0 = b.add_bond(c, f, Bond::default());
        let e1 = b.add_bond(c, cl, Bond::default());
        let e2 = b.add_bond(c, br, Bond::default());
        b.set_adjacency(c, vec![e2, e0, e1]);
        let mol = b.build().unwrap();

        let record = MolRecord::from(&mol);
        assert_eq!(record.adjacency.as_ref().map(|a| a[0].clone()), Some(vec![2, 0, 1]));
        let json = serde_json::to_string(&record).unwrap();
        let back: MolRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(Mol::try_from(back).unwrap(), mol);
    }
}
