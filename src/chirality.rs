use petgraph::graph::NodeIndex;

use crate::atom::Chirality;
use crate::bond::BondOrder;
use crate::cip::{Substituent, priority_key, substituents};
use crate::error::Inconsistency;
use crate::mol::Mol;
use crate::traits::{HasAtomicNum, HasBondOrder, HasChirality, HasElement, HasHydrogenCount};

/// Whether `to` is an even permutation of `from`. `None` when the two are
/// not permutations of each other.
pub fn permutation_parity<T: Eq>(from: &[T], to: &[T]) -> Option<bool> {
    let n = from.len();
    if n != to.len() {
        return None;
    }
    let mut perm = Vec::with_capacity(n);
    for f in from {
        let pos = to.iter().position(|t| t == f)?;
        if perm.contains(&pos) {
            return None;
        }
        perm.push(pos);
    }
    let mut visited = vec![false; n];
    let mut swaps = 0usize;
    for i in 0..n {
        if visited[i] {
            continue;
        }
        let mut cycle_len = 0;
        let mut j = i;
        while !visited[j] {
            visited[j] = true;
            j = perm[j];
            cycle_len += 1;
        }
        swaps += cycle_len - 1;
    }
    Some(swaps % 2 == 0)
}

/// Re-expresses `tag`, read against neighbor order `from`, against `to`.
///
/// The spatial arrangement is unchanged; only the frame moves. An odd
/// permutation flips the tag.
pub fn reframe<T: Eq>(tag: Chirality, from: &[T], to: &[T]) -> Option<Chirality> {
    match permutation_parity(from, to)? {
        true => Some(tag),
        false => Some(tag.inverted()),
    }
}

/// Checks that a tagged atom can actually hold a stereocenter.
///
/// Needs 4 neighbors counting implicit hydrogens, or 3 explicit neighbors
/// on an element with a lone pair; at most one implicit hydrogen; and no two
/// substituents that tie on priority ranking over the same bond order.
/// Returns `None` for untagged or well-formed atoms.
pub fn stereo_problem<A, B>(mol: &Mol<A, B>, idx: NodeIndex) -> Option<Inconsistency>
where
    A: HasChirality + HasHydrogenCount + HasAtomicNum + HasElement,
    B: HasBondOrder,
{
    let atom = mol.atom(idx);
    if !atom.chirality().is_defined() {
        return None;
    }

    let count = mol.degree(idx) + atom.hydrogen_count() as usize;
    let lone_pair_center = count == 3 && atom.hydrogen_count() == 0 && has_lone_pair(atom);
    if count != 4 && !lone_pair_center {
        return Some(Inconsistency::StereoNeighborCount { count });
    }
    if atom.hydrogen_count() > 1 || has_equivalent_substituents(mol, idx) {
        return Some(Inconsistency::StereoNeighborsIdentical);
    }
    None
}

/// Atoms of `mol` whose tag would not survive [`stereo_problem`].
pub fn invalid_stereocenters<A, B>(mol: &Mol<A, B>) -> Vec<(NodeIndex, Inconsistency)>
where
    A: HasChirality + HasHydrogenCount + HasAtomicNum + HasElement,
    B: HasBondOrder,
{
    mol.atoms()
        .filter_map(|idx| stereo_problem(mol, idx).map(|p| (idx, p)))
        .collect()
}

/// Whether a three-coordinate atom of this kind keeps a lone pair in the
/// fourth position.
pub fn has_lone_pair<A: HasElement>(atom: &A) -> bool {
    atom.element().is_some_and(|e| e.has_lone_pair_stereo())
}

/// Whether two substituents of `idx` tie on priority key and on the order of
/// the bond that reaches them.
fn has_equivalent_substituents<A, B>(mol: &Mol<A, B>, idx: NodeIndex) -> bool
where
    A: HasHydrogenCount + HasAtomicNum,
    B: HasBondOrder,
{
    let Some(subs) = substituents(mol, idx) else {
        return false;
    };
    let keys: Vec<(Vec<Vec<u8>>, Option<BondOrder>)> = subs
        .iter()
        .map(|&sub| {
            let order = match sub {
                Substituent::Atom(nb) => mol
                    .bond_between(idx, nb)
                    .and_then(|e| mol.bond(e).bond_order()),
                Substituent::ImplicitHydrogen => Some(BondOrder::Single),
                Substituent::LonePair => None,
            };
            (priority_key(mol, idx, sub), order)
        })
        .collect();
    keys.iter()
        .enumerate()
        .any(|(i, k)| keys[i + 1..].contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atom::Atom;
    use crate::bond::Bond;
    use crate::element::Element;

    fn center(chirality: Chirality, hydrogens: u8, neighbors: &[Element]) -> Mol<Atom, Bond> {
        let mut b = Mol::builder();
        let c = b.add_atom(
            Atom::new(Element::C)
                .with_hydrogens(hydrogens)
                .with_chirality(chirality),
        );
        for &e in neighbors {
            let nb = b.add_atom(Atom::new(e));
            b.add_bond(c, nb, Bond::default());
        }
        b.build().unwrap()
    }

    #[test]
    fn parity_of_swaps() {
        assert_eq!(permutation_parity(&[1, 2, 3, 4], &[1, 2, 3, 4]), Some(true));
        assert_eq!(permutation_parity(&[1, 2, 3, 4], &[2, 1, 3, 4]), Some(false));
        assert_eq!(permutation_parity(&[1, 2, 3, 4], &[2, 3, 1, 4]), Some(true));
        assert_eq!(permutation_parity(&[1, 2, 3], &[1, 2]), None);
        assert_eq!(permutation_parity(&[1, 2, 3], &[1, 2, 5]), None);
        assert_eq!(permutation_parity(&[1, 1, 2], &[1, 2, 2]), None);
    }

    #[test]
    fn reframe_flips_on_odd_permutation() {
        assert_eq!(reframe(Chirality::Cw, &['a', 'b', 'c'], &['b', 'a', 'c']), Some(Chirality::Ccw));
        assert_eq!(reframe(Chirality::Cw, &['a', 'b', 'c'], &['b', 'c', 'a']), Some(Chirality::Cw));
        assert_eq!(reframe(Chirality::None, &['a', 'b'], &['b', 'a']), Some(Chirality::None));
    }

    #[test]
    fn distinct_neighbors_are_well_formed() {
        let mol = center(Chirality::Cw, 1, &[Element::F, Element::Cl, Element::Br]);
        assert_eq!(stereo_problem(&mol, NodeIndex::new(0)), None);
        assert!(invalid_stereocenters(&mol).is_empty());
    }

    #[test]
    fn untagged_atom_is_never_a_problem() {
        let mol = center(Chirality::None, 2, &[Element::F]);
        assert_eq!(stereo_problem(&mol, NodeIndex::new(0)), None);
    }

    #[test]
    fn too_few_neighbors() {
        let mol = center(Chirality::Cw, 0, &[Element::F, Element::Cl]);
        assert_eq!(
            stereo_problem(&mol, NodeIndex::new(0)),
            Some(Inconsistency::StereoNeighborCount { count: 2 })
        );
    }

    #[test]
    fn two_hydrogens_are_not_distinguishable() {
        let mol = center(Chirality::Ccw, 2, &[Element::F, Element::Cl]);
        assert_eq!(
            stereo_problem(&mol, NodeIndex::new(0)),
            Some(Inconsistency::StereoNeighborsIdentical)
        );
    }

    #[test]
    fn identical_neighbors() {
        let mol = center(Chirality::Cw, 0, &[Element::F; 4]);
        assert_eq!(
            stereo_problem(&mol, NodeIndex::new(0)),
            Some(Inconsistency::StereoNeighborsIdentical)
        );
        assert_eq!(invalid_stereocenters(&mol).len(), 1);
    }

    #[test]
    fn two_equal_neighbors_are_rejected() {
        let mol = center(Chirality::Cw, 1, &[Element::F, Element::F, Element::Cl]);
        assert_eq!(
            stereo_problem(&mol, NodeIndex::new(0)),
            Some(Inconsistency::StereoNeighborsIdentical)
        );
    }

    #[test]
    fn equal_ring_branches_are_rejected() {
        // 1-chloro-1-fluorocyclohexane: both ring directions look the same
        let mut atoms = vec![Atom::new(Element::C).with_hydrogens(2); 6];
        atoms[0] = Atom::new(Element::C).with_chirality(Chirality::Ccw);
        atoms.push(Atom::new(Element::F));
        atoms.push(Atom::new(Element::Cl));
        let mut bonds: Vec<_> = (0..6).map(|i| (i, (i + 1) % 6, Bond::default())).collect();
        bonds.push((0, 6, Bond::default()));
        bonds.push((0, 7, Bond::default()));
        let mol = Mol::from_parts(atoms, bonds, None).unwrap();
        assert_eq!(
            stereo_problem(&mol, NodeIndex::new(0)),
            Some(Inconsistency::StereoNeighborsIdentical)
        );
    }

    #[test]
    fn branches_differing_deeper_are_distinct() {
        // C(H)(F)(CH2CH3)(CH2CH2Cl): the ethyl arms differ two bonds out
        let mut b = Mol::builder();
        let c = b.add_atom(
            Atom::new(Element::C)
                .with_hydrogens(1)
                .with_chirality(Chirality::Cw),
        );
        let f = b.add_atom(Atom::new(Element::F));
        let a1 = b.add_atom(Atom::new(Element::C).with_hydrogens(2));
        let a2 = b.add_atom(Atom::new(Element::C).with_hydrogens(3));
        let b1 = b.add_atom(Atom::new(Element::C).with_hydrogens(2));
        let b2 = b.add_atom(Atom::new(Element::C).with_hydrogens(2));
        let cl = b.add_atom(Atom::new(Element::Cl));
        b.add_bond(c, f, Bond::default());
        b.add_bond(c, a1, Bond::default());
        b.add_bond(a1, a2, Bond::default());
        b.add_bond(c, b1, Bond::default());
        b.add_bond(b1, b2, Bond::default());
        b.add_bond(b2, cl, Bond::default());
        let mol = b.build().unwrap();
        assert_eq!(stereo_problem(&mol, c), None);
    }

    #[test]
    fn three_coordinate_needs_lone_pair() {
        let mut b = Mol::builder();
        let n = b.add_atom(Atom::new(Element::N).with_chirality(Chirality::Cw));
        let c = b.add_atom(Atom::new(Element::C).with_chirality(Chirality::Cw));
        b.add_bond(n, c, Bond::default());
        for (center, e) in [(n, Element::F), (n, Element::Cl), (c, Element::Br), (c, Element::I)] {
            let nb = b.add_atom(Atom::new(e));
            b.add_bond(center, nb, Bond::default());
        }
        // N: C, F, Cl plus lone pair; C: N, Br, I and nothing in the fourth slot
        let mol = b.build().unwrap();
        assert_eq!(stereo_problem(&mol, n), None);
        assert_eq!(
            stereo_problem(&mol, c),
            Some(Inconsistency::StereoNeighborCount { count: 3 })
        );
    }
}
