//! Substituent priority ranking and R/S descriptors.
//!
//! Ranking is by atomic number, then sphere by sphere outward from each
//! substituent. Every branch explores with its own visited set, so rings and
//! repeated substructure are walked at most once per branch. This is a
//! simplification of the full CIP rules: multiple bonds are not duplicated
//! and isotopes are ignored.

use std::cmp::Ordering;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::atom::Chirality;
use crate::chirality::permutation_parity;
use crate::mol::Mol;
use crate::traits::{HasAtomicNum, HasChirality, HasHydrogenCount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Descriptor {
    R,
    S,
}

impl std::fmt::Display for Descriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Descriptor::R => f.write_str("R"),
            Descriptor::S => f.write_str("S"),
        }
    }
}

/// One of the (up to) four positions around a stereocenter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Substituent {
    Atom(NodeIndex),
    ImplicitHydrogen,
    LonePair,
}

impl Substituent {
    /// Ordering used when priority keys tie: explicit atoms by ascending
    /// identifier, then implicit hydrogen, then lone pair.
    fn tie_rank(self) -> (u8, usize) {
        match self {
            Substituent::Atom(idx) => (0, idx.index()),
            Substituent::ImplicitHydrogen => (1, 0),
            Substituent::LonePair => (2, 0),
        }
    }
}

/// The substituents of `center` in adjacency order, with the implicit
/// hydrogen or lone pair last when the atom has three explicit neighbors.
///
/// `None` when the atom cannot be a tetrahedral center.
pub fn substituents<A, B>(mol: &Mol<A, B>, center: NodeIndex) -> Option<Vec<Substituent>>
where
    A: HasHydrogenCount,
{
    let mut subs: Vec<Substituent> = mol.neighbors(center).map(Substituent::Atom).collect();
    let atom = mol.atom(center);
    match (subs.len(), atom.hydrogen_count()) {
        (4, 0) => {}
        (3, 1) => subs.push(Substituent::ImplicitHydrogen),
        (3, 0) => subs.push(Substituent::LonePair),
        _ => return None,
    }
    Some(subs)
}

/// Substituents of `center`, highest priority first.
pub fn rank_substituents<A, B>(mol: &Mol<A, B>, center: NodeIndex) -> Option<Vec<Substituent>>
where
    A: HasHydrogenCount + HasAtomicNum,
{
    let subs = substituents(mol, center)?;
    let mut keyed: Vec<(Vec<Vec<u8>>, Substituent)> = subs
        .into_iter()
        .map(|s| (priority_key(mol, center, s), s))
        .collect();
    keyed.sort_by(|(ka, sa), (kb, sb)| match kb.cmp(ka) {
        Ordering::Equal => sa.tie_rank().cmp(&sb.tie_rank()),
        other => other,
    });
    Some(keyed.into_iter().map(|(_, s)| s).collect())
}

/// R/S label of a tagged center, or `None` if the atom is untagged or not
/// tetrahedral.
///
/// With substituents listed highest priority first, `Ccw` reads as S and
/// `Cw` as R. The stored tag is first re-expressed in that order.
pub fn descriptor<A, B>(mol: &Mol<A, B>, center: NodeIndex) -> Option<Descriptor>
where
    A: HasHydrogenCount + HasAtomicNum + HasChirality,
{
    let tag = mol.atom(center).chirality();
    if !tag.is_defined() {
        return None;
    }
    let frame = substituents(mol, center)?;
    let ranked = rank_substituents(mol, center)?;
    let tag = if permutation_parity(&frame, &ranked)? {
        tag
    } else {
        tag.inverted()
    };
    match tag {
        Chirality::Cw => Some(Descriptor::R),
        Chirality::Ccw => Some(Descriptor::S),
        Chirality::None => None,
    }
}

/// Atomic numbers sphere by sphere, each sphere sorted high to low.
pub(crate) fn priority_key<A, B>(mol: &Mol<A, B>, center: NodeIndex, sub: Substituent) -> Vec<Vec<u8>>
where
    A: HasHydrogenCount + HasAtomicNum,
{
    let start = match sub {
        Substituent::Atom(idx) => idx,
        Substituent::ImplicitHydrogen => return vec![vec![1]],
        Substituent::LonePair => return vec![vec![0]],
    };

    let mut visited = vec![false; mol.atom_count()];
    visited[center.index()] = true;
    visited[start.index()] = true;
    let mut spheres = vec![vec![mol.atom(start).atomic_num()]];
    let mut frontier = vec![start];

    while !frontier.is_empty() {
        let mut next = Vec::new();
        let mut sphere = Vec::new();
        for &atom in &frontier {
            for nb in mol.neighbors(atom) {
                if visited[nb.index()] {
                    continue;
                }
                visited[nb.index()] = true;
                sphere.push(mol.atom(nb).atomic_num());
                next.push(nb);
            }
            sphere.extend(std::iter::repeat_n(1, mol.atom(atom).hydrogen_count() as usize));
        }
        if sphere.is_empty() {
            break;
        }
        sphere.sort_unstable_by(|a, b| b.cmp(a));
        spheres.push(sphere);
        frontier = next;
    }
    spheres
}
