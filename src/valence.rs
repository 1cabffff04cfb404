use petgraph::graph::NodeIndex;

use crate::element::Element;
use crate::mol::Mol;
use crate::traits::{HasBondOrder, HasElement, HasFormalCharge, HasHydrogenCount};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValenceError {
    pub atom_idx: NodeIndex,
    pub element: Element,
    /// Lowest and highest valence the bonding allows.
    pub actual_valence: (u8, u8),
    pub allowed_valences: Vec<u8>,
}

impl std::fmt::Display for ValenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (lo, hi) = self.actual_valence;
        write!(f, "atom {} ({}): valence ", self.atom_idx.index(), self.element)?;
        if lo == hi {
            write!(f, "{lo}")?;
        } else {
            write!(f, "{lo}..={hi}")?;
        }
        write!(f, " not in {:?}", self.allowed_valences)
    }
}

impl std::error::Error for ValenceError {}

/// Bond-order sum plus implicit hydrogens, as a `(min, max)` range.
///
/// Aromatic bonds are undecided between single and double, but an atom takes
/// part in at most one double bond of its aromatic system, so the range is
/// never wider than one.
pub fn total_valence<A, B>(mol: &Mol<A, B>, atom: NodeIndex) -> (u8, u8)
where
    A: HasHydrogenCount,
    B: HasBondOrder,
{
    let mut low = mol.atom(atom).hydrogen_count();
    let mut aromatic = false;
    for &e in mol.adjacency(atom) {
        let (lo, hi) = mol.bond(e).bond_order().map_or((1, 1), |o| o.valence_range());
        low = low.saturating_add(lo);
        aromatic |= hi > lo;
    }
    (low, low.saturating_add(aromatic as u8))
}

/// Neutral atoms of valence-checked elements whose bonding reaches none of
/// the element's default valences. Charged atoms and metals are skipped.
pub fn check_valence<A, B>(mol: &Mol<A, B>) -> Result<(), Vec<ValenceError>>
where
    A: HasElement + HasFormalCharge + HasHydrogenCount,
    B: HasBondOrder,
{
    let errors: Vec<ValenceError> = mol
        .atoms()
        .filter_map(|idx| {
            let atom = mol.atom(idx);
            if atom.formal_charge() != 0 {
                return None;
            }
            let element = atom.element()?;
            let allowed = element.default_valences();
            if allowed.is_empty() {
                return None;
            }
            let (lo, hi) = total_valence(mol, idx);
            if allowed.iter().any(|v| (lo..=hi).contains(v)) {
                return None;
            }
            Some(ValenceError {
                atom_idx: idx,
                element,
                actual_valence: (lo, hi),
                allowed_valences: allowed.to_vec(),
            })
        })
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
