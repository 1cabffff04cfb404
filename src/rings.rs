use petgraph::algo::connected_components;
use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::mol::Mol;

/// Ring membership of every bond and atom.
///
/// A bond is a ring bond exactly when it is not a bridge; found with one
/// iterative depth-first pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RingInfo {
    ring_bonds: Vec<bool>,
    ring_atoms: Vec<bool>,
    num_rings: usize,
}

impl RingInfo {
    pub fn new<A, B>(mol: &Mol<A, B>) -> Self {
        let n = mol.atom_count();
        let mut disc = vec![usize::MAX; n];
        let mut low = vec![0usize; n];
        let mut ring_bonds = vec![true; mol.bond_count()];
        let mut timer = 0usize;

        for root in mol.atoms() {
            if disc[root.index()] != usize::MAX {
                continue;
            }
            disc[root.index()] = timer;
            low[root.index()] = timer;
            timer += 1;
            // (atom, bond we arrived by, next adjacency slot)
            let mut stack: Vec<(NodeIndex, Option<EdgeIndex>, usize)> = vec![(root, None, 0)];

            while let Some(&(v, via, slot)) = stack.last() {
                if let Some(&e) = mol.adjacency(v).get(slot) {
                    if let Some(top) = stack.last_mut() {
                        top.2 += 1;
                    }
                    if Some(e) == via {
                        continue;
                    }
                    let w = mol.other_end(e, v);
                    if disc[w.index()] == usize::MAX {
                        disc[w.index()] = timer;
                        low[w.index()] = timer;
                        timer += 1;
                        stack.push((w, Some(e), 0));
                    } else {
                        low[v.index()] = low[v.index()].min(disc[w.index()]);
                    }
                } else {
                    stack.pop();
                    if let Some(e) = via {
                        let parent = mol.other_end(e, v);
                        low[parent.index()] = low[parent.index()].min(low[v.index()]);
                        if low[v.index()] > disc[parent.index()] {
                            ring_bonds[e.index()] = false;
                        }
                    }
                }
            }
        }

        let mut ring_atoms = vec![false; n];
        for e in mol.bonds() {
            if ring_bonds[e.index()]
                && let Some((a, b)) = mol.bond_endpoints(e)
            {
                ring_atoms[a.index()] = true;
                ring_atoms[b.index()] = true;
            }
        }

        Self {
            ring_bonds,
            ring_atoms,
            num_rings: Self::expected_ring_count(mol),
        }
    }

    pub fn is_ring_bond(&self, bond: EdgeIndex) -> bool {
        self.ring_bonds.get(bond.index()).copied().unwrap_or(false)
    }

    pub fn is_ring_atom(&self, atom: NodeIndex) -> bool {
        self.ring_atoms.get(atom.index()).copied().unwrap_or(false)
    }

    /// Size of the cycle basis.
    pub fn num_rings(&self) -> usize {
        self.num_rings
    }

    pub fn expected_ring_count<A, B>(mol: &Mol<A, B>) -> usize {
        let v = mol.atom_count();
        let e = mol.bond_count();
        let c = connected_components(mol.graph());
        (e + c).saturating_sub(v)
    }
}
