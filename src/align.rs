//! Neighbor-order alignment of a target against a matched query.
//!
//! A chirality tag only means something relative to its atom's adjacency
//! order. Before a query tag can be copied verbatim, every mapped target atom
//! must list its matched bonds in the same order the query atom does.

use petgraph::graph::{EdgeIndex, NodeIndex};
use tracing::{debug, instrument};

use crate::atom::Chirality;
use crate::chirality::reframe;
use crate::mol::Mol;
use crate::substruct::AtomMapping;
use crate::traits::HasChiralityMut;

/// Reorders the adjacency of every mapped target atom to mirror its query
/// atom.
///
/// Bonds whose far end is mapped and whose query counterpart exists come
/// first, in the query atom's adjacency order. All other incident bonds
/// follow in their previous relative order. Unmapped atoms keep their
/// adjacency. A reordered atom that already carries a tag has it re-expressed
/// against the new order, so its handedness is unchanged. Returns a new
/// generation.
#[instrument(skip_all)]
pub fn reorder<A, B, QA, QB>(
    target: &Mol<A, B>,
    mapping: &AtomMapping,
    query: &Mol<QA, QB>,
) -> Mol<A, B>
where
    A: Clone + HasChiralityMut,
    B: Clone,
{
    let mut orders = Vec::new();
    let mut retagged: Vec<(NodeIndex, Chirality)> = Vec::new();
    for (q, t) in mapping.iter() {
        let matched: Vec<EdgeIndex> = query
            .adjacency(q)
            .iter()
            .filter_map(|&q_bond| {
                let q_neighbor = query.other_end(q_bond, q);
                let t_neighbor = mapping.target(q_neighbor)?;
                target.bond_between(t, t_neighbor)
            })
            .collect();

        let current = target.adjacency(t);
        let unmatched: Vec<EdgeIndex> = current
            .iter()
            .filter(|b| !matched.contains(b))
            .copied()
            .collect();
        let mut order = matched;
        order.extend(unmatched);

        if order.as_slice() != current {
            let tag = target.atom(t).chirality();
            if tag.is_defined()
                && let Some(reframed) = reframe(tag, current, &order)
                && reframed != tag
            {
                retagged.push((t, reframed));
            }
            orders.push((t, order));
        }
    }
    debug!(
        reordered = orders.len(),
        retagged = retagged.len(),
        mapped = mapping.len(),
        "aligned adjacency"
    );

    let next = target.with_permuted_adjacency(orders);
    if retagged.is_empty() {
        return next;
    }
    next.map_atoms(|idx, atom| {
        let mut atom = atom.clone();
        if let Some(&(_, tag)) = retagged.iter().find(|(t, _)| *t == idx) {
            atom.set_chirality(tag);
        }
        atom
    })
}
