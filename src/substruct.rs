use std::collections::HashMap;

use petgraph::graph::NodeIndex;
use tracing::trace;

use crate::error::{Incompatibility, StereoError};
use crate::mol::Mol;
use crate::traits::{HasBondOrder, HasElement};

/// Injective, structure-preserving map from query atoms to target atoms.
///
/// Covers every query atom; indexed by query atom identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomMapping {
    targets: Vec<NodeIndex>,
    queries: HashMap<NodeIndex, NodeIndex>,
}

impl AtomMapping {
    fn new(targets: Vec<NodeIndex>) -> Self {
        let queries = targets
            .iter()
            .enumerate()
            .map(|(q, &t)| (t, NodeIndex::new(q)))
            .collect();
        Self { targets, queries }
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Target image of a query atom.
    pub fn target(&self, query: NodeIndex) -> Option<NodeIndex> {
        self.targets.get(query.index()).copied()
    }

    /// Query atom whose image is `target`, if any.
    pub fn query(&self, target: NodeIndex) -> Option<NodeIndex> {
        self.queries.get(&target).copied()
    }

    /// `(query, target)` pairs in query declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, NodeIndex)> + '_ {
        self.targets
            .iter()
            .enumerate()
            .map(|(q, &t)| (NodeIndex::new(q), t))
    }
}

/// Rejects queries that cannot embed in `target` under any mapping.
///
/// Counts only: atoms, bonds, atoms per required element and bonds per
/// required order. Passing this screen does not imply a match exists.
pub fn check_compatible<A, B, QA, QB>(
    target: &Mol<A, B>,
    query: &Mol<QA, QB>,
) -> Result<(), StereoError>
where
    A: HasElement,
    B: HasBondOrder,
    QA: HasElement,
    QB: HasBondOrder,
{
    if query.atom_count() > target.atom_count() {
        return Err(StereoError::IncompatibleQuery(Incompatibility::TooManyAtoms {
            query: query.atom_count(),
            target: target.atom_count(),
        }));
    }
    if query.bond_count() > target.bond_count() {
        return Err(StereoError::IncompatibleQuery(Incompatibility::TooManyBonds {
            query: query.bond_count(),
            target: target.bond_count(),
        }));
    }

    let mut required = HashMap::new();
    for idx in query.atoms() {
        if let Some(e) = query.atom(idx).element() {
            *required.entry(e).or_insert(0usize) += 1;
        }
    }
    let mut elements: Vec<_> = required.into_iter().collect();
    elements.sort();
    for (element, required) in elements {
        let available = target
            .atoms()
            .filter(|&idx| target.atom(idx).element() == Some(element))
            .count();
        if available < required {
            return Err(StereoError::IncompatibleQuery(
                Incompatibility::ElementShortfall {
                    element,
                    required,
                    available,
                },
            ));
        }
    }

    let mut required_orders = Vec::new();
    for idx in query.bonds() {
        if let Some(order) = query.bond(idx).bond_order() {
            match required_orders.iter_mut().find(|(o, _)| *o == order) {
                Some((_, n)) => *n += 1,
                None => required_orders.push((order, 1usize)),
            }
        }
    }
    for (order, required) in required_orders {
        let available = target
            .bonds()
            .filter(|&idx| target.bond(idx).bond_order() == Some(order))
            .count();
        if available < required {
            return Err(StereoError::IncompatibleQuery(
                Incompatibility::BondOrderShortfall {
                    order,
                    required,
                    available,
                },
            ));
        }
    }

    Ok(())
}

/// First embedding of `query` in `target`, or `None`.
///
/// Unbounded; see [`find_match_bounded`] to cap the search.
pub fn find_match<A, B, QA, QB>(target: &Mol<A, B>, query: &Mol<QA, QB>) -> Option<AtomMapping>
where
    A: HasElement,
    B: HasBondOrder,
    QA: HasElement,
    QB: HasBondOrder,
{
    Matcher::new(target, query).search(None).unwrap_or(None)
}

/// Like [`find_match`], but gives up with
/// [`StereoError::SearchLimitExceeded`] after `max_steps` candidate trials.
pub fn find_match_bounded<A, B, QA, QB>(
    target: &Mol<A, B>,
    query: &Mol<QA, QB>,
    max_steps: Option<usize>,
) -> Result<Option<AtomMapping>, StereoError>
where
    A: HasElement,
    B: HasBondOrder,
    QA: HasElement,
    QB: HasBondOrder,
{
    Matcher::new(target, query).search(max_steps)
}

struct Frame {
    candidates: Vec<NodeIndex>,
    next: usize,
}

/// Backtracking search over query atoms in declaration order.
///
/// Query atom `i` is placed at depth `i`. Candidates are tried in ascending
/// target index, so for a given query the result depends only on target
/// identifiers and connectivity, never on target adjacency order. When the
/// query is symmetric within the target, the first mapping reached under
/// this order wins.
struct Matcher<'a, A, B, QA, QB> {
    target: &'a Mol<A, B>,
    query: &'a Mol<QA, QB>,
    query_map: Vec<Option<NodeIndex>>,
    target_used: Vec<bool>,
}

impl<'a, A, B, QA, QB> Matcher<'a, A, B, QA, QB>
where
    A: HasElement,
    B: HasBondOrder,
    QA: HasElement,
    QB: HasBondOrder,
{
    fn new(target: &'a Mol<A, B>, query: &'a Mol<QA, QB>) -> Self {
        Self {
            target,
            query,
            query_map: vec![None; query.atom_count()],
            target_used: vec![false; target.atom_count()],
        }
    }

    fn search(&mut self, max_steps: Option<usize>) -> Result<Option<AtomMapping>, StereoError> {
        let n = self.query.atom_count();
        if n == 0 {
            return Ok(Some(AtomMapping::new(Vec::new())));
        }

        let mut steps = 0usize;
        let mut stack = vec![Frame {
            candidates: self.candidates(NodeIndex::new(0)),
            next: 0,
        }];

        while !stack.is_empty() {
            let depth = stack.len() - 1;
            if let Some(prev) = self.query_map[depth].take() {
                self.target_used[prev.index()] = false;
            }

            let frame = &mut stack[depth];
            let Some(&target_node) = frame.candidates.get(frame.next) else {
                trace!(depth, "backtrack");
                stack.pop();
                continue;
            };
            frame.next += 1;

            steps += 1;
            if max_steps.is_some_and(|limit| steps > limit) {
                return Err(StereoError::SearchLimitExceeded { steps: steps - 1 });
            }

            let query_node = NodeIndex::new(depth);
            if !self.is_feasible(query_node, target_node) {
                continue;
            }

            self.query_map[depth] = Some(target_node);
            self.target_used[target_node.index()] = true;

            if depth + 1 == n {
                trace!(steps, "match complete");
                let targets = self.query_map.iter().flatten().copied().collect();
                return Ok(Some(AtomMapping::new(targets)));
            }

            stack.push(Frame {
                candidates: self.candidates(NodeIndex::new(depth + 1)),
                next: 0,
            });
        }

        trace!(steps, "search exhausted");
        Ok(None)
    }

    /// Target atoms worth trying for `query_node`: the neighbors of an
    /// already-placed query neighbor's image, else every target atom.
    fn candidates(&self, query_node: NodeIndex) -> Vec<NodeIndex> {
        let anchor = self
            .query
            .neighbors(query_node)
            .filter(|nb| nb.index() < query_node.index())
            .find_map(|nb| self.query_map[nb.index()]);
        match anchor {
            Some(image) => {
                let mut nbs: Vec<NodeIndex> = self.target.neighbors(image).collect();
                nbs.sort_unstable();
                nbs
            }
            None => self.target.atoms().collect(),
        }
    }

    fn is_feasible(&self, query_node: NodeIndex, target_node: NodeIndex) -> bool {
        if self.target_used[target_node.index()] {
            return false;
        }
        if self.target.degree(target_node) < self.query.degree(query_node) {
            return false;
        }
        if let Some(required) = self.query.atom(query_node).element()
            && self.target.atom(target_node).element() != Some(required)
        {
            return false;
        }

        for &q_bond in self.query.adjacency(query_node) {
            let q_neighbor = self.query.other_end(q_bond, query_node);
            let Some(t_mapped) = self.query_map[q_neighbor.index()] else {
                continue;
            };
            let Some(t_bond) = self.target.bond_between(target_node, t_mapped) else {
                return false;
            };
            if let Some(required) = self.query.bond(q_bond).bond_order()
                && self.target.bond(t_bond).bond_order() != Some(required)
            {
                return false;
            }
        }

        true
    }
}
