use std::collections::HashSet;

use petgraph::graph::{EdgeIndex, NodeIndex, UnGraph};
use thiserror::Error;

/// Structural problems rejected when a graph is built or re-ordered.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("bond {bond} references atom {atom}, which does not exist")]
    DanglingBond { bond: usize, atom: usize },
    #[error("bond {bond} connects atom {atom} to itself")]
    SelfLoop { bond: usize, atom: usize },
    #[error("atoms {a} and {b} are joined by more than one bond")]
    ParallelBond { a: usize, b: usize },
    #[error("atom {atom} does not exist")]
    UnknownAtom { atom: usize },
    #[error("adjacency given for {got} atoms, graph has {expected}")]
    AdjacencyLength { expected: usize, got: usize },
    #[error("adjacency of atom {atom} lists bond {bond} more than once")]
    DuplicateAdjacencyEntry { atom: usize, bond: usize },
    #[error("adjacency of atom {atom} lists bond {bond}, which is not incident to it")]
    ForeignAdjacencyEntry { atom: usize, bond: usize },
    #[error("adjacency of atom {atom} omits incident bond {bond}")]
    MissingAdjacencyEntry { atom: usize, bond: usize },
}

/// A molecular graph with order-significant adjacency.
///
/// Every atom carries a sequence of its incident bonds. That sequence is the
/// reference frame a chirality tag is read against, so two graphs with the
/// same connectivity but different adjacency order are different values.
///
/// `Mol` is immutable once built: the `with_*` and `map_*` methods return a
/// new generation and leave `self` untouched. Atom and bond identifiers are
/// the same in every generation derived from one builder.
#[derive(Clone)]
pub struct Mol<A, B> {
    graph: UnGraph<A, B>,
    adjacency: Vec<Vec<EdgeIndex>>,
}

impl<A, B> Mol<A, B> {
    pub fn builder() -> MolBuilder<A, B> {
        MolBuilder::new()
    }

    /// Builds a graph from raw parts.
    ///
    /// `adjacency`, when given, must hold one sequence per atom listing
    /// exactly that atom's incident bonds (by bond position in `bonds`).
    /// Without it, each atom's sequence follows bond insertion order.
    pub fn from_parts(
        atoms: Vec<A>,
        bonds: Vec<(usize, usize, B)>,
        adjacency: Option<Vec<Vec<usize>>>,
    ) -> Result<Self, GraphError> {
        let n = atoms.len();
        let mut seen_pairs = HashSet::new();
        for (i, (a, b, _)) in bonds.iter().enumerate() {
            for &end in &[*a, *b] {
                if end >= n {
                    return Err(GraphError::DanglingBond { bond: i, atom: end });
                }
            }
            if a == b {
                return Err(GraphError::SelfLoop { bond: i, atom: *a });
            }
            let key = if a < b { (*a, *b) } else { (*b, *a) };
            if !seen_pairs.insert(key) {
                return Err(GraphError::ParallelBond { a: key.0, b: key.1 });
            }
        }

        let mut graph = UnGraph::with_capacity(n, bonds.len());
        for atom in atoms {
            graph.add_node(atom);
        }
        let mut default_adjacency = vec![Vec::new(); n];
        for (a, b, bond) in bonds {
            let e = graph.add_edge(NodeIndex::new(a), NodeIndex::new(b), bond);
            default_adjacency[a].push(e);
            default_adjacency[b].push(e);
        }

        let mut mol = Self {
            graph,
            adjacency: default_adjacency,
        };

        if let Some(orders) = adjacency {
            if orders.len() != n {
                return Err(GraphError::AdjacencyLength {
                    expected: n,
                    got: orders.len(),
                });
            }
            for (atom, order) in orders.into_iter().enumerate() {
                let order: Vec<EdgeIndex> = order.into_iter().map(EdgeIndex::new).collect();
                let idx = NodeIndex::new(atom);
                mol.check_adjacency(idx, &order)?;
                mol.adjacency[atom] = order;
            }
        }

        Ok(mol)
    }

    pub fn graph(&self) -> &UnGraph<A, B> {
        &self.graph
    }

    pub fn atom(&self, idx: NodeIndex) -> &A {
        &self.graph[idx]
    }

    pub fn get_atom(&self, idx: NodeIndex) -> Option<&A> {
        self.graph.node_weight(idx)
    }

    pub fn bond(&self, idx: EdgeIndex) -> &B {
        &self.graph[idx]
    }

    pub fn get_bond(&self, idx: EdgeIndex) -> Option<&B> {
        self.graph.edge_weight(idx)
    }

    pub fn atom_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn bond_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.node_indices()
    }

    pub fn bonds(&self) -> impl Iterator<Item = EdgeIndex> + '_ {
        self.graph.edge_indices()
    }

    pub fn bond_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.graph.find_edge(a, b)
    }

    pub fn bond_endpoints(&self, idx: EdgeIndex) -> Option<(NodeIndex, NodeIndex)> {
        self.graph.edge_endpoints(idx)
    }

    /// The atom at the far end of `bond` as seen from `atom`.
    pub fn other_end(&self, bond: EdgeIndex, atom: NodeIndex) -> NodeIndex {
        let edge = &self.graph.raw_edges()[bond.index()];
        if edge.source() == atom {
            edge.target()
        } else {
            edge.source()
        }
    }

    /// Incident bonds of `idx`, in the order chirality is read against.
    pub fn adjacency(&self, idx: NodeIndex) -> &[EdgeIndex] {
        &self.adjacency[idx.index()]
    }

    /// Neighbors of `idx` in adjacency order.
    pub fn neighbors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.adjacency[idx.index()]
            .iter()
            .map(move |&e| self.other_end(e, idx))
    }

    pub fn degree(&self, idx: NodeIndex) -> usize {
        self.adjacency[idx.index()].len()
    }

    fn check_adjacency(&self, atom: NodeIndex, order: &[EdgeIndex]) -> Result<(), GraphError> {
        if atom.index() >= self.atom_count() {
            return Err(GraphError::UnknownAtom { atom: atom.index() });
        }
        let mut seen = HashSet::with_capacity(order.len());
        for &bond in order {
            let incident = self
                .bond_endpoints(bond)
                .is_some_and(|(a, b)| a == atom || b == atom);
            if !incident {
                return Err(GraphError::ForeignAdjacencyEntry {
                    atom: atom.index(),
                    bond: bond.index(),
                });
            }
            if !seen.insert(bond) {
                return Err(GraphError::DuplicateAdjacencyEntry {
                    atom: atom.index(),
                    bond: bond.index(),
                });
            }
        }
        if let Some(&missing) = self.adjacency[atom.index()]
            .iter()
            .find(|b| !seen.contains(*b))
        {
            return Err(GraphError::MissingAdjacencyEntry {
                atom: atom.index(),
                bond: missing.index(),
            });
        }
        Ok(())
    }
}

impl<A: Clone, B: Clone> Mol<A, B> {
    /// New generation with the adjacency of `atom` replaced by `order`.
    ///
    /// `order` must be a permutation of the atom's current incident bonds.
    pub fn with_adjacency(&self, atom: NodeIndex, order: Vec<EdgeIndex>) -> Result<Self, GraphError> {
        self.check_adjacency(atom, &order)?;
        let mut next = self.clone();
        next.adjacency[atom.index()] = order;
        Ok(next)
    }

    /// New generation with `atom` replaced.
    pub fn with_atom(&self, idx: NodeIndex, atom: A) -> Result<Self, GraphError> {
        if idx.index() >= self.atom_count() {
            return Err(GraphError::UnknownAtom { atom: idx.index() });
        }
        let mut next = self.clone();
        next.graph[idx] = atom;
        Ok(next)
    }
}

impl<A: Clone, B: Clone> Mol<A, B> {
    /// New generation with several adjacencies replaced at once.
    ///
    /// Callers pass permutations of each atom's current incident bonds.
    pub(crate) fn with_permuted_adjacency(&self, orders: Vec<(NodeIndex, Vec<EdgeIndex>)>) -> Self {
        let mut next = self.clone();
        for (atom, order) in orders {
            debug_assert!(self.check_adjacency(atom, &order).is_ok());
            next.adjacency[atom.index()] = order;
        }
        next
    }
}

impl<A, B: Clone> Mol<A, B> {
    /// New generation whose atoms are produced by `f`; bonds and adjacency
    /// are carried over unchanged.
    pub fn map_atoms<A2>(&self, mut f: impl FnMut(NodeIndex, &A) -> A2) -> Mol<A2, B> {
        Mol {
            graph: self.graph.map(|idx, atom| f(idx, atom), |_, bond| bond.clone()),
            adjacency: self.adjacency.clone(),
        }
    }
}

impl<A, B> Default for Mol<A, B> {
    fn default() -> Self {
        Self {
            graph: UnGraph::default(),
            adjacency: Vec::new(),
        }
    }
}

impl<A: PartialEq, B: PartialEq> PartialEq for Mol<A, B> {
    fn eq(&self, other: &Self) -> bool {
        if self.atom_count() != other.atom_count() || self.bond_count() != other.bond_count() {
            return false;
        }
        for idx in self.atoms() {
            if self.atom(idx) != other.atom(idx) || self.adjacency(idx) != other.adjacency(idx) {
                return false;
            }
        }
        for idx in self.bonds() {
            if self.bond(idx) != other.bond(idx)
                || self.bond_endpoints(idx) != other.bond_endpoints(idx)
            {
                return false;
            }
        }
        true
    }
}

impl<A: std::fmt::Debug, B: std::fmt::Debug> std::fmt::Debug for Mol<A, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let atoms: Vec<_> = self
            .atoms()
            .map(|idx| (idx.index(), self.atom(idx), self.adjacency(idx)))
            .collect();
        f.debug_struct("Mol")
            .field("atoms", &atoms)
            .field("bond_count", &self.bond_count())
            .finish()
    }
}

/// Accumulates atoms and bonds, then validates them into a [`Mol`].
///
/// Nothing is checked until [`build`](MolBuilder::build), so a bond may name
/// an atom added later.
pub struct MolBuilder<A, B> {
    atoms: Vec<A>,
    bonds: Vec<(usize, usize, B)>,
    orders: Vec<(NodeIndex, Vec<EdgeIndex>)>,
}

impl<A, B> MolBuilder<A, B> {
    pub fn new() -> Self {
        Self {
            atoms: Vec::new(),
            bonds: Vec::new(),
            orders: Vec::new(),
        }
    }

    pub fn add_atom(&mut self, atom: A) -> NodeIndex {
        self.atoms.push(atom);
        NodeIndex::new(self.atoms.len() - 1)
    }

    /// Appends the bond to both endpoints' adjacency.
    pub fn add_bond(&mut self, a: NodeIndex, b: NodeIndex, bond: B) -> EdgeIndex {
        self.bonds.push((a.index(), b.index(), bond));
        EdgeIndex::new(self.bonds.len() - 1)
    }

    /// Overrides the neighbor order of `atom` with an explicit bond sequence.
    pub fn set_adjacency(&mut self, atom: NodeIndex, order: Vec<EdgeIndex>) -> &mut Self {
        self.orders.push((atom, order));
        self
    }

    pub fn build(self) -> Result<Mol<A, B>, GraphError> {
        let mut mol = Mol::from_parts(self.atoms, self.bonds, None)?;
        for (atom, order) in self.orders {
            mol.check_adjacency(atom, &order)?;
            mol.adjacency[atom.index()] = order;
        }
        Ok(mol)
    }
}

impl<A, B> Default for MolBuilder<A, B> {
    fn default() -> Self {
        Self::new()
    }
}
