//! Global consistency checks on a tagged graph, and descriptor labelling.

use std::collections::BTreeMap;

use petgraph::graph::NodeIndex;
use tracing::{debug, instrument};

use crate::atom::{Atom, Chirality};
use crate::bond::{Bond, BondOrder};
use crate::chirality::stereo_problem;
use crate::cip::{Descriptor, descriptor};
use crate::config::StereoConfig;
use crate::error::{Inconsistency, StereoError};
use crate::mol::Mol;
use crate::rings::RingInfo;
use crate::substruct::AtomMapping;
use crate::traits::{
    HasAtomicNum, HasBondOrder, HasChirality, HasElement, HasFormalCharge, HasHydrogenCount,
};
use crate::valence::check_valence;

/// A graph that passed every post-transfer check.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedGraph<A = Atom, B = Bond> {
    mol: Mol<A, B>,
    descriptors: Option<BTreeMap<NodeIndex, Descriptor>>,
    mapping: Option<AtomMapping>,
}

impl<A, B> ValidatedGraph<A, B> {
    pub fn mol(&self) -> &Mol<A, B> {
        &self.mol
    }

    pub fn into_mol(self) -> Mol<A, B> {
        self.mol
    }

    /// R/S labels keyed by stereocenter, if they were computed.
    pub fn descriptors(&self) -> Option<&BTreeMap<NodeIndex, Descriptor>> {
        self.descriptors.as_ref()
    }

    pub fn descriptor(&self, atom: NodeIndex) -> Option<Descriptor> {
        self.descriptors.as_ref()?.get(&atom).copied()
    }

    /// The query-to-target mapping that produced this graph, when it came out
    /// of a template run.
    pub fn mapping(&self) -> Option<&AtomMapping> {
        self.mapping.as_ref()
    }

    pub(crate) fn with_mapping(mut self, mapping: AtomMapping) -> Self {
        self.mapping = Some(mapping);
        self
    }
}

impl<A: HasChirality, B> ValidatedGraph<A, B> {
    /// Tagged atoms in ascending identifier order.
    pub fn stereocenters(&self) -> impl Iterator<Item = (NodeIndex, Chirality)> + '_ {
        self.mol.atoms().filter_map(|idx| {
            let tag = self.mol.atom(idx).chirality();
            tag.is_defined().then_some((idx, tag))
        })
    }
}

/// Validates `graph` with the default configuration.
pub fn finalize<A, B>(graph: Mol<A, B>) -> Result<ValidatedGraph<A, B>, StereoError>
where
    A: HasElement + HasAtomicNum + HasChirality + HasHydrogenCount + HasFormalCharge,
    B: HasBondOrder,
{
    finalize_with(graph, &StereoConfig::default())
}

/// Checks valence, aromatic ring membership and stereocenter shape, atom by
/// atom in identifier order. The first violation fails the whole graph.
#[instrument(skip_all)]
pub fn finalize_with<A, B>(
    graph: Mol<A, B>,
    config: &StereoConfig,
) -> Result<ValidatedGraph<A, B>, StereoError>
where
    A: HasElement + HasAtomicNum + HasChirality + HasHydrogenCount + HasFormalCharge,
    B: HasBondOrder,
{
    if let Some((atom, reason)) = first_inconsistency(&graph) {
        return Err(StereoError::PostTransferInconsistency {
            atom: atom.index(),
            reason,
        });
    }

    let descriptors = config.compute_descriptors.then(|| {
        graph
            .atoms()
            .filter_map(|idx| descriptor(&graph, idx).map(|d| (idx, d)))
            .collect::<BTreeMap<_, _>>()
    });
    debug!(
        labelled = descriptors.as_ref().map_or(0, |d| d.len()),
        "graph validated"
    );

    Ok(ValidatedGraph {
        mol: graph,
        descriptors,
        mapping: None,
    })
}

fn first_inconsistency<A, B>(mol: &Mol<A, B>) -> Option<(NodeIndex, Inconsistency)>
where
    A: HasElement + HasAtomicNum + HasChirality + HasHydrogenCount + HasFormalCharge,
    B: HasBondOrder,
{
    let mut valence: BTreeMap<NodeIndex, Inconsistency> = match check_valence(mol) {
        Ok(()) => BTreeMap::new(),
        Err(errors) => errors
            .into_iter()
            .map(|e| {
                (
                    e.atom_idx,
                    Inconsistency::Valence {
                        actual: e.actual_valence,
                        allowed: e.allowed_valences,
                    },
                )
            })
            .collect(),
    };
    let rings = RingInfo::new(mol);

    for idx in mol.atoms() {
        if let Some(reason) = valence.remove(&idx) {
            return Some((idx, reason));
        }
        for &e in mol.adjacency(idx) {
            if mol.bond(e).bond_order() == Some(BondOrder::Aromatic) && !rings.is_ring_bond(e) {
                let neighbor = mol.other_end(e, idx).index();
                return Some((idx, Inconsistency::AromaticBondOutsideRing { neighbor }));
            }
        }
        if let Some(reason) = stereo_problem(mol, idx) {
            return Some((idx, reason));
        }
    }
    None
}
