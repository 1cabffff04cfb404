use std::fmt;

use thiserror::Error;

use crate::bond::BondOrder;
use crate::element::Element;

/// Why a query cannot embed in a target, found before any search runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incompatibility {
    TooManyAtoms { query: usize, target: usize },
    TooManyBonds { query: usize, target: usize },
    ElementShortfall {
        element: Element,
        required: usize,
        available: usize,
    },
    BondOrderShortfall {
        order: BondOrder,
        required: usize,
        available: usize,
    },
}

impl fmt::Display for Incompatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooManyAtoms { query, target } => {
                write!(f, "query has {query} atoms, target only {target}")
            }
            Self::TooManyBonds { query, target } => {
                write!(f, "query has {query} bonds, target only {target}")
            }
            Self::ElementShortfall {
                element,
                required,
                available,
            } => write!(
                f,
                "query needs {required} {element} atoms, target has {available}"
            ),
            Self::BondOrderShortfall {
                order,
                required,
                available,
            } => write!(
                f,
                "query needs {required} {order:?} bonds, target has {available}"
            ),
        }
    }
}

/// What made a transferred graph inconsistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inconsistency {
    Valence { actual: (u8, u8), allowed: Vec<u8> },
    AromaticBondOutsideRing { neighbor: usize },
    StereoNeighborCount { count: usize },
    StereoNeighborsIdentical,
}

impl fmt::Display for Inconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valence { actual, allowed } => {
                if actual.0 == actual.1 {
                    write!(f, "valence {} not in {:?}", actual.0, allowed)
                } else {
                    write!(f, "valence {}..={} not in {:?}", actual.0, actual.1, allowed)
                }
            }
            Self::AromaticBondOutsideRing { neighbor } => {
                write!(f, "aromatic bond to atom {neighbor} is not in a ring")
            }
            Self::StereoNeighborCount { count } => {
                write!(f, "stereocenter has {count} neighbors, needs 3 or 4")
            }
            Self::StereoNeighborsIdentical => {
                write!(f, "stereocenter neighbors are indistinguishable")
            }
        }
    }
}

/// Failure of a template-guided chirality assignment. A run fails with
/// exactly one of these and produces no graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StereoError {
    #[error("query cannot match target: {0}")]
    IncompatibleQuery(Incompatibility),
    #[error("no embedding of the query in the target exists")]
    MatchNotFound,
    #[error("query atom {atom} is tagged but has {degree} neighbors (needs 3 or 4)")]
    InvalidTagSource { atom: usize, degree: usize },
    #[error("atom {atom} is inconsistent after transfer: {reason}")]
    PostTransferInconsistency { atom: usize, reason: Inconsistency },
    #[error("substructure search gave up after {steps} steps")]
    SearchLimitExceeded { steps: usize },
}

impl StereoError {
    pub fn kind(&self) -> StereoErrorKind {
        match self {
            Self::IncompatibleQuery(_) => StereoErrorKind::IncompatibleQuery,
            Self::MatchNotFound => StereoErrorKind::MatchNotFound,
            Self::InvalidTagSource { .. } => StereoErrorKind::InvalidTagSource,
            Self::PostTransferInconsistency { .. } => StereoErrorKind::PostTransferInconsistency,
            Self::SearchLimitExceeded { .. } => StereoErrorKind::SearchLimitExceeded,
        }
    }
}

/// Payload-free discriminant of [`StereoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StereoErrorKind {
    IncompatibleQuery,
    MatchNotFound,
    InvalidTagSource,
    PostTransferInconsistency,
    SearchLimitExceeded,
}
