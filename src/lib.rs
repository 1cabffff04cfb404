pub mod align;
pub mod atom;
pub mod bond;
pub mod chirality;
pub mod cip;
pub mod config;
pub mod element;
pub mod error;
pub mod mol;
pub mod pipeline;
pub mod query;
pub mod record;
pub mod rings;
pub mod substruct;
pub mod traits;
pub mod transfer;
pub mod valence;
pub mod validate;

pub use atom::{Atom, Chirality};
pub use bond::{Bond, BondOrder};
pub use cip::Descriptor;
pub use config::{ConfigError, StereoConfig, StereoConfigBuilder};
pub use element::Element;
pub use error::{Incompatibility, Inconsistency, StereoError, StereoErrorKind};
pub use mol::{GraphError, Mol, MolBuilder};
pub use pipeline::{Run, Stage, assign_chirality_batch, assign_chirality_from_template};
pub use query::{AtomPattern, BondPattern, QueryAtom, QueryBond, QueryMol};
pub use record::{BondRecord, MolRecord, QueryMolRecord};
pub use substruct::{AtomMapping, find_match};
pub use traits::{
    HasAtomicNum, HasBondOrder, HasChirality, HasChiralityMut, HasElement, HasFormalCharge,
    HasHydrogenCount,
};
pub use validate::{ValidatedGraph, finalize};
