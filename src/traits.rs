use crate::atom::Chirality;
use crate::bond::BondOrder;
use crate::element::Element;

pub trait HasAtomicNum {
    fn atomic_num(&self) -> u8;
}

/// `None` means the atom matches any element (query wildcard).
pub trait HasElement {
    fn element(&self) -> Option<Element>;
}

pub trait HasChirality {
    fn chirality(&self) -> Chirality;
}

pub trait HasChiralityMut: HasChirality {
    fn set_chirality(&mut self, chirality: Chirality);
}

pub trait HasHydrogenCount {
    fn hydrogen_count(&self) -> u8;
}

pub trait HasFormalCharge {
    fn formal_charge(&self) -> i8;
}

/// `None` means any bond order is accepted (query-only).
pub trait HasBondOrder {
    fn bond_order(&self) -> Option<BondOrder>;
}
