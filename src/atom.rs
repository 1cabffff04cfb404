use serde::{Deserialize, Serialize};

use crate::element::Element;

/// Tetrahedral chirality tag, interpreted against an atom's adjacency order.
///
/// Looking from the first neighbor toward the center, the remaining neighbors
/// run counterclockwise ([`Ccw`](Chirality::Ccw)) or clockwise
/// ([`Cw`](Chirality::Cw)). When the center has only three explicit
/// neighbors, its implicit hydrogen (or lone pair) takes the last position.
///
/// The same tag value on two atoms with different neighbor orders can denote
/// opposite handedness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Chirality {
    /// Handedness undefined.
    #[default]
    None,
    /// Clockwise (`@@`).
    Cw,
    /// Counterclockwise (`@`).
    Ccw,
}

impl Chirality {
    pub fn is_defined(self) -> bool {
        self != Chirality::None
    }

    pub fn inverted(self) -> Chirality {
        match self {
            Chirality::None => Chirality::None,
            Chirality::Cw => Chirality::Ccw,
            Chirality::Ccw => Chirality::Cw,
        }
    }
}

/// Atom of a target molecule.
///
/// Hydrogens are normally implicit: `hydrogen_count` of them hang off the
/// atom without being graph nodes.
///
/// # Examples
///
/// ```
/// use stereocrab::{Atom, Element};
///
/// let carbon = Atom::new(Element::C).with_hydrogens(1);
/// assert_eq!(carbon.element, Element::C);
/// assert_eq!(carbon.hydrogen_count, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Atom {
    pub element: Element,
    /// Number of implicit hydrogens.
    #[serde(default)]
    pub hydrogen_count: u8,
    #[serde(default)]
    pub formal_charge: i8,
    #[serde(default)]
    pub chirality: Chirality,
}

impl Atom {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            hydrogen_count: 0,
            formal_charge: 0,
            chirality: Chirality::None,
        }
    }

    pub fn with_hydrogens(mut self, count: u8) -> Self {
        self.hydrogen_count = count;
        self
    }

    pub fn with_charge(mut self, charge: i8) -> Self {
        self.formal_charge = charge;
        self
    }

    pub fn with_chirality(mut self, chirality: Chirality) -> Self {
        self.chirality = chirality;
        self
    }
}

impl crate::traits::HasAtomicNum for Atom {
    fn atomic_num(&self) -> u8 {
        self.element.atomic_num()
    }
}

impl crate::traits::HasElement for Atom {
    fn element(&self) -> Option<Element> {
        Some(self.element)
    }
}

impl crate::traits::HasChirality for Atom {
    fn chirality(&self) -> Chirality {
        self.chirality
    }
}

impl crate::traits::HasChiralityMut for Atom {
    fn set_chirality(&mut self, chirality: Chirality) {
        self.chirality = chirality;
    }
}

impl crate::traits::HasHydrogenCount for Atom {
    fn hydrogen_count(&self) -> u8 {
        self.hydrogen_count
    }
}

impl crate::traits::HasFormalCharge for Atom {
    fn formal_charge(&self) -> i8 {
        self.formal_charge
    }
}
