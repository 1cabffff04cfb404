use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BondOrder {
    #[default]
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Contribution to the atom valence as `(min, max)`. An aromatic bond is
    /// either side of a Kekulé structure, so it spans 1..=2.
    pub fn valence_range(self) -> (u8, u8) {
        match self {
            BondOrder::Single => (1, 1),
            BondOrder::Double => (2, 2),
            BondOrder::Triple => (3, 3),
            BondOrder::Aromatic => (1, 2),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bond {
    #[serde(default)]
    pub order: BondOrder,
}

impl Bond {
    pub fn new(order: BondOrder) -> Self {
        Self { order }
    }
}

impl crate::traits::HasBondOrder for Bond {
    fn bond_order(&self) -> Option<BondOrder> {
        Some(self.order)
    }
}
