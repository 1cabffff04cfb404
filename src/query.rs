//! Template graphs: atoms that may be wildcards and bonds that may accept
//! any order.

use std::fmt;

use petgraph::graph::NodeIndex;
use serde::{Deserialize, Serialize};

use crate::atom::Chirality;
use crate::bond::BondOrder;
use crate::element::Element;
use crate::mol::Mol;

/// Element constraint of a query atom. Serialized as `"*"` or an element
/// symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum AtomPattern {
    Any,
    Element(Element),
}

impl AtomPattern {
    pub fn accepts(self, element: Element) -> bool {
        match self {
            AtomPattern::Any => true,
            AtomPattern::Element(e) => e == element,
        }
    }
}

impl TryFrom<String> for AtomPattern {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        if s == "*" {
            return Ok(AtomPattern::Any);
        }
        Element::from_symbol(&s)
            .map(AtomPattern::Element)
            .ok_or_else(|| format!("unknown element symbol '{s}'"))
    }
}

impl From<AtomPattern> for String {
    fn from(p: AtomPattern) -> Self {
        p.to_string()
    }
}

impl fmt::Display for AtomPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AtomPattern::Any => f.write_str("*"),
            AtomPattern::Element(e) => f.write_str(e.symbol()),
        }
    }
}

/// Bond-order constraint of a query bond. Serialized as `"~"` or an order
/// name (`"Single"`, `"Aromatic"`, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BondPattern {
    Any,
    Order(BondOrder),
}

impl BondPattern {
    pub fn accepts(self, order: BondOrder) -> bool {
        match self {
            BondPattern::Any => true,
            BondPattern::Order(o) => o == order,
        }
    }
}

impl Default for BondPattern {
    fn default() -> Self {
        BondPattern::Order(BondOrder::Single)
    }
}

impl TryFrom<String> for BondPattern {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.as_str() {
            "~" => Ok(BondPattern::Any),
            "Single" => Ok(BondPattern::Order(BondOrder::Single)),
            "Double" => Ok(BondPattern::Order(BondOrder::Double)),
            "Triple" => Ok(BondPattern::Order(BondOrder::Triple)),
            "Aromatic" => Ok(BondPattern::Order(BondOrder::Aromatic)),
            _ => Err(format!("unknown bond pattern '{s}'")),
        }
    }
}

impl From<BondPattern> for String {
    fn from(p: BondPattern) -> Self {
        match p {
            BondPattern::Any => "~".to_owned(),
            BondPattern::Order(o) => format!("{o:?}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAtom {
    pub element: AtomPattern,
    #[serde(default)]
    pub chirality: Chirality,
}

impl QueryAtom {
    pub fn element(element: Element) -> Self {
        Self {
            element: AtomPattern::Element(element),
            chirality: Chirality::None,
        }
    }

    pub fn any() -> Self {
        Self {
            element: AtomPattern::Any,
            chirality: Chirality::None,
        }
    }

    pub fn with_chirality(mut self, chirality: Chirality) -> Self {
        self.chirality = chirality;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryBond {
    #[serde(default)]
    pub order: BondPattern,
}

impl QueryBond {
    pub fn new(order: BondOrder) -> Self {
        Self {
            order: BondPattern::Order(order),
        }
    }

    pub fn any() -> Self {
        Self {
            order: BondPattern::Any,
        }
    }
}

pub type QueryMol = Mol<QueryAtom, QueryBond>;

impl QueryMol {
    /// Query atoms carrying a defined chirality tag, in declaration order.
    pub fn tagged_atoms(&self) -> impl Iterator<Item = NodeIndex> + '_ {
        self.atoms()
            .filter(|&idx| self.atom(idx).chirality.is_defined())
    }
}

impl crate::traits::HasElement for QueryAtom {
    fn element(&self) -> Option<Element> {
        match self.element {
            AtomPattern::Any => None,
            AtomPattern::Element(e) => Some(e),
        }
    }
}

impl crate::traits::HasChirality for QueryAtom {
    fn chirality(&self) -> Chirality {
        self.chirality
    }
}

impl crate::traits::HasBondOrder for QueryBond {
    fn bond_order(&self) -> Option<BondOrder> {
        match self.order {
            BondPattern::Any => None,
            BondPattern::Order(o) => Some(o),
        }
    }
}
