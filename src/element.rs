use serde::{Deserialize, Serialize};

/// Elements 1–118. Serialized by symbol (`"C"`, `"Cl"`, …).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Element {
    H = 1,
    He = 2,
    Li = 3,
    Be = 4,
    B = 5,
    C = 6,
    N = 7,
    O = 8,
    F = 9,
    Ne = 10,
    Na = 11,
    Mg = 12,
    Al = 13,
    Si = 14,
    P = 15,
    S = 16,
    Cl = 17,
    Ar = 18,
    K = 19,
    Ca = 20,
    Sc = 21,
    Ti = 22,
    V = 23,
    Cr = 24,
    Mn = 25,
    Fe = 26,
    Co = 27,
    Ni = 28,
    Cu = 29,
    Zn = 30,
    Ga = 31,
    Ge = 32,
    As = 33,
    Se = 34,
    Br = 35,
    Kr = 36,
    Rb = 37,
    Sr = 38,
    Y = 39,
    Zr = 40,
    Nb = 41,
    Mo = 42,
    Tc = 43,
    Ru = 44,
    Rh = 45,
    Pd = 46,
    Ag = 47,
    Cd = 48,
    In = 49,
    Sn = 50,
    Sb = 51,
    Te = 52,
    I = 53,
    Xe = 54,
    Cs = 55,
    Ba = 56,
    La = 57,
    Ce = 58,
    Pr = 59,
    Nd = 60,
    Pm = 61,
    Sm = 62,
    Eu = 63,
    Gd = 64,
    Tb = 65,
    Dy = 66,
    Ho = 67,
    Er = 68,
    Tm = 69,
    Yb = 70,
    Lu = 71,
    Hf = 72,
    Ta = 73,
    W = 74,
    Re = 75,
    Os = 76,
    Ir = 77,
    Pt = 78,
    Au = 79,
    Hg = 80,
    Tl = 81,
    Pb = 82,
    Bi = 83,
    Po = 84,
    At = 85,
    Rn = 86,
    Fr = 87,
    Ra = 88,
    Ac = 89,
    Th = 90,
    Pa = 91,
    U = 92,
    Np = 93,
    Pu = 94,
    Am = 95,
    Cm = 96,
    Bk = 97,
    Cf = 98,
    Es = 99,
    Fm = 100,
    Md = 101,
    No = 102,
    Lr = 103,
    Rf = 104,
    Db = 105,
    Sg = 106,
    Bh = 107,
    Hs = 108,
    Mt = 109,
    Ds = 110,
    Rg = 111,
    Cn = 112,
    Nh = 113,
    Fl = 114,
    Mc = 115,
    Lv = 116,
    Ts = 117,
    Og = 118,
}

impl Element {
    pub fn from_atomic_num(n: u8) -> Option<Element> {
        let slot = (n as usize).checked_sub(1)?;
        SYMBOL_TABLE.get(slot).map(|(_, e)| *e)
    }

    pub fn from_symbol(s: &str) -> Option<Element> {
        SYMBOL_TABLE.iter().find(|(sym, _)| *sym == s).map(|(_, e)| *e)
    }

    pub fn atomic_num(self) -> u8 {
        self as u8
    }

    pub fn symbol(self) -> &'static str {
        SYMBOL_TABLE[self as usize - 1].0
    }

    /// Every element in atomic-number order.
    pub fn all() -> impl Iterator<Item = Element> {
        SYMBOL_TABLE.iter().map(|(_, e)| *e)
    }

    /// Neutral-atom valences, lowest first. Empty for elements that are never
    /// valence-checked (metals, noble gases).
    pub fn default_valences(self) -> &'static [u8] {
        match self {
            Element::H => &[1],
            Element::B => &[3],
            Element::C => &[4],
            Element::N => &[3, 5],
            Element::O => &[2],
            Element::F | Element::Cl | Element::Br | Element::At => &[1],
            Element::Si | Element::Ge => &[4],
            Element::P | Element::As => &[3, 5],
            Element::S | Element::Se | Element::Te => &[2, 4, 6],
            Element::I => &[1, 3, 5, 7],
            _ => &[],
        }
    }

    /// Elements whose three-coordinate form can hold a stereocenter with a
    /// lone pair in the fourth position.
    pub fn has_lone_pair_stereo(self) -> bool {
        matches!(
            self,
            Element::N | Element::P | Element::As | Element::S | Element::Se | Element::Te
        )
    }
}

impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.symbol())
    }
}

// symbol, Element pairs for from_symbol lookup
const SYMBOL_TABLE: [(&str, Element); 118] = [
    ("H", Element::H), ("He", Element::He), ("Li", Element::Li), ("Be", Element::Be),
    ("B", Element::B), ("C", Element::C), ("N", Element::N), ("O", Element::O),
    ("F", Element::F), ("Ne", Element::Ne), ("Na", Element::Na), ("Mg", Element::Mg),
    ("Al", Element::Al), ("Si", Element::Si), ("P", Element::P), ("S", Element::S),
    ("Cl", Element::Cl), ("Ar", Element::Ar), ("K", Element::K), ("Ca", Element::Ca),
    ("Sc", Element::Sc), ("Ti", Element::Ti), ("V", Element::V), ("Cr", Element::Cr),
    ("Mn", Element::Mn), ("Fe", Element::Fe), ("Co", Element::Co), ("Ni", Element::Ni),
    ("Cu", Element::Cu), ("Zn", Element::Zn), ("Ga", Element::Ga), ("Ge", Element::Ge),
    ("As", Element::As), ("Se", Element::Se), ("Br", Element::Br), ("Kr", Element::Kr),
    ("Rb", Element::Rb), ("Sr", Element::Sr), ("Y", Element::Y), ("Zr", Element::Zr),
    ("Nb", Element::Nb), ("Mo", Element::Mo), ("Tc", Element::Tc), ("Ru", Element::Ru),
    ("Rh", Element::Rh), ("Pd", Element::Pd), ("Ag", Element::Ag), ("Cd", Element::Cd),
    ("In", Element::In), ("Sn", Element::Sn), ("Sb", Element::Sb), ("Te", Element::Te),
    ("I", Element::I), ("Xe", Element::Xe), ("Cs", Element::Cs), ("Ba", Element::Ba),
    ("La", Element::La), ("Ce", Element::Ce), ("Pr", Element::Pr), ("Nd", Element::Nd),
    ("Pm", Element::Pm), ("Sm", Element::Sm), ("Eu", Element::Eu), ("Gd", Element::Gd),
    ("Tb", Element::Tb), ("Dy", Element::Dy), ("Ho", Element::Ho), ("Er", Element::Er),
    ("Tm", Element::Tm), ("Yb", Element::Yb), ("Lu", Element::Lu), ("Hf", Element::Hf),
    ("Ta", Element::Ta), ("W", Element::W), ("Re", Element::Re), ("Os", Element::Os),
    ("Ir", Element::Ir), ("Pt", Element::Pt), ("Au", Element::Au), ("Hg", Element::Hg),
    ("Tl", Element::Tl), ("Pb", Element::Pb), ("Bi", Element::Bi), ("Po", Element::Po),
    ("At", Element::At), ("Rn", Element::Rn), ("Fr", Element::Fr), ("Ra", Element::Ra),
    ("Ac", Element::Ac), ("Th", Element::Th), ("Pa", Element::Pa), ("U", Element::U),
    ("Np", Element::Np), ("Pu", Element::Pu), ("Am", Element::Am), ("Cm", Element::Cm),
    ("Bk", Element::Bk), ("Cf", Element::Cf), ("Es", Element::Es), ("Fm", Element::Fm),
    ("Md", Element::Md), ("No", Element::No), ("Lr", Element::Lr), ("Rf", Element::Rf),
    ("Db", Element::Db), ("Sg", Element::Sg), ("Bh", Element::Bh), ("Hs", Element::Hs),
    ("Mt", Element::Mt), ("Ds", Element::Ds), ("Rg", Element::Rg), ("Cn", Element::Cn),
    ("Nh", Element::Nh), ("Fl", Element::Fl), ("Mc", Element::Mc), ("Lv", Element::Lv),
    ("Ts", Element::Ts), ("Og", Element::Og),
];
