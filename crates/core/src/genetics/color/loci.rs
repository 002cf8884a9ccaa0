use std::fmt;

/// Coat colour loci. Variant order is the display order of genotype strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LocusKind {
    Extension,
    Brown,
    DominantBlack,
    Agouti,
    Dilution,
    Spotting,
    Merle,
}

/// Loci every genotype must carry.
pub const CORE_LOCI: [LocusKind; 5] = [
    LocusKind::Extension,
    LocusKind::Brown,
    LocusKind::DominantBlack,
    LocusKind::Agouti,
    LocusKind::Dilution,
];

/// Loci a genotype may carry. They are crossed only when both parents
/// supply them.
pub const OPTIONAL_LOCI: [LocusKind; 2] = [LocusKind::Spotting, LocusKind::Merle];

/// An allele as listed in a locus table.
#[derive(Debug)]
pub struct AlleleInfo {
    pub symbol: &'static str,
    pub name: &'static str,
}

/// A genetic position with its alleles ordered from most to least dominant.
#[derive(Debug)]
pub struct Locus {
    pub kind: LocusKind,
    pub symbol: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub alleles: &'static [AlleleInfo],
}

static EXTENSION: Locus = Locus {
    kind: LocusKind::Extension,
    symbol: "E",
    name: "Extension",
    description: "Controls production of black pigment (eumelanin)",
    alleles: &[
        AlleleInfo { symbol: "Em", name: "Melanistic mask" },
        AlleleInfo { symbol: "Eg", name: "Grizzle" },
        AlleleInfo { symbol: "E", name: "Normal extension" },
        AlleleInfo { symbol: "e", name: "Recessive yellow/red" },
    ],
};

static BROWN: Locus = Locus {
    kind: LocusKind::Brown,
    symbol: "B",
    name: "Brown",
    description: "Turns black pigment into chocolate/liver",
    alleles: &[
        AlleleInfo { symbol: "B", name: "Black" },
        AlleleInfo { symbol: "b", name: "Chocolate" },
    ],
};

static DOMINANT_BLACK: Locus = Locus {
    kind: LocusKind::DominantBlack,
    symbol: "K",
    name: "Dominant Black",
    description: "Controls whether the agouti pattern is expressed",
    alleles: &[
        AlleleInfo { symbol: "KB", name: "Dominant black" },
        AlleleInfo { symbol: "kbr", name: "Brindle" },
        AlleleInfo { symbol: "ky", name: "Allows agouti expression" },
    ],
};

static AGOUTI: Locus = Locus {
    kind: LocusKind::Agouti,
    symbol: "A",
    name: "Agouti",
    description: "Pattern of pigment distribution",
    alleles: &[
        AlleleInfo { symbol: "Ay", name: "Dominant fawn/sable" },
        AlleleInfo { symbol: "aw", name: "Wild agouti" },
        AlleleInfo { symbol: "at", name: "Tan points" },
        AlleleInfo { symbol: "a", name: "Recessive black" },
    ],
};

static DILUTION: Locus = Locus {
    kind: LocusKind::Dilution,
    symbol: "D",
    name: "Dilution",
    description: "Dilutes pigment (black to blue, chocolate to lilac)",
    alleles: &[
        AlleleInfo { symbol: "D", name: "Not diluted" },
        AlleleInfo { symbol: "d", name: "Diluted" },
    ],
};

static SPOTTING: Locus = Locus {
    kind: LocusKind::Spotting,
    symbol: "S",
    name: "Spotting",
    description: "White spotting",
    alleles: &[
        AlleleInfo { symbol: "S", name: "Solid colour" },
        AlleleInfo { symbol: "sp", name: "Piebald" },
        AlleleInfo { symbol: "sw", name: "Extreme white" },
    ],
};

static MERLE: Locus = Locus {
    kind: LocusKind::Merle,
    symbol: "M",
    name: "Merle",
    description: "Mosaic dilution pattern",
    alleles: &[
        AlleleInfo { symbol: "M", name: "Merle" },
        AlleleInfo { symbol: "m", name: "Non-merle" },
    ],
};

impl LocusKind {
    pub const ALL: [LocusKind; 7] = [
        LocusKind::Extension,
        LocusKind::Brown,
        LocusKind::DominantBlack,
        LocusKind::Agouti,
        LocusKind::Dilution,
        LocusKind::Spotting,
        LocusKind::Merle,
    ];

    pub fn locus(self) -> &'static Locus {
        match self {
            LocusKind::Extension => &EXTENSION,
            LocusKind::Brown => &BROWN,
            LocusKind::DominantBlack => &DOMINANT_BLACK,
            LocusKind::Agouti => &AGOUTI,
            LocusKind::Dilution => &DILUTION,
            LocusKind::Spotting => &SPOTTING,
            LocusKind::Merle => &MERLE,
        }
    }

    pub fn symbol(self) -> &'static str {
        self.locus().symbol
    }

    pub fn is_core(self) -> bool {
        CORE_LOCI.contains(&self)
    }

    /// Look a locus up by its one-letter symbol (`"E"`, `"K"`, ...).
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.symbol() == symbol)
    }
}

impl fmt::Display for LocusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// An allele of one specific locus.
///
/// `rank` is the position in the locus's allele list, so a smaller rank is
/// more dominant. Alleles of different loci never compare equal even when
/// their symbols coincide (`B` at Brown, `S` at Spotting, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Allele {
    locus: LocusKind,
    rank: u8,
}

impl Allele {
    /// Resolve a symbol within `locus`. Symbols are case-sensitive.
    pub fn parse(locus: LocusKind, symbol: &str) -> Option<Self> {
        locus
            .locus()
            .alleles
            .iter()
            .position(|a| a.symbol == symbol)
            .map(|rank| Allele {
                locus,
                rank: rank as u8,
            })
    }

    pub fn locus(self) -> LocusKind {
        self.locus
    }

    fn info(self) -> &'static AlleleInfo {
        &self.locus.locus().alleles[self.rank as usize]
    }

    pub fn symbol(self) -> &'static str {
        self.info().symbol
    }

    pub fn name(self) -> &'static str {
        self.info().name
    }
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Two alleles of the same locus, stored most dominant first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllelePair {
    first: Allele,
    second: Allele,
}

impl AllelePair {
    /// Build the canonical pair. The order of the arguments does not matter.
    ///
    /// Both alleles must belong to the same locus; callers only build pairs
    /// from alleles parsed against one locus.
    pub fn new(a: Allele, b: Allele) -> Self {
        debug_assert_eq!(a.locus, b.locus, "alleles from different loci");
        if a <= b {
            Self { first: a, second: b }
        } else {
            Self { first: b, second: a }
        }
    }

    pub fn locus(&self) -> LocusKind {
        self.first.locus
    }

    /// The more dominant allele.
    pub fn dominant(&self) -> Allele {
        self.first
    }

    pub fn alleles(&self) -> [Allele; 2] {
        [self.first, self.second]
    }

    /// Whether both alleles carry `symbol`.
    pub fn is_homozygous(&self, symbol: &str) -> bool {
        self.first.symbol() == symbol && self.second.symbol() == symbol
    }

    /// Whether either allele carries `symbol`.
    pub fn carries(&self, symbol: &str) -> bool {
        self.first.symbol() == symbol || self.second.symbol() == symbol
    }
}

impl fmt::Display for AllelePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.first, self.second)
    }
}
