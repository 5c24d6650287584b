use serde::{Deserialize, Serialize};

/// Ring a dart landed in, as reported by the board boundary (camera or
/// manual entry). The two single rings are kept distinct because punt
/// returns treat them differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Multiplier {
    SingleInner,
    SingleOuter,
    Double,
    Triple,
    InnerBull,
    OuterBull,
    Miss,
}

impl Multiplier {
    /// Distance factor for segment hits. Bulls and misses resolve through
    /// their own rules and never use this.
    pub fn factor(self) -> u16 {
        match self {
            Multiplier::SingleInner | Multiplier::SingleOuter => 1,
            Multiplier::Double => 2,
            Multiplier::Triple => 3,
            Multiplier::InnerBull | Multiplier::OuterBull | Multiplier::Miss => 0,
        }
    }

    pub fn is_single(self) -> bool {
        matches!(self, Multiplier::SingleInner | Multiplier::SingleOuter)
    }

    pub fn is_miss(self) -> bool {
        matches!(self, Multiplier::Miss)
    }

    pub fn is_bull(self) -> bool {
        matches!(self, Multiplier::InnerBull | Multiplier::OuterBull)
    }
}

impl std::fmt::Display for Multiplier {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let s = match self {
            Multiplier::SingleInner => "single_inner",
            Multiplier::SingleOuter => "single_outer",
            Multiplier::Double => "double",
            Multiplier::Triple => "triple",
            Multiplier::InnerBull => "inner_bull",
            Multiplier::OuterBull => "outer_bull",
            Multiplier::Miss => "miss",
        };
        f.write_str(s)
    }
}

/// Raw board hit as submitted by the host. Segment 25 is the bull; the
/// multiplier tag carries the ring. Validated by the resolver before any
/// state is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DartHit {
    pub segment: u8,
    pub multiplier: Multiplier,
}

impl DartHit {
    pub fn new(segment: u8, multiplier: Multiplier) -> Self {
        Self {
            segment,
            multiplier,
        }
    }
}

/// Resolved dart: the yardage/scoring primitive the modules consume.
///
/// `yards` is meaningless when `inner_bull` is set (automatic touchdown
/// sentinel); downstream code checks the flag first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DartResult {
    pub segment: u8,
    pub multiplier: Multiplier,
    pub yards: u16,
    pub inner_bull: bool,
    pub outer_bull: bool,
}

impl DartResult {
    /// Short code in dart notation: `T20`, `D5`, `S7`, `IB`, `OB`, `MISS`.
    pub fn code(&self) -> String {
        match self.multiplier {
            Multiplier::InnerBull => "IB".to_string(),
            Multiplier::OuterBull => "OB".to_string(),
            Multiplier::Miss => "MISS".to_string(),
            Multiplier::Triple => format!("T{}", self.segment),
            Multiplier::Double => format!("D{}", self.segment),
            Multiplier::SingleInner | Multiplier::SingleOuter => format!("S{}", self.segment),
        }
    }
}
