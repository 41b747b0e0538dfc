//! Placement ladder levels and CEFR proficiency tiers.
//!
//! The ladder (`pre_intermediate` → `advanced`) orders the leveled quiz
//! difficulty used during placement. It is distinct from the CEFR tier
//! (A1–C2) the placement ultimately produces.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::errors::DomainError;

/// Quiz difficulty tier on the placement ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LadderLevel {
    PreIntermediate,
    Intermediate,
    UpperIntermediate,
    Advanced,
}

impl LadderLevel {
    /// All ladder levels in ascending difficulty order.
    pub const ALL: [LadderLevel; 4] = [
        LadderLevel::PreIntermediate,
        LadderLevel::Intermediate,
        LadderLevel::UpperIntermediate,
        LadderLevel::Advanced,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LadderLevel::PreIntermediate => "pre_intermediate",
            LadderLevel::Intermediate => "intermediate",
            LadderLevel::UpperIntermediate => "upper_intermediate",
            LadderLevel::Advanced => "advanced",
        }
    }
}

impl fmt::Display for LadderLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LadderLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pre_intermediate" => Ok(LadderLevel::PreIntermediate),
            "intermediate" => Ok(LadderLevel::Intermediate),
            "upper_intermediate" => Ok(LadderLevel::UpperIntermediate),
            "advanced" => Ok(LadderLevel::Advanced),
            other => Err(DomainError::UnknownLevel(other.to_string())),
        }
    }
}

/// CEFR proficiency tier produced by placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CefrLevel {
    A1,
    A2,
    B1,
    B2,
    C1,
    C2,
}

impl CefrLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            CefrLevel::A1 => "A1",
            CefrLevel::A2 => "A2",
            CefrLevel::B1 => "B1",
            CefrLevel::B2 => "B2",
            CefrLevel::C1 => "C1",
            CefrLevel::C2 => "C2",
        }
    }
}

impl fmt::Display for CefrLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CefrLevel {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A1" => Ok(CefrLevel::A1),
            "A2" => Ok(CefrLevel::A2),
            "B1" => Ok(CefrLevel::B1),
            "B2" => Ok(CefrLevel::B2),
            "C1" => Ok(CefrLevel::C1),
            "C2" => Ok(CefrLevel::C2),
            other => Err(DomainError::UnknownLevel(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ladder_level_round_trip() {
        for level in LadderLevel::ALL {
            assert_eq!(level.as_str().parse::<LadderLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_unknown_ladder_level() {
        let err = "elementary".parse::<LadderLevel>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownLevel(_)));
    }

    #[test]
    fn test_ladder_level_serde_uses_snake_case() {
        let json = serde_json::to_string(&LadderLevel::UpperIntermediate).unwrap();
        assert_eq!(json, "\"upper_intermediate\"");
    }

    #[test]
    fn test_cefr_round_trip() {
        for s in ["A1", "A2", "B1", "B2", "C1", "C2"] {
            assert_eq!(s.parse::<CefrLevel>().unwrap().as_str(), s);
        }
    }

    #[test]
    fn test_unknown_cefr_level() {
        let err = "Z9".parse::<CefrLevel>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownLevel(_)));
    }
}
