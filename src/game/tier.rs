use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// Grid size and scoring parameters for one tier.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct DifficultyProfile {
    pub total_pairs: usize,
    pub columns: usize,
    pub base_score: u32,
    pub attempt_penalty: f64,
    pub time_penalty: f64,
}

const EASY: DifficultyProfile = DifficultyProfile {
    total_pairs: 4,
    columns: 2,
    base_score: 1000,
    attempt_penalty: 5.0,
    time_penalty: 1.0,
};

const MEDIUM: DifficultyProfile = DifficultyProfile {
    total_pairs: 8,
    columns: 4,
    base_score: 2000,
    attempt_penalty: 4.0,
    time_penalty: 0.7,
};

const HARD: DifficultyProfile = DifficultyProfile {
    total_pairs: 12,
    columns: 4,
    base_score: 3000,
    attempt_penalty: 3.0,
    time_penalty: 0.3,
};

pub const ALL_TIERS: [Tier; 3] = [Tier::Easy, Tier::Medium, Tier::Hard];

impl Tier {
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Tier::Easy => EASY,
            Tier::Medium => MEDIUM,
            Tier::Hard => HARD,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Tier::Easy => "Easy",
            Tier::Medium => "Medium",
            Tier::Hard => "Hard",
        }
    }

    fn code(self) -> &'static str {
        match self {
            Tier::Easy => "easy",
            Tier::Medium => "medium",
            Tier::Hard => "hard",
        }
    }

    /// Parses an optional tier setting, falling back to [`Tier::default`]
    /// when none is given.
    pub fn or_default(raw: Option<&str>) -> Result<Tier, EngineError> {
        match raw {
            Some(raw) => raw.parse(),
            None => {
                log::warn!(
                    "no tier selected; using {} (the legacy default time penalty of 2.0 is not applied)",
                    Tier::default().name()
                );
                Ok(Tier::default())
            }
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Tier {
    type Err = EngineError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Ok(index) = trimmed.parse::<u8>() {
            return Tier::try_from(index);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "easy" => Ok(Tier::Easy),
            "medium" | "normal" => Ok(Tier::Medium),
            "hard" => Ok(Tier::Hard),
            _ => Err(EngineError::UnknownTier(raw.to_string())),
        }
    }
}

/// Menu index as used by level selection: 0 = Easy, 1 = Medium, 2 = Hard.
impl TryFrom<u8> for Tier {
    type Error = EngineError;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        match index {
            0 => Ok(Tier::Easy),
            1 => Ok(Tier::Medium),
            2 => Ok(Tier::Hard),
            _ => Err(EngineError::UnknownTier(index.to_string())),
        }
    }
}

impl DifficultyProfile {
    pub fn card_count(&self) -> usize {
        self.total_pairs * 2
    }

    pub fn rows(&self) -> usize {
        if self.columns == 0 {
            return 0;
        }
        self.card_count().div_ceil(self.columns)
    }

    /// Row-major grid position of a deck index.
    pub fn cell(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.card_count() || self.columns == 0 {
            return None;
        }
        Some((index / self.columns, index % self.columns))
    }
}
