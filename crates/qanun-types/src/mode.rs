use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Answer-generation mode sent with every chat request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    General,
    Family,
    Labor,
    RealEstate,
    Criminal,
    Commercial,
}

impl Mode {
    pub const ALL: [Mode; 6] = [
        Mode::General,
        Mode::Family,
        Mode::Labor,
        Mode::RealEstate,
        Mode::Criminal,
        Mode::Commercial,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::General => "general",
            Mode::Family => "family",
            Mode::Labor => "labor",
            Mode::RealEstate => "real_estate",
            Mode::Criminal => "criminal",
            Mode::Commercial => "commercial",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Mode::General => "عام",
            Mode::Family => "الأسرة",
            Mode::Labor => "الشغل",
            Mode::RealEstate => "العقار",
            Mode::Criminal => "الجنائي",
            Mode::Commercial => "التجاري",
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|m| *m == self).unwrap_or(0)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|mode| mode.as_str() == normalized)
            .ok_or_else(|| format!("unknown mode: {}", s))
    }
}
