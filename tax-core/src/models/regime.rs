use serde::{Deserialize, Serialize};

/// The two mutually exclusive income tax policies.
///
/// `Old` is the legacy deduction-based regime with age-dependent slabs;
/// `New` is the simplified regime with a single slab table that ignores
/// itemized deductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Regime {
    #[default]
    Old,
    New,
}

impl Regime {
    pub const ALL: [Regime; 2] = [Regime::Old, Regime::New];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Old => "old",
            Self::New => "new",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Old => "Old Regime",
            Self::New => "New Regime",
        }
    }

    /// Case-insensitive parse of `old` / `new`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "old" => Some(Self::Old),
            "new" => Some(Self::New),
            _ => None,
        }
    }
}

impl std::fmt::Display for Regime {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Regime::parse("OLD"), Some(Regime::Old));
        assert_eq!(Regime::parse(" new "), Some(Regime::New));
        assert_eq!(Regime::parse("flat"), None);
    }

    #[test]
    fn as_str_round_trips_through_parse() {
        for regime in Regime::ALL {
            assert_eq!(Regime::parse(regime.as_str()), Some(regime));
        }
    }
}
