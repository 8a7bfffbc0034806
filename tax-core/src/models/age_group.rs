use serde::{Deserialize, Serialize};

/// Taxpayer age bracket. Only the old regime has age-specific slabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AgeGroup {
    #[default]
    #[serde(rename = "<60")]
    Under60,
    #[serde(rename = "60-80")]
    SixtyTo80,
    #[serde(rename = ">80")]
    Over80,
}

impl AgeGroup {
    pub const ALL: [AgeGroup; 3] = [AgeGroup::Under60, AgeGroup::SixtyTo80, AgeGroup::Over80];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Under60 => "<60",
            Self::SixtyTo80 => "60-80",
            Self::Over80 => ">80",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Under60 => "Below 60",
            Self::SixtyTo80 => "60 to 80",
            Self::Over80 => "Above 80",
        }
    }

    /// Accepts the short codes (`<60`, `60-80`, `>80`) as well as the
    /// shell-friendly spellings `under-60` and `over-80`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "<60" | "under-60" | "under60" => Some(Self::Under60),
            "60-80" => Some(Self::SixtyTo80),
            ">80" | "over-80" | "over80" => Some(Self::Over80),
            _ => None,
        }
    }
}

impl std::fmt::Display for AgeGroup {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
