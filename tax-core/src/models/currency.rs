use serde::{Deserialize, Serialize};

/// Display currency. The engine never converts amounts; the symbol is
/// only echoed into results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Inr,
    Usd,
    Eur,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Inr => "INR",
            Self::Usd => "USD",
            Self::Eur => "EUR",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Inr => "₹",
            Self::Usd => "$",
            Self::Eur => "€",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INR" => Some(Self::Inr),
            "USD" => Some(Self::Usd),
            "EUR" => Some(Self::Eur),
            _ => None,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbols_match_codes() {
        assert_eq!(Currency::parse("inr").map(|c| c.symbol()), Some("₹"));
        assert_eq!(Currency::parse("USD").map(|c| c.symbol()), Some("$"));
        assert_eq!(Currency::parse("eur").map(|c| c.symbol()), Some("€"));
        assert_eq!(Currency::parse("GBP"), None);
    }
}
