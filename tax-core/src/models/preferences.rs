use serde::{Deserialize, Serialize};

use crate::models::{Currency, Regime};

/// Selections remembered between runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Preferences {
    pub regime: Regime,
    pub currency: Currency,
}
