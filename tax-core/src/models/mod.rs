mod age_group;
mod currency;
mod history_entry;
mod preferences;
mod regime;
mod tax_input;
mod tax_result;

pub use age_group::AgeGroup;
pub use currency::Currency;
pub use history_entry::{HistoryEntry, NewHistoryEntry};
pub use preferences::Preferences;
pub use regime::Regime;
pub use tax_input::TaxInput;
pub use tax_result::TaxResult;
