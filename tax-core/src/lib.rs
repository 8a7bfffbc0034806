pub mod calculations;
pub mod db;
pub mod models;

pub use calculations::{RegimeComparison, ValidationError, compare, compute};
pub use db::repository::{HistoryRepository, RepositoryError};
pub use models::*;
