pub mod models;
pub mod storage;

pub use models::{HistoryQuery, HistorySummary};
pub use storage::HistoryStore;
