//! Core business logic abstractions

pub mod config;
pub mod currency;
pub mod log;
pub mod rate;
pub mod session;
pub mod watcher;

// Re-export main types for cleaner imports
pub use currency::CurrencyPair;
pub use rate::{FetchError, RateProvider, RateSnapshot};
pub use session::{MissingApiKey, Session, SessionState};
pub use watcher::RateWatcher;
