pub mod api;
pub mod config;
pub mod error;
pub mod exchange_rate;
pub mod rate_store;

pub use error::StoreError;
pub use exchange_rate::{NewRate, RateRecord};
pub use rate_store::RateStore;
