use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One stored observation of a currency pair's rate on a given date.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct RateRecord {
    pub id: i64,
    pub currency_pair: String,
    pub rate: f64,
    pub date_recorded: NaiveDate,
}

/// Caller-supplied fields of a record, used for both create and update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRate {
    pub currency_pair: String,
    pub rate: f64,
    pub date_recorded: NaiveDate,
}

impl NewRate {
    pub fn new(currency_pair: impl Into<String>, rate: f64, date_recorded: NaiveDate) -> Self {
        Self {
            currency_pair: currency_pair.into(),
            rate,
            date_recorded,
        }
    }
}
