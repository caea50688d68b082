use time::PrimitiveDateTime;

#[cfg(feature = "serde")]
time::serde::format_description!(
    record_timestamp,
    PrimitiveDateTime,
    "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
);

/// One stored billing entry.
///
/// Every numeric column is nullable: readings that were missing on intake are
/// persisted as NULL, and SQLite stores a NaN result the same way.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElectricityRecord {
    pub id: i64,
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub rate: Option<f64>,
    pub usage: Option<f64>,
    pub amount: Option<f64>,
    pub record_month: Option<String>,
    #[cfg_attr(feature = "serde", serde(with = "record_timestamp"))]
    pub timestamp: PrimitiveDateTime,
}

/// A record about to be inserted, with `usage` and `amount` already derived.
///
/// The derived values are a snapshot taken here; nothing recomputes them later.
#[derive(Debug, Clone, PartialEq)]
pub struct NewElectricityRecord {
    pub start: Option<f64>,
    pub end: Option<f64>,
    pub rate: Option<f64>,
    pub usage: Option<f64>,
    pub amount: Option<f64>,
    pub record_month: Option<String>,
}

impl NewElectricityRecord {
    /// Derive `usage = end - start` and `amount = usage * rate`.
    ///
    /// A derived value is absent when any of its inputs is absent.
    pub fn from_readings(
        start: Option<f64>,
        end: Option<f64>,
        rate: Option<f64>,
        record_month: Option<String>,
    ) -> Self {
        let usage = start.zip(end).map(|(start, end)| end - start);
        let amount = usage.zip(rate).map(|(usage, rate)| usage * rate);

        Self {
            start,
            end,
            rate,
            usage,
            amount,
            record_month,
        }
    }
}
