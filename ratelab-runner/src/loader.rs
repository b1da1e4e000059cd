//! Input loading — TOML config and CSV market, availability and event files.
//!
//! The loaders only parse and join. Every domain correction (clamping,
//! imputation, inventory floors) is left to the core normalizer so it is
//! recorded in the rationale.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use ratelab_core::{ConfigError, RateSignal, RmsConfig, ValidatedConfig};

/// Rack rate multiplier used when the market file carries no rack rate.
pub const RACK_FALLBACK_MULTIPLIER: f64 = 1.2;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in '{}': {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("event '{name}' ends ({end}) before it starts ({start})")]
    InvertedEventRange {
        name: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("no availability for {date}: supply an availability file or an available_rooms column")]
    MissingAvailability { date: NaiveDate },
}

/// One row of the market file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRow {
    pub date: NaiveDate,
    #[serde(default)]
    pub current_rate: Option<f64>,
    #[serde(default)]
    pub competitor_median_rate: Option<f64>,
    pub demand_index: i32,
    #[serde(default)]
    pub rack_rate: Option<f64>,
    #[serde(default)]
    pub pickup_velocity: Option<f64>,
    /// Inline inventory, used when no availability file covers the date.
    #[serde(default)]
    pub available_rooms: Option<i64>,
}

/// One row of the availability file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityRow {
    pub date: NaiveDate,
    pub room_type: String,
    pub available: i64,
}

/// A demand event covering an inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketEvent {
    pub name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub impact: i32,
}

impl MarketEvent {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Load and validate an `RmsConfig` from a TOML file.
pub fn load_config(path: &Path) -> Result<ValidatedConfig, LoadError> {
    let content = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let config = RmsConfig::from_toml(&content)?.validate()?;
    tracing::info!(
        path = %path.display(),
        version = %config.version().short(),
        strategy = %config.strategy(),
        "config loaded"
    );
    Ok(config)
}

fn read_rows<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<Vec<T>, LoadError> {
    let csv_err = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(csv_err)?;
    reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(csv_err)
}

/// Market rows: `date,current_rate,competitor_median_rate,demand_index,rack_rate,pickup_velocity`.
///
/// Empty cells for optional columns read as absent.
pub fn load_market(path: &Path) -> Result<Vec<MarketRow>, LoadError> {
    let rows: Vec<MarketRow> = read_rows(path)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "market loaded");
    Ok(rows)
}

/// Availability rows `date,room_type,available`, summed per date.
pub fn load_availability(path: &Path) -> Result<BTreeMap<NaiveDate, i64>, LoadError> {
    let rows: Vec<AvailabilityRow> = read_rows(path)?;
    let totals = sum_availability(&rows);
    tracing::info!(
        path = %path.display(),
        rows = rows.len(),
        dates = totals.len(),
        "availability loaded"
    );
    Ok(totals)
}

pub fn sum_availability(rows: &[AvailabilityRow]) -> BTreeMap<NaiveDate, i64> {
    let mut totals = BTreeMap::new();
    for row in rows {
        let total = totals.entry(row.date).or_insert(0i64);
        *total = total.saturating_add(row.available);
    }
    totals
}

/// Event rows `name,start,end,impact`.
pub fn load_events(path: &Path) -> Result<Vec<MarketEvent>, LoadError> {
    let events: Vec<MarketEvent> = read_rows(path)?;
    if let Some(bad) = events.iter().find(|e| e.end < e.start) {
        return Err(LoadError::InvertedEventRange {
            name: bad.name.clone(),
            start: bad.start,
            end: bad.end,
        });
    }
    tracing::info!(path = %path.display(), events = events.len(), "events loaded");
    Ok(events)
}

/// Highest impact among events covering `date`.
pub fn event_impact_on(events: &[MarketEvent], date: NaiveDate) -> Option<i32> {
    events
        .iter()
        .filter(|e| e.covers(date))
        .map(|e| e.impact)
        .max()
}

/// Join market, availability and events into engine signals, in market order.
///
/// Availability from the availability map wins over the inline column.
/// A missing rack rate falls back to 1.2 × current rate, then to the
/// competitor median, then to 0 (which the normalizer flags).
pub fn assemble_signals(
    market: &[MarketRow],
    availability: &BTreeMap<NaiveDate, i64>,
    events: &[MarketEvent],
) -> Result<Vec<RateSignal>, LoadError> {
    market
        .iter()
        .map(|row| {
            let available_rooms = availability
                .get(&row.date)
                .copied()
                .or(row.available_rooms)
                .ok_or(LoadError::MissingAvailability { date: row.date })?;

            let rack_rate = row
                .rack_rate
                .or_else(|| row.current_rate.map(|r| r * RACK_FALLBACK_MULTIPLIER))
                .or(row.competitor_median_rate)
                .unwrap_or(0.0);

            Ok(RateSignal {
                date: row.date,
                current_rate: row.current_rate,
                competitor_median_rate: row.competitor_median_rate,
                demand_index: row.demand_index,
                available_rooms,
                rack_rate,
                event_impact: event_impact_on(events, row.date),
                pickup_velocity: row.pickup_velocity.unwrap_or(0.0),
            })
        })
        .collect()
}
