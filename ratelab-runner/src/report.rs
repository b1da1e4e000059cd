//! Reporting and export — batch summary plus JSON and CSV artifacts.
//!
//! - **JSON**: the full `BatchOutcome`, rationale included
//! - **CSV**: one row per recommended date, flattened for spreadsheets

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use ratelab_core::{Action, AdrStatus, BatchOutcome};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to serialize outcome: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Headline numbers for one batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub config_version: String,
    pub total_dates: usize,
    pub up: usize,
    pub down: usize,
    pub hold: usize,
    pub auto_approvable: usize,
    pub needs_review: usize,
    pub indeterminate: usize,
    /// Mean signed change over recommended dates.
    pub mean_magnitude_pct: Option<f64>,
    pub average_suggested: Option<f64>,
    pub adr_status: AdrStatus,
}

impl BatchSummary {
    pub fn from_outcome(outcome: &BatchOutcome) -> Self {
        let recs = &outcome.recommendations;
        let auto_approvable = recs.iter().filter(|r| r.auto_approvable).count();
        let mean_magnitude_pct = (!recs.is_empty())
            .then(|| recs.iter().map(|r| r.magnitude_pct).sum::<f64>() / recs.len() as f64);

        Self {
            config_version: outcome.config_version.clone(),
            total_dates: recs.len() + outcome.indeterminate.len(),
            up: outcome.count(Action::Up),
            down: outcome.count(Action::Down),
            hold: outcome.count(Action::Hold),
            auto_approvable,
            needs_review: recs.len() - auto_approvable,
            indeterminate: outcome.indeterminate.len(),
            mean_magnitude_pct,
            average_suggested: outcome.adr_guardrail.average_suggested,
            adr_status: outcome.adr_guardrail.status,
        }
    }
}

// ─── JSON export ────────────────────────────────────────────────────

pub fn to_json(outcome: &BatchOutcome) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(outcome)?)
}

/// Write the full outcome as pretty JSON.
pub fn export_json(outcome: &BatchOutcome, path: &Path) -> Result<(), ExportError> {
    write_file(path, to_json(outcome)?)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Columns: date, action, current_rate, suggested_price, magnitude_pct,
/// auto_approvable, rule, pressure, competitor_gap_pct, demand_index,
/// event_impact, available_rooms, weekend_premium, last_minute_discount,
/// warnings. Indeterminate dates are appended with an empty action and the
/// reason in the `rule` column.
pub fn to_csv(outcome: &BatchOutcome) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "date",
        "action",
        "current_rate",
        "suggested_price",
        "magnitude_pct",
        "auto_approvable",
        "rule",
        "pressure",
        "competitor_gap_pct",
        "demand_index",
        "event_impact",
        "available_rooms",
        "weekend_premium",
        "last_minute_discount",
        "warnings",
    ])?;

    for r in &outcome.recommendations {
        let why = &r.rationale;
        let warnings: Vec<&str> = why.warnings.iter().map(|w| w.as_str()).collect();
        wtr.write_record([
            r.date.to_string(),
            r.action.to_string(),
            format!("{:.2}", r.current_rate),
            format!("{:.2}", r.suggested_price),
            format!("{:.2}", r.magnitude_pct),
            r.auto_approvable.to_string(),
            why.rule.as_str().to_string(),
            format!("{:.4}", why.pressure.net),
            why.competitor_gap_pct
                .map(|g| format!("{:.2}", g))
                .unwrap_or_default(),
            why.demand_index.to_string(),
            why.event_impact.to_string(),
            why.available_rooms.to_string(),
            why.adjustments.weekend_premium.to_string(),
            why.adjustments.last_minute_discount.to_string(),
            warnings.join(";"),
        ])?;
    }

    for d in &outcome.indeterminate {
        let mut record = vec![String::new(); 15];
        record[0] = d.date.to_string();
        record[6] = d.reason.as_str().to_string();
        wtr.write_record(&record)?;
    }

    let data = wtr
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&data).into_owned())
}

/// Write the flattened outcome as CSV.
pub fn export_csv(outcome: &BatchOutcome, path: &Path) -> Result<(), ExportError> {
    write_file(path, to_csv(outcome)?)
}

fn write_file(path: &Path, contents: String) -> Result<(), ExportError> {
    fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "outcome exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use ratelab_core::{compute, RateSignal, RmsConfig};

    fn outcome() -> BatchOutcome {
        let cfg = RmsConfig::default().validate().unwrap();
        let day = |d| NaiveDate::from_ymd_opt(2025, 6, d).unwrap();
        let mut missing = RateSignal::new(day(13), 0.0, 0.0);
        missing.current_rate = None;
        missing.competitor_median_rate = None;
        let signals = vec![
            RateSignal::new(day(11), 150.0, 180.0).with_demand(8).with_rooms(2),
            RateSignal::new(day(12), 152.0, 150.0),
            missing,
        ];
        compute(&signals, &cfg)
    }

    #[test]
    fn summary_counts() {
        let s = BatchSummary::from_outcome(&outcome());
        assert_eq!(s.total_dates, 3);
        assert_eq!(s.up, 1);
        assert_eq!(s.hold, 1);
        assert_eq!(s.down, 0);
        assert_eq!(s.indeterminate, 1);
        assert_eq!(s.auto_approvable + s.needs_review, 2);
        assert!(s.mean_magnitude_pct.unwrap() > 0.0);
    }

    #[test]
    fn summary_of_empty_batch() {
        let cfg = RmsConfig::default().validate().unwrap();
        let s = BatchSummary::from_outcome(&compute(&[], &cfg));
        assert_eq!(s.total_dates, 0);
        assert_eq!(s.mean_magnitude_pct, None);
        assert_eq!(s.adr_status, AdrStatus::NoData);
    }

    #[test]
    fn csv_has_header_and_one_row_per_date() {
        let csv = to_csv(&outcome()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("date,action,current_rate,suggested_price"));
        assert!(lines[1].starts_with("2025-06-11,up,150.00,"));
        assert!(lines[1].contains("scarcity_override"));
        assert!(lines[2].starts_with("2025-06-12,hold,152.00,152.00,0.00,true,within_band"));
        assert!(lines[3].starts_with("2025-06-13,,,,,,missing_reference_prices"));
    }

    #[test]
    fn json_contains_rationale() {
        let json = to_json(&outcome()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["recommendations"][0]["rationale"]["rule"], "scarcity_override");
        assert_eq!(value["indeterminate"][0]["reason"], "missing_reference_prices");
    }
}
