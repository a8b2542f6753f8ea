use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;

use crate::models::{MAX_SCORE, MIN_SCORE, ScoredParcel};

/// Number of score columns every report carries (scores 1 through 5).
pub const SCORE_COLUMNS: usize = (MAX_SCORE - MIN_SCORE + 1) as usize;

/// One row of the overall score distribution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreBucket {
    pub compatibility_score: i64,
    pub parcel_count: u64,
    /// Share of *all* parcels, in percent. 0.0 for an empty parcel set.
    pub percentage: f64,
}

/// City-wide score distribution. Always exactly [`SCORE_COLUMNS`] rows,
/// scores ascending, zero-filled — comparable bar charts across runs need
/// every score present even when its count is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct OverallSummary {
    pub rows: Vec<ScoreBucket>,
}

/// One land-use class with its parcel counts per score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassRow {
    pub land_use: String,
    /// Counts for scores 1..=5, ascending, zero-filled.
    pub counts: [u64; SCORE_COLUMNS],
    pub total_parcels: u64,
}

/// Per-class breakdown, rows sorted by class label for stable output.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassBreakdown {
    pub rows: Vec<ClassRow>,
}

/// Tabulates the city-wide distribution of final scores.
pub fn overall_summary(parcels: &[ScoredParcel]) -> OverallSummary {
    let mut counts = [0u64; SCORE_COLUMNS];
    for parcel in parcels {
        if let Some(slot) = score_slot(parcel.compat_score) {
            counts[slot] += 1;
        }
    }
    let total = parcels.len() as f64;
    let rows = (MIN_SCORE..=MAX_SCORE)
        .map(|score| {
            let parcel_count = counts[(score - MIN_SCORE) as usize];
            let percentage = if parcels.is_empty() {
                0.0
            } else {
                parcel_count as f64 / total * 100.0
            };
            ScoreBucket {
                compatibility_score: score,
                parcel_count,
                percentage,
            }
        })
        .collect();
    OverallSummary { rows }
}

/// Tabulates score counts per land-use class, plus a per-class total.
///
/// The total counts every parcel of the class, including any whose score
/// fell outside 1..=5 (possible with an out-of-range matrix, which the
/// engine tolerates).
pub fn class_breakdown(parcels: &[ScoredParcel]) -> ClassBreakdown {
    let mut by_class: BTreeMap<&str, ([u64; SCORE_COLUMNS], u64)> = BTreeMap::new();
    for parcel in parcels {
        let entry = by_class.entry(parcel.land_use.as_str()).or_default();
        entry.1 += 1;
        if let Some(slot) = score_slot(parcel.compat_score) {
            entry.0[slot] += 1;
        }
    }
    let rows = by_class
        .into_iter()
        .map(|(land_use, (counts, total_parcels))| ClassRow {
            land_use: land_use.to_string(),
            counts,
            total_parcels,
        })
        .collect();
    ClassBreakdown { rows }
}

fn score_slot(score: i64) -> Option<usize> {
    (MIN_SCORE..=MAX_SCORE)
        .contains(&score)
        .then(|| (score - MIN_SCORE) as usize)
}

impl OverallSummary {
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["compatibility_score", "parcel_count", "percentage"])?;
        for row in &self.rows {
            wtr.write_record([
                row.compatibility_score.to_string(),
                row.parcel_count.to_string(),
                format!("{:.2}", row.percentage),
            ])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ClassBreakdown {
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut header = vec!["land_use".to_string()];
        header.extend((MIN_SCORE..=MAX_SCORE).map(|score| format!("score_{score}")));
        header.push("total_parcels".to_string());
        wtr.write_record(&header)?;

        for row in &self.rows {
            let mut record = vec![row.land_use.clone()];
            record.extend(row.counts.iter().map(|count| count.to_string()));
            record.push(row.total_parcels.to_string());
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
