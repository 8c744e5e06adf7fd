/*!
Reshaping and query core for sex-paired labour force statistics.

The crate turns a long-format statistical extract (one row per observation,
sex as a categorical column) into an [`AnalysisTable`]: one row per
(date, geography, labour status, industry, age group, sex) combination,
annotated with the paired total and this sex's percentage share. The table
is built once with [`build_analysis_table`] and then queried any number of
times with [`run_query`].

See the [`quick_start`] module for an end-to-end walkthrough and the
[`manual`] module for the input and configuration reference.
*/

mod config;
use log::{debug, info};

use std::collections::HashMap;

pub use crate::config::*;

pub mod builder;
pub mod manual;
pub mod quick_start;

// **** Private structures ****

// The dimension key shared by the female and male halves of a pair.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
struct SliceKey {
    date: i32,
    geography: String,
    labour_status: String,
    industry: String,
    age_group: String,
}

impl SliceKey {
    fn of(obs: &Observation) -> SliceKey {
        SliceKey {
            date: obs.date,
            geography: obs.geography.clone(),
            labour_status: obs.labour_status.clone(),
            industry: obs.industry.clone(),
            age_group: obs.age_group.clone(),
        }
    }
}

// The two sex-specific values collected for one key before pairing.
#[derive(PartialEq, Debug, Clone, Copy, Default)]
struct PairedValues {
    female: Option<f64>,
    male: Option<f64>,
}

// Rows dropped before and during pairing, for the startup log.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
struct ReshapeDrops {
    missing_value: usize,
    aggregate_sex: usize,
    unpaired: usize,
    zero_total: usize,
}

/// Reshapes raw observations into an [`AnalysisTable`].
///
/// This is a pure function, intended to be called exactly once at startup.
/// Rows with a missing value and the "Both sexes" aggregate rows are
/// discarded first. The remaining rows are paired by dimension key: a key
/// present for only one sex has no defined share and is excluded, as is a
/// pair whose total is zero. Each surviving pair produces two rows, one per
/// sex, both carrying the shared total.
///
/// The returned rows are sorted by dimension key and sex, so the same input
/// always reshapes to the same table.
pub fn build_analysis_table(
    observations: &[Observation],
    rules: &ReshapeRules,
) -> Result<AnalysisTable, StatsError> {
    info!(
        "build_analysis_table: processing {} raw observations, rules: {:?}",
        observations.len(),
        rules
    );

    let mut drops = ReshapeDrops::default();
    let mut pairs: HashMap<SliceKey, PairedValues> = HashMap::new();

    for obs in observations.iter() {
        let value = match obs.value {
            Some(v) => v,
            None => {
                drops.missing_value += 1;
                continue;
            }
        };
        let sex = match obs.sex.as_str() {
            RAW_FEMALES => Sex::Female,
            RAW_MALES => Sex::Male,
            // "Both sexes" and anything else that is not sex-specific.
            _ => {
                drops.aggregate_sex += 1;
                continue;
            }
        };
        let entry = pairs.entry(SliceKey::of(obs)).or_default();
        let slot = match sex {
            Sex::Female => &mut entry.female,
            Sex::Male => &mut entry.male,
        };
        if slot.is_some() {
            debug!(
                "build_analysis_table: second {:?} observation for {:?}",
                sex,
                SliceKey::of(obs)
            );
            return Err(StatsError::DuplicateObservation);
        }
        *slot = Some(value);
    }

    debug!("build_analysis_table: {} candidate pairs", pairs.len());

    let mut rows: Vec<AnalysisRow> = Vec::new();
    for (key, pair) in pairs.into_iter() {
        let (value_f, value_m) = match (pair.female, pair.male) {
            (Some(f), Some(m)) => (f, m),
            _ => {
                drops.unpaired += 1;
                continue;
            }
        };
        let total = value_f + value_m;
        if total == 0.0 {
            drops.zero_total += 1;
            continue;
        }
        let percent_f = round_percent(value_f / total * 100.0, rules.rounding_mode);
        let percent_m = round_percent(value_m / total * 100.0, rules.rounding_mode);
        rows.push(make_row(&key, Sex::Female, value_f, total, percent_f));
        rows.push(make_row(&key, Sex::Male, value_m, total, percent_m));
    }

    info!(
        "build_analysis_table: dropped {} missing values, {} aggregate rows, {} unpaired keys, {} zero totals",
        drops.missing_value, drops.aggregate_sex, drops.unpaired, drops.zero_total
    );

    if rows.is_empty() {
        return Err(StatsError::EmptyTable);
    }

    rows.sort_by(|a, b| {
        (
            a.date,
            &a.geography,
            &a.labour_status,
            &a.industry,
            &a.age_group,
            a.sex,
        )
            .cmp(&(
                b.date,
                &b.geography,
                &b.labour_status,
                &b.industry,
                &b.age_group,
                b.sex,
            ))
    });

    info!("build_analysis_table: {} rows in the analysis table", rows.len());
    Ok(AnalysisTable { rows })
}

/// Projects the two chart subsets for one selection.
///
/// Both projections are conjunctive equality filters over the immutable
/// table, preserving table order. The precomputed percentages are reused
/// verbatim. Criteria that match nothing yield empty vectors, never an
/// error, and repeating an identical query returns an identical result.
pub fn run_query(table: &AnalysisTable, criteria: &Criteria) -> QueryOutput {
    debug!("run_query: criteria: {:?}", criteria);

    let map_rows: Vec<AnalysisRow> = table
        .rows
        .iter()
        .filter(|r| {
            r.date == criteria.year
                && r.age_group == criteria.age_group
                && r.industry == criteria.industry
        })
        .cloned()
        .collect();

    let bar_rows: Vec<AnalysisRow> = table
        .rows
        .iter()
        .filter(|r| {
            r.age_group == criteria.age_group
                && r.industry == criteria.industry
                && r.geography == criteria.province
                && r.labour_status == criteria.labour_status
        })
        .cloned()
        .collect();

    debug!(
        "run_query: {} map rows, {} bar rows",
        map_rows.len(),
        bar_rows.len()
    );
    QueryOutput { map_rows, bar_rows }
}

fn make_row(key: &SliceKey, sex: Sex, value: f64, total: f64, percent: f64) -> AnalysisRow {
    AnalysisRow {
        date: key.date,
        geography: key.geography.clone(),
        labour_status: key.labour_status.clone(),
        industry: key.industry.clone(),
        age_group: key.age_group.clone(),
        sex,
        value,
        total,
        percent,
    }
}

// Rounding at 2 decimal places. Ties are detected with a small tolerance:
// a share like 0.125 is not exactly representable, and the tie must not
// depend on which side of .5 the floating point representation landed.
fn round_percent(x: f64, mode: RoundingMode) -> f64 {
    let scaled = x * 100.0;
    let down = scaled.floor();
    let is_tie = (scaled - down - 0.5).abs() < 1e-9;
    let rounded = match (mode, is_tie) {
        (_, false) => scaled.round(),
        (RoundingMode::HalfUp, true) => down + 1.0,
        (RoundingMode::HalfEven, true) => {
            if (down as i64) % 2 == 0 {
                down
            } else {
                down + 1.0
            }
        }
    };
    rounded / 100.0
}
