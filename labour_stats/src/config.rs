// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// Raw label used by the source extract for female observations.
pub const RAW_FEMALES: &str = "Females";
/// Raw label used by the source extract for male observations.
pub const RAW_MALES: &str = "Males";
/// Raw label for the aggregate rows. These duplicate the sum of the two
/// sex-specific rows and are discarded during reshaping.
pub const RAW_BOTH_SEXES: &str = "Both sexes";

/// One raw row of the source statistical extract.
///
/// Values are person counts. The published extract stores thousands of
/// persons; callers are expected to rescale before handing observations to
/// this crate so that the core stays unit-agnostic.
#[derive(PartialEq, Debug, Clone)]
pub struct Observation {
    /// Reference year of the observation.
    pub date: i32,
    /// Province name, as published.
    pub geography: String,
    /// Labour force characteristic, e.g. "Full-time employment".
    pub labour_status: String,
    /// NAICS industry label, including aggregates such as
    /// "Total, all industries".
    pub industry: String,
    /// Raw sex label: one of "Females", "Males" or "Both sexes".
    pub sex: String,
    /// Age group label, e.g. "25 to 54 years".
    pub age_group: String,
    /// Person count. `None` marks a suppressed or missing cell; such rows
    /// are discarded before any transformation.
    pub value: Option<f64>,
}

// ******** Output data structures *********

/// Sex dimension of the reshaped table.
///
/// The aggregate "Both sexes" rows of the extract have no variant here:
/// they are dropped during reshaping and can never appear downstream.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    pub fn label(&self) -> &'static str {
        match self {
            Sex::Female => "Female",
            Sex::Male => "Male",
        }
    }
}

/// One reshaped row: a sex-specific count annotated with the paired total
/// and this sex's percentage share.
///
/// The combination (date, geography, labour_status, industry, age_group,
/// sex) is unique within a table.
#[derive(PartialEq, Debug, Clone)]
pub struct AnalysisRow {
    pub date: i32,
    pub geography: String,
    pub labour_status: String,
    pub industry: String,
    pub age_group: String,
    pub sex: Sex,
    /// Person count for this sex.
    pub value: f64,
    /// Female value + male value of the pair. Identical on both rows.
    pub total: f64,
    /// value / total * 100, rounded to 2 decimal places.
    pub percent: f64,
}

/// The reshaped, percentage-annotated table that all queries operate
/// against.
///
/// Built exactly once and never mutated afterwards: the rows are only
/// reachable through shared references, so a table can be handed to any
/// number of concurrent readers without synchronization.
#[derive(PartialEq, Debug, Clone)]
pub struct AnalysisTable {
    // Sorted by (date, geography, labour_status, industry, age_group, sex)
    // at construction, so identical inputs reshape to identical tables.
    pub(crate) rows: Vec<AnalysisRow>,
}

impl AnalysisTable {
    pub fn rows(&self) -> &[AnalysisRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The distinct age groups present in the table, sorted. Used to
    /// populate the age group selector of the dashboard.
    pub fn age_groups(&self) -> Vec<String> {
        let mut res: Vec<String> = self.rows.iter().map(|r| r.age_group.clone()).collect();
        res.sort();
        res.dedup();
        res
    }
}

/// The selection state driving a single query: one value per dashboard
/// control.
///
/// Membership in the allowed value sets is not validated. An unknown value
/// matches nothing and yields an empty result, not an error.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Criteria {
    pub year: i32,
    pub age_group: String,
    pub industry: String,
    pub province: String,
    pub labour_status: String,
}

/// The two projections produced by one query.
#[derive(PartialEq, Debug, Clone)]
pub struct QueryOutput {
    /// Rows for the choropleth view: one time/industry/age slice across all
    /// provinces, both sexes, all labour force characteristics.
    pub map_rows: Vec<AnalysisRow>,
    /// Rows for the bar view: one province/industry/age/labour slice across
    /// the full year range, both sexes.
    pub bar_rows: Vec<AnalysisRow>,
}

/// Errors that prevent the table from being built.
///
/// Anomalies that concern a single pair (a missing counterpart sex, a zero
/// total) are not errors: those pairs are excluded during reshaping.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum StatsError {
    /// No paired observation survived the reshape. Serving queries against
    /// an empty snapshot is never meaningful.
    EmptyTable,
    /// Two raw rows carry the same dimension key and sex. The input shape
    /// is malformed and there is no safe way to pick one.
    DuplicateObservation,
}

impl Error for StatsError {}

impl Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::EmptyTable => write!(f, "no paired observations after reshaping"),
            StatsError::DuplicateObservation => {
                write!(f, "duplicate observation for one dimension key and sex")
            }
        }
    }
}

// ********* Configuration **********

/// Rounding applied to the percentage shares, at 2 decimal places.
///
/// The same mode is applied to both halves of a pair, so the two shares of
/// a pair always sum to 100 within rounding tolerance.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum RoundingMode {
    /// Ties round to the even neighbour. This matches the rounding of the
    /// published reference tables.
    HalfEven,
    /// Ties round away from zero.
    HalfUp,
}

/// The options that govern one reshape run.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ReshapeRules {
    pub rounding_mode: RoundingMode,
}

impl ReshapeRules {
    pub const DEFAULT_RULES: ReshapeRules = ReshapeRules {
        rounding_mode: RoundingMode::HalfEven,
    };
}
