pub use crate::config::*;

/// Incrementally assembles raw observations and reshapes them into an
/// [`AnalysisTable`].
///
/// Using the builder should be considered when the observations do not come
/// from a file reader, for instance in tests or embedding applications.
///
/// ```
/// pub use labour_stats::builder::TableBuilder;
/// pub use labour_stats::ReshapeRules;
/// # use labour_stats::StatsError;
///
/// let mut builder = TableBuilder::new(&ReshapeRules::DEFAULT_RULES);
/// builder.add_observation_simple(
///     2020, "Alberta", "Full-time employment", "Total, all industries",
///     "Females", "25 to 54 years", Some(500_000.0))?;
/// builder.add_observation_simple(
///     2020, "Alberta", "Full-time employment", "Total, all industries",
///     "Males", "25 to 54 years", Some(700_000.0))?;
///
/// let table = builder.build()?;
/// assert_eq!(table.len(), 2);
///
/// # Ok::<(), StatsError>(())
/// ```
pub struct TableBuilder {
    pub(crate) _rules: ReshapeRules,
    pub(crate) _observations: Vec<Observation>,
}

impl TableBuilder {
    pub fn new(rules: &ReshapeRules) -> TableBuilder {
        TableBuilder {
            _rules: rules.clone(),
            _observations: Vec::new(),
        }
    }

    /// Adds one raw observation from its parts.
    ///
    /// The sex is the raw extract label ("Females", "Males" or
    /// "Both sexes"); aggregate rows are accepted here and filtered out
    /// when the table is built.
    pub fn add_observation_simple(
        &mut self,
        date: i32,
        geography: &str,
        labour_status: &str,
        industry: &str,
        sex: &str,
        age_group: &str,
        value: Option<f64>,
    ) -> Result<(), StatsError> {
        self.add_observation(&Observation {
            date,
            geography: geography.to_string(),
            labour_status: labour_status.to_string(),
            industry: industry.to_string(),
            sex: sex.to_string(),
            age_group: age_group.to_string(),
            value,
        })
    }

    pub fn add_observation(&mut self, observation: &Observation) -> Result<(), StatsError> {
        self._observations.push(observation.clone());
        Ok(())
    }

    /// Consumes the builder and reshapes the collected observations.
    pub fn build(self) -> Result<AnalysisTable, StatsError> {
        crate::build_analysis_table(&self._observations, &self._rules)
    }
}
