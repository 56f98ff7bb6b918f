//! In-memory observation table shared by every pipeline stage

use std::collections::HashMap;
use std::fmt;

use super::error::MetricError;

/// Numeric columns of an [`Observation`] that a pipeline stage can compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueColumn {
    Predicted,
    Experimental,
    PredictedError,
    ExperimentalError,
}

impl ValueColumn {
    pub fn label(&self) -> &'static str {
        match self {
            ValueColumn::Predicted => "predicted",
            ValueColumn::Experimental => "experimental",
            ValueColumn::PredictedError => "predicted error",
            ValueColumn::ExperimentalError => "experimental error",
        }
    }
}

impl fmt::Display for ValueColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One row of the dataset: a prediction, its measured counterpart and the
/// residue category it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub predicted: f64,
    pub experimental: f64,
    pub category: String,
    pub predicted_error: Option<f64>,
    pub experimental_error: Option<f64>,
}

impl Observation {
    pub fn new(predicted: f64, experimental: f64, category: impl Into<String>) -> Self {
        Self {
            predicted,
            experimental,
            category: category.into(),
            predicted_error: None,
            experimental_error: None,
        }
    }

    /// Attach uncertainty estimates for weighted correlation.
    pub fn with_errors(mut self, predicted_error: f64, experimental_error: f64) -> Self {
        self.predicted_error = Some(predicted_error);
        self.experimental_error = Some(experimental_error);
        self
    }

    pub fn value(&self, column: ValueColumn) -> Option<f64> {
        match column {
            ValueColumn::Predicted => Some(self.predicted),
            ValueColumn::Experimental => Some(self.experimental),
            ValueColumn::PredictedError => self.predicted_error,
            ValueColumn::ExperimentalError => self.experimental_error,
        }
    }
}

/// True when every value equals the first one.
pub(crate) fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|pair| pair[0] == pair[1])
}

/// Ordered, immutable sequence of observations.
///
/// Stages never mutate a dataset; filtering and partitioning build new ones.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    observations: Vec<Observation>,
}

impl Dataset {
    pub fn new(observations: Vec<Observation>) -> Self {
        Self { observations }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Observation> {
        self.observations.iter()
    }

    pub fn predicted(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.predicted).collect()
    }

    pub fn experimental(&self) -> Vec<f64> {
        self.observations.iter().map(|o| o.experimental).collect()
    }

    /// Extract one numeric column.
    ///
    /// Fails with [`MetricError::InvalidError`] when an error column is
    /// requested and any row lacks that value.
    pub fn column(&self, column: ValueColumn) -> Result<Vec<f64>, MetricError> {
        self.observations
            .iter()
            .enumerate()
            .map(|(row, obs)| {
                obs.value(column).ok_or_else(|| {
                    MetricError::invalid_error(format!("row {} has no {} value", row, column))
                })
            })
            .collect()
    }

    /// True when every row carries both error estimates.
    pub fn has_errors(&self) -> bool {
        !self.observations.is_empty()
            && self
                .observations
                .iter()
                .all(|o| o.predicted_error.is_some() && o.experimental_error.is_some())
    }

    /// Distinct category labels in order of first appearance.
    pub fn categories(&self) -> Vec<String> {
        self.partition().into_iter().map(|(label, _)| label).collect()
    }

    /// Split rows by category, preserving first-seen category order and the
    /// original row order within each partition.
    pub fn partition(&self) -> Vec<(String, Dataset)> {
        let mut index: HashMap<&str, usize> = HashMap::new();
        let mut parts: Vec<(String, Vec<Observation>)> = Vec::new();

        for obs in &self.observations {
            let slot = *index.entry(obs.category.as_str()).or_insert_with(|| {
                parts.push((obs.category.clone(), Vec::new()));
                parts.len() - 1
            });
            parts[slot].1.push(obs.clone());
        }

        parts
            .into_iter()
            .map(|(label, rows)| (label, Dataset::new(rows)))
            .collect()
    }
}

impl FromIterator<Observation> for Dataset {
    fn from_iter<I: IntoIterator<Item = Observation>>(iter: I) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Observation;
    type IntoIter = std::slice::Iter<'a, Observation>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}
