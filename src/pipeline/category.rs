//! Per-category metric aggregation

use std::collections::{HashMap, HashSet};

use log::warn;
use rayon::prelude::*;

use super::dataset::Dataset;
use super::error::MetricError;
use super::metrics::MetricResult;

/// Which category labels a report should cover.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategorySelection {
    /// Every label present in the data, in order of first appearance
    #[default]
    Observed,
    /// These labels in this order, first occurrence wins; labels without rows are "no data"
    Listed(Vec<String>),
}

/// Result of computing metrics for one category.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryOutcome {
    Computed(MetricResult),
    /// No rows carry this label, so there was nothing to compute.
    NoData,
    /// Rows existed but the metric function failed on them.
    Failed(MetricError),
}

impl CategoryOutcome {
    pub fn metrics(&self) -> Option<&MetricResult> {
        match self {
            CategoryOutcome::Computed(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, CategoryOutcome::NoData)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryEntry {
    pub category: String,
    pub rows: usize,
    pub outcome: CategoryOutcome,
}

/// Ordered category → outcome mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryMetrics {
    entries: Vec<CategoryEntry>,
}

impl CategoryMetrics {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[CategoryEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CategoryEntry> {
        self.entries.iter()
    }

    pub fn get(&self, category: &str) -> Option<&CategoryOutcome> {
        self.entries
            .iter()
            .find(|e| e.category == category)
            .map(|e| &e.outcome)
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.category.as_str()).collect()
    }

    /// Number of categories with a computed metric
    pub fn computed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, CategoryOutcome::Computed(_)))
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e.outcome, CategoryOutcome::Failed(_)))
            .count()
    }
}

/// Apply `metric_fn` to each category partition of `filtered`.
///
/// Partitions are evaluated in parallel; the result keeps the order given by
/// `selection`. A failing partition is recorded as
/// [`CategoryOutcome::Failed`] without affecting the others.
pub fn aggregate<F>(
    filtered: &Dataset,
    selection: &CategorySelection,
    metric_fn: F,
) -> CategoryMetrics
where
    F: Fn(&Dataset) -> Result<MetricResult, MetricError> + Sync,
{
    let partitions = filtered.partition();
    let by_label: HashMap<&str, &Dataset> = partitions
        .iter()
        .map(|(label, ds)| (label.as_str(), ds))
        .collect();

    let labels: Vec<String> = match selection {
        CategorySelection::Observed => partitions.iter().map(|(l, _)| l.clone()).collect(),
        CategorySelection::Listed(labels) => {
            let mut seen = HashSet::new();
            labels
                .iter()
                .filter(|l| seen.insert(*l))
                .cloned()
                .collect()
        }
    };

    let entries: Vec<CategoryEntry> = labels
        .into_par_iter()
        .map(|category| {
            let (rows, outcome) = match by_label.get(category.as_str()).copied() {
                Some(subset) if !subset.is_empty() => match metric_fn(subset) {
                    Ok(m) => (subset.len(), CategoryOutcome::Computed(m)),
                    Err(e) => {
                        warn!("Metrics for category '{}' failed: {}", category, e);
                        (subset.len(), CategoryOutcome::Failed(e))
                    }
                },
                _ => (0, CategoryOutcome::NoData),
            };
            CategoryEntry {
                category,
                rows,
                outcome,
            }
        })
        .collect();

    CategoryMetrics { entries }
}
