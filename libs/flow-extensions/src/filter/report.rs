//! Per-run summary of what happened to each boundary.

use crate::ops::ExtrusionSummary;
use serde::Serialize;

/// Outcome for one boundary, in extraction order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum BoundaryOutcome {
    Extruded(ExtrusionSummary),
    /// Excluded by the `boundary_ids` selection
    NotSelected,
    /// Malformed boundary or failed transition fit
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoundaryReport {
    /// Extraction index of the boundary
    pub index: usize,
    pub outcome: BoundaryOutcome,
}

/// Summary returned alongside the extended mesh.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ExtensionReport {
    pub boundaries: Vec<BoundaryReport>,
}

impl ExtensionReport {
    pub fn push(&mut self, index: usize, outcome: BoundaryOutcome) {
        self.boundaries.push(BoundaryReport { index, outcome });
    }

    /// Outcome for the boundary with extraction index `index`.
    pub fn outcome(&self, index: usize) -> Option<&BoundaryOutcome> {
        self.boundaries
            .iter()
            .find(|report| report.index == index)
            .map(|report| &report.outcome)
    }

    pub fn extruded_count(&self) -> usize {
        self.summaries().count()
    }

    pub fn skipped_count(&self) -> usize {
        self.boundaries
            .iter()
            .filter(|report| matches!(report.outcome, BoundaryOutcome::Skipped { .. }))
            .count()
    }

    pub fn points_added(&self) -> usize {
        self.summaries().map(|summary| summary.points_added).sum()
    }

    pub fn triangles_added(&self) -> usize {
        self.summaries().map(|summary| summary.triangles_added).sum()
    }

    fn summaries(&self) -> impl Iterator<Item = &ExtrusionSummary> {
        self.boundaries.iter().filter_map(|report| match &report.outcome {
            BoundaryOutcome::Extruded(summary) => Some(summary),
            _ => None,
        })
    }
}
