#![forbid(unsafe_code)]

//! Turning a record into the valuation shown in the drawer.

use crate::record::{OpportunityRecord, SelectedValuation};

pub trait Analyzer {
    fn analyze(&self, record: &OpportunityRecord) -> SelectedValuation;
}

/// Field-for-field projection: price becomes the valuation and the
/// description becomes the reasoning.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectionAnalyzer;

impl Analyzer for ProjectionAnalyzer {
    fn analyze(&self, record: &OpportunityRecord) -> SelectedValuation {
        record.to_valuation()
    }
}
