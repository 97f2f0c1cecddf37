//! Scenario energy projection: per-sector pipelines and their assembly

pub mod assembler;
pub mod economic;
pub mod evaluate;
pub mod filters;
pub mod intensity;
pub mod residential;

pub use assembler::{compute_energy_projection, ProjectionEngine, ProjectionSummary};
pub use economic::economic_projection;
pub use evaluate::output_columns;
pub use filters::{filter_by_geography, filter_by_group, unmodeled_sectors};
pub use intensity::pivot_energy_intensity;
pub use residential::residential_projection;

use crate::domain::UnknownModelPolicy;

/// Parameters shared by both pipelines for one projection run
#[derive(Debug, Clone, Copy)]
pub struct ProjectionContext<'a> {
    pub geography_column: &'a str,
    pub geography: &'a str,
    pub unknown_model_type: UnknownModelPolicy,
}

impl<'a> ProjectionContext<'a> {
    pub fn new(geography_column: &'a str, geography: &'a str) -> Self {
        Self {
            geography_column,
            geography,
            unknown_model_type: UnknownModelPolicy::default(),
        }
    }

    pub fn with_unknown_model_type(mut self, policy: UnknownModelPolicy) -> Self {
        self.unknown_model_type = policy;
        self
    }
}
