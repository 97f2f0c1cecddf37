use serde::Serialize;
use tracing::{info, warn};

use crate::config::ProjectionConfig;
use crate::domain::columns;
use crate::error::{EngineError, Result};
use crate::relation::Relation;
use crate::store::{TableName, TableStore};

use super::{economic_projection, residential_projection, unmodeled_sectors, ProjectionContext};

/// Outcome of one materialized projection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectionSummary {
    pub table: TableName,
    pub geography: String,
    pub rows: usize,
    pub economic_rows: usize,
    pub residential_rows: usize,
    /// Rows whose demand could not be evaluated
    pub null_values: usize,
}

/// Runs both sector pipelines against the input tables of a store
pub struct ProjectionEngine<'a> {
    store: &'a dyn TableStore,
    config: ProjectionConfig,
}

impl<'a> ProjectionEngine<'a> {
    pub fn new(store: &'a dyn TableStore, config: ProjectionConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Economic and residential pipeline outputs for `geography`, not yet
    /// combined or materialized
    pub fn project(&self, geography: &str) -> Result<(Relation, Relation)> {
        let tables = &self.config.tables;
        let energy_intensity = self.store.table(&tables.energy_intensity)?;
        let gdp = self.store.table(&tables.gdp)?;
        let hdi = self.store.table(&tables.hdi)?;
        let population = self.store.table(&tables.population)?;
        let load_profiles = self.store.table(&tables.load_profiles)?;

        for (table, rel) in [
            (&tables.energy_intensity, &energy_intensity),
            (&tables.load_profiles, &load_profiles),
        ] {
            let skipped = unmodeled_sectors(rel)?;
            if !skipped.is_empty() {
                warn!(table = %table, sectors = ?skipped, "rows with unmodeled sectors are excluded");
            }
        }

        let ctx = ProjectionContext::new(&self.config.geography_column, geography)
            .with_unknown_model_type(self.config.unknown_model_type);
        let economic = economic_projection(&ctx, &energy_intensity, &gdp, &load_profiles)?;
        let residential =
            residential_projection(&ctx, &energy_intensity, &hdi, &population, &load_profiles)?;
        Ok((economic, residential))
    }

    /// Compute the projection for `geography` and materialize it as
    /// `output_name`. An existing table of that name is never replaced.
    pub fn compute_energy_projection(
        &self,
        geography: &str,
        output_name: &TableName,
    ) -> Result<ProjectionSummary> {
        if self.store.has_table(output_name) {
            return Err(EngineError::TableExists(output_name.to_string()));
        }

        let (economic, residential) = self.project(geography)?;
        let combined = economic.union_all(&residential)?;
        let null_values = combined
            .column(columns::VALUE)?
            .into_iter()
            .filter(|v| v.is_null())
            .count();
        let summary = ProjectionSummary {
            table: output_name.clone(),
            geography: geography.to_string(),
            rows: combined.num_rows(),
            economic_rows: economic.num_rows(),
            residential_rows: residential.num_rows(),
            null_values,
        };

        self.store.materialize(output_name, combined)?;
        info!(
            table = %output_name,
            geography,
            rows = summary.rows,
            null_values,
            "computed energy projection"
        );
        Ok(summary)
    }

    /// Materialize under the configured default output table
    pub fn compute_default_projection(&self, geography: &str) -> Result<ProjectionSummary> {
        let output = self.config.output_table.clone();
        self.compute_energy_projection(geography, &output)
    }
}

/// One-shot form of [`ProjectionEngine::compute_energy_projection`]
pub fn compute_energy_projection(
    store: &dyn TableStore,
    config: &ProjectionConfig,
    geography: &str,
    output_name: &TableName,
) -> Result<ProjectionSummary> {
    ProjectionEngine::new(store, config.clone()).compute_energy_projection(geography, output_name)
}
