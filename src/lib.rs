//! Scenario energy projection engine
//!
//! Combines regression-based energy-intensity coefficients with economic and
//! demographic drivers and hourly load profiles into an hourly demand series
//! per geography and sector, and aggregates the materialized result.

pub mod config;
pub mod domain;
pub mod error;
pub mod projection;
pub mod query;
pub mod relation;
pub mod store;
pub mod telemetry;

pub use config::Config;
pub use error::{EngineError, Result};
pub use projection::{compute_energy_projection, ProjectionEngine, ProjectionSummary};
pub use query::{
    compute_total_electricity_consumption_time_series, load_duration_curve, AnnualQuery,
    ConsumptionQuery, ConsumptionTable, PivotDimension,
};
pub use relation::Relation;
pub use store::{MemoryStore, TableName, TableStore};
