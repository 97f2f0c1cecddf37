//! Post-hoc aggregation over a materialized projection table

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use tracing::debug;

use crate::config::QueryConfig;
use crate::domain::columns;
use crate::error::{EngineError, Result};
use crate::relation::{col, lit, DataType, Expr, Relation, Row, Value};
use crate::store::{TableName, TableStore};

/// Categorical column a consumption series can be broken down by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PivotDimension {
    EndUse,
    Sector,
}

impl PivotDimension {
    pub fn column(&self) -> &'static str {
        match self {
            PivotDimension::EndUse => columns::END_USE,
            PivotDimension::Sector => columns::SECTOR,
        }
    }
}

/// Query options; all unset returns the table as stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionQuery {
    /// Keep rows strictly after this instant
    pub after_time: Option<NaiveDateTime>,
    /// Keep rows strictly before this instant
    pub before_time: Option<NaiveDateTime>,
    pub pivot_dimension: Option<PivotDimension>,
    pub sort_by: Option<Vec<String>>,
}

impl ConsumptionQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn after(mut self, time: NaiveDateTime) -> Self {
        self.after_time = Some(time);
        self
    }

    pub fn before(mut self, time: NaiveDateTime) -> Self {
        self.before_time = Some(time);
        self
    }

    pub fn pivot(mut self, dimension: PivotDimension) -> Self {
        self.pivot_dimension = Some(dimension);
        self
    }

    pub fn sort_by<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort_by = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Time-window predicate over `time_column`, if any bound is set
    fn time_window(&self, time_column: &str) -> Option<Expr> {
        let after = self.after_time.map(|t| col(time_column).gt(lit(t)));
        let before = self.before_time.map(|t| col(time_column).lt(lit(t)));
        match (after, before) {
            (Some(a), Some(b)) => Some(a.and(b)),
            (a, b) => a.or(b),
        }
    }

    /// Run against `table`. The source table is read once; the result is an
    /// owned snapshot.
    pub fn execute(
        &self,
        store: &dyn TableStore,
        table: &TableName,
        config: &QueryConfig,
    ) -> Result<ConsumptionTable> {
        let mut rel = store.table(table)?;

        if let Some(window) = self.time_window(&config.time_column) {
            let field = rel.schema().field(&config.time_column)?;
            if field.data_type != DataType::Timestamp {
                return Err(EngineError::TypeMismatch {
                    column: field.name.clone(),
                    expected: DataType::Timestamp,
                    found: field.data_type.to_string(),
                });
            }
            rel = rel.filter(&window)?;
        }
        if let Some(dimension) = self.pivot_dimension {
            rel = rel.pivot(dimension.column(), columns::VALUE, None)?;
        }
        if let Some(sort_by) = &self.sort_by {
            let keys: Vec<&str> = sort_by.iter().map(String::as_str).collect();
            rel = rel.sort_by(&keys)?;
        }

        debug!(
            table = %table,
            pivot = ?self.pivot_dimension,
            rows = rel.num_rows(),
            "computed consumption time series"
        );
        Ok(ConsumptionTable::from(rel))
    }
}

/// Row-oriented query result detached from the store
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl ConsumptionTable {
    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, in row order
    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

impl From<Relation> for ConsumptionTable {
    fn from(rel: Relation) -> Self {
        let columns = rel.column_names().into_iter().map(String::from).collect();
        Self {
            columns,
            rows: rel.into_rows(),
        }
    }
}

/// Total electricity consumption series from a projection table, optionally
/// windowed in time, broken down by `pivot_dimension` and sorted. Time
/// bounds apply to `config.time_column`.
pub fn compute_total_electricity_consumption_time_series(
    store: &dyn TableStore,
    table_name: &TableName,
    after_time: Option<NaiveDateTime>,
    before_time: Option<NaiveDateTime>,
    pivot_dimension: Option<PivotDimension>,
    sort_by: Option<&[&str]>,
    config: &QueryConfig,
) -> Result<ConsumptionTable> {
    let query = ConsumptionQuery {
        after_time,
        before_time,
        pivot_dimension,
        sort_by: sort_by.map(|cols| cols.iter().map(|c| c.to_string()).collect()),
    };
    query.execute(store, table_name, config)
}
