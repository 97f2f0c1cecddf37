//! Annual and hourly aggregates over a materialized projection table

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::columns;
use crate::error::{EngineError, Result};
use crate::relation::{col, lit, Aggregate, Relation, SortOrder, Value};
use crate::store::{TableName, TableStore};

use super::{ConsumptionTable, PivotDimension};

/// Year selection and optional breakdown shared by the annual queries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnnualQuery {
    /// Years to report; every year in the table when unset
    pub years: Option<Vec<i64>>,
    pub breakdown: Option<PivotDimension>,
}

impl AnnualQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn years<I>(mut self, years: I) -> Self
    where
        I: IntoIterator<Item = i64>,
    {
        self.years = Some(years.into_iter().collect());
        self
    }

    pub fn breakdown(mut self, dimension: PivotDimension) -> Self {
        self.breakdown = Some(dimension);
        self
    }

    /// Total consumption per year.
    ///
    /// Without a breakdown the result has `year` and `value` columns, one row
    /// per year ascending. With one, each category of the breakdown column
    /// gets a row and each year a column.
    pub fn consumption(&self, store: &dyn TableStore, table: &TableName) -> Result<ConsumptionTable> {
        let (rel, years) = self.load(store, table)?;
        let result = match self.breakdown {
            None => rel
                .aggregate(&[columns::YEAR], columns::VALUE, Aggregate::Sum)?
                .sort_by(&[columns::YEAR])?,
            Some(dimension) => by_year(&rel, dimension, &years)?,
        };
        debug!(
            table = %table,
            breakdown = ?self.breakdown,
            rows = result.num_rows(),
            "computed annual consumption"
        );
        Ok(result.into())
    }

    /// Peak hourly demand per year.
    ///
    /// Without a breakdown `value` is the largest hourly total of each year.
    /// With one, every category reports its demand during that peak hour;
    /// the earliest hour wins when several share the peak.
    pub fn peak_demand(&self, store: &dyn TableStore, table: &TableName) -> Result<ConsumptionTable> {
        let (rel, years) = self.load(store, table)?;
        let hourly = rel.aggregate(&[columns::YEAR, columns::HOUR], columns::VALUE, Aggregate::Sum)?;
        let result = match self.breakdown {
            None => hourly
                .aggregate(&[columns::YEAR], columns::VALUE, Aggregate::Max)?
                .sort_by(&[columns::YEAR])?,
            Some(dimension) => {
                let at_peak = rel.inner_join(&peak_hours(&hourly)?, &[columns::YEAR, columns::HOUR])?;
                by_year(&at_peak, dimension, &years)?
            }
        };
        debug!(
            table = %table,
            breakdown = ?self.breakdown,
            rows = result.num_rows(),
            "computed annual peak demand"
        );
        Ok(result.into())
    }

    /// Rows of the selected years, plus those years ascending
    fn load(&self, store: &dyn TableStore, table: &TableName) -> Result<(Relation, Vec<Value>)> {
        let rel = store.table(table)?;
        let available = rel.distinct_values(columns::YEAR)?;
        let years = match &self.years {
            None => available,
            Some(requested) => {
                validate_years(&available, requested)?;
                requested
                    .iter()
                    .copied()
                    .sorted()
                    .dedup()
                    .map(Value::from)
                    .collect()
            }
        };
        let rel = rel.filter(&col(columns::YEAR).is_in(years.clone()))?;
        Ok((rel, years))
    }
}

/// Hourly demand totals of one year, largest first. Equal totals are
/// ordered by hour.
pub fn load_duration_curve(store: &dyn TableStore, table: &TableName, year: i64) -> Result<ConsumptionTable> {
    let rel = store.table(table)?;
    validate_years(&rel.distinct_values(columns::YEAR)?, &[year])?;
    let curve = rel
        .filter(&col(columns::YEAR).eq(lit(year)))?
        .aggregate(&[columns::HOUR], columns::VALUE, Aggregate::Sum)?
        .sort(&[
            (columns::VALUE, SortOrder::Descending),
            (columns::HOUR, SortOrder::Ascending),
        ])?;
    debug!(table = %table, year, hours = curve.num_rows(), "computed load duration curve");
    Ok(curve.into())
}

fn validate_years(available: &[Value], requested: &[i64]) -> Result<()> {
    let invalid: Vec<i64> = requested
        .iter()
        .copied()
        .filter(|y| !available.contains(&Value::from(*y)))
        .unique()
        .collect();
    if invalid.is_empty() {
        return Ok(());
    }
    Err(EngineError::InvalidYears {
        invalid,
        available: available.iter().map(ToString::to_string).collect(),
    })
}

/// `(year, hour)` of the largest hourly total in each year
fn peak_hours(hourly: &Relation) -> Result<Relation> {
    let ranked = hourly
        .sort(&[
            (columns::YEAR, SortOrder::Ascending),
            (columns::VALUE, SortOrder::Descending),
            (columns::HOUR, SortOrder::Ascending),
        ])?
        .select(&[columns::YEAR, columns::HOUR])?;
    let schema = ranked.schema().clone();
    let rows = ranked
        .into_rows()
        .into_iter()
        .dedup_by(|a, b| a[0] == b[0])
        .collect();
    Relation::new(schema, rows)
}

/// One row per category of `dimension`, one column per year
fn by_year(rel: &Relation, dimension: PivotDimension, years: &[Value]) -> Result<Relation> {
    let category = dimension.column();
    rel.select(&[category, columns::YEAR, columns::VALUE])?
        .pivot(columns::YEAR, columns::VALUE, Some(years))?
        .sort_by(&[category])
}
