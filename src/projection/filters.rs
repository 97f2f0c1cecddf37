use itertools::Itertools;

use crate::domain::{columns, SectorGroup};
use crate::error::Result;
use crate::relation::{col, lit, Relation, Value};

/// Rows whose sector belongs to `group`
pub fn filter_by_group(relation: &Relation, group: SectorGroup) -> Result<Relation> {
    relation.filter(&col(columns::SECTOR).is_in(group.values()))
}

/// Rows for a single geography
pub fn filter_by_geography(relation: &Relation, geography_column: &str, geography: &str) -> Result<Relation> {
    relation.filter(&col(geography_column).eq(lit(geography)))
}

/// Sector labels present in `relation` that neither pipeline models, with
/// their row counts, sorted by label
pub fn unmodeled_sectors(relation: &Relation) -> Result<Vec<(String, usize)>> {
    let labels = relation
        .column(columns::SECTOR)?
        .into_iter()
        .filter_map(|value| match value {
            Value::Utf8(s) if SectorGroup::of(s).is_some() => None,
            Value::Utf8(s) => Some(s.clone()),
            other => Some(other.to_string()),
        });
    Ok(labels.counts().into_iter().sorted().collect())
}
