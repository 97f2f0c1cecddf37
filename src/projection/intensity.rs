use crate::domain::{columns, IntensityParameter};
use crate::error::Result;
use crate::relation::Relation;

/// Pivot long-format energy intensity (one row per parameter) into one row
/// per (geography, sector, model_type) with `intercept` and `slope` columns.
///
/// `unit` is dropped before grouping. Both coefficient columns are always
/// present; a group missing a parameter row gets a null coefficient.
pub fn pivot_energy_intensity(relation: &Relation) -> Result<Relation> {
    let rel = if relation.schema().contains(columns::UNIT) {
        relation.drop_columns(&[columns::UNIT])?
    } else {
        relation.clone()
    };
    rel.pivot(
        columns::PARAMETER,
        columns::VALUE,
        Some(&IntensityParameter::values()),
    )
}
