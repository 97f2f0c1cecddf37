//! Commercial, industrial and transportation demand driven by GDP

use tracing::debug;

use crate::domain::{columns, SectorGroup};
use crate::error::Result;
use crate::relation::Relation;

use super::evaluate::evaluate_demand;
use super::filters::{filter_by_geography, filter_by_group};
use super::intensity::pivot_energy_intensity;
use super::ProjectionContext;

/// Hourly demand for the economic sectors of one geography.
///
/// Intensity coefficients are joined to GDP by geography (one row per year)
/// and then to the load profiles by (geography, sector), fanning each year out
/// across every hour. Demand is `f(intercept, slope) * gdp * profile`.
pub fn economic_projection(
    ctx: &ProjectionContext<'_>,
    energy_intensity: &Relation,
    gdp: &Relation,
    load_profiles: &Relation,
) -> Result<Relation> {
    let geo = ctx.geography_column;
    let gdp = filter_by_geography(gdp, geo, ctx.geography)?
        .select(&[geo, columns::YEAR, columns::VALUE])?
        .rename(columns::VALUE, columns::GDP_VALUE)?;
    let intensity = filter_by_geography(
        &filter_by_group(energy_intensity, SectorGroup::Economic)?,
        geo,
        ctx.geography,
    )?;
    let profiles = filter_by_geography(
        &filter_by_group(load_profiles, SectorGroup::Economic)?,
        geo,
        ctx.geography,
    )?
    .select(&[geo, columns::SECTOR, columns::HOUR, columns::VALUE])?
    .rename(columns::VALUE, columns::PROFILE_VALUE)?;

    let pivoted = pivot_energy_intensity(&intensity)?;
    let with_gdp = pivoted.inner_join(&gdp, &[geo])?;
    let joined = with_gdp.inner_join(&profiles, &[geo, columns::SECTOR])?;
    debug!(
        geography = ctx.geography,
        intensity_groups = pivoted.num_rows(),
        sector_years = with_gdp.num_rows(),
        rows = joined.num_rows(),
        "joined economic sector inputs"
    );

    evaluate_demand(&joined, ctx, SectorGroup::Economic, &[columns::GDP_VALUE])
}
