//! Residential demand driven by human development index and population

use tracing::debug;

use crate::domain::{columns, SectorGroup};
use crate::error::Result;
use crate::relation::Relation;

use super::evaluate::evaluate_demand;
use super::filters::{filter_by_geography, filter_by_group};
use super::intensity::pivot_energy_intensity;
use super::ProjectionContext;

/// Hourly residential demand for one geography.
///
/// Coefficients are joined to HDI by geography, then to population by
/// (geography, year), then to the residential load profile by
/// (geography, sector). Demand is `f(intercept, slope) * hdi * population * profile`.
pub fn residential_projection(
    ctx: &ProjectionContext<'_>,
    energy_intensity: &Relation,
    hdi: &Relation,
    population: &Relation,
    load_profiles: &Relation,
) -> Result<Relation> {
    let geo = ctx.geography_column;
    let hdi = filter_by_geography(hdi, geo, ctx.geography)?
        .select(&[geo, columns::YEAR, columns::VALUE])?
        .rename(columns::VALUE, columns::HDI_VALUE)?;
    let population = filter_by_geography(population, geo, ctx.geography)?
        .select(&[geo, columns::YEAR, columns::VALUE])?
        .rename(columns::VALUE, columns::POP_VALUE)?;
    let intensity = filter_by_geography(
        &filter_by_group(energy_intensity, SectorGroup::Residential)?,
        geo,
        ctx.geography,
    )?;
    let profiles = filter_by_geography(
        &filter_by_group(load_profiles, SectorGroup::Residential)?,
        geo,
        ctx.geography,
    )?
    .select(&[geo, columns::SECTOR, columns::HOUR, columns::VALUE])?
    .rename(columns::VALUE, columns::PROFILE_VALUE)?;

    let pivoted = pivot_energy_intensity(&intensity)?;
    let drivers = pivoted
        .inner_join(&hdi, &[geo])?
        .inner_join(&population, &[geo, columns::YEAR])?;
    let joined = drivers.inner_join(&profiles, &[geo, columns::SECTOR])?;
    debug!(
        geography = ctx.geography,
        intensity_groups = pivoted.num_rows(),
        sector_years = drivers.num_rows(),
        rows = joined.num_rows(),
        "joined residential inputs"
    );

    evaluate_demand(
        &joined,
        ctx,
        SectorGroup::Residential,
        &[columns::HDI_VALUE, columns::POP_VALUE],
    )
}
