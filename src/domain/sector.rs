use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator};

use crate::relation::Value;

/// Demand sectors the engine models
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Sector {
    Commercial,
    Industrial,
    Transportation,
    Residential,
}

impl Sector {
    pub fn group(&self) -> SectorGroup {
        match self {
            Sector::Commercial | Sector::Industrial | Sector::Transportation => SectorGroup::Economic,
            Sector::Residential => SectorGroup::Residential,
        }
    }
}

/// Disjoint sector partitions, each evaluated by its own pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SectorGroup {
    /// Commercial, industrial and transportation, driven by GDP
    Economic,
    /// Residential, driven by HDI and population
    Residential,
}

impl SectorGroup {
    pub fn sectors(&self) -> Vec<Sector> {
        Sector::iter().filter(|s| s.group() == *self).collect()
    }

    /// Member sectors as relation values, for `is_in` predicates
    pub fn values(&self) -> Vec<Value> {
        self.sectors()
            .into_iter()
            .map(|s| Value::from(s.as_ref()))
            .collect()
    }

    /// Group of a raw sector label; `None` for sectors neither pipeline models
    pub fn of(sector: &str) -> Option<SectorGroup> {
        sector.parse::<Sector>().ok().map(|s| s.group())
    }
}
