use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::UnknownModelPolicy;
use crate::error::Result;
use crate::store::TableName;

pub const DEFAULT_CONFIG_FILE: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "EPE__";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub projection: ProjectionConfig,
    pub query: QueryConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProjectionConfig {
    /// Column holding the geography key in every input relation
    #[validate(length(min = 1))]
    pub geography_column: String,
    pub output_table: TableName,
    #[serde(default)]
    pub unknown_model_type: UnknownModelPolicy,
    pub tables: InputTables,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            geography_column: "geography".to_string(),
            output_table: TableName::from_static("energy_projection"),
            unknown_model_type: UnknownModelPolicy::default(),
            tables: InputTables::default(),
        }
    }
}

/// Names of the pre-loaded input relations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTables {
    pub energy_intensity: TableName,
    pub gdp: TableName,
    pub hdi: TableName,
    pub population: TableName,
    pub load_profiles: TableName,
}

impl Default for InputTables {
    fn default() -> Self {
        Self {
            energy_intensity: TableName::from_static("energy_intensity"),
            gdp: TableName::from_static("gdp"),
            hdi: TableName::from_static("hdi"),
            population: TableName::from_static("population"),
            load_profiles: TableName::from_static("load_profiles"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QueryConfig {
    /// Timestamp column used by time-window filtering
    #[validate(length(min = 1))]
    pub time_column: String,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            time_column: "timestamp".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then `config/default.toml` if present, then `EPE__*` env vars
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_FILE)
    }

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        let cfg: Config = figment.extract()?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.projection.validate()?;
        self.query.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use figment::Jail;

    #[test]
    fn test_defaults() {
        let cfg = Config::default();
        assert_eq!(cfg.projection.geography_column, "geography");
        assert_eq!(cfg.projection.output_table.as_str(), "energy_projection");
        assert_eq!(cfg.projection.tables.load_profiles.as_str(), "load_profiles");
        assert_eq!(cfg.query.time_column, "timestamp");
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_file_and_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "engine.toml",
                r#"
                [projection]
                geography_column = "country"
                unknown_model_type = "error"

                [projection.tables]
                gdp = "baseline__gdp"
                "#,
            )?;
            jail.set_env("EPE__QUERY__TIME_COLUMN", "timestamp_utc");

            let cfg = Config::load_from("engine.toml").unwrap();
            assert_eq!(cfg.projection.geography_column, "country");
            assert_eq!(cfg.projection.unknown_model_type, UnknownModelPolicy::Error);
            assert_eq!(cfg.projection.tables.gdp.as_str(), "baseline__gdp");
            assert_eq!(cfg.projection.tables.hdi.as_str(), "hdi");
            assert_eq!(cfg.query.time_column, "timestamp_utc");
            Ok(())
        });
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        Jail::expect_with(|_jail| {
            let cfg = Config::load_from("does-not-exist.toml").unwrap();
            assert_eq!(cfg.projection.geography_column, "geography");
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("empty_geo.toml", "[projection]\ngeography_column = \"\"\n")?;
            let err = Config::load_from("empty_geo.toml").unwrap_err();
            assert!(matches!(err, EngineError::InvalidConfig(_)));

            jail.set_env("EPE__PROJECTION__OUTPUT_TABLE", "bad name");
            let err = Config::load_from("none.toml").unwrap_err();
            assert!(matches!(err, EngineError::Config(_)));
            Ok(())
        });
    }
}
