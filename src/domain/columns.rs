//! Column names shared by the input and output relations

pub const SECTOR: &str = "sector";
pub const YEAR: &str = "year";
pub const HOUR: &str = "hour";
pub const VALUE: &str = "value";
pub const UNIT: &str = "unit";
pub const PARAMETER: &str = "parameter";
pub const MODEL_TYPE: &str = "model_type";
pub const END_USE: &str = "end_use";

pub const INTERCEPT: &str = "intercept";
pub const SLOPE: &str = "slope";

// Driver and profile values carried through the pipeline joins
pub const GDP_VALUE: &str = "gdp_value";
pub const HDI_VALUE: &str = "hdi_value";
pub const POP_VALUE: &str = "pop_value";
pub const PROFILE_VALUE: &str = "profile_value";
