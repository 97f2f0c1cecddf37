pub mod annual;
pub mod consumption;

pub use annual::{load_duration_curve, AnnualQuery};
pub use consumption::{
    compute_total_electricity_consumption_time_series, ConsumptionQuery, ConsumptionTable,
    PivotDimension,
};
