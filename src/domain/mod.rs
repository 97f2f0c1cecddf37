pub mod columns;
pub mod model;
pub mod sector;

pub use model::{Coefficients, IntensityParameter, ModelType, UnknownModelPolicy};
pub use sector::{Sector, SectorGroup};
