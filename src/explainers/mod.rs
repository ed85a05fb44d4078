mod incremental_sage;
mod loss;
mod params;

pub use incremental_sage::IncrementalSage;
pub use loss::LossKind;
pub use params::{
    BackgroundChoice, BackgroundKind, FixedDefaultParams, GeometricReservoirParams,
    HistogramParams, NoParams, SageParams, SmoothingParams, StorageChoice, StorageKind,
    StorageParams, TrackerChoice, TrackerKind,
};
