mod background_storage;
mod geometric_reservoir_storage;
mod histogram_storage;
mod sequence_storage;
mod storage;
mod uniform_reservoir_storage;

pub use background_storage::BackgroundStorage;
pub use geometric_reservoir_storage::GeometricReservoirStorage;
pub use histogram_storage::{DEFAULT_HISTOGRAM_BINS, HistogramStorage};
pub use sequence_storage::SequenceStorage;
pub use storage::Storage;
pub use uniform_reservoir_storage::{DEFAULT_RESERVOIR_CAPACITY, UniformReservoirStorage};
