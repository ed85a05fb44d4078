pub mod spy_model;
pub mod vec_stream;

pub use spy_model::{CallCounter, SpyModel};
pub use vec_stream::VecStream;
