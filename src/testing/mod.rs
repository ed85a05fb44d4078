pub mod dummies;
pub mod stubs;

pub use stubs::{CallCounter, SpyModel, VecStream};
