mod model;

pub use model::{FnModel, Model};
