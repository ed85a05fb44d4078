mod marginal_imputer;
mod marginal_sampler;

pub use marginal_imputer::MarginalImputer;
pub use marginal_sampler::{MarginalSampler, SamplingStrategy};
