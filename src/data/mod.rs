mod load;
mod model;
mod sample;

pub use load::DatasetSource;
pub use model::{Clip, Dataset, Project};
pub use sample::sample_dataset;

#[cfg(test)]
pub(crate) use model::tests as fixtures;
