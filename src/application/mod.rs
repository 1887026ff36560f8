pub mod errors;
pub mod side_effects;
pub mod usecases;
