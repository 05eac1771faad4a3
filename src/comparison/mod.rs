pub mod matrix;
pub mod selection;

pub use matrix::{ComparisonMatrix, Entity, MatrixRow};
pub use selection::SelectionState;
