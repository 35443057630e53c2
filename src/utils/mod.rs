/// Group of useful computations
pub mod computations;
mod direction;
pub mod indices;
mod keyed_vec;
/// Sorting algorithms
pub mod sort;

pub use computations::*;
pub use direction::Axis;
pub use indices::Index;
pub use keyed_vec::KeyedVec;
pub use sort::*;
