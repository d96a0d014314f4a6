mod coordinate;
mod eatery;

pub use coordinate::{empty_object, Coordinate};
pub use eatery::{Eateries, Eatery, Location};
