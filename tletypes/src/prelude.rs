pub use crate::element_set::ElementSet;
pub use crate::position::{Geodetic, Position};
pub use crate::provenance::Provenance;
