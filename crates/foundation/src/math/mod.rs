pub mod antimeridian;
pub mod curve;
pub mod geo;
pub mod mercator;
pub mod thickness;

pub use antimeridian::*;
pub use curve::*;
pub use geo::*;
pub use mercator::*;
pub use thickness::*;
