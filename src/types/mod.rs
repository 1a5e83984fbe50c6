pub mod geo;
pub mod location;

pub use geo::*;
pub use location::*;
