pub mod icon;
pub mod route_builder;
pub mod surface;
pub mod symbology;

pub use route_builder::*;
pub use surface::*;
