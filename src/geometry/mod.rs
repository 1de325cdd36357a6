// geometry/mod.rs
// Math, orientation and projection
pub mod camera;
pub mod math;
pub mod rotation;
pub mod transform;
