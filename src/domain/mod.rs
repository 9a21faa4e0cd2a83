//! Domain layer - account layouts and record comparison

pub mod diff;
pub mod pool;
