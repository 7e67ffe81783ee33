pub mod common;
pub mod pan_orbit_camera;
pub mod scene;
