pub mod config;
pub mod error;
pub mod geometry;
pub mod report;
pub mod scene;
pub mod view;
