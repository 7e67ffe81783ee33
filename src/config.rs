pub mod setup;
pub mod snapshot;
