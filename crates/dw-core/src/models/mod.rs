//! Shared data models for the bridge

mod scan;

pub use scan::*;
