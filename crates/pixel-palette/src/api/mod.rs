//! Builder entry point.

mod builder;

pub use builder::Remapper;
