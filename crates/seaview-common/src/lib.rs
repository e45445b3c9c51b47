//! Common types shared across the SeaView field pipeline crates.

pub mod error;
pub mod field;
pub mod grid;
pub mod style;

pub use error::{FieldError, FieldResult};
pub use field::DecodedField;
pub use grid::GridShape;
pub use style::{Color, ColorRamp, ColorStop, GradientConfig, Interpolation, LegendEntry};
