//! Pure domain types with minimal dependencies
//!
//! Geometry, colors, visual objects and layout. Nothing here knows about
//! engines or scenes.

pub mod color;
pub mod geometry;
pub mod layout;
pub mod object;

pub use color::*;
pub use geometry::*;
pub use layout::*;
pub use object::*;
