//! Frame rendering module
//!
//! This module contains:
//! - Geometry shared by every rasterized shape (viewport mapping, arrow heads)
//! - Frame rasterization using tiny-skia (for writing PNG frames)
//! - Label rasterization using fontdue

pub mod geometry;
pub mod image;
pub mod text;
