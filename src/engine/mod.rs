//! Rendering engine capability
//!
//! The narration only talks to an [`Engine`]: it creates objects, plays
//! beats, removes objects and holds. Every call blocks until the engine has
//! finished it, so statements in a script are strictly ordered in time.
//!
//! Two engines are provided:
//! - [`RecordingEngine`] keeps an event log and live-object snapshots
//! - [`RasterEngine`] renders every frame to PNG with tiny-skia

mod beat;
pub mod rate;
pub mod raster;
pub mod recorder;

use std::fmt;

use serde::Serialize;

use crate::domain::VisualObject;

pub use beat::{AnimationKind, Beat};
pub use rate::RateFunc;
pub use raster::RasterEngine;
pub use recorder::RecordingEngine;

/// Engine-assigned handle of a created object
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Failures reported by an engine
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown object {0}")]
    UnknownObject(ObjectId),
    #[error("invalid duration {0}, must be positive and finite")]
    InvalidDuration(f32),
    #[error("cannot allocate a {width}x{height} frame")]
    FrameAllocation { width: u32, height: u32 },
    #[error("failed to write frame {frame}")]
    FrameOutput {
        frame: u64,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode frame {frame}")]
    Encode {
        frame: u64,
        #[source]
        source: png::EncodingError,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;

/// Scene/object/animation primitives a narration is rendered against
pub trait Engine {
    /// Register an object; it is not visible until an entrance beat plays
    fn create(&mut self, object: &VisualObject) -> Result<ObjectId>;

    /// Play all tracks of `beat` concurrently and return once they finish
    fn animate(&mut self, beat: &Beat) -> Result<()>;

    /// Drop objects immediately, without any transition
    fn remove(&mut self, ids: &[ObjectId]) -> Result<()>;

    /// Hold the current picture for `duration` time units
    fn wait(&mut self, duration: f32) -> Result<()>;

    /// Called when a scene opens
    fn begin_scene(&mut self, _title: &str) -> Result<()> {
        Ok(())
    }

    /// Called after a scene has released its objects
    fn end_scene(&mut self, _title: &str) -> Result<()> {
        Ok(())
    }
}

/// Reject durations an engine cannot schedule
pub(crate) fn check_duration(duration: f32) -> Result<()> {
    if duration.is_finite() && duration > 0.0 {
        Ok(())
    } else {
        Err(EngineError::InvalidDuration(duration))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_duration() {
        assert!(check_duration(1.0).is_ok());
        assert!(matches!(
            check_duration(0.0),
            Err(EngineError::InvalidDuration(_))
        ));
        assert!(check_duration(f32::NAN).is_err());
        assert!(check_duration(f32::INFINITY).is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            EngineError::UnknownObject(ObjectId(7)).to_string(),
            "unknown object #7"
        );
    }
}
