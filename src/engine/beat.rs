//! Animation beats: concurrent tracks sharing one duration and rate function

use serde::Serialize;

use super::ObjectId;
use super::rate::RateFunc;
use crate::domain::{Vec2, VisualObject};

/// Duration of a beat when the narration does not set one
pub const DEFAULT_DURATION: f32 = 1.0;

/// What a track does to its targets
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum AnimationKind {
    /// Text written in stroke by stroke
    Write,
    /// Shape drawn along its outline
    Create,
    FadeIn,
    FadeOut,
    Shift(Vec2),
    Rotate { angle: f32, about: Vec2 },
    Scale { factor: f32, about: Vec2 },
}

impl AnimationKind {
    /// Whether this kind makes its targets visible
    pub fn is_entrance(self) -> bool {
        matches!(
            self,
            AnimationKind::Write | AnimationKind::Create | AnimationKind::FadeIn
        )
    }

    pub fn is_exit(self) -> bool {
        matches!(self, AnimationKind::FadeOut)
    }

    /// Apply the transform part of this kind to `object` at progress `alpha`
    ///
    /// Entrances and exits leave the geometry alone.
    pub fn transform(self, object: &mut VisualObject, alpha: f32) {
        use crate::domain::Layout;

        match self {
            AnimationKind::Shift(offset) => object.translate(offset * alpha),
            AnimationKind::Rotate { angle, about } => object.rotate(angle * alpha, about),
            AnimationKind::Scale { factor, about } => {
                object.scale(1.0 + (factor - 1.0) * alpha, about)
            }
            AnimationKind::Write
            | AnimationKind::Create
            | AnimationKind::FadeIn
            | AnimationKind::FadeOut => {}
        }
    }
}

/// One target set animated with one kind
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Track {
    pub targets: Vec<ObjectId>,
    pub kind: AnimationKind,
}

/// A timed set of concurrent tracks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Beat {
    pub tracks: Vec<Track>,
    pub duration: f32,
    pub rate: RateFunc,
}

impl Default for Beat {
    fn default() -> Self {
        Self {
            tracks: Vec::new(),
            duration: DEFAULT_DURATION,
            rate: RateFunc::default(),
        }
    }
}

impl Beat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a track over `targets`
    pub fn track(mut self, targets: &[ObjectId], kind: AnimationKind) -> Self {
        self.tracks.push(Track {
            targets: targets.to_vec(),
            kind,
        });
        self
    }

    pub fn write(self, targets: &[ObjectId]) -> Self {
        self.track(targets, AnimationKind::Write)
    }

    pub fn create(self, targets: &[ObjectId]) -> Self {
        self.track(targets, AnimationKind::Create)
    }

    pub fn fade_out(self, targets: &[ObjectId]) -> Self {
        self.track(targets, AnimationKind::FadeOut)
    }

    pub fn shift(self, targets: &[ObjectId], offset: Vec2) -> Self {
        self.track(targets, AnimationKind::Shift(offset))
    }

    pub fn rotate(self, targets: &[ObjectId], angle: f32, about: Vec2) -> Self {
        self.track(targets, AnimationKind::Rotate { angle, about })
    }

    pub fn scale(self, targets: &[ObjectId], factor: f32, about: Vec2) -> Self {
        self.track(targets, AnimationKind::Scale { factor, about })
    }

    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = duration;
        self
    }

    pub fn rate(mut self, rate: RateFunc) -> Self {
        self.rate = rate;
        self
    }

    /// Every target of every track, in track order
    pub fn targets(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.tracks.iter().flat_map(|t| t.targets.iter().copied())
    }
}
