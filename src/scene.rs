//! Scoped scene ownership
//!
//! A [`SceneScope`] owns every object created through it. Closing the scope,
//! or dropping it on an early return or unwind, removes whatever it still
//! owns from the engine, so no object outlives its scene.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::{Group, VisualObject};
use crate::engine::{Beat, Engine, EngineError, ObjectId, Result};

/// What a closed scene did, for logging and structural checks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneSummary {
    pub title: String,
    /// Objects in creation order
    pub created: Vec<ObjectId>,
    /// Objects that received an entrance beat
    pub entered: Vec<ObjectId>,
    /// Objects that received a fade-out beat
    pub faded: Vec<ObjectId>,
    /// Objects removed by `clear` or `close`, in removal order
    pub removed: Vec<ObjectId>,
    pub beats: Vec<Beat>,
    /// Sum of plain holds
    pub hold: f32,
}

impl SceneSummary {
    /// Sum of beat durations, excluding holds
    pub fn animated(&self) -> f32 {
        self.beats.iter().map(|b| b.duration).sum()
    }

    /// Full scene length
    pub fn duration(&self) -> f32 {
        self.animated() + self.hold
    }
}

pub struct SceneScope<'e, E: Engine + ?Sized> {
    engine: &'e mut E,
    title: String,
    created: Vec<ObjectId>,
    owned: BTreeSet<ObjectId>,
    entered: BTreeSet<ObjectId>,
    faded: BTreeSet<ObjectId>,
    removed: Vec<ObjectId>,
    beats: Vec<Beat>,
    hold: f32,
    closed: bool,
}

impl<'e, E: Engine + ?Sized> SceneScope<'e, E> {
    /// Start a scene; the engine stays borrowed until the scope ends
    pub fn open(engine: &'e mut E, title: impl Into<String>) -> Result<Self> {
        let title = title.into();
        log::debug!("Scene '{}' opened", title);
        engine.begin_scene(&title)?;
        Ok(Self {
            engine,
            title,
            created: Vec::new(),
            owned: BTreeSet::new(),
            entered: BTreeSet::new(),
            faded: BTreeSet::new(),
            removed: Vec::new(),
            beats: Vec::new(),
            hold: 0.0,
            closed: false,
        })
    }

    pub fn add(&mut self, object: VisualObject) -> Result<ObjectId> {
        let id = self.engine.create(&object)?;
        self.created.push(id);
        self.owned.insert(id);
        Ok(id)
    }

    /// Add every member of `group`, returning ids in member order
    pub fn add_group(&mut self, group: Group) -> Result<Vec<ObjectId>> {
        group
            .members
            .into_iter()
            .map(|member| self.add(member))
            .collect()
    }

    /// Play a beat over objects this scene owns
    pub fn play(&mut self, beat: Beat) -> Result<()> {
        if let Some(foreign) = beat.targets().find(|id| !self.owned.contains(id)) {
            return Err(EngineError::UnknownObject(foreign));
        }
        self.engine.animate(&beat)?;

        for track in &beat.tracks {
            if track.kind.is_entrance() {
                self.entered.extend(track.targets.iter().copied());
            } else if track.kind.is_exit() {
                self.faded.extend(track.targets.iter().copied());
            }
        }
        self.beats.push(beat);
        Ok(())
    }

    pub fn wait(&mut self, duration: f32) -> Result<()> {
        self.engine.wait(duration)?;
        self.hold += duration;
        Ok(())
    }

    /// Fade out every owned object that is still showing, in one beat
    pub fn fade_out_all(&mut self) -> Result<()> {
        let showing: Vec<ObjectId> = self
            .created
            .iter()
            .copied()
            .filter(|id| self.owned.contains(id))
            .filter(|id| self.entered.contains(id) && !self.faded.contains(id))
            .collect();
        if showing.is_empty() {
            return Ok(());
        }
        self.play(Beat::new().fade_out(&showing))
    }

    /// Remove every owned object now; the scene stays open for further holds
    pub fn clear(&mut self) -> Result<()> {
        self.release()
    }

    /// Remove every remaining object and end the scene
    pub fn close(mut self) -> Result<SceneSummary> {
        self.release()?;
        self.closed = true;
        self.engine.end_scene(&self.title)?;
        log::debug!(
            "Scene '{}' closed: {} objects, {} beats, {:.1} units held",
            self.title,
            self.created.len(),
            self.beats.len(),
            self.hold
        );

        let in_order = |set: &BTreeSet<ObjectId>, created: &[ObjectId]| -> Vec<ObjectId> {
            created.iter().copied().filter(|id| set.contains(id)).collect()
        };
        Ok(SceneSummary {
            title: std::mem::take(&mut self.title),
            entered: in_order(&self.entered, &self.created),
            faded: in_order(&self.faded, &self.created),
            created: std::mem::take(&mut self.created),
            removed: std::mem::take(&mut self.removed),
            beats: std::mem::take(&mut self.beats),
            hold: self.hold,
        })
    }

    fn release(&mut self) -> Result<()> {
        let remaining: Vec<ObjectId> = self
            .created
            .iter()
            .copied()
            .filter(|id| self.owned.contains(id))
            .collect();
        if !remaining.is_empty() {
            self.engine.remove(&remaining)?;
        }
        self.owned.clear();
        self.removed.extend(remaining);
        Ok(())
    }
}

impl<E: Engine + ?Sized> Drop for SceneScope<'_, E> {
    fn drop(&mut self) {
        if self.closed {
            return;
        }
        log::warn!("Scene '{}' ended without closing, releasing its objects", self.title);
        if let Err(err) = self.release() {
            log::error!("Failed to release scene '{}': {}", self.title, err);
        }
        if let Err(err) = self.engine.end_scene(&self.title) {
            log::error!("Failed to end scene '{}': {}", self.title, err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Color, ORIGIN, RIGHT};
    use crate::engine::RecordingEngine;

    fn dot() -> VisualObject {
        VisualObject::dot(ORIGIN, Color::RED)
    }

    #[test]
    fn test_close_removes_everything() {
        let mut engine = RecordingEngine::new();
        let summary = {
            let mut scene = SceneScope::open(&mut engine, "Intro").unwrap();
            let a = scene.add(dot()).unwrap();
            let b = scene.add(dot()).unwrap();
            scene.play(Beat::new().create(&[a, b])).unwrap();
            scene.wait(2.0).unwrap();
            scene.fade_out_all().unwrap();
            scene.close().unwrap()
        };
        assert_eq!(summary.created, summary.entered);
        assert_eq!(summary.created, summary.faded);
        assert_eq!(summary.created, summary.removed);
        assert_eq!(summary.hold, 2.0);
        assert_eq!(summary.duration(), 4.0);
        assert!(engine.live_ids().is_empty());
    }

    #[test]
    fn test_drop_releases_objects() {
        let mut engine = RecordingEngine::new();
        {
            let mut scene = SceneScope::open(&mut engine, "Aborted").unwrap();
            scene.add(dot()).unwrap();
            scene.add(dot()).unwrap();
        }
        assert!(engine.live_ids().is_empty());
        assert_eq!(engine.scene_titles(), vec!["Aborted"]);
    }

    #[test]
    fn test_early_return_releases_objects() {
        fn failing(engine: &mut RecordingEngine) -> Result<()> {
            let mut scene = SceneScope::open(engine, "Failing")?;
            let id = scene.add(dot())?;
            scene.play(Beat::new().create(&[id]))?;
            scene.wait(0.0)?;
            scene.close().map(|_| ())
        }

        let mut engine = RecordingEngine::new();
        assert!(matches!(
            failing(&mut engine),
            Err(EngineError::InvalidDuration(_))
        ));
        assert!(engine.live_ids().is_empty());
    }

    #[test]
    fn test_foreign_objects_are_rejected() {
        let mut engine = RecordingEngine::new();
        let outsider = engine.create(&dot()).unwrap();
        let mut scene = SceneScope::open(&mut engine, "Strict").unwrap();
        let err = scene
            .play(Beat::new().shift(&[outsider], RIGHT))
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownObject(id) if id == outsider));
    }

    #[test]
    fn test_clear_keeps_scene_open() {
        let mut engine = RecordingEngine::new();
        let mut scene = SceneScope::open(&mut engine, "Clearing").unwrap();
        let a = scene.add(dot()).unwrap();
        scene.play(Beat::new().create(&[a])).unwrap();
        scene.clear().unwrap();
        scene.wait(1.0).unwrap();
        let b = scene.add(dot()).unwrap();
        let summary = scene.close().unwrap();
        assert_eq!(summary.removed, vec![a, b]);
        assert_eq!(summary.hold, 1.0);
        assert!(engine.live_ids().is_empty());
    }

    #[test]
    fn test_fade_out_all_skips_already_faded() {
        let mut engine = RecordingEngine::new();
        let mut scene = SceneScope::open(&mut engine, "Partial").unwrap();
        let a = scene.add(dot()).unwrap();
        let b = scene.add(dot()).unwrap();
        scene.play(Beat::new().create(&[a, b])).unwrap();
        scene.play(Beat::new().fade_out(&[a])).unwrap();
        scene.fade_out_all().unwrap();
        let summary = scene.close().unwrap();
        assert_eq!(summary.beats.len(), 3);
        assert_eq!(summary.beats[2].targets().collect::<Vec<_>>(), vec![b]);
    }
}
