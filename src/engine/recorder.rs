//! In-memory engine that records every call
//!
//! Used for dry runs and for checking the structure of a narration: which
//! objects exist at each scene boundary, how long the timeline is and which
//! beats were played in which order.

use std::collections::BTreeMap;

use serde::Serialize;

use super::{check_duration, Beat, Engine, EngineError, ObjectId, Result};
use crate::domain::VisualObject;

/// One recorded engine call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Event {
    SceneStarted(String),
    Created { id: ObjectId, object: VisualObject },
    Animated(Beat),
    Removed(Vec<ObjectId>),
    Waited(f32),
    /// Scene closed; `live` is every object still registered at that point
    SceneEnded { title: String, live: Vec<ObjectId> },
}

#[derive(Debug, Default)]
pub struct RecordingEngine {
    next_id: u64,
    live: BTreeMap<ObjectId, VisualObject>,
    events: Vec<Event>,
    elapsed: f32,
}

impl RecordingEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Ids of objects created and not yet removed
    pub fn live_ids(&self) -> Vec<ObjectId> {
        self.live.keys().copied().collect()
    }

    /// Total timeline length: beat durations plus holds
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Titles of scenes in the order they started
    pub fn scene_titles(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::SceneStarted(title) => Some(title.as_str()),
                _ => None,
            })
            .collect()
    }

    fn ensure_live(&self, id: ObjectId) -> Result<()> {
        if self.live.contains_key(&id) {
            Ok(())
        } else {
            Err(EngineError::UnknownObject(id))
        }
    }
}

impl Engine for RecordingEngine {
    fn create(&mut self, object: &VisualObject) -> Result<ObjectId> {
        self.next_id += 1;
        let id = ObjectId(self.next_id);
        self.live.insert(id, object.clone());
        self.events.push(Event::Created {
            id,
            object: object.clone(),
        });
        Ok(id)
    }

    fn animate(&mut self, beat: &Beat) -> Result<()> {
        check_duration(beat.duration)?;
        for id in beat.targets() {
            self.ensure_live(id)?;
        }

        let alpha = beat.rate.apply(1.0);
        for track in &beat.tracks {
            for id in &track.targets {
                if let Some(object) = self.live.get_mut(id) {
                    track.kind.transform(object, alpha);
                }
            }
        }

        self.elapsed += beat.duration;
        self.events.push(Event::Animated(beat.clone()));
        Ok(())
    }

    fn remove(&mut self, ids: &[ObjectId]) -> Result<()> {
        for id in ids {
            self.ensure_live(*id)?;
        }
        for id in ids {
            self.live.remove(id);
        }
        self.events.push(Event::Removed(ids.to_vec()));
        Ok(())
    }

    fn wait(&mut self, duration: f32) -> Result<()> {
        check_duration(duration)?;
        self.elapsed += duration;
        self.events.push(Event::Waited(duration));
        Ok(())
    }

    fn begin_scene(&mut self, title: &str) -> Result<()> {
        self.events.push(Event::SceneStarted(title.to_string()));
        Ok(())
    }

    fn end_scene(&mut self, title: &str) -> Result<()> {
        let live = self.live_ids();
        self.events.push(Event::SceneEnded {
            title: title.to_string(),
            live,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Color, Layout, ORIGIN, RIGHT};
    use crate::engine::RateFunc;

    #[test]
    fn test_create_assigns_sequential_ids() {
        let mut engine = RecordingEngine::new();
        let a = engine.create(&VisualObject::dot(ORIGIN, Color::RED)).unwrap();
        let b = engine.create(&VisualObject::dot(ORIGIN, Color::BLUE)).unwrap();
        assert_eq!((a, b), (ObjectId(1), ObjectId(2)));
        assert_eq!(engine.live_ids(), vec![a, b]);
    }

    #[test]
    fn test_animate_applies_final_transform() {
        let mut engine = RecordingEngine::new();
        let id = engine.create(&VisualObject::dot(ORIGIN, Color::RED)).unwrap();
        engine
            .animate(&Beat::new().shift(&[id], RIGHT * 4.0).duration(2.0))
            .unwrap();
        assert!((engine.live[&id].center().x - 4.0).abs() < 1e-5);
        assert_eq!(engine.elapsed(), 2.0);
    }

    #[test]
    fn test_wiggle_ends_where_it_started() {
        let mut engine = RecordingEngine::new();
        let id = engine.create(&VisualObject::dot(ORIGIN, Color::RED)).unwrap();
        engine
            .animate(&Beat::new().shift(&[id], RIGHT).rate(RateFunc::Wiggle))
            .unwrap();
        assert!(engine.live[&id].center().length() < 1e-5);
    }

    #[test]
    fn test_unknown_object_is_rejected() {
        let mut engine = RecordingEngine::new();
        let err = engine
            .animate(&Beat::new().write(&[ObjectId(42)]))
            .unwrap_err();
        assert!(matches!(err, EngineError::UnknownObject(ObjectId(42))));
        assert!(engine.remove(&[ObjectId(42)]).is_err());
        assert!(engine.events().is_empty());
    }

    #[test]
    fn test_scene_boundaries_snapshot_live_objects() {
        let mut engine = RecordingEngine::new();
        engine.begin_scene("Intro").unwrap();
        let id = engine.create(&VisualObject::dot(ORIGIN, Color::RED)).unwrap();
        engine.remove(&[id]).unwrap();
        engine.end_scene("Intro").unwrap();
        assert_eq!(engine.scene_titles(), vec!["Intro"]);
        assert_eq!(
            engine.events().last(),
            Some(&Event::SceneEnded {
                title: "Intro".to_string(),
                live: vec![],
            })
        );
    }
}
