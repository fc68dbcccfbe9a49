//! Preview engine that rasterizes every frame to PNG
//!
//! Keeps a retained table of objects, interpolates each beat frame by frame
//! and writes `frame_NNNNNN.png` files into the output directory. Encoding
//! the PNG sequence into a video is left to external tools.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Serialize;
use tiny_skia::Pixmap;

use super::{check_duration, AnimationKind, Beat, Engine, EngineError, ObjectId, Result};
use crate::config::RenderConfig;
use crate::domain::{Color, VisualObject};
use crate::render::geometry::Viewport;
use crate::render::image::{draw_object, new_frame, to_rgba_image, write_png};
use crate::render::text::TextRasterizer;

/// Retained state of one object
#[derive(Debug, Clone)]
struct Entry {
    object: VisualObject,
    opacity: f32,
    /// Entrance progress, 0.0 (hidden) to 1.0 (fully drawn)
    progress: f32,
}

impl Entry {
    fn visible(&self) -> bool {
        self.opacity > 0.0 && self.progress > 0.0
    }
}

/// Frame range covered by one scene
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneFrames {
    pub title: String,
    pub start_frame: u64,
    pub frame_count: u64,
}

/// Contents of `timeline.json`
#[derive(Debug, Serialize)]
struct Manifest<'a> {
    fps: u32,
    width: u32,
    height: u32,
    frames: u64,
    scenes: &'a [SceneFrames],
}

pub struct RasterEngine {
    viewport: Viewport,
    fps: u32,
    background: Color,
    output_dir: PathBuf,
    font: Option<TextRasterizer>,
    write_manifest: bool,
    next_id: u64,
    objects: BTreeMap<ObjectId, Entry>,
    frame: u64,
    scenes: Vec<SceneFrames>,
}

impl RasterEngine {
    /// Create an engine writing into `output_dir`, creating it if needed
    pub fn new(config: &RenderConfig, output_dir: &Path) -> anyhow::Result<Self> {
        anyhow::ensure!(
            config.width > 0 && config.height > 0,
            "Frame size must be non-zero, got {}x{}",
            config.width,
            config.height
        );
        anyhow::ensure!(config.fps > 0, "Frame rate must be positive");

        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create {}", output_dir.display()))?;

        let font = match &config.font_path {
            Some(path) => Some(TextRasterizer::from_file(path)?),
            None => {
                log::info!("No font configured, labels are drawn as placeholder bars");
                None
            }
        };

        log::info!(
            "Rendering {}x{} at {} fps into {}",
            config.width,
            config.height,
            config.fps,
            output_dir.display()
        );

        Ok(Self {
            viewport: Viewport::new(config.width, config.height),
            fps: config.fps,
            background: config.background,
            output_dir: output_dir.to_path_buf(),
            font,
            write_manifest: config.write_manifest,
            next_id: 0,
            objects: BTreeMap::new(),
            frame: 0,
            scenes: Vec::new(),
        })
    }

    /// Write the timeline manifest, if enabled, and return the output directory
    pub fn finish(self) -> anyhow::Result<PathBuf> {
        if self.write_manifest {
            let path = self.output_dir.join("timeline.json");
            let file = File::create(&path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            let manifest = Manifest {
                fps: self.fps,
                width: self.viewport.width,
                height: self.viewport.height,
                frames: self.frame,
                scenes: &self.scenes,
            };
            serde_json::to_writer_pretty(BufWriter::new(file), &manifest)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        log::info!(
            "Wrote {} frames to {}",
            self.frame,
            self.output_dir.display()
        );
        Ok(self.output_dir)
    }

    fn frames_for(&self, duration: f32) -> u64 {
        ((duration * self.fps as f32).ceil() as u64).max(1)
    }

    fn render(&self) -> Result<Pixmap> {
        let mut pixmap =
            new_frame(self.viewport, self.background).ok_or(EngineError::FrameAllocation {
                width: self.viewport.width,
                height: self.viewport.height,
            })?;
        for entry in self.objects.values().filter(|e| e.visible()) {
            draw_object(
                &mut pixmap,
                self.viewport,
                &entry.object,
                entry.opacity,
                entry.progress,
                self.font.as_ref(),
            );
        }
        Ok(pixmap)
    }

    fn encode_current(&self) -> Result<Vec<u8>> {
        let image = to_rgba_image(&self.render()?);
        let mut buffer = Vec::new();
        write_png(&mut buffer, &image).map_err(|source| EngineError::Encode {
            frame: self.frame,
            source,
        })?;
        Ok(buffer)
    }

    fn emit(&mut self, png: &[u8]) -> Result<()> {
        let path = self
            .output_dir
            .join(format!("frame_{:06}.png", self.frame));
        let frame = self.frame;
        File::create(&path)
            .and_then(|mut file| file.write_all(png))
            .map_err(|source| EngineError::FrameOutput { frame, source })?;
        self.frame += 1;
        Ok(())
    }

    fn ensure_live(&self, id: ObjectId) -> Result<()> {
        if self.objects.contains_key(&id) {
            Ok(())
        } else {
            Err(EngineError::UnknownObject(id))
        }
    }
}

/// Apply one track kind to `entry`, starting from `start`, at progress `alpha`
fn apply(kind: AnimationKind, start: &Entry, entry: &mut Entry, alpha: f32) {
    match kind {
        AnimationKind::Write | AnimationKind::Create => {
            entry.opacity = 1.0;
            entry.progress = alpha;
        }
        AnimationKind::FadeIn => {
            entry.progress = 1.0;
            entry.opacity = alpha;
        }
        AnimationKind::FadeOut => {
            entry.opacity = start.opacity * (1.0 - alpha);
        }
        AnimationKind::Shift(_) | AnimationKind::Rotate { .. } | AnimationKind::Scale { .. } => {
            kind.transform(&mut entry.object, alpha);
        }
    }
}

impl Engine for RasterEngine {
    fn create(&mut self, object: &VisualObject) -> Result<ObjectId> {
        self.next_id += 1;
        let id = ObjectId(self.next_id);
        self.objects.insert(
            id,
            Entry {
                object: object.clone(),
                opacity: 0.0,
                progress: 0.0,
            },
        );
        Ok(id)
    }

    fn animate(&mut self, beat: &Beat) -> Result<()> {
        check_duration(beat.duration)?;
        for id in beat.targets() {
            self.ensure_live(id)?;
        }

        let start: BTreeMap<ObjectId, Entry> = beat
            .targets()
            .filter_map(|id| self.objects.get(&id).map(|e| (id, e.clone())))
            .collect();

        let frames = self.frames_for(beat.duration);
        for i in 1..=frames {
            let alpha = beat.rate.apply(i as f32 / frames as f32);
            let mut working = start.clone();
            for track in &beat.tracks {
                for id in &track.targets {
                    if let (Some(from), Some(entry)) = (start.get(id), working.get_mut(id)) {
                        apply(track.kind, from, entry, alpha);
                    }
                }
            }
            self.objects.extend(working);
            let png = self.encode_current()?;
            self.emit(&png)?;
        }
        Ok(())
    }

    fn remove(&mut self, ids: &[ObjectId]) -> Result<()> {
        for id in ids {
            self.ensure_live(*id)?;
        }
        for id in ids {
            self.objects.remove(id);
        }
        Ok(())
    }

    fn wait(&mut self, duration: f32) -> Result<()> {
        check_duration(duration)?;
        let png = self.encode_current()?;
        for _ in 0..self.frames_for(duration) {
            self.emit(&png)?;
        }
        Ok(())
    }

    fn begin_scene(&mut self, title: &str) -> Result<()> {
        self.scenes.push(SceneFrames {
            title: title.to_string(),
            start_frame: self.frame,
            frame_count: 0,
        });
        Ok(())
    }

    fn end_scene(&mut self, _title: &str) -> Result<()> {
        if let Some(scene) = self.scenes.last_mut() {
            scene.frame_count = self.frame - scene.start_frame;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Layout, ORIGIN, RIGHT};

    fn small_config() -> RenderConfig {
        RenderConfig {
            width: 64,
            height: 36,
            fps: 4,
            ..RenderConfig::default()
        }
    }

    fn png_count(dir: &Path) -> usize {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "png"))
            .count()
    }

    #[test]
    fn test_beats_and_holds_write_frames() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = RasterEngine::new(&small_config(), dir.path()).unwrap();
        let dot = engine.create(&VisualObject::dot(ORIGIN, Color::RED)).unwrap();
        engine.animate(&Beat::new().create(&[dot])).unwrap();
        engine.wait(0.5).unwrap();
        engine
            .animate(&Beat::new().shift(&[dot], RIGHT).duration(2.0))
            .unwrap();
        assert_eq!(engine.frame, 4 + 2 + 8);
        assert_eq!(png_count(dir.path()), 14);
        assert!(dir.path().join("frame_000000.png").exists());
    }

    #[test]
    fn test_transforms_start_from_beat_state() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = RasterEngine::new(&small_config(), dir.path()).unwrap();
        let dot = engine.create(&VisualObject::dot(ORIGIN, Color::RED)).unwrap();
        engine
            .animate(&Beat::new().shift(&[dot], RIGHT * 2.0))
            .unwrap();
        let center = engine.objects[&dot].object.center();
        assert!((center.x - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_fade_out_hides_objects() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = RasterEngine::new(&small_config(), dir.path()).unwrap();
        let dot = engine.create(&VisualObject::dot(ORIGIN, Color::RED)).unwrap();
        assert!(!engine.objects[&dot].visible());
        engine.animate(&Beat::new().create(&[dot])).unwrap();
        assert!(engine.objects[&dot].visible());
        engine.animate(&Beat::new().fade_out(&[dot])).unwrap();
        assert!(!engine.objects[&dot].visible());
        engine.remove(&[dot]).unwrap();
        assert!(engine.remove(&[dot]).is_err());
    }

    #[test]
    fn test_manifest_lists_scene_frames() {
        let dir = tempfile::tempdir().unwrap();
        let mut engine = RasterEngine::new(&small_config(), dir.path()).unwrap();
        engine.begin_scene("Intro").unwrap();
        engine.wait(1.0).unwrap();
        engine.end_scene("Intro").unwrap();
        assert_eq!(
            engine.scenes,
            vec![SceneFrames {
                title: "Intro".to_string(),
                start_frame: 0,
                frame_count: 4,
            }]
        );
        let out = engine.finish().unwrap();
        let manifest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(out.join("timeline.json")).unwrap())
                .unwrap();
        assert_eq!(manifest["frames"], 4);
        assert_eq!(manifest["scenes"][0]["title"], "Intro");
    }

    #[test]
    fn test_zero_frame_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = RenderConfig {
            width: 0,
            ..small_config()
        };
        assert!(RasterEngine::new(&config, dir.path()).is_err());
    }
}
