//! The six-scene narration on Noether's theorem
//!
//! Every scene runs inside its own [`SceneScope`], so whatever a scene puts
//! on screen is gone before the next one starts. The only nondeterminism is
//! the particle burst in the closing scene, drawn from the caller's `rng`.

pub mod correspondence;
pub mod particles;

use std::f32::consts::TAU;

use anyhow::Context;
use rand::Rng;

use crate::domain::{
    Color, Edge, Group, Layout, VisualObject, DEFAULT_BUFF, DOWN, LEFT, RIGHT, UP,
};
use crate::engine::{Beat, Engine, RateFunc, Result};
use crate::scene::{SceneScope, SceneSummary};

use correspondence::TABLE;
use particles::particle_burst;

pub const SCENE_TITLES: [&str; 6] = [
    "Introduction",
    "Symmetry",
    "Theorem",
    "Proof",
    "Examples",
    "Conclusion",
];

const HEADING_SIZE: f32 = 40.0;
const BODY_SIZE: f32 = 32.0;
const LINE_GAP: f32 = 0.2;

/// Scene heading pinned to the top edge
fn heading(text: &str) -> VisualObject {
    VisualObject::text(text, HEADING_SIZE, Color::BLUE).to_edge(Edge::Top)
}

/// TeX lines stacked downwards with the usual line gap
fn paragraph(lines: &[&str], font_size: f32, color: Color) -> Group {
    paragraph_spaced(lines, font_size, color, LINE_GAP)
}

fn paragraph_spaced(lines: &[&str], font_size: f32, color: Color, gap: f32) -> Group {
    Group::new(
        lines
            .iter()
            .map(|line| VisualObject::tex(*line, font_size, color)),
    )
    .arrange(DOWN, gap)
}

/// Play the whole narration against `engine`
pub fn construct<E, R>(engine: &mut E, rng: &mut R) -> anyhow::Result<Vec<SceneSummary>>
where
    E: Engine + ?Sized,
    R: Rng + ?Sized,
{
    log::info!("Starting Noether's Theorem animation");

    let summaries = vec![
        finished(SCENE_TITLES[0], introduction(engine))?,
        finished(SCENE_TITLES[1], symmetry(engine))?,
        finished(SCENE_TITLES[2], theorem(engine))?,
        finished(SCENE_TITLES[3], proof(engine))?,
        finished(SCENE_TITLES[4], examples(engine))?,
        finished(SCENE_TITLES[5], conclusion(engine, rng))?,
    ];

    log::info!("Finished Noether's Theorem animation");
    Ok(summaries)
}

fn finished(title: &str, result: Result<SceneSummary>) -> anyhow::Result<SceneSummary> {
    let summary = result.with_context(|| format!("Scene '{}' failed", title))?;
    log::info!(
        "Scene '{}' done: {} objects, {:.1} time units",
        summary.title,
        summary.created.len(),
        summary.duration()
    );
    Ok(summary)
}

fn introduction<E: Engine + ?Sized>(engine: &mut E) -> Result<SceneSummary> {
    let mut scene = SceneScope::open(engine, SCENE_TITLES[0])?;
    let title = Group::new([
        VisualObject::text("Noether's Theorem", 48.0, Color::YELLOW),
        VisualObject::text("Symmetry and Conservation Laws", 36.0, Color::WHITE),
    ])
    .arrange(DOWN, DEFAULT_BUFF);

    let title = scene.add_group(title)?;
    scene.play(Beat::new().write(&title))?;
    scene.wait(2.0)?;
    scene.fade_out_all()?;
    scene.close()
}

fn symmetry<E: Engine + ?Sized>(engine: &mut E) -> Result<SceneSummary> {
    let mut scene = SceneScope::open(engine, SCENE_TITLES[1])?;

    let circle = VisualObject::circle(1.5, Color::WHITE)
        .with_fill(0.2)
        .shifted(LEFT * 3.0);
    let pivot = circle.center();
    let rim = VisualObject::dot(pivot + RIGHT * 1.5, Color::RED);
    let caption =
        VisualObject::text("Physical System", 24.0, Color::WHITE).next_to(&circle.bounds(), DOWN, DEFAULT_BUFF);
    let description = paragraph(
        &[
            "Rotational Symmetry: The system",
            "looks the same after a rotation.",
        ],
        BODY_SIZE,
        Color::WHITE,
    )
    .shifted(RIGHT * 3.0);

    let title = scene.add(heading("What is Symmetry?"))?;
    let system = scene.add_group(Group::new([circle, rim]))?;
    let caption = scene.add(caption)?;
    let description = scene.add_group(description)?;

    scene.play(Beat::new().write(&[title]))?;
    scene.play(Beat::new().create(&system).write(&[caption]))?;
    scene.play(Beat::new().write(&description))?;
    scene.play(Beat::new().rotate(&system, TAU, pivot).duration(3.0))?;
    scene.wait(2.0)?;
    scene.fade_out_all()?;
    scene.close()
}

fn theorem<E: Engine + ?Sized>(engine: &mut E) -> Result<SceneSummary> {
    let mut scene = SceneScope::open(engine, SCENE_TITLES[2])?;

    let statement = paragraph(
        &[
            "For every continuous symmetry",
            "in a physical system,",
            "there is a corresponding",
            "conserved quantity.",
        ],
        36.0,
        Color::WHITE,
    )
    .shifted(UP * 2.0);
    let fact = VisualObject::tex("Emmy Noether proved this in 1915.", BODY_SIZE, Color::GREEN)
        .next_to(&statement.bounds(), DOWN, 0.5);

    let title = scene.add(heading("Noether's Theorem"))?;
    let statement = scene.add_group(statement)?;
    let fact = scene.add(fact)?;

    scene.play(Beat::new().write(&[title]))?;
    scene.play(Beat::new().write(&statement))?;
    scene.play(Beat::new().write(&[fact]))?;
    scene.wait(3.0)?;
    scene.fade_out_all()?;
    scene.close()
}

/// Derivation steps, then the free-particle example.
///
/// The scene ends by removing its objects without a fade-out.
fn proof<E: Engine + ?Sized>(engine: &mut E) -> Result<SceneSummary> {
    let mut scene = SceneScope::open(engine, SCENE_TITLES[3])?;

    let title = scene.add(heading("Proof of Noether's Theorem"))?;
    scene.play(Beat::new().write(&[title]))?;

    let action = paragraph(
        &[
            r"The action $S = \int_{t_1}^{t_2}$",
            r"$L(q, \dot{q}, t) \, dt$,",
            r"where $L$ is the Lagrangian.",
        ],
        BODY_SIZE,
        Color::WHITE,
    )
    .shifted(UP)
    .to_edge(Edge::Left);
    let euler = paragraph(
        &[
            r"Euler-Lagrange equation:",
            r"$\frac{d}{dt} \left( \frac{\partial L}{\partial \dot{q}} \right) - \frac{\partial L}{\partial q} = 0$",
        ],
        BODY_SIZE,
        Color::WHITE,
    )
    .shifted(UP);
    let transformation = paragraph(
        &[
            r"A symmetry transformation",
            r"(e.g., $q \to q + \epsilon$)",
            r"leaves $S$ invariant: $\delta S = 0$.",
        ],
        BODY_SIZE,
        Color::WHITE,
    )
    .shifted(UP)
    .to_edge(Edge::Right);
    let current = paragraph(
        &[
            r"The conserved quantity (Noether current):",
            r"$\frac{\partial L}{\partial \dot{q}}$",
            r"is constant if $L$ is invariant.",
        ],
        BODY_SIZE,
        Color::WHITE,
    )
    .shifted(DOWN * 2.0);

    let mut steps = Vec::new();
    for step in [action, euler, transformation, current] {
        let ids = scene.add_group(step)?;
        scene.play(Beat::new().write(&ids))?;
        scene.wait(2.0)?;
        steps.push(ids);
    }
    let clear_steps = steps
        .iter()
        .fold(Beat::new(), |beat, ids| beat.fade_out(ids));
    scene.play(clear_steps)?;

    let example_title =
        VisualObject::text("Example: Free Particle", 36.0, Color::GREEN).shifted(UP * 2.0);
    let lagrangian = paragraph(
        &[r"Lagrangian: $L = \frac{1}{2} m \dot{q}^2$", r"(free particle)."],
        BODY_SIZE,
        Color::WHITE,
    )
    .shifted(UP);
    let number_line = VisualObject::number_line(-4.0, 4.0, 1.0, 8.0).shifted(DOWN);
    let particle = VisualObject::dot(number_line.number_to_point(-2.0), Color::RED);
    let label =
        VisualObject::text("Particle", 24.0, Color::WHITE).next_to(&particle.bounds(), UP, DEFAULT_BUFF);
    let momentum = paragraph(
        &[
            r"Spatial Symmetry ($q \to q + a$):",
            r"$\frac{\partial L}{\partial \dot{q}} = m \dot{q}$",
            r"Momentum $p = m \dot{q}$ is conserved.",
        ],
        BODY_SIZE,
        Color::WHITE,
    )
    .to_edge(Edge::Bottom);

    let example_title = scene.add(example_title)?;
    let lagrangian = scene.add_group(lagrangian)?;
    let number_line = scene.add(number_line)?;
    let particle = scene.add(particle)?;
    let label = scene.add(label)?;
    let momentum = scene.add_group(momentum)?;

    scene.play(Beat::new().write(&[example_title]))?;
    scene.play(Beat::new().write(&lagrangian))?;
    scene.play(Beat::new().create(&[number_line, particle, label]))?;
    scene.play(Beat::new().shift(&[particle], RIGHT * 4.0).duration(2.0))?;
    scene.play(Beat::new().write(&momentum))?;
    scene.wait(3.0)?;
    scene.close()
}

fn examples<E: Engine + ?Sized>(engine: &mut E) -> Result<SceneSummary> {
    let mut scene = SceneScope::open(engine, SCENE_TITLES[4])?;

    let list = Group::new(
        TABLE
            .iter()
            .map(|row| VisualObject::tex(row.statement, 28.0, Color::WHITE)),
    )
    .arrange_aligned(DOWN, 0.5, LEFT)
    .shifted(UP)
    .to_edge(Edge::Left);
    let vignettes: Vec<Group> = TABLE
        .iter()
        .zip(&list.members)
        .map(|(row, statement)| row.vignette.build(&statement.bounds()))
        .collect();
    let pivots: Vec<_> = vignettes
        .iter()
        .map(|group| group.members.first().map(Layout::center).unwrap_or_default())
        .collect();

    let title = scene.add(heading("Symmetries and Conservations"))?;
    let list = scene.add_group(list)?;
    let mut visuals = Vec::with_capacity(vignettes.len());
    for group in vignettes {
        visuals.push(scene.add_group(group)?);
    }

    scene.play(Beat::new().write(&[title]))?;
    scene.play(Beat::new().write(&list))?;
    scene.play(Beat::new().create(&visuals.concat()))?;

    let motion = TABLE
        .iter()
        .zip(&visuals)
        .zip(&pivots)
        .fold(Beat::new(), |beat, ((row, ids), pivot)| {
            row.vignette.motion(beat, ids, *pivot)
        });
    scene.play(motion.duration(3.0))?;

    // the time-reversal dot returns to where it started
    let reversible = visuals
        .last()
        .and_then(|ids| ids.get(1..))
        .unwrap_or_default();
    scene.play(Beat::new().shift(reversible, LEFT * 2.0).duration(2.0))?;
    scene.wait(2.0)?;
    scene.fade_out_all()?;
    scene.close()
}

fn conclusion<E, R>(engine: &mut E, rng: &mut R) -> Result<SceneSummary>
where
    E: Engine + ?Sized,
    R: Rng + ?Sized,
{
    let mut scene = SceneScope::open(engine, SCENE_TITLES[5])?;

    let statement = paragraph_spaced(
        &[
            "Symmetries govern the laws",
            "of nature, revealing conserved",
            "quantities that shape physics!",
        ],
        36.0,
        Color::YELLOW,
        0.3,
    )
    .shifted(UP);

    let title = scene.add(heading("Why Noether's Theorem Matters"))?;
    let statement = scene.add_group(statement)?;
    scene.play(Beat::new().write(&[title]))?;
    scene.play(Beat::new().write(&statement))?;
    scene.wait(2.0)?;

    let particles = scene.add_group(Group::new(particle_burst(rng)))?;
    scene.play(Beat::new().create(&particles))?;
    scene.play(
        Beat::new()
            .shift(&particles, DOWN * 0.5)
            .duration(2.0)
            .rate(RateFunc::Wiggle),
    )?;
    scene.wait(2.0)?;
    scene.fade_out_all()?;
    scene.clear()?;
    scene.wait(1.0)?;
    scene.close()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Shape;
    use crate::engine::recorder::Event;
    use crate::engine::{AnimationKind, ObjectId, RecordingEngine};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn run(seed: u64) -> (RecordingEngine, Vec<SceneSummary>) {
        let mut engine = RecordingEngine::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let summaries = construct(&mut engine, &mut rng).unwrap();
        (engine, summaries)
    }

    fn summary<'a>(summaries: &'a [SceneSummary], title: &str) -> &'a SceneSummary {
        summaries.iter().find(|s| s.title == title).unwrap()
    }

    #[test]
    fn test_scene_order() {
        let (engine, summaries) = run(0);
        assert_eq!(engine.scene_titles(), SCENE_TITLES.to_vec());
        let titles: Vec<&str> = summaries.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, SCENE_TITLES.to_vec());
    }

    #[test]
    fn test_nothing_survives_a_scene_boundary() {
        let (engine, _) = run(0);
        let mut boundaries = 0;
        for event in engine.events() {
            if let Event::SceneEnded { title, live } = event {
                assert!(live.is_empty(), "'{}' left {:?} behind", title, live);
                boundaries += 1;
            }
        }
        assert_eq!(boundaries, 6);
        assert!(engine.live_ids().is_empty());
    }

    #[test]
    fn test_everything_created_is_shown_and_removed() {
        let (_, summaries) = run(0);
        for summary in &summaries {
            assert_eq!(summary.created, summary.entered, "{}", summary.title);
            assert_eq!(summary.created, summary.removed, "{}", summary.title);
        }
    }

    #[test]
    fn test_proof_ends_without_fade() {
        let (_, summaries) = run(0);
        for summary in &summaries {
            if summary.title == "Proof" {
                assert_ne!(summary.faded, summary.created);
                let last = summary.beats.last().unwrap();
                assert!(last.tracks.iter().all(|t| !t.kind.is_exit()));
            } else {
                assert_eq!(summary.faded, summary.created, "{}", summary.title);
            }
        }
    }

    #[test]
    fn test_proof_steps_fade_together() {
        let (_, summaries) = run(0);
        let proof = summary(&summaries, "Proof");
        let fades: Vec<&Beat> = proof
            .beats
            .iter()
            .filter(|b| b.tracks.iter().any(|t| t.kind.is_exit()))
            .collect();
        assert_eq!(fades.len(), 1);
        assert_eq!(fades[0].tracks.len(), 4);
        assert_eq!(fades[0].targets().count(), 3 + 2 + 3 + 3);
    }

    #[test]
    fn test_hold_totals() {
        let (_, summaries) = run(0);
        let holds: Vec<f32> = summaries.iter().map(|s| s.hold).collect();
        assert_eq!(holds, vec![2.0, 2.0, 3.0, 11.0, 2.0, 5.0]);
    }

    #[test]
    fn test_timeline_length() {
        let (engine, summaries) = run(0);
        let total: f32 = summaries.iter().map(SceneSummary::duration).sum();
        assert!((engine.elapsed() - total).abs() < 1e-4);
        let symmetry = summary(&summaries, "Symmetry");
        assert_eq!(symmetry.animated(), 1.0 + 1.0 + 1.0 + 3.0 + 1.0);
    }

    #[test]
    fn test_examples_pair_statements_with_vignettes() {
        let (engine, summaries) = run(0);
        let examples = summary(&summaries, "Examples");
        // title, five statements, then 3 + 2 + 2 + 5 + 2 vignette members
        assert_eq!(examples.created.len(), 1 + 5 + 14);

        let statements: Vec<String> = engine
            .events()
            .iter()
            .filter_map(|e| match e {
                Event::Created { object, .. } => match &object.shape {
                    Shape::Text { content, .. } if content.contains(r"$\rightarrow$") => {
                        Some(content.clone())
                    }
                    _ => None,
                },
                _ => None,
            })
            .collect();
        let expected: Vec<String> = TABLE.iter().map(|r| r.statement.to_string()).collect();
        assert_eq!(statements, expected);

        let motion = &examples.beats[3];
        assert_eq!(motion.duration, 3.0);
        let rotations = motion
            .tracks
            .iter()
            .filter(|t| matches!(t.kind, AnimationKind::Rotate { .. }))
            .count();
        assert_eq!(rotations, 3);
        assert!(motion
            .tracks
            .iter()
            .any(|t| matches!(t.kind, AnimationKind::Scale { factor, .. } if factor == 1.2)));
    }

    #[test]
    fn test_reversible_dot_returns() {
        let mut engine = RecordingEngine::new();
        let summary = examples(&mut engine).unwrap();
        let dot = *summary.created.last().unwrap();
        let start = engine
            .events()
            .iter()
            .find_map(|e| match e {
                Event::Created { id, object } if *id == dot => Some(object.center()),
                _ => None,
            })
            .unwrap();
        let end = summary
            .beats
            .iter()
            .flat_map(|b| &b.tracks)
            .filter(|t| t.targets.contains(&dot))
            .filter_map(|t| match t.kind {
                AnimationKind::Shift(offset) => Some(offset),
                _ => None,
            })
            .fold(start, |p, offset| p + offset);
        assert!((end - start).length() < 1e-5);
    }

    #[test]
    fn test_particles_in_closing_scene() {
        let (engine, summaries) = run(3);
        let conclusion = summary(&summaries, "Conclusion");
        let particles: Vec<ObjectId> = conclusion.created[4..].to_vec();
        assert_eq!(particles.len(), particles::PARTICLE_COUNT);

        let wiggle = conclusion
            .beats
            .iter()
            .find(|b| b.rate == RateFunc::Wiggle)
            .unwrap();
        assert_eq!(wiggle.duration, 2.0);
        assert_eq!(wiggle.targets().collect::<Vec<_>>(), particles);

        for event in engine.events() {
            if let Event::Created { id, object } = event {
                if particles.contains(id) {
                    assert!(particles::PARTICLE_COLORS.contains(&object.color));
                    let c = object.center();
                    assert!(c.x.abs() <= 4.0 && c.y.abs() <= 2.0);
                }
            }
        }
    }

    fn is_particle(event: &Event) -> bool {
        matches!(event, Event::Created { object, .. } if matches!(object.shape, Shape::Dot { .. }))
    }

    #[test]
    fn test_same_seed_same_events() {
        let (a, _) = run(42);
        let (b, _) = run(42);
        assert_eq!(a.events(), b.events());
    }

    #[test]
    fn test_seed_only_changes_particles() {
        let (a, _) = run(1);
        let (b, _) = run(2);
        assert_eq!(a.events().len(), b.events().len());
        assert_eq!(a.elapsed(), b.elapsed());

        let conclusion_start = a
            .events()
            .iter()
            .position(|e| matches!(e, Event::SceneStarted(t) if t == "Conclusion"))
            .unwrap();
        let mut differing = 0;
        for (i, (x, y)) in a.events().iter().zip(b.events()).enumerate() {
            if x != y {
                assert!(i > conclusion_start && is_particle(x) && is_particle(y), "{:?}", x);
                differing += 1;
            }
        }
        assert!(differing > 0);
    }
}
