//! Symmetry to conservation-law table and its animated vignettes

use std::f32::consts::TAU;

use crate::domain::{
    Bounds, Color, Group, Layout, Vec2, VisualObject, DOWN, LEFT, ORIGIN, RIGHT, UP,
};
use crate::engine::{Beat, ObjectId};

/// Gap between a table row and its vignette
pub const VIGNETTE_GAP: f32 = 2.0;
/// Length of the field-line arrows around the charge
pub const FIELD_LINE_LENGTH: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vignette {
    /// Circle with two red hands
    Clock,
    /// Yellow dot sliding along a short number line
    Slide,
    /// Disk with a red rim marker
    Disk,
    /// Red charge with four outward yellow arrows
    FieldLines,
    /// Green dot that moves and comes back
    Reversible,
}

pub struct Correspondence {
    pub statement: &'static str,
    pub vignette: Vignette,
}

pub const TABLE: [Correspondence; 5] = [
    Correspondence {
        statement: r"Time Symmetry $\rightarrow$ Energy Conservation",
        vignette: Vignette::Clock,
    },
    Correspondence {
        statement: r"Spatial Symmetry $\rightarrow$ Momentum Conservation",
        vignette: Vignette::Slide,
    },
    Correspondence {
        statement: r"Rotational Symmetry $\rightarrow$ Angular Momentum Conservation",
        vignette: Vignette::Disk,
    },
    Correspondence {
        statement: r"Gauge Symmetry $\rightarrow$ Charge Conservation",
        vignette: Vignette::FieldLines,
    },
    Correspondence {
        statement: r"Time Reversal Symmetry $\rightarrow$ No Conservation (Classical)",
        vignette: Vignette::Reversible,
    },
];

/// Short number line with a dot at -1, used by two vignettes
fn track_with_dot(color: Color, row: &Bounds) -> Group {
    let line = VisualObject::number_line(-2.0, 2.0, 1.0, 4.0).next_to(row, RIGHT, VIGNETTE_GAP);
    let dot = VisualObject::dot(line.number_to_point(-1.0), color);
    Group::new([line, dot])
}

impl Vignette {
    /// Build the vignette right of the table row occupying `row`
    pub fn build(self, row: &Bounds) -> Group {
        match self {
            Vignette::Clock => {
                let face = VisualObject::circle(0.5, Color::WHITE)
                    .with_fill(0.1)
                    .next_to(row, RIGHT, VIGNETTE_GAP);
                let c = face.center();
                Group::new([
                    face,
                    VisualObject::line(c, c + UP * 0.3, Color::RED),
                    VisualObject::line(c, c + RIGHT * 0.4, Color::RED),
                ])
            }
            Vignette::Slide => track_with_dot(Color::YELLOW, row),
            Vignette::Disk => {
                let disk = VisualObject::circle(0.5, Color::WHITE)
                    .with_fill(0.3)
                    .next_to(row, RIGHT, VIGNETTE_GAP);
                let marker = VisualObject::dot(disk.center() + RIGHT * 0.5, Color::RED);
                Group::new([disk, marker])
            }
            Vignette::FieldLines => {
                let charge = VisualObject::dot(ORIGIN, Color::RED).next_to(row, RIGHT, VIGNETTE_GAP);
                let c = charge.center();
                let arrows = [UP, DOWN, LEFT, RIGHT]
                    .map(|dir| VisualObject::arrow(c, c + dir * FIELD_LINE_LENGTH, Color::YELLOW));
                Group::new(std::iter::once(charge).chain(arrows))
            }
            Vignette::Reversible => track_with_dot(Color::GREEN, row),
        }
    }

    /// Add this vignette's part of the shared motion beat.
    ///
    /// `ids` are the vignette's objects in the order [`Vignette::build`]
    /// produced them and `center` is the center of its first member.
    pub fn motion(self, beat: Beat, ids: &[ObjectId], center: Vec2) -> Beat {
        match (self, ids) {
            (Vignette::Clock, [_, hour, minute]) => beat
                .rotate(&[*hour], TAU, center)
                .rotate(&[*minute], 2.0 * TAU, center),
            (Vignette::Slide | Vignette::Reversible, [_, dot]) => beat.shift(&[*dot], RIGHT * 2.0),
            (Vignette::Disk, all) => beat.rotate(all, TAU, center),
            (Vignette::FieldLines, [_, arrows @ ..]) => beat.scale(arrows, 1.2, center),
            _ => beat,
        }
    }
}
