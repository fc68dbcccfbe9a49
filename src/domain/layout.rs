//! Relative placement of objects and groups
//!
//! Placement is resolved eagerly: every helper computes an offset from the
//! current bounds and translates the target, so a laid-out object carries
//! its final absolute position when it is handed to an engine.

use super::geometry::{Bounds, Edge, Vec2, EDGE_BUFF, ORIGIN};
use super::object::VisualObject;

/// Gap used by `next_to` when the narration does not specify one
pub const DEFAULT_BUFF: f32 = 0.25;

/// Anything with bounds that can be moved as a unit
pub trait Layout {
    fn bounds(&self) -> Bounds;

    fn translate(&mut self, offset: Vec2);

    fn center(&self) -> Vec2 {
        self.bounds().center()
    }

    /// Translated copy, for builder-style construction
    fn shifted(mut self, offset: Vec2) -> Self
    where
        Self: Sized,
    {
        self.translate(offset);
        self
    }

    /// Move so the centre lands on `point`
    fn moved_to(mut self, point: Vec2) -> Self
    where
        Self: Sized,
    {
        let offset = point - self.center();
        self.translate(offset);
        self
    }

    /// Place beside `other` in direction `dir`, keeping a `buff` gap
    fn next_to(self, other: &Bounds, dir: Vec2, buff: f32) -> Self
    where
        Self: Sized,
    {
        self.next_to_aligned(other, dir, buff, ORIGIN)
    }

    /// Like [`Layout::next_to`], with the perpendicular axis aligned to `aligned_edge`
    /// instead of centred
    fn next_to_aligned(mut self, other: &Bounds, dir: Vec2, buff: f32, aligned_edge: Vec2) -> Self
    where
        Self: Sized,
    {
        let target = other.critical_point(dir + aligned_edge) + dir * buff;
        let anchor = self.bounds().critical_point(-dir + aligned_edge);
        self.translate(target - anchor);
        self
    }

    /// Move flush against a screen edge
    fn to_edge(mut self, edge: Edge) -> Self
    where
        Self: Sized,
    {
        let offset = edge.offset_for(&self.bounds(), EDGE_BUFF);
        self.translate(offset);
        self
    }
}

/// Ordered collection of objects laid out as one unit
///
/// The scene that receives a group owns every member individually.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Group {
    pub members: Vec<VisualObject>,
}

impl Group {
    pub fn new(members: impl IntoIterator<Item = VisualObject>) -> Self {
        Self {
            members: members.into_iter().collect(),
        }
    }

    /// Stack members one after another in `dir`, then centre the group on the origin
    pub fn arrange(self, dir: Vec2, buff: f32) -> Self {
        self.arrange_aligned(dir, buff, ORIGIN)
    }

    /// Like [`Group::arrange`], aligning each member's `aligned_edge` with its predecessor
    pub fn arrange_aligned(mut self, dir: Vec2, buff: f32, aligned_edge: Vec2) -> Self {
        for i in 1..self.members.len() {
            let previous = self.members[i - 1].bounds();
            let member = self.members[i].clone();
            self.members[i] = member.next_to_aligned(&previous, dir, buff, aligned_edge);
        }
        self.moved_to(ORIGIN)
    }
}

impl Layout for Group {
    fn bounds(&self) -> Bounds {
        let mut members = self.members.iter().map(Layout::bounds);
        let Some(first) = members.next() else {
            return Bounds::centered(ORIGIN, 0.0, 0.0);
        };
        members.fold(first, |acc, b| acc.union(&b))
    }

    fn translate(&mut self, offset: Vec2) {
        for member in &mut self.members {
            member.translate(offset);
        }
    }
}
