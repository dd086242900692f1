//! CSG body tree
//!
//! A [`Body`] is either a primitive or a [`List`]: an ordered sequence of
//! child bodies folded left-to-right under one combinator [`Mode`].

use super::primitives::{Box3, Cross, Sphere};
use super::{Sdf, Surface};
use glam::Vec3;

/// Combinator applied by a [`List`] to its children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    /// Closest child wins
    #[default]
    Union,
    /// Every child is turned inside-out, then the closest wins
    Complement,
    /// Farthest child wins
    Intersection,
    /// Every later child is cut out of the running result
    Difference,
}

impl Mode {
    /// Every mode, in wire-tag order
    pub const ALL: [Mode; 4] = [
        Mode::Union,
        Mode::Complement,
        Mode::Intersection,
        Mode::Difference,
    ];

    /// Fold one more child surface into the running result.
    ///
    /// `acc` is `None` for the first child. This is the single definition of
    /// the list fold; the flattened evaluator replays it step for step.
    pub fn fold(self, acc: Option<Surface>, child: Surface) -> Surface {
        match (self, acc) {
            (Mode::Complement, None) => -child,
            (_, None) => child,
            (Mode::Union, Some(acc)) => acc.union(child),
            (Mode::Complement, Some(acc)) => acc.union(-child),
            (Mode::Intersection, Some(acc)) => acc.intersect(child),
            (Mode::Difference, Some(acc)) => acc.subtract(child),
        }
    }
}

/// A node of the scene tree
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Sphere(Sphere),
    Box(Box3),
    Cross(Cross),
    List(List),
}

impl Body {
    /// Number of primitive leaves below (and including) this node
    pub fn leaf_count(&self) -> usize {
        match self {
            Body::List(list) => list.leaf_count(),
            _ => 1,
        }
    }
}

impl Sdf for Body {
    fn surface(&self, p: Vec3) -> Surface {
        match self {
            Body::Sphere(s) => s.surface(p),
            Body::Box(b) => b.surface(p),
            Body::Cross(c) => c.surface(p),
            Body::List(l) => l.evaluate(p),
        }
    }
}

impl From<Sphere> for Body {
    fn from(s: Sphere) -> Self {
        Body::Sphere(s)
    }
}

impl From<Box3> for Body {
    fn from(b: Box3) -> Self {
        Body::Box(b)
    }
}

impl From<Cross> for Body {
    fn from(c: Cross) -> Self {
        Body::Cross(c)
    }
}

impl From<List> for Body {
    fn from(l: List) -> Self {
        Body::List(l)
    }
}

/// Ordered children combined under one [`Mode`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List {
    pub mode: Mode,
    children: Vec<Body>,
}

impl List {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            children: Vec::new(),
        }
    }

    /// Append a child at the end of the fold order
    pub fn append(&mut self, child: impl Into<Body>) {
        self.children.push(child.into());
    }

    pub fn children(&self) -> &[Body] {
        &self.children
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn leaf_count(&self) -> usize {
        self.children.iter().map(Body::leaf_count).sum()
    }

    /// Evaluate every child once and fold the results.
    ///
    /// An empty list is [`Surface::EMPTY`].
    pub fn evaluate(&self, p: Vec3) -> Surface {
        self.children
            .iter()
            .fold(None, |acc, child| Some(self.mode.fold(acc, child.surface(p))))
            .unwrap_or(Surface::EMPTY)
    }
}

impl Sdf for List {
    fn surface(&self, p: Vec3) -> Surface {
        self.evaluate(p)
    }
}
