//! Signed Distance Functions (SDF) for CSG scene definition
//!
//! SDFs represent shapes as functions that return the distance from any
//! point in space to the nearest surface. Negative values are inside,
//! positive values are outside, and zero is exactly on the surface.
//!
//! Every evaluation yields a [`Surface`]: the distance plus the color of
//! whichever body is closest under the active combinator.
//!
//! ## Example
//!
//! ```rust
//! use sdtrace_core::prelude::*;
//!
//! let mut shapes = List::new(Mode::Union);
//! shapes.append(Sphere::new(Vec3::ZERO, 1.0, Vec3::ONE));
//! shapes.append(Box3::from_size(Vec3::new(3.0, 0.0, 0.0), Vec3::splat(2.0), Vec3::X));
//!
//! assert!(shapes.evaluate(Vec3::ZERO).distance < 0.0);
//! ```

pub mod body;
pub mod generators;
pub mod primitives;

use glam::Vec3;
use std::ops::Neg;

/// Color reported where no body is present
pub const BACKGROUND: Vec3 = Vec3::ZERO;

/// The core SDF trait - anything that can report the surface nearest a point
pub trait Sdf: Send + Sync {
    /// Evaluate distance and color at point `p`.
    fn surface(&self, p: Vec3) -> Surface;

    /// Signed distance only.
    fn distance(&self, p: Vec3) -> f32 {
        self.surface(p).distance
    }
}

/// Result of a distance query: signed distance and surface color.
///
/// Comparisons between surfaces look at `distance` only; the color rides
/// along with whichever side wins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    pub distance: f32,
    pub color: Vec3,
}

impl Surface {
    /// Nothing in range: infinitely far, background colored
    pub const EMPTY: Self = Self {
        distance: f32::INFINITY,
        color: BACKGROUND,
    };

    pub fn new(distance: f32, color: Vec3) -> Self {
        Self { distance, color }
    }

    /// Keep the closer surface (smaller distance). Ties keep `self`.
    pub fn union(self, other: Self) -> Self {
        if other.distance < self.distance {
            other
        } else {
            self
        }
    }

    /// Keep the farther surface (larger distance). Ties keep `self`.
    pub fn intersect(self, other: Self) -> Self {
        if other.distance > self.distance {
            other
        } else {
            self
        }
    }

    /// Cut `other` out of `self`: `max(self, -other)`
    pub fn subtract(self, other: Self) -> Self {
        self.intersect(-other)
    }
}

impl Neg for Surface {
    type Output = Self;

    /// Turn the surface inside-out, keeping its color.
    fn neg(self) -> Self {
        Self {
            distance: -self.distance,
            color: self.color,
        }
    }
}

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create a cube centered at origin
    pub fn cube(half_size: f32) -> Self {
        Self::new(Vec3::splat(-half_size), Vec3::splat(half_size))
    }

    /// Create from center and half-extents
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Get the size of the bounding box
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Get the center of the bounding box
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        self.size() * 0.5
    }

    /// Closed containment test. Points on a face count as inside;
    /// NaN coordinates never do.
    pub fn contains(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

// Re-exports
pub use body::{Body, List, Mode};
pub use generators::{MAX_MENGER_DEPTH, death_star, menger_sponge};
pub use primitives::{Box3, Cross, Sphere};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_prefers_smaller_distance() {
        let near = Surface::new(0.5, Vec3::X);
        let far = Surface::new(2.0, Vec3::Y);

        assert_eq!(near.union(far), near);
        assert_eq!(far.union(near), near);
    }

    #[test]
    fn ties_keep_the_running_surface() {
        let a = Surface::new(1.0, Vec3::X);
        let b = Surface::new(1.0, Vec3::Y);

        assert_eq!(a.union(b).color, Vec3::X);
        assert_eq!(a.intersect(b).color, Vec3::X);
    }

    #[test]
    fn negation_flips_sign_and_keeps_color() {
        let s = -Surface::new(1.5, Vec3::Z);
        assert_eq!(s.distance, -1.5);
        assert_eq!(s.color, Vec3::Z);
    }

    #[test]
    fn subtract_takes_color_of_cutter_on_carved_faces() {
        let solid = Surface::new(-1.0, Vec3::X);
        let cutter = Surface::new(-0.5, Vec3::Y);

        let carved = solid.subtract(cutter);
        assert_eq!(carved.distance, 0.5);
        assert_eq!(carved.color, Vec3::Y);
    }

    #[test]
    fn aabb_contains_faces_but_not_nan() {
        let b = Aabb::cube(1.0);
        assert!(b.contains(Vec3::ZERO));
        assert!(b.contains(Vec3::new(1.0, 0.0, 0.0)));
        assert!(!b.contains(Vec3::new(1.01, 0.0, 0.0)));
        assert!(!b.contains(Vec3::new(f32::NAN, 0.0, 0.0)));
    }
}
