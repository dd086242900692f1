//! SDF primitive shapes
//!
//! Each primitive stores its own center and color. Distances are pure
//! functions of position.
//!
//! Only [`Sphere`] is an exact Euclidean SDF. [`Box3`] and [`Cross`] use a
//! per-axis max/median combination that is exact inside and along the face
//! normals but overestimates near edges and corners, so a sphere-tracing step
//! there is a heuristic rather than a guaranteed-safe bound.

use super::{Sdf, Surface};
use glam::Vec3;

/// Sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
    pub color: Vec3,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, color: Vec3) -> Self {
        Self {
            center,
            radius,
            color,
        }
    }
}

impl Sdf for Sphere {
    fn surface(&self, p: Vec3) -> Surface {
        Surface::new(self.distance(p), self.color)
    }

    fn distance(&self, p: Vec3) -> f32 {
        (p - self.center).length() - self.radius
    }
}

/// Axis-aligned box (rectangular prism)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box3 {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub color: Vec3,
}

impl Box3 {
    pub fn new(center: Vec3, half_extents: Vec3, color: Vec3) -> Self {
        Self {
            center,
            half_extents,
            color,
        }
    }

    /// Create from full edge lengths
    pub fn from_size(center: Vec3, size: Vec3, color: Vec3) -> Self {
        Self::new(center, size * 0.5, color)
    }
}

impl Sdf for Box3 {
    fn surface(&self, p: Vec3) -> Surface {
        Surface::new(self.distance(p), self.color)
    }

    fn distance(&self, p: Vec3) -> f32 {
        axis_distances(p, self.center, self.half_extents).max_element()
    }
}

/// Three mutually orthogonal bars through a common center.
///
/// A point is inside when at least two of its per-axis slab distances are
/// negative, so each bar is unbounded along its own axis. This is the motif
/// cut out of the cube at every level of a Menger sponge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cross {
    pub center: Vec3,
    pub half_extents: Vec3,
    pub color: Vec3,
}

impl Cross {
    pub fn new(center: Vec3, half_extents: Vec3, color: Vec3) -> Self {
        Self {
            center,
            half_extents,
            color,
        }
    }

    /// Create from full bar widths
    pub fn from_size(center: Vec3, size: Vec3, color: Vec3) -> Self {
        Self::new(center, size * 0.5, color)
    }
}

impl Sdf for Cross {
    fn surface(&self, p: Vec3) -> Surface {
        Surface::new(self.distance(p), self.color)
    }

    fn distance(&self, p: Vec3) -> f32 {
        // Median of the three slab distances.
        let d = axis_distances(p, self.center, self.half_extents);
        d.x + d.y + d.z - d.min_element() - d.max_element()
    }
}

/// Per-axis signed slab distances
fn axis_distances(p: Vec3, center: Vec3, half_extents: Vec3) -> Vec3 {
    (p - center).abs() - half_extents
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_center_is_minus_radius() {
        let s = Sphere::new(Vec3::ZERO, 2.0, Vec3::ONE);
        assert_relative_eq!(s.distance(Vec3::ZERO), -2.0);
    }

    #[test]
    fn sphere_distance_along_each_axis() {
        let s = Sphere::new(Vec3::ZERO, 1.5, Vec3::ONE);
        for axis in [Vec3::X, Vec3::Y, Vec3::Z, -Vec3::X, -Vec3::Y, -Vec3::Z] {
            for d in [0.0_f32, 0.5, 1.5, 4.0] {
                assert_relative_eq!(s.distance(axis * d), d - 1.5, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn sphere_respects_center() {
        let s = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 1.0, Vec3::ONE);
        assert_relative_eq!(s.distance(Vec3::new(1.0, 2.0, 6.0)), 2.0);
    }

    #[test]
    fn box_is_chebyshev() {
        let b = Box3::new(Vec3::ZERO, Vec3::ONE, Vec3::ONE);

        assert_relative_eq!(b.distance(Vec3::ZERO), -1.0);
        assert_relative_eq!(b.distance(Vec3::new(3.0, 0.0, 0.0)), 2.0);
        // Corner region takes the largest axis offset, not the Euclidean one
        assert_relative_eq!(b.distance(Vec3::new(2.0, 3.0, 2.0)), 2.0);
    }

    #[test]
    fn box_from_size_halves() {
        let b = Box3::from_size(Vec3::ZERO, Vec3::new(2.0, 4.0, 6.0), Vec3::ONE);
        assert_eq!(b.half_extents, Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn cross_bars_are_inside() {
        let c = Cross::new(Vec3::ZERO, Vec3::splat(0.5), Vec3::ONE);

        // Along each bar, far from the center
        assert!(c.distance(Vec3::new(10.0, 0.0, 0.0)) < 0.0);
        assert!(c.distance(Vec3::new(0.0, 10.0, 0.0)) < 0.0);
        assert!(c.distance(Vec3::new(0.0, 0.0, 10.0)) < 0.0);

        // Off every bar
        assert!(c.distance(Vec3::new(1.0, 1.0, 0.0)) > 0.0);
        assert!(c.distance(Vec3::new(1.0, 1.0, 1.0)) > 0.0);
    }

    #[test]
    fn cross_takes_median_axis_distance() {
        let c = Cross::new(Vec3::ZERO, Vec3::ONE, Vec3::ONE);
        // Per-axis distances: (2, 0.5, -1) -> median 0.5
        assert_relative_eq!(c.distance(Vec3::new(3.0, 1.5, 0.0)), 0.5);
    }

    #[test]
    fn surfaces_carry_primitive_color() {
        let red = Vec3::new(1.0, 0.0, 0.0);
        let s = Sphere::new(Vec3::ZERO, 1.0, red);
        assert_eq!(s.surface(Vec3::X * 3.0).color, red);
    }
}
