//! Procedural body builders
//!
//! Pure functions: identical inputs always produce identical trees.

use super::body::{List, Mode};
use super::primitives::{Box3, Cross, Sphere};
use glam::Vec3;

/// Deepest sponge worth building. Each level multiplies the cross count by
/// about 20; depth 6 already holds over three million bodies.
pub const MAX_MENGER_DEPTH: u32 = 6;

/// Build a Menger sponge of edge `size` centered at `center`.
///
/// The cube is split into a 3x3x3 grid. Every level contributes a [`Cross`]
/// as wide as the center cell; while `depth >= 2` the 8 corner and 12 edge
/// cells are subdivided again at one third the size. All crosses land in
/// one union list which is then cut out of a solid [`Box3`]:
///
/// ```text
/// Difference
/// ├── Box(size)
/// └── Union
///     ├── Cross(size / 3)
///     ├── Cross(size / 9)   (first corner cell)
///     └── ...
/// ```
///
/// Cells are visited x-major, then y, then z, each from -1 to +1, so the
/// child order of the union list is fixed. `depth == 0` yields the bare cube.
pub fn menger_sponge(center: Vec3, size: f32, depth: u32, color: Vec3) -> List {
    let mut crosses = List::new(Mode::Union);
    if depth > 0 {
        subdivide(&mut crosses, center, size, depth, color);
    }

    let mut sponge = List::new(Mode::Difference);
    sponge.append(Box3::from_size(center, Vec3::splat(size), color));
    sponge.append(crosses);
    sponge
}

fn subdivide(crosses: &mut List, center: Vec3, size: f32, depth: u32, color: Vec3) {
    let cell = size / 3.0;
    crosses.append(Cross::from_size(center, Vec3::splat(cell), color));

    if depth < 2 {
        return;
    }

    for x in -1..=1_i32 {
        for y in -1..=1_i32 {
            for z in -1..=1_i32 {
                // Skip the center cell and the six face centers
                let off_axis = [x, y, z].iter().filter(|&&c| c != 0).count();
                if off_axis < 2 {
                    continue;
                }
                let offset = Vec3::new(x as f32, y as f32, z as f32) * cell;
                subdivide(crosses, center + offset, cell, depth - 1, color);
            }
        }
    }
}

/// Build a sphere of radius `radius` at `center` with a same-sized sphere
/// cut out of it, offset by `1.5 * radius` along +X.
pub fn death_star(center: Vec3, radius: f32, color: Vec3) -> List {
    let mut star = List::new(Mode::Difference);
    star.append(Sphere::new(center, radius, color));
    star.append(Sphere::new(
        center + Vec3::new(1.5 * radius, 0.0, 0.0),
        radius,
        color,
    ));
    star
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sdf::{Body, Sdf};

    fn crosses_of(sponge: &List) -> &List {
        match &sponge.children()[1] {
            Body::List(l) => l,
            other => panic!("expected cross list, got {:?}", other),
        }
    }

    #[test]
    fn sponge_cross_counts_per_depth() {
        let counts: Vec<usize> = (0..=3)
            .map(|d| crosses_of(&menger_sponge(Vec3::ZERO, 3.0, d, Vec3::ONE)).len())
            .collect();
        assert_eq!(counts, vec![0, 1, 21, 421]);
    }

    #[test]
    fn sponge_is_a_box_minus_crosses() {
        let sponge = menger_sponge(Vec3::ZERO, 3.0, 2, Vec3::ONE);
        assert_eq!(sponge.mode, Mode::Difference);
        assert!(matches!(sponge.children()[0], Body::Box(_)));
        assert_eq!(crosses_of(&sponge).mode, Mode::Union);
    }

    #[test]
    fn sponge_center_tunnel_is_empty() {
        let sponge = menger_sponge(Vec3::ZERO, 3.0, 1, Vec3::ONE);

        // Center is carved out, a corner cell is solid
        assert!(sponge.distance(Vec3::ZERO) > 0.0);
        assert!(sponge.distance(Vec3::new(1.0, 1.0, 1.0)) < 0.0);
        // Outside the cube
        assert!(sponge.distance(Vec3::new(3.0, 0.0, 0.0)) > 0.0);
    }

    #[test]
    fn sponge_second_level_carves_corner_cells() {
        let sponge = menger_sponge(Vec3::ZERO, 3.0, 2, Vec3::ONE);
        // Center of the +X+Y+Z corner cell sits inside that cell's cross
        assert!(sponge.distance(Vec3::new(1.0, 1.0, 1.0)) > 0.0);
        // A corner sub-cell of that corner cell remains solid
        let solid = Vec3::new(1.0, 1.0, 1.0) + Vec3::splat(1.0 / 3.0);
        assert!(sponge.distance(solid) < 0.0);
    }

    #[test]
    fn sponge_first_recursion_visits_lowest_corner() {
        let sponge = menger_sponge(Vec3::ZERO, 3.0, 2, Vec3::ONE);
        match &crosses_of(&sponge).children()[1] {
            Body::Cross(c) => assert_eq!(c.center, Vec3::new(-1.0, -1.0, -1.0)),
            other => panic!("expected cross, got {:?}", other),
        }
    }

    #[test]
    fn generators_are_deterministic() {
        let a = menger_sponge(Vec3::new(0.5, 1.0, 2.0), 4.0, 3, Vec3::X);
        let b = menger_sponge(Vec3::new(0.5, 1.0, 2.0), 4.0, 3, Vec3::X);
        assert_eq!(a, b);

        let c = death_star(Vec3::ONE, 2.0, Vec3::Y);
        let d = death_star(Vec3::ONE, 2.0, Vec3::Y);
        assert_eq!(c, d);
    }

    #[test]
    fn death_star_center_is_inside() {
        let star = death_star(Vec3::ZERO, 5.0, Vec3::ONE);
        // Cutter sphere sits at x = 7.5, so the center is 2.5 outside it
        let d = star.distance(Vec3::ZERO);
        assert!(d < 0.0);
        assert!((d - -2.5).abs() < 1e-6);
    }

    #[test]
    fn death_star_lens_is_carved() {
        let star = death_star(Vec3::ZERO, 5.0, Vec3::ONE);
        // x = 4 is inside both spheres
        let d = star.distance(Vec3::new(4.0, 0.0, 0.0));
        assert!(d > 0.0);
        assert!((d - 1.5).abs() < 1e-6);
    }

    #[test]
    fn death_star_far_side_is_plain_sphere() {
        let star = death_star(Vec3::ZERO, 5.0, Vec3::ONE);
        assert!((star.distance(Vec3::new(-5.0, 0.0, 0.0))).abs() < 1e-6);
    }
}
