//! Wire layout shared with the compute kernel
//!
//! ```text
//! bodies:  [ sphere 0..1024 | box 0..1024 | cross 0..1024 ]   BodyRecord
//! nodes:   [ segment 0 | segment 1 | ... | segment 63 ]        TreeNode
//!            slot 0       header  (mode, child count)
//!            slot 1..=n   child   (primitive type, body index)
//!                              or (LIST_TAG, segment)
//! ```
//!
//! Segment 0 is always the root list. Every constant here is also injected
//! into the WGSL source by [`crate::build_kernel`].

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use sdtrace_core::sdf::{Body, Box3, Cross, Mode, Sdf, Sphere, Surface};
use std::fmt;

/// Distinct primitive types, each with its own body array
pub const PRIMITIVE_TYPES: usize = 3;

/// Capacity of each per-type body array
pub const MAX_BODIES_PER_TYPE: usize = 1024;

/// Lists in one scene, root included
pub const MAX_SEGMENTS: usize = 64;

/// Slots per segment; slot 0 is the header
pub const SEGMENT_SLOTS: usize = 512;

/// Depth of the kernel's traversal stack
pub const MAX_STACK_DEPTH: usize = 16;

/// Lights carried in the uniform block
pub const MAX_LIGHTS: usize = 4;

/// Tag of a tree-node slot that points at a child segment
pub const LIST_TAG: u32 = 3;

/// Primitive type tag; also selects the body array
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum PrimitiveType {
    Sphere = 0,
    Box = 1,
    Cross = 2,
}

impl PrimitiveType {
    pub const ALL: [PrimitiveType; PRIMITIVE_TYPES] =
        [PrimitiveType::Sphere, PrimitiveType::Box, PrimitiveType::Cross];

    pub fn tag(self) -> u32 {
        self as u32
    }

    pub fn from_tag(tag: u32) -> Option<Self> {
        Self::ALL.get(tag as usize).copied()
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveType::Sphere => "sphere",
            PrimitiveType::Box => "box",
            PrimitiveType::Cross => "cross",
        };
        f.write_str(name)
    }
}

/// Header tag of a list with this mode
pub fn mode_tag(mode: Mode) -> u32 {
    match mode {
        Mode::Union => 0,
        Mode::Complement => 1,
        Mode::Intersection => 2,
        Mode::Difference => 3,
    }
}

pub fn mode_from_tag(tag: u32) -> Option<Mode> {
    Mode::ALL.get(tag as usize).copied()
}

/// One leaf body: four vec4s of geometry and color.
///
/// | type        | v0             | v1                  | v2          |
/// |-------------|----------------|---------------------|-------------|
/// | sphere      | center, radius | color, 0            | 0           |
/// | box / cross | center, 0      | half extents, 0     | color, 0    |
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct BodyRecord {
    pub data: [[f32; 4]; 4],
}

impl BodyRecord {
    pub fn sphere(sphere: &Sphere) -> Self {
        Self {
            data: [
                sphere.center.extend(sphere.radius).to_array(),
                sphere.color.extend(0.0).to_array(),
                [0.0; 4],
                [0.0; 4],
            ],
        }
    }

    /// Box or cross record; both share one layout
    pub fn cuboid(center: Vec3, half_extents: Vec3, color: Vec3) -> Self {
        Self {
            data: [
                center.extend(0.0).to_array(),
                half_extents.extend(0.0).to_array(),
                color.extend(0.0).to_array(),
                [0.0; 4],
            ],
        }
    }

    /// Record for a leaf body, `None` for lists
    pub fn from_body(body: &Body) -> Option<(PrimitiveType, Self)> {
        match body {
            Body::Sphere(s) => Some((PrimitiveType::Sphere, Self::sphere(s))),
            Body::Box(b) => Some((
                PrimitiveType::Box,
                Self::cuboid(b.center, b.half_extents, b.color),
            )),
            Body::Cross(c) => Some((
                PrimitiveType::Cross,
                Self::cuboid(c.center, c.half_extents, c.color),
            )),
            Body::List(_) => None,
        }
    }

    fn vec3(&self, i: usize) -> Vec3 {
        let [x, y, z, _] = self.data[i];
        Vec3::new(x, y, z)
    }

    /// Rebuild the primitive this record was packed from
    pub fn to_body(&self, kind: PrimitiveType) -> Body {
        match kind {
            PrimitiveType::Sphere => {
                Sphere::new(self.vec3(0), self.data[0][3], self.vec3(1)).into()
            }
            PrimitiveType::Box => Box3::new(self.vec3(0), self.vec3(1), self.vec3(2)).into(),
            PrimitiveType::Cross => Cross::new(self.vec3(0), self.vec3(1), self.vec3(2)).into(),
        }
    }

    /// Evaluate the packed primitive at `p`
    pub fn surface(&self, kind: PrimitiveType, p: Vec3) -> Surface {
        self.to_body(kind).surface(p)
    }
}

/// One slot of a list segment
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct TreeNode {
    /// Mode (header), primitive type, or [`LIST_TAG`]
    pub tag: u32,
    /// Child count (header), body index, or child segment
    pub value: u32,
}

impl TreeNode {
    pub fn header(mode: Mode, child_count: u32) -> Self {
        Self {
            tag: mode_tag(mode),
            value: child_count,
        }
    }

    pub fn body(kind: PrimitiveType, index: u32) -> Self {
        Self {
            tag: kind.tag(),
            value: index,
        }
    }

    pub fn list(segment: u32) -> Self {
        Self {
            tag: LIST_TAG,
            value: segment,
        }
    }

    pub fn is_list(self) -> bool {
        self.tag == LIST_TAG
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_sizes_match_kernel_structs() {
        assert_eq!(std::mem::size_of::<BodyRecord>(), 64);
        assert_eq!(std::mem::size_of::<TreeNode>(), 8);
    }

    #[test]
    fn list_tag_does_not_collide_with_primitive_tags() {
        for kind in PrimitiveType::ALL {
            assert_ne!(kind.tag(), LIST_TAG);
            assert_eq!(PrimitiveType::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(PrimitiveType::from_tag(LIST_TAG), None);
    }

    #[test]
    fn mode_tags_follow_mode_order() {
        for (i, mode) in Mode::ALL.into_iter().enumerate() {
            assert_eq!(mode_tag(mode), i as u32);
            assert_eq!(mode_from_tag(i as u32), Some(mode));
        }
        assert_eq!(mode_from_tag(4), None);
    }

    #[test]
    fn sphere_record_layout() {
        let s = Sphere::new(Vec3::new(1.0, 2.0, 3.0), 4.0, Vec3::new(0.1, 0.2, 0.3));
        let record = BodyRecord::sphere(&s);
        assert_eq!(record.data[0], [1.0, 2.0, 3.0, 4.0]);
        assert_eq!(record.data[1], [0.1, 0.2, 0.3, 0.0]);
        assert_eq!(record.to_body(PrimitiveType::Sphere), Body::Sphere(s));
    }

    #[test]
    fn cross_record_keeps_half_extents() {
        let c = Cross::from_size(Vec3::ONE, Vec3::new(2.0, 4.0, 6.0), Vec3::X);
        let (kind, record) = BodyRecord::from_body(&c.into()).unwrap();
        assert_eq!(kind, PrimitiveType::Cross);
        assert_eq!(record.data[1], [1.0, 2.0, 3.0, 0.0]);
    }
}
